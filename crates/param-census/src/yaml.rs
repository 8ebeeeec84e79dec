use std::fmt;

use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_yaml::{Mapping, Number, Value};

/// Parses `text` into a [`Value`], keeping the last value of a key repeated
/// inside one mapping.
///
/// Tags are dropped and the tagged content kept.
pub(crate) fn parse_last_wins(text: &str) -> Result<Value, serde_yaml::Error> {
    LastWins.deserialize(serde_yaml::Deserializer::from_str(text))
}

struct LastWins;

impl<'de> DeserializeSeed<'de> for LastWins {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for LastWins {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    // Integers beyond 64 bits only survive as floats.
    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v as f64)))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(LastWins)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(LastWins)? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some(key) = map.next_key_seed(LastWins)? {
            let value = map.next_value_seed(LastWins)?;
            if let Some(previous) = mapping.insert(key.clone(), value) {
                log::debug!("Duplicate key {key:?}, dropping earlier value {previous:?}");
            }
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (_tag, contents): (String, _) = data.variant()?;
        contents.newtype_variant_seed(LastWins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_key_keeps_the_last_value() {
        let value = parse_last_wins("config:\n  seed: 1\n  seed: 2\n  algo: A\n").unwrap();
        let expected: Value = serde_yaml::from_str("config: {seed: 2, algo: A}").unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn repeated_top_level_key_keeps_the_last_value() {
        let value = parse_last_wins("a: {x: 1}\na: {y: 2}\n").unwrap();
        let expected: Value = serde_yaml::from_str("a: {y: 2}").unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn matches_the_plain_parser_without_duplicates() {
        let text = "base: &b {t: 30}\nlist: [1, 2.5, 'x', ~, true]\nref: *b\n";
        let plain: Value = serde_yaml::from_str(text).unwrap();
        assert_eq!(parse_last_wins(text).unwrap(), plain);
    }

    #[test]
    fn tags_are_transparent() {
        let value = parse_last_wins("run: !custom {seed: 3}\n").unwrap();
        let expected: Value = serde_yaml::from_str("run: {seed: 3}").unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn syntax_errors_still_fail() {
        assert!(parse_last_wins("config: [unclosed").is_err());
    }
}
