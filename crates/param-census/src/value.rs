use std::cmp::Ordering;
use std::fmt;

use serde_yaml::Value;

/// A leaf value of a flattened experiment document.
///
/// Values keep the type they were parsed with: `30` and `30.0` are different
/// values, and so are `true` and `"true"`.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Positive integers too large for `i64`.
    Unsigned(u64),
    Float(f64),
    String(String),
    /// A sequence kept whole, stored as its compact JSON rendering.
    Sequence(String),
}

impl ParamValue {
    pub fn from_yaml(value: &Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ParamValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    ParamValue::Unsigned(u)
                } else {
                    ParamValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => ParamValue::String(s.clone()),
            Value::Sequence(_) | Value::Mapping(_) => {
                ParamValue::Sequence(to_json(value).to_string())
            }
            Value::Tagged(tagged) => ParamValue::from_yaml(&tagged.value),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ParamValue::Null => 0,
            ParamValue::Bool(_) => 1,
            ParamValue::Integer(_) => 2,
            ParamValue::Unsigned(_) => 3,
            ParamValue::Float(_) => 4,
            ParamValue::String(_) => 5,
            ParamValue::Sequence(_) => 6,
        }
    }
}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ParamValue::Null, ParamValue::Null) => Ordering::Equal,
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a.cmp(b),
            (ParamValue::Integer(a), ParamValue::Integer(b)) => a.cmp(b),
            (ParamValue::Unsigned(a), ParamValue::Unsigned(b)) => a.cmp(b),
            (ParamValue::Float(a), ParamValue::Float(b)) => a.total_cmp(b),
            (ParamValue::String(a), ParamValue::String(b)) => a.cmp(b),
            (ParamValue::Sequence(a), ParamValue::Sequence(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamValue {}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => f.write_str("null"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Unsigned(u) => write!(f, "{u}"),
            // Debug keeps the fractional part, so 30.0 never prints like 30.
            ParamValue::Float(x) => write!(f, "{x:?}"),
            ParamValue::String(s) => write!(f, "{s:?}"),
            ParamValue::Sequence(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// Text used for a mapping key in a key path.
pub(crate) fn key_to_string(key: &Value) -> String {
    match key {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(_) | Value::Mapping(_) => to_json(key).to_string(),
        Value::Tagged(tagged) => key_to_string(&tagged.value),
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(u) = n.as_u64() {
                u.into()
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    // JSON has no NaN or infinity.
                    .unwrap_or_else(|| serde_json::Value::String(n.to_string()))
            }
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (key_to_string(k), to_json(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => to_json(&tagged.value),
    }
}
