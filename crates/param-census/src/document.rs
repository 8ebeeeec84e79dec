use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::value::{ParamValue, key_to_string};
use crate::yaml::parse_last_wins;

/// Joins nested mapping keys into a key path.
pub const KEY_SEPARATOR: char = '.';

/// What to do with a document whose root is a list of records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RowPolicy {
    /// Only the first record is examined; the others are dropped.
    #[default]
    First,
    /// Every record counts as its own observation.
    All,
    /// Documents holding more than one record are an error.
    Reject,
}

/// One flattened observation: key paths mapped to leaf values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatParams {
    entries: BTreeMap<String, ParamValue>,
}

impl FlatParams {
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, path: String, value: ParamValue) {
        if let Some(previous) = self.entries.get(&path) {
            log::debug!("Key path `{path}` appears twice, replacing {previous} with {value}");
        }
        self.entries.insert(path, value);
    }
}

impl<'a> IntoIterator for &'a FlatParams {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Flattens nested mappings into dotted key paths.
///
/// Sequences and scalars are leaves. Empty nested mappings produce no key.
pub fn flatten(mapping: &Mapping) -> FlatParams {
    let mut params = FlatParams::default();
    flatten_into(&mut params, None, mapping);
    params
}

fn flatten_into(params: &mut FlatParams, prefix: Option<&str>, mapping: &Mapping) {
    for (key, value) in mapping {
        let key = key_to_string(key);
        let path = match prefix {
            Some(prefix) => format!("{prefix}{KEY_SEPARATOR}{key}"),
            None => key,
        };
        match as_mapping(value) {
            Some(nested) => flatten_into(params, Some(&path), nested),
            None => params.insert(path, ParamValue::from_yaml(value)),
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn as_mapping(value: &Value) -> Option<&Mapping> {
    untag(value).as_mapping()
}

fn describe(value: &Value) -> &'static str {
    match untag(value) {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// A single parsed experiment configuration.
#[derive(Debug, Clone)]
pub struct ExperimentDocument {
    path: PathBuf,
    root: Value,
}

impl ExperimentDocument {
    /// Reads and parses `path`. The file is only read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(path, &text)
    }

    pub fn from_yaml_str(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        if text.trim().is_empty() {
            return Ok(Self {
                path,
                root: Value::Null,
            });
        }

        let mut root = match parse_last_wins(text) {
            Ok(root) => root,
            Err(source) => return Err(Error::Yaml { path, source }),
        };
        if let Err(source) = root.apply_merge() {
            return Err(Error::Yaml { path, source });
        }

        Ok(Self { path, root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Splits the document into flattened observations.
    pub fn rows(&self, policy: RowPolicy) -> Result<Vec<FlatParams>> {
        match untag(&self.root) {
            Value::Null => Ok(Vec::new()),
            Value::Mapping(mapping) => Ok(vec![flatten(mapping)]),
            Value::Sequence(records) => self.record_rows(records, policy),
            other => Err(self.unsupported(describe(other).to_owned())),
        }
    }

    fn record_rows(&self, records: &[Value], policy: RowPolicy) -> Result<Vec<FlatParams>> {
        let mappings = records
            .iter()
            .map(|record| {
                as_mapping(record).ok_or_else(|| {
                    self.unsupported(format!("a list containing {}", describe(record)))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        match policy {
            RowPolicy::First => {
                if mappings.len() > 1 {
                    log::debug!(
                        "{} holds {} records, only the first one is examined",
                        self.path.display(),
                        mappings.len()
                    );
                }
                Ok(mappings.first().map(|m| flatten(m)).into_iter().collect())
            }
            RowPolicy::Reject if mappings.len() > 1 => Err(Error::MultipleRecords {
                path: self.path.clone(),
                count: mappings.len(),
            }),
            RowPolicy::All | RowPolicy::Reject => {
                Ok(mappings.into_iter().map(flatten).collect())
            }
        }
    }

    fn unsupported(&self, found: String) -> Error {
        Error::UnsupportedRoot {
            path: self.path.clone(),
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> ExperimentDocument {
        ExperimentDocument::from_yaml_str("test.yaml", text).unwrap()
    }

    fn single_row(text: &str) -> FlatParams {
        let mut rows = doc(text).rows(RowPolicy::First).unwrap();
        assert_eq!(rows.len(), 1);
        rows.remove(0)
    }

    #[test]
    fn nested_keys_are_joined_with_dots() {
        let row = single_row(
            r#"
config:
  algorithm:
    name: A
    weight: 1.5
  timeout: 30
metric:
  success: true
"#,
        );

        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(
            keys,
            vec![
                "config.algorithm.name",
                "config.algorithm.weight",
                "config.timeout",
                "metric.success"
            ]
        );
        assert_eq!(row.get("config.algorithm.name"), Some(&ParamValue::from("A")));
        assert_eq!(row.get("config.timeout"), Some(&ParamValue::Integer(30)));
    }

    #[test]
    fn sequences_are_leaves() {
        let row = single_row("config:\n  agents: [1, 2, 3]\n");
        assert_eq!(
            row.get("config.agents"),
            Some(&ParamValue::Sequence("[1,2,3]".to_owned()))
        );
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn empty_nested_mapping_produces_no_key() {
        let row = single_row("config:\n  extras: {}\n  seed: 4\n");
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["config.seed"]);
    }

    #[test]
    fn non_string_keys_become_path_segments() {
        let row = single_row("levels:\n  1: easy\n  2: hard\n");
        assert_eq!(row.get("levels.1"), Some(&ParamValue::from("easy")));
        assert_eq!(row.get("levels.2"), Some(&ParamValue::from("hard")));
    }

    #[test]
    fn later_colliding_path_wins() {
        let row = single_row("a.b: 1\na:\n  b: 2\n");
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("a.b"), Some(&ParamValue::Integer(2)));
    }

    #[test]
    fn merge_keys_are_applied() {
        let row = single_row(
            r#"
base: &base
  timeout: 30
config:
  <<: *base
  algorithm: A
"#,
        );
        assert_eq!(row.get("config.timeout"), Some(&ParamValue::Integer(30)));
        assert_eq!(row.get("config.algorithm"), Some(&ParamValue::from("A")));
    }

    #[test]
    fn repeated_key_keeps_the_last_value() {
        let row = single_row("config:\n  seed: 1\n  seed: 2\n  algo: A\n");
        assert_eq!(row.get("config.seed"), Some(&ParamValue::Integer(2)));
        assert_eq!(row.get("config.algo"), Some(&ParamValue::from("A")));
    }

    #[test]
    fn empty_document_has_no_rows() {
        assert!(doc("").rows(RowPolicy::First).unwrap().is_empty());
        assert!(doc("~").rows(RowPolicy::First).unwrap().is_empty());
        assert!(doc("[]").rows(RowPolicy::All).unwrap().is_empty());
    }

    const RECORDS: &str = "- {config: {algorithm: A}}\n- {config: {algorithm: B}}\n";

    #[test]
    fn first_policy_keeps_only_the_first_record() {
        let rows = doc(RECORDS).rows(RowPolicy::First).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("config.algorithm"), Some(&ParamValue::from("A")));
    }

    #[test]
    fn all_policy_keeps_every_record() {
        let rows = doc(RECORDS).rows(RowPolicy::All).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("config.algorithm"), Some(&ParamValue::from("B")));
    }

    #[test]
    fn reject_policy_refuses_several_records() {
        let err = doc(RECORDS).rows(RowPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::MultipleRecords { count: 2, .. }));

        let single = doc("- {config: {algorithm: A}}\n");
        assert_eq!(single.rows(RowPolicy::Reject).unwrap().len(), 1);
    }

    #[test]
    fn scalar_root_is_unsupported() {
        let err = doc("just text").rows(RowPolicy::First).unwrap_err();
        assert!(matches!(err, Error::UnsupportedRoot { ref found, .. } if found == "a string"));
    }

    #[test]
    fn list_of_scalars_is_unsupported() {
        let err = doc("[1, 2]").rows(RowPolicy::First).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedRoot { ref found, .. } if found == "a list containing a number")
        );
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ExperimentDocument::from_yaml_str("bad.yaml", "config: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Yaml { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }
}
