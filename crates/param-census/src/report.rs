use std::collections::BTreeMap;
use std::fmt;

use crate::tally::ValueCounts;

const INDENT: &str = "    ";

/// Keys whose value changed somewhere in the batch, with their value counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaryingParams {
    params: BTreeMap<String, ValueCounts>,
}

impl VaryingParams {
    pub fn get(&self, key: &str) -> Option<&ValueCounts> {
        self.params.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueCounts)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<(String, ValueCounts)> for VaryingParams {
    fn from_iter<I: IntoIterator<Item = (String, ValueCounts)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for VaryingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return writeln!(f, "No varying parameters found.");
        }

        for (key, counts) in &self.params {
            writeln!(f, "{key}")?;
            for (value, count) in counts {
                writeln!(f, "{INDENT}{value}: {count}")?;
            }
        }
        Ok(())
    }
}
