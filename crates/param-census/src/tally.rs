use std::collections::BTreeMap;

use crate::document::FlatParams;
use crate::filter::KeyFilter;
use crate::report::VaryingParams;
use crate::value::ParamValue;

/// Number of observations for each distinct value of one key.
pub type ValueCounts = BTreeMap<ParamValue, usize>;

/// Running count of every value seen for every tallied key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTally {
    params: BTreeMap<String, ValueCounts>,
    observations: usize,
}

impl ParamTally {
    /// Counts one observation. Keys missing from `row` are left untouched.
    pub fn record(&mut self, row: &FlatParams, filter: &KeyFilter) {
        self.observations += 1;
        for (key, value) in row {
            if filter.is_ignored(key) {
                continue;
            }
            *self
                .params
                .entry(key.clone())
                .or_default()
                .entry(value.clone())
                .or_insert(0) += 1;
        }
    }

    pub fn get(&self, key: &str) -> Option<&ValueCounts> {
        self.params.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueCounts)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys tallied.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of rows recorded so far.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Keys that took more than one distinct value.
    pub fn varying(&self) -> VaryingParams {
        self.params
            .iter()
            .filter(|(_, counts)| counts.len() > 1)
            .map(|(key, counts)| (key.clone(), counts.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ExperimentDocument, RowPolicy};

    fn row(text: &str) -> FlatParams {
        ExperimentDocument::from_yaml_str("test.yaml", text)
            .unwrap()
            .rows(RowPolicy::First)
            .unwrap()
            .remove(0)
    }

    fn tally(docs: &[&str]) -> ParamTally {
        let filter = KeyFilter::default();
        let mut tally = ParamTally::default();
        for text in docs {
            tally.record(&row(text), &filter);
        }
        tally
    }

    #[test]
    fn counts_each_value_once_per_observation() {
        let tally = tally(&[
            "config: {algorithm: A, timeout: 30}",
            "config: {algorithm: B, timeout: 30}",
            "config: {algorithm: A, timeout: 30}",
        ]);

        assert_eq!(tally.observations(), 3);
        let algorithm = tally.get("config.algorithm").unwrap();
        assert_eq!(algorithm[&ParamValue::from("A")], 2);
        assert_eq!(algorithm[&ParamValue::from("B")], 1);
        assert_eq!(tally.get("config.timeout").unwrap()[&ParamValue::Integer(30)], 3);
    }

    #[test]
    fn absent_keys_are_not_counted() {
        let tally = tally(&[
            "config: {seed: 1, extra: x}",
            "config: {seed: 2}",
        ]);

        let extra = tally.get("config.extra").unwrap();
        assert_eq!(extra.len(), 1);
        assert_eq!(extra[&ParamValue::from("x")], 1);
    }

    #[test]
    fn ignored_keys_are_never_tallied() {
        let tally = tally(&[
            "metric: {success: true}\nconfig: {maps: {name: m1}, pathToOutput: /a}",
            "metric: {success: false}\nconfig: {maps: {name: m2}, pathToOutput: /b}",
        ]);

        assert!(tally.is_empty());
        assert_eq!(tally.observations(), 2);
    }

    #[test]
    fn varying_keeps_only_keys_with_several_values() {
        let tally = tally(&[
            "config: {algorithm: A, timeout: 30, shared: s}",
            "config: {algorithm: B, timeout: 30, shared: s}",
            "config: {algorithm: B, timeout: 30}",
        ]);

        let varying = tally.varying();
        assert_eq!(varying.len(), 1);
        assert!(varying.get("config.timeout").is_none());
        assert!(varying.get("config.shared").is_none());
        let algorithm = varying.get("config.algorithm").unwrap();
        assert_eq!(algorithm[&ParamValue::from("A")], 1);
        assert_eq!(algorithm[&ParamValue::from("B")], 2);
    }

    #[test]
    fn values_of_different_types_count_separately() {
        let tally = tally(&["config: {timeout: 30}", "config: {timeout: 30.0}"]);
        assert_eq!(tally.varying().get("config.timeout").unwrap().len(), 2);
    }
}
