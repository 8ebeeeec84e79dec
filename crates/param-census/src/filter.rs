use derive_new::new;

/// Key paths starting with one of these are never tallied.
pub const DEFAULT_IGNORED_PREFIXES: [&str; 2] = ["metric", "config.maps"];
/// Key paths containing one of these (case-insensitive) are never tallied.
pub const DEFAULT_IGNORED_SUBSTRINGS: [&str; 1] = ["pathto"];

/// Decides which flattened keys are configuration worth comparing.
///
/// Metrics are run outputs, and map or path identifiers are expected to
/// differ between runs, so the default filter leaves them out.
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct KeyFilter {
    prefixes: Vec<String>,
    substrings: Vec<String>,
}

impl KeyFilter {
    /// A filter that keeps every key.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    pub fn with_substring(mut self, substring: impl Into<String>) -> Self {
        self.substrings.push(substring.into());
        self
    }

    pub fn is_ignored(&self, key: &str) -> bool {
        if self.prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())) {
            return true;
        }
        if self.substrings.is_empty() {
            return false;
        }
        let lowered = key.to_lowercase();
        self.substrings
            .iter()
            .any(|needle| lowered.contains(&needle.to_lowercase()))
    }
}

impl Default for KeyFilter {
    fn default() -> Self {
        let filter = DEFAULT_IGNORED_PREFIXES
            .iter()
            .fold(KeyFilter::empty(), |filter, prefix| filter.with_prefix(*prefix));
        DEFAULT_IGNORED_SUBSTRINGS
            .iter()
            .fold(filter, |filter, needle| filter.with_substring(*needle))
    }
}
