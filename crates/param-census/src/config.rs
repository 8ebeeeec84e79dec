use crate::document::RowPolicy;
use crate::filter::KeyFilter;

/// Fewer documents than this cannot show any variation.
pub const MIN_DOCUMENTS: usize = 2;

/// What to do when a document cannot be read or parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ParseErrorPolicy {
    /// Report the document and carry on with the others.
    #[default]
    Skip,
    /// Stop at the first failing document.
    Abort,
}

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub extensions: Vec<String>,
    pub key_filter: KeyFilter,
    pub row_policy: RowPolicy,
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for InspectConfig {
    fn default() -> Self {
        InspectConfig {
            extensions: vec![String::from("yaml")],
            key_filter: KeyFilter::default(),
            row_policy: RowPolicy::default(),
            on_parse_error: ParseErrorPolicy::default(),
        }
    }
}
