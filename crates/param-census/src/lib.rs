//! Find which parameters actually vary across a batch of experiment configs.
//!
//! Each document in a folder is parsed, flattened into dotted key paths and
//! tallied. Keys that took more than one value make up the report; metric
//! outputs and map or path identifiers are ignored by default.

pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod filter;
pub mod inspect;
pub mod report;
pub mod tally;
pub mod value;

mod yaml;

pub use config::{InspectConfig, MIN_DOCUMENTS, ParseErrorPolicy};
pub use discovery::discover_documents;
pub use document::{ExperimentDocument, FlatParams, RowPolicy, flatten};
pub use error::{Error, Result};
pub use filter::KeyFilter;
pub use inspect::{Inspection, SkippedDocument, inspect};
pub use report::VaryingParams;
pub use tally::{ParamTally, ValueCounts};
pub use value::ParamValue;
