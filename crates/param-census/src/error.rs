use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Unsupported document root in {}: expected a mapping or a list of mappings, found {found}", path.display())]
    UnsupportedRoot { path: PathBuf, found: String },
    #[error("{} holds {count} records but only single-record documents are accepted", path.display())]
    MultipleRecords { path: PathBuf, count: usize },
    #[error("{found} {extensions} files found in {}. At least {needed} are needed.", folder.display())]
    TooFewDocuments {
        found: usize,
        needed: usize,
        extensions: String,
        folder: PathBuf,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
