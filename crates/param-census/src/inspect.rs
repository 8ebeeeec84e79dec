use std::path::{Path, PathBuf};

use crate::config::{InspectConfig, MIN_DOCUMENTS, ParseErrorPolicy};
use crate::discovery::discover_documents;
use crate::document::{ExperimentDocument, FlatParams};
use crate::error::{Error, Result};
use crate::report::VaryingParams;
use crate::tally::ParamTally;

/// A document left out of the tally, with the reason.
#[derive(Debug)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of inspecting a folder of experiment documents.
#[derive(Debug)]
pub struct Inspection {
    documents: Vec<PathBuf>,
    skipped: Vec<SkippedDocument>,
    tally: ParamTally,
}

impl Inspection {
    /// Every document discovered, including skipped ones.
    pub fn documents(&self) -> &[PathBuf] {
        &self.documents
    }

    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    pub fn tally(&self) -> &ParamTally {
        &self.tally
    }

    pub fn varying(&self) -> VaryingParams {
        self.tally.varying()
    }
}

/// Loads every document in `folder`, flattens it and tallies its values.
pub fn inspect(folder: &Path, config: &InspectConfig) -> Result<Inspection> {
    let documents = discover_documents(folder, &config.extensions)?;
    if documents.len() < MIN_DOCUMENTS {
        return Err(Error::TooFewDocuments {
            found: documents.len(),
            needed: MIN_DOCUMENTS,
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_uppercase())
                .collect::<Vec<_>>()
                .join("/"),
            folder: folder.to_path_buf(),
        });
    }

    let mut tally = ParamTally::default();
    let mut skipped = Vec::new();
    for path in &documents {
        match load_rows(path, config) {
            Ok(rows) => {
                if rows.is_empty() {
                    log::warn!("{} holds no parameters", path.display());
                }
                for row in &rows {
                    tally.record(row, &config.key_filter);
                }
            }
            Err(error) => match config.on_parse_error {
                ParseErrorPolicy::Abort => return Err(error),
                ParseErrorPolicy::Skip => {
                    log::debug!("Skipping document: {error}");
                    skipped.push(SkippedDocument {
                        path: path.clone(),
                        error,
                    });
                }
            },
        }
    }

    log::debug!(
        "Tallied {} keys over {} observations",
        tally.len(),
        tally.observations()
    );

    Ok(Inspection {
        documents,
        skipped,
        tally,
    })
}

fn load_rows(path: &Path, config: &InspectConfig) -> Result<Vec<FlatParams>> {
    ExperimentDocument::load(path)?.rows(config.row_policy)
}
