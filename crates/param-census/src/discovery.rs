use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Lists the files in `folder` (not its subfolders) carrying one of `extensions`.
///
/// Extensions are compared case-sensitively and may be given with or without
/// the leading dot. The result is sorted by path. A folder that does not exist
/// holds no documents.
pub fn discover_documents(folder: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Folder {} does not exist", folder.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(folder, e)),
    };

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(folder, e))?.path();
        if !has_extension(&path, extensions) {
            continue;
        }
        // `metadata` follows symlinks, so a link to a file counts as a file.
        // Entries that cannot be inspected are kept so loading reports them.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => documents.push(path),
            Ok(_) => log::debug!("Skipping {}: not a regular file", path.display()),
            Err(e) => {
                log::warn!("Cannot inspect {}: {e}", path.display());
                documents.push(path);
            }
        }
    }

    documents.sort();
    log::debug!(
        "Found {} documents in {}",
        documents.len(),
        folder.display()
    );
    Ok(documents)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.') == ext)
        })
}
