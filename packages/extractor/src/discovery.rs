//! Discovery of input documents in a directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExtractorError, Result};

/// Check that `path` exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ExtractorError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: "does not exist".to_string(),
        });
    }
    if !path.is_dir() {
        return Err(ExtractorError::InvalidDirectory {
            path: path.to_path_buf(),
            reason: "is not a directory".to_string(),
        });
    }
    Ok(())
}

/// List every document file directly inside `dir`.
///
/// No extension filtering is applied. Subdirectories are skipped and the
/// result is sorted by file name so runs are reproducible.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory(dir)?;

    let entries = fs::read_dir(dir).map_err(|e| ExtractorError::InvalidDirectory {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            tracing::debug!(path = %path.display(), "Skipping subdirectory");
            continue;
        }
        documents.push(path);
    }

    documents.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(documents)
}
