//! Listing the source directory.
//!
//! Produces the candidate list the batch works through: regular files that
//! pass the configured filters, in name order.

use crate::config::CompiledFilters;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// A file name plus the directory it lives in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateFile {
    pub dir: PathBuf,
    pub name: String,
}

impl CandidateFile {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// Full path of the file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// The source directory itself could not be listed.
#[derive(Debug, Error)]
#[error("Error reading directory {}: {source}", path.display())]
pub struct ScanError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Lists the regular files in `dir` accepted by `filters`, sorted by name.
///
/// Symbolic links count when they resolve to a regular file; dangling links
/// are skipped.
///
/// Entries whose names are not valid UTF-8 are skipped with a warning since
/// no rule could match them.
pub fn scan_source(dir: &Path, filters: &CompiledFilters) -> Result<Vec<CandidateFile>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        let file_path = entry.path();
        // follows symlinks, so a link to a regular file is a candidate
        match fs::metadata(&file_path) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => {
                debug!(path = %file_path.display(), "not a regular file");
                continue;
            }
            Err(e) => {
                debug!(path = %file_path.display(), error = %e, "cannot stat entry");
                continue;
            }
        }
        if !filters.should_include(&file_path) {
            debug!(path = %file_path.display(), "filtered out");
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => candidates.push(CandidateFile::new(dir, name)),
            Err(raw) => warn!(name = ?raw, "skipping file with non UTF-8 name"),
        }
    }

    candidates.sort();
    Ok(candidates)
}
