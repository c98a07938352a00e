//! Root manifest discovery
//!
//! Walks a package tree and returns every file whose name ends with the
//! manifest extension, compared case-insensitively. Results come back in
//! walk order with entries sorted by file name, so repeated runs sign the
//! same roots in the same order.

use crate::errors::{Result, TocSigError};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn discover_manifests(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{}", extension.to_lowercase());
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| name.to_lowercase().ends_with(&suffix))
            .unwrap_or(false);
        if matches {
            found.push(entry.into_path());
        }
    }

    tracing::debug!(dir = %dir.display(), files_len = found.len(), "manifests discovered");
    Ok(found)
}

fn walk_error(dir: &Path, err: walkdir::Error) -> TocSigError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    match err.into_io_error() {
        Some(io_err) => TocSigError::from_io_hard("walk", &path, io_err),
        None => TocSigError::Io {
            op: "walk".to_string(),
            path,
            source: io::Error::new(io::ErrorKind::Other, "filesystem loop"),
        },
    }
}
