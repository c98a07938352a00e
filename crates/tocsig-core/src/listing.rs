//! Archive listing
//!
//! Independent of the signature engine: each listed file is hashed whole,
//! with no reference resolution. The listing is what a patch server
//! publishes so clients can check downloads by name and digest.

use crate::digest::{DigestAccumulator, Md5Digest};
use crate::errors::{Result, TocSigError};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// One published file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListingEntry {
    pub path: String,
    pub url: String,
    /// Uppercase hex digest of the whole file
    pub md5: String,
}

/// Digest of a file's complete contents.
pub fn file_digest(path: &Path) -> Result<Md5Digest> {
    let mut file = File::open(path).map_err(|e| TocSigError::from_io_hard("open", path, e))?;
    let mut acc = DigestAccumulator::new();
    io::copy(&mut file, &mut acc).map_err(|e| TocSigError::from_io_hard("read", path, e))?;
    Ok(acc.finalize())
}

/// Whether a file name belongs in the listing: archives (`*.mpq`) and
/// libraries (`*dll`), compared case-insensitively.
pub fn is_listed(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".mpq") || lower.ends_with("dll")
}

/// List the archives and libraries directly inside `folder`.
///
/// Subdirectories are not descended. Entries are sorted by name and every
/// entry gets the same `url` placeholder.
pub fn list_archives(folder: &Path, url: &str) -> Result<Vec<ListingEntry>> {
    let entries =
        std::fs::read_dir(folder).map_err(|e| TocSigError::from_io_hard("list", folder, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TocSigError::from_io_hard("list", folder, e))?;
        match entry.file_name().into_string() {
            Ok(name) if is_listed(&name) && entry.path().is_file() => names.push(name),
            Ok(_) => {}
            Err(raw) => {
                tracing::warn!(name = ?raw, "skipping file with non UTF-8 name");
            }
        }
    }
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let digest = file_digest(&folder.join(&name))?;
            Ok(ListingEntry {
                path: name,
                url: url.to_string(),
                md5: digest.to_hex_upper(),
            })
        })
        .collect()
}

/// Write the listing as a pretty JSON array (4-space indent) plus newline.
pub fn write_listing<W: io::Write>(mut writer: W, entries: &[ListingEntry]) -> io::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    entries.serialize(&mut serializer).map_err(io::Error::from)?;
    writeln!(writer)
}
