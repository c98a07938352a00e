//! Line-oriented manifest resolver
//!
//! Lines are split on `\n` and trimmed of ASCII whitespace (so `\r\n`
//! endings are accepted). Blank lines and lines starting with the comment
//! prefix produce nothing; every other line is one reference, in file order,
//! without deduplication.

use crate::errors::{Result, TocSigError};
use std::path::Path;

/// Ordered references listed in a manifest.
///
/// Comment lines are matched on raw bytes and never decoded; a reference line
/// that is not valid UTF-8 fails the whole manifest with `MalformedInput`.
pub fn manifest_references(
    path: &Path,
    content: &[u8],
    comment_prefix: &[u8],
) -> Result<Vec<String>> {
    let mut references = Vec::new();

    for (index, raw_line) in content.split(|b| *b == b'\n').enumerate() {
        let line = trim_line(raw_line);
        if line.is_empty() || line.starts_with(comment_prefix) {
            continue;
        }

        let reference = std::str::from_utf8(line).map_err(|e| {
            TocSigError::malformed(path, format!("line {} is not valid UTF-8: {}", index + 1, e))
        })?;
        references.push(reference.to_string());
    }

    Ok(references)
}

fn is_line_space(b: &u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0b' | b'\x0c')
}

fn trim_line(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|b| !is_line_space(b)).unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !is_line_space(b))
        .map_or(start, |i| i + 1);
    &line[start..end]
}
