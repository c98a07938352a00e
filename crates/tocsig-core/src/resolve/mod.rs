//! Reference resolution
//!
//! A file's extension selects at most one resolver. The resolver turns the
//! file's raw bytes into the ordered list of reference strings it names;
//! `join_reference` anchors each one to the referencing file's directory.

pub mod manifest;
pub mod markup;

use crate::config::SignerConfig;
use crate::errors::Result;
use std::path::{Path, PathBuf};

/// Format-specific reference resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolver {
    /// Line-oriented member list
    Manifest,
    /// Element tree with file-naming reference tags
    Markup,
}

impl Resolver {
    /// Select the resolver for `path` by exact (case-sensitive) extension.
    ///
    /// Returns `None` for leaf files, which are accumulated but never expanded.
    pub fn for_path(path: &Path, config: &SignerConfig) -> Option<Resolver> {
        let ext = path.extension()?;
        if ext == config.manifest_extension.as_str() {
            Some(Resolver::Manifest)
        } else if ext == config.markup_extension.as_str() {
            Some(Resolver::Markup)
        } else {
            None
        }
    }

    /// Ordered reference strings named by `content`, the raw bytes of `path`
    pub fn references(
        &self,
        path: &Path,
        content: &[u8],
        config: &SignerConfig,
    ) -> Result<Vec<String>> {
        match self {
            Resolver::Manifest => {
                manifest::manifest_references(path, content, config.comment_prefix.as_bytes())
            }
            Resolver::Markup => markup::markup_references(
                path,
                content,
                &config.reference_tags,
                &config.file_attribute,
            ),
        }
    }
}

/// Anchor a reference string to `base_dir`.
///
/// Both `/` and `\` separate components; empty components are dropped so a
/// leading separator stays inside `base_dir`.
pub fn join_reference(base_dir: &Path, reference: &str) -> PathBuf {
    reference
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .fold(base_dir.to_path_buf(), |path, segment| path.join(segment))
}
