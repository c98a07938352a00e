//! Depth-first traversal over a root file and everything it references.
//!
//! Every path goes through the same cycle: read, accumulate, dispatch by
//! extension, recurse into each reference in order. A reference that does
//! not exist is logged and skipped; every other failure aborts.

use crate::config::SignerConfig;
use crate::digest::DigestAccumulator;
use crate::errors::{Result, TocSigError};
use crate::resolve::{join_reference, Resolver};
use std::path::{Path, PathBuf};

/// What a traversal fed into the accumulator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalReport {
    /// Files whose bytes were accumulated, in accumulation order
    pub visited: Vec<PathBuf>,
    /// References that did not exist and contributed nothing
    pub missing: Vec<PathBuf>,
    /// Total bytes accumulated
    pub bytes: u64,
}

/// One traversal over a single root.
///
/// The accumulator is borrowed exclusively for the traversal's lifetime.
pub struct Traversal<'a> {
    config: &'a SignerConfig,
    acc: &'a mut DigestAccumulator,
    report: TraversalReport,
    // Files currently being expanded; only maintained with the cycle guard on.
    active: Vec<PathBuf>,
}

impl<'a> Traversal<'a> {
    pub fn new(config: &'a SignerConfig, acc: &'a mut DigestAccumulator) -> Self {
        Self {
            config,
            acc,
            report: TraversalReport::default(),
            active: Vec::new(),
        }
    }

    /// Traverse from `root`, which must exist.
    ///
    /// # Errors
    /// `Io` if the root is absent, otherwise whatever `visit` returns.
    pub fn visit_root(&mut self, root: &Path) -> Result<()> {
        std::fs::metadata(root).map_err(|e| TocSigError::from_io_hard("open_root", root, e))?;
        self.visit(root)
    }

    /// Read and accumulate `path`, then expand its references.
    pub fn visit(&mut self, path: &Path) -> Result<()> {
        let content = match read_file(path) {
            Ok(content) => content,
            Err(err) if err.kind().is_soft() => {
                tracing::warn!(
                    path = %path.display(),
                    err.code = err.code(),
                    "referenced file not found, skipping"
                );
                self.report.missing.push(path.to_path_buf());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        tracing::debug!(path = %path.display(), bytes = content.len(), "reading file");
        self.acc.update(&content);
        self.report.visited.push(path.to_path_buf());
        self.report.bytes += content.len() as u64;

        let Some(resolver) = Resolver::for_path(path, self.config) else {
            return Ok(());
        };
        let references = resolver.references(path, &content, self.config)?;
        drop(content);

        let guarded = self.config.cycle_guard;
        if guarded {
            self.enter(path)?;
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        for reference in &references {
            self.visit(&join_reference(base_dir, reference))?;
        }

        if guarded {
            self.active.pop();
        }
        Ok(())
    }

    /// Accumulate a file that is included raw (never expanded) if present.
    ///
    /// Returns whether the file existed.
    pub fn include_raw(&mut self, path: &Path) -> Result<bool> {
        match read_file(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), bytes = content.len(), "reading file");
                self.acc.update(&content);
                self.report.visited.push(path.to_path_buf());
                self.report.bytes += content.len() as u64;
                Ok(true)
            }
            Err(err) if err.kind().is_soft() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn into_report(self) -> TraversalReport {
        self.report
    }

    fn enter(&mut self, path: &Path) -> Result<()> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if let Some(start) = self.active.iter().position(|p| *p == key) {
            let mut chain = self.active[start..].to_vec();
            chain.push(key);
            return Err(TocSigError::CycleDetected { chain });
        }
        self.active.push(key);
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| TocSigError::from_io("read", path, e))
}
