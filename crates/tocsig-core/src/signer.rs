//! Top-level signing contract
//!
//! `process(root)` = traverse the root manifest, append the companion file if
//! present, finalize, and write the digest into the pre-existing sidecar.
//! Each call owns a fresh accumulator; nothing is shared between calls, so
//! different roots may be signed in parallel as long as no two target the
//! same sidecar.

use crate::config::SignerConfig;
use crate::digest::{DigestAccumulator, Md5Digest};
use crate::discovery::discover_manifests;
use crate::errors::Result;
use crate::sidecar::{read_header, sidecar_path, write_header};
use crate::traversal::{Traversal, TraversalReport};
use crate::{log_op_end, log_op_error, log_op_start};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tocsig_core_types::RequestId;

/// Result of signing one root manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    pub root: PathBuf,
    pub digest: Md5Digest,
    pub sidecar: PathBuf,
    pub report: TraversalReport,
}

/// Result of checking a sidecar header against a fresh digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    pub sidecar: PathBuf,
    /// Digest stored in the sidecar header
    pub recorded: Md5Digest,
    /// Digest recomputed from the current files
    pub computed: Md5Digest,
}

impl VerifyOutcome {
    pub fn is_match(&self) -> bool {
        self.recorded == self.computed
    }
}

#[derive(Debug, Clone, Default)]
pub struct Signer {
    config: SignerConfig,
}

impl Signer {
    /// Create a signer after validating `config`
    pub fn new(config: SignerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Compute the digest for `root` without touching the sidecar.
    pub fn compute(&self, root: &Path) -> Result<(Md5Digest, TraversalReport)> {
        let mut acc = DigestAccumulator::new();
        let mut traversal = Traversal::new(&self.config, &mut acc);
        traversal.visit_root(root)?;

        let companion = root
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&self.config.companion_file);
        if !traversal.include_raw(&companion)? {
            tracing::debug!(path = %companion.display(), "no companion file");
        }

        let report = traversal.into_report();
        Ok((acc.finalize(), report))
    }

    /// Sign `root`: compute its digest and write it into the sidecar header.
    ///
    /// # Errors
    /// Any hard error from traversal, or `SidecarUnavailable` when the
    /// sidecar is absent, unwritable or shorter than the header.
    pub fn process(&self, root: &Path) -> Result<SignOutcome> {
        let request_id = RequestId::new();
        let span = tracing::info_span!(
            "sign",
            request_id = %request_id,
            root = %root.display()
        );
        let _enter = span.enter();

        log_op_start!("sign");
        let start = Instant::now();

        let result = self.process_inner(root);
        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcome) => {
                log_op_end!(
                    "sign",
                    duration_ms = duration_ms,
                    files_len = outcome.report.visited.len(),
                    missing_len = outcome.report.missing.len(),
                    digest = %outcome.digest
                );
            }
            Err(err) => log_op_error!("sign", err, duration_ms = duration_ms),
        }
        result
    }

    fn process_inner(&self, root: &Path) -> Result<SignOutcome> {
        let sidecar = sidecar_path(root, self.config.sidecar_case, &self.config.sidecar_suffix)?;
        let (digest, report) = self.compute(root)?;
        write_header(&sidecar, &digest)?;

        Ok(SignOutcome {
            root: root.to_path_buf(),
            digest,
            sidecar,
            report,
        })
    }

    /// Sign every root manifest found under `dir`, in discovery order.
    ///
    /// Stops at the first hard error; roots signed before it keep their
    /// updated sidecars.
    pub fn process_tree(&self, dir: &Path) -> Result<Vec<SignOutcome>> {
        log_op_start!("sign_tree", dir = %dir.display());
        let start = Instant::now();

        let result = discover_manifests(dir, &self.config.manifest_extension).and_then(|roots| {
            roots
                .iter()
                .map(|root| self.process(root))
                .collect::<Result<Vec<_>>>()
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(outcomes) => {
                log_op_end!("sign_tree", duration_ms = duration_ms, files_len = outcomes.len());
            }
            Err(err) => log_op_error!("sign_tree", err, duration_ms = duration_ms),
        }
        result
    }

    /// Recompute the digest for `root` and compare it with the sidecar header.
    pub fn verify(&self, root: &Path) -> Result<VerifyOutcome> {
        let sidecar = sidecar_path(root, self.config.sidecar_case, &self.config.sidecar_suffix)?;
        let recorded = read_header(&sidecar)?;
        let (computed, _) = self.compute(root)?;

        Ok(VerifyOutcome {
            sidecar,
            recorded,
            computed,
        })
    }
}

/// Sign `root` with the default configuration.
pub fn process(root: &Path) -> Result<SignOutcome> {
    Signer::default().process(root)
}
