//! Signer configuration
//!
//! Every field has a default matching the reference signature layout, so an
//! empty TOML document (or no file at all) yields a working configuration.

use crate::errors::{Result, TocSigError};
use serde::Deserialize;
use std::path::Path;

/// How the sidecar path is derived from the root manifest path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidecarCase {
    /// Upper-case the entire path, directories included (reference behavior)
    #[default]
    FullPath,
    /// Upper-case only the final path component
    FileName,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    /// Extension (without dot) that selects the manifest resolver
    pub manifest_extension: String,
    /// Extension (without dot) that selects the markup resolver
    pub markup_extension: String,
    /// Namespace-stripped element tags that carry a file reference
    pub reference_tags: Vec<String>,
    /// Attribute naming the referenced file
    pub file_attribute: String,
    /// Manifest lines starting with this prefix (after trimming) are comments
    pub comment_prefix: String,
    /// File in the root's directory appended raw after traversal, if present
    pub companion_file: String,
    pub sidecar_suffix: String,
    pub sidecar_case: SidecarCase,
    /// Fail with `CycleDetected` instead of recursing forever
    pub cycle_guard: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            manifest_extension: "toc".to_string(),
            markup_extension: "xml".to_string(),
            reference_tags: vec!["Script".to_string(), "Include".to_string()],
            file_attribute: "file".to_string(),
            comment_prefix: "#".to_string(),
            companion_file: "Bindings.xml".to_string(),
            sidecar_suffix: ".SIG".to_string(),
            sidecar_case: SidecarCase::FullPath,
            cycle_guard: false,
        }
    }
}

impl SignerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SignerConfig = toml::from_str(content)
            .map_err(|e| TocSigError::invalid_config(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TocSigError::invalid_config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("manifest_extension", &self.manifest_extension),
            ("markup_extension", &self.markup_extension),
            ("file_attribute", &self.file_attribute),
            ("comment_prefix", &self.comment_prefix),
            ("sidecar_suffix", &self.sidecar_suffix),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(TocSigError::invalid_config(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        if self.manifest_extension == self.markup_extension {
            return Err(TocSigError::invalid_config(
                "manifest_extension and markup_extension must differ",
            ));
        }

        if self.reference_tags.is_empty() || self.reference_tags.iter().any(|t| t.is_empty()) {
            return Err(TocSigError::invalid_config(
                "reference_tags must list at least one non-empty tag",
            ));
        }

        Ok(())
    }
}
