use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using TocSigError
pub type Result<T> = std::result::Result<T, TocSigError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error raised by the engine maps to exactly one kind, and every kind
/// maps to a stable code usable for programmatic handling and log assertions.
/// Only `MissingReference` is ever handled locally (by the orchestrator);
/// all other kinds abort the signing of the current root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced file does not exist (soft: logged and skipped)
    MissingReference,
    /// Manifest is not text, or markup failed to parse
    MalformedInput,
    /// Access to a file was denied
    PermissionDenied,
    /// The sidecar file is missing, unwritable or too short for the header
    SidecarUnavailable,
    /// Any other I/O failure
    Io,
    /// A markup file re-entered its own expansion (opt-in guard)
    CycleDetected,
    /// Configuration could not be loaded or failed validation
    InvalidConfig,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingReference => "ERR_MISSING_REFERENCE",
            ErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            ErrorKind::PermissionDenied => "ERR_PERMISSION_DENIED",
            ErrorKind::SidecarUnavailable => "ERR_SIDECAR_UNAVAILABLE",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }

    /// Whether the orchestrator tolerates this kind without aborting
    pub fn is_soft(&self) -> bool {
        matches!(self, ErrorKind::MissingReference)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for signing operations
#[derive(Error, Debug)]
pub enum TocSigError {
    /// Referenced file does not exist
    #[error("Referenced file not found: {}", path.display())]
    MissingReference { path: PathBuf },

    /// Input file could not be decoded or parsed
    #[error("Malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    /// Permission denied while reading or writing a file
    #[error("Permission denied during {op} of {}", path.display())]
    PermissionDenied { op: String, path: PathBuf },

    /// Sidecar file cannot receive the digest header
    #[error("Sidecar unavailable {}: {reason}", path.display())]
    SidecarUnavailable { path: PathBuf, reason: String },

    /// Unexpected I/O failure
    #[error("I/O error during {op} of {}: {source}", path.display())]
    Io {
        op: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Markup reference cycle (only raised when the cycle guard is enabled)
    #[error("Reference cycle detected: {}", format_chain(chain))]
    CycleDetected { chain: Vec<PathBuf> },

    /// Configuration could not be loaded or is invalid
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl TocSigError {
    /// Classify an I/O failure on `path`.
    ///
    /// `NotFound` becomes the soft `MissingReference`; callers that must treat
    /// absence as fatal re-map it themselves.
    pub fn from_io(op: &str, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => TocSigError::MissingReference {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => TocSigError::PermissionDenied {
                op: op.to_string(),
                path: path.to_path_buf(),
            },
            _ => TocSigError::Io {
                op: op.to_string(),
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Classify an I/O failure where absence is fatal (roots, walk targets).
    pub fn from_io_hard(op: &str, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => TocSigError::PermissionDenied {
                op: op.to_string(),
                path: path.to_path_buf(),
            },
            _ => TocSigError::Io {
                op: op.to_string(),
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        TocSigError::MalformedInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn sidecar(path: &Path, reason: impl Into<String>) -> Self {
        TocSigError::SidecarUnavailable {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        TocSigError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            TocSigError::MissingReference { .. } => ErrorKind::MissingReference,
            TocSigError::MalformedInput { .. } => ErrorKind::MalformedInput,
            TocSigError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            TocSigError::SidecarUnavailable { .. } => ErrorKind::SidecarUnavailable,
            TocSigError::Io { .. } => ErrorKind::Io,
            TocSigError::CycleDetected { .. } => ErrorKind::CycleDetected,
            TocSigError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Get the file the error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            TocSigError::MissingReference { path }
            | TocSigError::MalformedInput { path, .. }
            | TocSigError::PermissionDenied { path, .. }
            | TocSigError::SidecarUnavailable { path, .. }
            | TocSigError::Io { path, .. } => Some(path),
            TocSigError::CycleDetected { chain } => chain.last().map(PathBuf::as_path),
            TocSigError::InvalidConfig { .. } => None,
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
