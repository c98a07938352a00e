//! tocsig core - dependency-aware package signature engine
//!
//! Computes one MD5 digest over a root manifest and every file it
//! transitively references, then stores it in the header of the root's
//! pre-provisioned `.SIG` sidecar. This crate provides:
//! - The digest accumulator and 16-byte digest type
//! - Manifest (line list) and markup (element tree) reference resolvers
//! - The depth-first traversal with soft handling of missing references
//! - Sidecar naming and in-place header writes
//! - Root manifest discovery and whole-file archive listings

pub mod config;
pub mod digest;
pub mod discovery;
pub mod errors;
pub mod listing;
pub mod logging_facility;
pub mod resolve;
pub mod sidecar;
pub mod signer;
pub mod traversal;

// Re-export commonly used types
pub use config::{SidecarCase, SignerConfig};
pub use digest::{DigestAccumulator, Md5Digest, DIGEST_LEN};
pub use errors::{ErrorKind, Result, TocSigError};
pub use resolve::Resolver;
pub use signer::{process, SignOutcome, Signer, VerifyOutcome};
pub use traversal::TraversalReport;
