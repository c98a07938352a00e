//! Verify command
//!
//! Usage: tocsig verify <MANIFEST>

use super::GlobalArgs;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Root manifest file
    pub path: PathBuf,
}

/// Execute verify; a mismatch is an error
pub fn execute(args: VerifyArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let signer = global.signer()?;
    let outcome = signer.verify(&args.path)?;

    if !outcome.is_match() {
        return Err(format!(
            "digest mismatch for {}: header has {}, files hash to {}",
            outcome.sidecar.display(),
            outcome.recorded,
            outcome.computed
        )
        .into());
    }

    println!("✓ {} matches (digest: {})", outcome.sidecar.display(), outcome.computed);
    Ok(())
}
