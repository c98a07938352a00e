//! Sign commands
//!
//! Usage: tocsig sign <MANIFEST>
//!        tocsig sign-tree <DIR>

use super::GlobalArgs;
use clap::Args;
use std::path::PathBuf;
use tocsig_core::SignOutcome;

#[derive(Debug, Args)]
pub struct SignArgs {
    /// Root manifest file
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct SignTreeArgs {
    /// Package directory to search for root manifests
    pub dir: PathBuf,
}

/// Execute sign
pub fn execute(args: SignArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let signer = global.signer()?;
    let outcome = signer.process(&args.path)?;
    print_outcome(&outcome);
    Ok(())
}

/// Execute sign-tree; the first failing root aborts the run
pub fn execute_tree(
    args: SignTreeArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let signer = global.signer()?;
    let outcomes = signer.process_tree(&args.dir)?;

    for outcome in &outcomes {
        print_outcome(outcome);
    }
    println!("Signed {} manifest(s)", outcomes.len());
    Ok(())
}

fn print_outcome(outcome: &SignOutcome) {
    println!(
        "✓ Signed {} -> {} (digest: {})",
        outcome.root.display(),
        outcome.sidecar.display(),
        outcome.digest
    );
    for missing in &outcome.report.missing {
        println!("  missing: {}", missing.display());
    }
}
