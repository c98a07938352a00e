//! Digest command (dry run)
//!
//! Usage: tocsig digest <MANIFEST> [--verbose]

use super::GlobalArgs;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DigestArgs {
    /// Root manifest file
    pub path: PathBuf,

    /// Also print every file in accumulation order
    #[arg(long, short)]
    pub verbose: bool,
}

/// Execute digest
pub fn execute(args: DigestArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let signer = global.signer()?;
    let (digest, report) = signer.compute(&args.path)?;

    println!("{}", digest);
    if args.verbose {
        for (index, path) in report.visited.iter().enumerate() {
            println!("{:>4} {}", index + 1, path.display());
        }
        for path in &report.missing {
            println!("   - {} (missing)", path.display());
        }
        println!("{} bytes", report.bytes);
    }
    Ok(())
}
