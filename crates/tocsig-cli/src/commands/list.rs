//! Archive listing command
//!
//! Usage: tocsig list <FOLDER> [--url URL]

use clap::Args;
use std::path::PathBuf;
use tocsig_core::listing::{list_archives, write_listing};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Folder holding the archives to publish
    pub folder: PathBuf,

    /// Download URL placed in every entry (edit per file afterwards)
    #[arg(long, default_value = "FILLME")]
    pub url: String,
}

/// Execute list
pub fn execute(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let entries = list_archives(&args.folder, &args.url)?;
    write_listing(std::io::stdout().lock(), &entries)?;
    Ok(())
}
