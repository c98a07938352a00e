//! tocsig CLI
//!
//! Command-line interface for package signature digests

use clap::{Parser, Subcommand};
use tocsig_core::logging_facility;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tocsig")]
#[command(about = "tocsig - dependency-aware package signature digests", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign one root manifest into its sidecar header
    Sign(commands::sign::SignArgs),
    /// Sign every root manifest found under a directory
    SignTree(commands::sign::SignTreeArgs),
    /// Compute a root manifest's digest without writing it
    Digest(commands::digest::DigestArgs),
    /// Compare a sidecar header with a freshly computed digest
    Verify(commands::verify::VerifyArgs),
    /// Print the archive listing of a folder as JSON
    List(commands::list::ListArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.global.log_format.profile());

    let result = match cli.command {
        Commands::Sign(args) => commands::sign::execute(args, &cli.global),
        Commands::SignTree(args) => commands::sign::execute_tree(args, &cli.global),
        Commands::Digest(args) => commands::digest::execute(args, &cli.global),
        Commands::Verify(args) => commands::verify::execute(args, &cli.global),
        Commands::List(args) => commands::list::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
