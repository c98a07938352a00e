pub mod digest;
pub mod list;
pub mod sign;
pub mod verify;

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tocsig_core::logging_facility::Profile;
use tocsig_core::{SidecarCase, Signer, SignerConfig};

/// Options shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override how the sidecar name is derived from the manifest path
    #[arg(long, global = true, value_enum)]
    pub sidecar_case: Option<SidecarCaseArg>,

    /// Fail on markup reference cycles instead of recursing forever
    #[arg(long, global = true)]
    pub cycle_guard: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SidecarCaseArg {
    /// Upper-case the entire path
    FullPath,
    /// Upper-case only the file name
    FileName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn profile(self) -> Profile {
        match self {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

impl GlobalArgs {
    /// Load the config file (if any) and apply flag overrides
    pub fn signer(&self) -> Result<Signer, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => SignerConfig::load(path)?,
            None => SignerConfig::default(),
        };

        if let Some(case) = self.sidecar_case {
            config.sidecar_case = match case {
                SidecarCaseArg::FullPath => SidecarCase::FullPath,
                SidecarCaseArg::FileName => SidecarCase::FileName,
            };
        }
        if self.cycle_guard {
            config.cycle_guard = true;
        }

        Ok(Signer::new(config)?)
    }
}
