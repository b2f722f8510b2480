//! Command-line definition and global flags.

use crate::commands;
use clap::{Args, Parser, Subcommand};
use cricp::constants;
use cricp::{CopyOptions, CriConnector, CricpConfig};
use std::path::{Path, PathBuf};

/// Copy files between the host and CRI containers through the host mount table.
#[derive(Parser, Debug)]
#[command(name = "cricp", author, version, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy files between the host and a running container
    #[command(after_help = commands::cp::AFTER_HELP)]
    Cp(commands::cp::CpArgs),

    /// Print a shell completion script
    Completion(commands::completion::CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Container runtime endpoint (unix:///path or tcp://host:port)
    #[arg(short = 'r', long, global = true, env = constants::runtime::ENDPOINT_ENV)]
    pub runtime_endpoint: Option<String>,

    /// Timeout in seconds for connecting to the runtime and for each request
    #[arg(short = 't', long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short = 'D', long, global = true)]
    pub debug: bool,

    /// Config file (default: /etc/cricp.yaml)
    #[arg(short = 'c', long, global = true, env = constants::config::PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Mount table scanned for container root filesystems
    #[arg(long, global = true, value_name = "PATH", default_value = constants::host::MOUNT_TABLE)]
    pub mount_table: PathBuf,
}

impl GlobalFlags {
    /// Load the config file named by `--config`, or the default one if present.
    pub fn load_config(&self) -> anyhow::Result<CricpConfig> {
        let config = match &self.config {
            Some(path) => CricpConfig::load(path)?,
            None => CricpConfig::load_optional(self.config_path())?,
        };
        Ok(config)
    }

    fn config_path(&self) -> &Path {
        self.config
            .as_deref()
            .unwrap_or(Path::new(constants::config::DEFAULT_PATH))
    }

    pub fn create_connector(&self, config: &CricpConfig) -> anyhow::Result<CriConnector> {
        let transport = config.endpoint(self.runtime_endpoint.as_deref())?;
        let timeout = config.timeout(self.timeout);
        tracing::debug!(
            "Using runtime endpoint {} (timeout {:?}, config {})",
            transport,
            timeout,
            self.config_path().display()
        );
        Ok(CriConnector::new(transport, timeout))
    }

    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            mount_table: self.mount_table.clone(),
            ..CopyOptions::default()
        }
    }
}
