//! Command-line arguments
//!
//! Flags override values from the config file, which override the built-in
//! defaults.

use super::{default_config_path, LogLevel, PipelineConfig};
use crate::error::{Result, ResultExt, EXIT_CONFIG, EXIT_OK};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "squitterrator")]
#[command(version, about = "Read hex lines from a TCP source and decode them into 32-bit words")]
pub struct Cli {
    /// Remote host to connect to
    #[arg(short = 's', long = "server")]
    pub server: Option<String>,

    /// Remote TCP port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level: DEBUG, INFO, WARNING or ERROR (or D, I, W, E)
    #[arg(short, long = "log-level")]
    pub log_level: Option<LogLevel>,

    /// Write ERROR log lines to this file instead of stderr
    #[arg(short, long = "error-log")]
    pub error_log: Option<PathBuf>,

    /// Write other log lines to this file instead of stdout
    #[arg(short, long = "output-log")]
    pub output_log: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of queue slots (power of two)
    #[arg(long = "queue-capacity")]
    pub queue_capacity: Option<usize>,
}

impl Cli {
    /// Build the effective configuration
    ///
    /// An explicit `--config` file must exist; the default config file is
    /// only read when present.
    pub fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match (&self.config, default_config_path()) {
            (Some(path), _) => PipelineConfig::load(path)
                .with_context(|| format!("Loading config file {}", path.display()))?,
            (None, Some(path)) if path.exists() => PipelineConfig::load(&path)
                .with_context(|| format!("Loading config file {}", path.display()))?,
            _ => PipelineConfig::default(),
        };

        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite `config` with every flag that was given
    pub fn apply(self, config: &mut PipelineConfig) {
        if let Some(server) = self.server {
            config.remote_host = server;
        }
        if let Some(port) = self.port {
            config.remote_port = port;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(path) = self.error_log {
            config.error_log_path = Some(path);
        }
        if let Some(path) = self.output_log {
            config.output_log_path = Some(path);
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
    }
}

/// Exit code for a failed argument parse
///
/// clap reports `--help` and `--version` as errors; those exit cleanly.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
        _ => EXIT_CONFIG,
    }
}
