//! Configuration module for squitterrator
//!
//! This module handles the pipeline configuration:
//! - [`PipelineConfig`] - remote endpoint, logging destinations and queue tuning
//! - [`LogLevel`] - the four verbosity levels accepted on the command line
//! - TOML config files layered under command-line flags (see [`cli`])
//!
//! # Config File Location
//!
//! When no `--config` flag is given, a config file is picked up from the
//! platform config directory if it exists:
//! - **Linux**: `~/.config/squitterrator/config.toml`
//! - **macOS**: `~/Library/Application Support/squitterrator/config.toml`
//! - **Windows**: `%APPDATA%\squitterrator\config.toml`
//!
//! # Example
//!
//! ```toml
//! remote_host = "192.168.1.20"
//! remote_port = 30002
//! log_level = "INFO"
//! output_log_path = "/var/log/squitterrator/out.log"
//! ```

pub mod cli;

pub use cli::{usage_exit_code, Cli};

use crate::error::{Result, SquitterError};
use crate::types::DEFAULT_QUEUE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Application identifier for config directories
pub const APP_ID: &str = "squitterrator";

/// Config filename inside the app config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Default remote host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default remote port (raw Mode-S output of common decoders)
pub const DEFAULT_PORT: u16 = 30002;

/// Default socket read size in bytes
pub const DEFAULT_READ_CHUNK_SIZE: usize = 128;

/// Default interval at which blocked threads re-check for shutdown
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

// ==================== Log Level ====================

/// Minimum severity that gets logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// Equivalent `tracing` level
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" | "D" => Ok(LogLevel::Debug),
            "INFO" | "I" => Ok(LogLevel::Info),
            "WARNING" | "WARN" | "W" => Ok(LogLevel::Warning),
            "ERROR" | "E" => Ok(LogLevel::Error),
            other => Err(format!(
                "unknown log level '{}' (expected DEBUG, INFO, WARNING or ERROR)",
                other
            )),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, String> {
        s.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

// ==================== Pipeline Config ====================

/// Read-only pipeline configuration, shared with the ingest thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Host name or IP address of the line source
    pub remote_host: String,

    /// TCP port of the line source
    pub remote_port: u16,

    /// Minimum log severity
    pub log_level: LogLevel,

    /// File receiving ERROR events (stderr when unset)
    pub error_log_path: Option<PathBuf>,

    /// File receiving all other events (stdout when unset)
    pub output_log_path: Option<PathBuf>,

    /// Number of queue slots, a power of two
    pub queue_capacity: usize,

    /// Bytes requested per socket read
    pub read_chunk_size: usize,

    /// Upper bound on how long either thread goes without checking for shutdown
    pub poll_interval_ms: u64,

    /// Connect timeout; the OS default applies when unset
    pub connect_timeout_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            remote_host: DEFAULT_HOST.to_string(),
            remote_port: DEFAULT_PORT,
            log_level: LogLevel::default(),
            error_log_path: None,
            output_log_path: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            connect_timeout_ms: None,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SquitterError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            SquitterError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save the config as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| SquitterError::Serialization(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| {
            SquitterError::Config(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Check the values the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if self.remote_host.trim().is_empty() {
            return Err(SquitterError::Config("remote host must not be empty".into()));
        }
        if self.remote_port == 0 {
            return Err(SquitterError::Config("remote port must be non-zero".into()));
        }
        if self.queue_capacity < 2 || !self.queue_capacity.is_power_of_two() {
            return Err(SquitterError::InvalidCapacity(self.queue_capacity));
        }
        if self.read_chunk_size == 0 {
            return Err(SquitterError::Config("read chunk size must be non-zero".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(SquitterError::Config("poll interval must be non-zero".into()));
        }
        if self.connect_timeout_ms == Some(0) {
            return Err(SquitterError::Config("connect timeout must be non-zero".into()));
        }
        Ok(())
    }

    /// `host:port` of the line source
    pub fn remote_addr(&self) -> String {
        format!("{}:{}", self.remote_host, self.remote_port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
