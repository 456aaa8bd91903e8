//! Error handling for squitterrator
//!
//! This module defines the crate error type, a Result alias, and the mapping
//! from errors to process exit codes.

use thiserror::Error;

/// Exit code for a clean shutdown
pub const EXIT_OK: u8 = 0;

/// Exit code for configuration and usage errors
pub const EXIT_CONFIG: u8 = 1;

/// Exit code when the remote endpoint could not be reached
pub const EXIT_CONNECT: u8 = 2;

/// Exit code for any other runtime failure
pub const EXIT_RUNTIME: u8 = 3;

/// Main error type for squitterrator operations
#[derive(Error, Debug)]
pub enum SquitterError {
    /// Errors related to configuration loading/validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Queue capacity that is not a power of two (or too small)
    #[error("Queue capacity {0} must be a power of two and at least 2")]
    InvalidCapacity(usize),

    /// Socket creation or connection failure
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output sink failures
    #[error("Sink error: {0}")]
    Sink(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A pipeline thread panicked or could not be spawned
    #[error("Thread error: {0}")]
    Thread(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SquitterError>,
    },
}

impl SquitterError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SquitterError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            SquitterError::Config(_)
            | SquitterError::InvalidCapacity(_)
            | SquitterError::Serialization(_) => EXIT_CONFIG,
            SquitterError::Connect { .. } => EXIT_CONNECT,
            SquitterError::WithContext { source, .. } => source.exit_code(),
            _ => EXIT_RUNTIME,
        }
    }
}

/// Result type alias for squitterrator operations
pub type Result<T> = std::result::Result<T, SquitterError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| SquitterError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SquitterError::Io(e).with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SquitterError::Config("port must be non-zero".to_string());
        assert_eq!(err.to_string(), "Configuration error: port must be non-zero");
    }

    #[test]
    fn test_error_with_context() {
        let err = SquitterError::Sink("stdout closed".to_string());
        let with_ctx = err.with_context("Failed to emit record");
        assert!(with_ctx.to_string().contains("Failed to emit record"));
        assert!(with_ctx.to_string().contains("stdout closed"));
    }

    #[test]
    fn test_exit_codes() {
        let connect = SquitterError::Connect {
            addr: "127.0.0.1:30002".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(connect.exit_code(), EXIT_CONNECT);
        assert_eq!(SquitterError::InvalidCapacity(3).exit_code(), EXIT_CONFIG);
        assert_eq!(
            SquitterError::Thread("consumer panicked".into()).exit_code(),
            EXIT_RUNTIME
        );
    }

    #[test]
    fn test_context_keeps_exit_code() {
        let err = SquitterError::Config("bad".into()).with_context("Loading config.toml");
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_io_result_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        let err = res.context("Opening log file").unwrap_err();
        assert!(err.to_string().starts_with("Opening log file"));
    }
}
