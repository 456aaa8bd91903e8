//! Log setup
//!
//! Installs a `tracing` subscriber with two outputs: ERROR events go to the
//! error log (stderr by default), everything else that passes the level
//! filter goes to the output log (stdout by default). File destinations are
//! written through `tracing-appender` worker threads; keep the returned
//! [`LogGuards`] alive until exit or the tail of the log may be lost.
//!
//! Lines look like `[2026-01-31 12:00:00] [INFO] Connected to server 127.0.0.1:30002`.
//! `RUST_LOG` takes precedence over the configured level when set.

use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt, SquitterError};
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the non-blocking log writers flushing until dropped
#[must_use = "dropping the guards stops log output"]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// `[timestamp] [LEVEL] message` event format
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] [{}] ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_label(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        _ => "TRACE",
    }
}

/// Install the global subscriber for `config`
pub fn init(config: &PipelineConfig) -> Result<LogGuards> {
    let (error_writer, error_guard) = match &config.error_log_path {
        Some(path) => file_writer(path)?,
        None => tracing_appender::non_blocking(std::io::stderr()),
    };
    let (output_writer, output_guard) = match &config.output_log_path {
        Some(path) => file_writer(path)?,
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    let level = LevelFilter::from_level(config.log_level.as_tracing_level());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    let error_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(error_writer)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);
    let output_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(output_writer)
        .with_ansi(false)
        .with_filter(filter_fn(|meta| *meta.level() != Level::ERROR));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(error_layer)
        .with(output_layer)
        .try_init()
        .map_err(|e| SquitterError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(LogGuards {
        _guards: vec![error_guard, output_guard],
    })
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating log directory {}", parent.display()))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Opening log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(file))
}
