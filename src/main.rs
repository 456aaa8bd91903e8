//! squitterrator - Main Entry Point
//!
//! Connects to the configured line source and prints every decoded record
//! until the server disconnects.
//!
//! Exit codes: 0 on a clean run, 1 for usage and configuration errors, 2 when the
//! server cannot be reached, 3 for other runtime failures.

use clap::Parser;
use squitterrator::config::{usage_exit_code, Cli};
use squitterrator::error::EXIT_OK;
use squitterrator::{logging, Pipeline, SquitterError, WriterSink};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_code(&e));
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => return report_early(e),
    };

    // Initialize logging
    let _log_guards = match logging::init(&config) {
        Ok(guards) => guards,
        Err(e) => return report_early(e),
    };

    tracing::info!("Starting squitterrator");
    tracing::debug!("Configuration: {:?}", config);

    let result = Pipeline::new(config).and_then(|pipeline| pipeline.run(WriterSink::stdout()));

    match result {
        Ok(report) => {
            tracing::info!(
                "Shutting down: {} of {} lines dropped",
                report.queue.dropped,
                report.producer.lines_framed
            );
            ExitCode::from(EXIT_OK)
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Report an error raised before the logger exists
fn report_early(e: SquitterError) -> ExitCode {
    eprintln!("squitterrator: {}", e);
    ExitCode::from(e.exit_code())
}
