//! jiradraft: draft Jira tasks from pending git changes.
//!
//! This is the main entry point for the `jiradraft` CLI. It parses arguments,
//! sets up logging, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod generator;
pub mod git;
pub mod ignore;
pub mod llm;
pub mod prompt;
pub mod prune;
pub mod sanitize;
pub mod secrets;
pub mod storage;
pub mod task;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(&cli.log_level);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(failure) => {
            if failure.error.is_user_facing() {
                debug!(error = ?failure.error, "command failed");
            } else {
                error!(error = %failure.error, "internal error");
            }

            // Print user-actionable error message to stderr
            eprintln!("Error: {}", failure.message);

            ExitCode::from(failure.exit_code() as u8)
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
