//! Command implementations for jiradraft.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, and [`Failure`], which pairs an error with the message
//! shown on the terminal.

mod check;
mod generate;
mod init;

use crate::cli::Command;
use crate::config::Config;
use crate::error::DraftError;
use crate::llm::describe_model_error;

/// Shown instead of internal error details.
const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred. Run again with --log-level debug for details.";

/// A failed command.
#[derive(Debug)]
pub struct Failure {
    pub error: DraftError,
    /// Text for the terminal.
    pub message: String,
}

impl Failure {
    /// Describe model errors in terms of the configured provider.
    pub fn with_config(error: DraftError, config: &Config) -> Self {
        match &error {
            DraftError::Model(model_error) => {
                let message = describe_model_error(
                    model_error,
                    config.provider,
                    Some(config.ollama_base_url.as_str()),
                );
                Self { error, message }
            }
            _ => Self::from(error),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

impl From<DraftError> for Failure {
    fn from(error: DraftError) -> Self {
        let message = if error.is_user_facing() {
            error.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        };
        Self { error, message }
    }
}

/// Result of a command.
pub type CommandResult = std::result::Result<(), Failure>;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> CommandResult {
    match command {
        Command::Generate(args) => generate::cmd_generate(args),
        Command::Check(args) => check::cmd_check(args),
        Command::Init(args) => init::cmd_init(args),
    }
}
