//! CLI argument parsing for jiradraft.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::config::{ConfigOverrides, Provider};
use crate::diff::DiffMode;
use clap::{Args, Parser, Subcommand};

/// jiradraft: turn pending git changes into a Jira task draft.
///
/// The changes are pruned, scrubbed of credentials and sent to a language
/// model; the validated task is upserted into a Markdown file in the
/// repository.
#[derive(Parser, Debug)]
#[command(name = "jiradraft")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level filter (error, warn, info, debug, trace). `RUST_LOG`
    /// takes precedence when set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for jiradraft.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a task from the pending changes.
    ///
    /// Collects the diff, asks the configured model for a task and stores
    /// it in the task file.
    Generate(GenerateArgs),

    /// Check that the configured model answers.
    ///
    /// Sends a tiny prompt and reports the round-trip time.
    Check(CheckArgs),

    /// Write a default `.jiradraft.yaml` at the repository root.
    Init(InitArgs),
}

/// Arguments for the `generate` command.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Which changes to analyze (staged, unstaged, staged+unstaged).
    #[arg(short, long)]
    pub mode: Option<DiffMode>,

    /// Language code the task is written in (e.g. en, pt-BR).
    #[arg(short, long)]
    pub language: Option<String>,

    /// Extra instructions for the model.
    #[arg(short, long)]
    pub instructions: Option<String>,

    /// Model backend (openrouter, groq, ollama, command).
    #[arg(short, long)]
    pub provider: Option<Provider>,
}

impl GenerateArgs {
    /// Config keys replaced by these flags.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider,
            diff_mode: self.mode,
            prompt_language: self.language.clone(),
            custom_instructions: self.instructions.clone(),
        }
    }
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Model backend to check instead of the configured one.
    #[arg(short, long)]
    pub provider: Option<Provider>,
}

impl CheckArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider,
            ..ConfigOverrides::default()
        }
    }
}

/// Arguments for the `init` command.
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
