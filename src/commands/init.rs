//! Implementation of the `jiradraft init` command.
//!
//! Writes `.jiradraft.yaml` with every key at its default value so the
//! file doubles as documentation. An existing file is left alone unless
//! `--force` is given.

use super::CommandResult;
use crate::cli::InitArgs;
use crate::config::Config;
use crate::context::WorkspaceContext;
use crate::error::{DraftError, Result};
use crate::fs::atomic_write_file;
use std::path::PathBuf;

const CONFIG_HEADER: &str = "\
# jiradraft configuration.
# API keys are read from OPENROUTER_API_KEY / GROQ_API_KEY, never from this file.
";

/// Execute the `jiradraft init` command.
pub fn cmd_init(args: InitArgs) -> CommandResult {
    let ctx = WorkspaceContext::resolve()?;
    let path = write_default_config(&ctx, args.force)?;

    println!("Wrote {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Export OPENROUTER_API_KEY (or pick another provider in the file)");
    println!("  2. Stage some changes and run `jiradraft generate`");
    Ok(())
}

/// Write the default config for `ctx`.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(DraftError::Config)` - The file exists and `force` is false
pub(crate) fn write_default_config(ctx: &WorkspaceContext, force: bool) -> Result<PathBuf> {
    if ctx.config_exists() && !force {
        return Err(DraftError::Config(format!(
            "config file already exists at '{}'. Use --force to overwrite it.",
            ctx.config_path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(&ctx.config_path, &format!("{}{}", CONFIG_HEADER, yaml))?;
    Ok(ctx.config_path.clone())
}
