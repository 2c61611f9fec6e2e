//! Git command runner for jiradraft.
//!
//! Provides a thin wrapper around the `git` binary with captured stdout/stderr
//! and structured error handling. All git access goes through this module.

use crate::error::{DraftError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Returns non-blank stdout lines, trimmed.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Run a git command with the specified working directory.
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(DraftError::Git)` - On spawn failure or non-zero exit code
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            DraftError::Git(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(DraftError::Git(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// Not being inside a repository is a configuration problem (there is no
/// workspace to analyze), so it maps to `DraftError::Config` rather than
/// `DraftError::Git`.
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let output = Command::new("git")
        .current_dir(cwd.as_ref())
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .map_err(|e| {
            DraftError::Config(format!("failed to execute git: {} (is git installed?)", e))
        })?;

    let git_output = GitOutput::from_output(&output);
    if !output.status.success() || git_output.is_empty() {
        return Err(DraftError::Config(
            "not inside a git repository. Run this command from within a git repository."
                .to_string(),
        ));
    }

    Ok(PathBuf::from(&git_output.stdout))
}

/// Name of the currently checked-out branch.
///
/// Falls back to `symbolic-ref` so repositories without any commit yet
/// still report the unborn branch name.
pub fn current_branch<P: AsRef<Path>>(cwd: P) -> Result<String> {
    match run_git(&cwd, &["rev-parse", "--abbrev-ref", "HEAD"]) {
        Ok(output) => Ok(output.stdout),
        Err(err) => run_git(&cwd, &["symbolic-ref", "--short", "HEAD"])
            .map(|output| output.stdout)
            .map_err(|_| err),
    }
}
