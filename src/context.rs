//! Workspace resolution for jiradraft.
//!
//! Every command starts here: the repository root is found from any
//! directory inside the repository, and the config file, the task file and
//! the event log are resolved against it. Relative paths in the config are
//! always relative to the repository root, never to the working directory.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{DraftError, Result};
use crate::git;
use std::env;
use std::path::{Path, PathBuf};

/// Resolved paths for one invocation. All paths are absolute.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    /// Top level of the Git repository.
    pub repo_root: PathBuf,

    /// `{repo_root}/.jiradraft.yaml`; may not exist.
    pub config_path: PathBuf,
}

impl WorkspaceContext {
    /// Resolve the workspace from the current working directory.
    ///
    /// # Returns
    ///
    /// * `Ok(WorkspaceContext)` - Successfully resolved context
    /// * `Err(DraftError::Config)` - If not in a git repository (exit code 1)
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            DraftError::Config(format!("failed to get current working directory: {}", e))
        })?;

        Self::resolve_from(&cwd)
    }

    /// Resolve the workspace from a specific directory.
    pub fn resolve_from<P: AsRef<Path>>(cwd: P) -> Result<Self> {
        let repo_root = git::get_repo_root(cwd)?;
        let config_path = repo_root.join(CONFIG_FILE_NAME);

        Ok(Self {
            repo_root,
            config_path,
        })
    }

    /// Whether a config file exists at [`WorkspaceContext::config_path`].
    pub fn config_exists(&self) -> bool {
        self.config_path.is_file()
    }

    /// Load the workspace config, falling back to defaults when the file
    /// is missing.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(&self.config_path)
    }

    /// Resolve a config-supplied path against the repository root.
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.repo_root.join(candidate)
        }
    }

    /// Path of the Markdown task file.
    pub fn storage_path(&self, config: &Config) -> PathBuf {
        self.resolve_path(&config.storage_file)
    }

    /// Path of the NDJSON event log, if one is configured.
    pub fn event_log_path(&self, config: &Config) -> Option<PathBuf> {
        config
            .event_log
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(|path| self.resolve_path(path))
    }
}
