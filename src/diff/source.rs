//! `git diff` backed snapshot source.

use super::helpers::{is_binary_from_numstat, merge_diff_entries, normalize_path};
use super::{DiffFile, DiffMode, DiffSnapshot, DiffSource};
use crate::error::Result;
use crate::git::{current_branch, run_git};
use std::path::PathBuf;
use tracing::debug;

/// One side of the working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffScope {
    Staged,
    Unstaged,
}

impl DiffScope {
    /// `git diff` arguments selecting this scope. Quoting of non-ASCII
    /// paths is disabled so names round-trip into pathspecs.
    fn args(self) -> Vec<&'static str> {
        let mut args = vec!["-c", "core.quotepath=off", "diff"];
        if self == DiffScope::Staged {
            args.push("--cached");
        }
        args
    }
}

/// Collects diffs by running `git` in the repository root.
#[derive(Debug, Clone)]
pub struct GitDiffSource {
    repo_root: PathBuf,
}

impl GitDiffSource {
    /// Create a source for the repository rooted at `repo_root`.
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    fn entries(&self, scope: DiffScope) -> Result<Vec<DiffFile>> {
        let mut args = scope.args();
        args.push("--name-only");
        let output = run_git(&self.repo_root, &args)?;

        let mut entries: Vec<DiffFile> = Vec::new();
        for path in output.lines() {
            let path = normalize_path(path);
            if entries.iter().any(|entry| entry.path == path) {
                continue;
            }
            entries.push(self.file_diff(scope, &path)?);
        }

        debug!(scope = ?scope, files = entries.len(), "collected diff entries");
        Ok(entries)
    }

    fn file_diff(&self, scope: DiffScope, path: &str) -> Result<DiffFile> {
        let mut numstat_args: Vec<&str> = scope.args();
        numstat_args.extend(["--numstat", "--", path]);
        let numstat = run_git(&self.repo_root, &numstat_args)?;

        if is_binary_from_numstat(&numstat.stdout) {
            return Ok(DiffFile::binary(path));
        }

        let mut diff_args: Vec<&str> = scope.args();
        diff_args.extend(["--", path]);
        let diff = run_git(&self.repo_root, &diff_args)?;

        Ok(DiffFile::new(path, diff.stdout))
    }
}

impl DiffSource for GitDiffSource {
    fn get_diff(&self, mode: DiffMode) -> Result<DiffSnapshot> {
        let branch = current_branch(&self.repo_root)?;

        let files = match mode {
            DiffMode::Staged => self.entries(DiffScope::Staged)?,
            DiffMode::Unstaged => self.entries(DiffScope::Unstaged)?,
            DiffMode::StagedAndUnstaged => {
                let staged = self.entries(DiffScope::Staged)?;
                let unstaged = self.entries(DiffScope::Unstaged)?;
                merge_diff_entries(staged, unstaged)
            }
        };

        Ok(DiffSnapshot { branch, files })
    }
}
