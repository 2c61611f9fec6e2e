//! Diff snapshot model and sources.
//!
//! A [`DiffSnapshot`] is the set of changed files (with their unified diff
//! text) at the moment a task is generated, tagged with the active branch.
//! Snapshots come from a [`DiffSource`]; the shipped implementation is
//! [`GitDiffSource`], which shells out to `git diff`.
//!
//! Paths inside a snapshot are repository-relative, use forward slashes and
//! are unique: when staged and unstaged views are combined, entries for the
//! same path are merged under `### Staged` / `### Unstaged` headers.

mod helpers;
mod source;


use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use helpers::{is_binary_from_numstat, merge_diff_entries, normalize_path};
pub use source::GitDiffSource;

/// A single changed file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffFile {
    /// Repository-relative path (forward slashes).
    pub path: String,
    /// Unified diff text; empty for binary files.
    pub diff: String,
    /// Binary files are always excluded before prompting.
    pub is_binary: bool,
}

impl DiffFile {
    /// Create a text file entry.
    pub fn new(path: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diff: diff.into(),
            is_binary: false,
        }
    }

    /// Create a binary file entry (no diff text).
    pub fn binary(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diff: String::new(),
            is_binary: true,
        }
    }
}

/// Changed files at generation time, tagged with the active branch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffSnapshot {
    /// Active branch name.
    pub branch: String,
    /// Changed files, most relevant first when the source imposes an order.
    pub files: Vec<DiffFile>,
}

/// Which changes to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DiffMode {
    /// Index only (`git diff --cached`).
    #[serde(rename = "staged")]
    Staged,
    /// Working tree only (`git diff`).
    #[serde(rename = "unstaged")]
    Unstaged,
    /// Both, merged per path.
    #[default]
    #[serde(rename = "staged+unstaged")]
    StagedAndUnstaged,
}

impl DiffMode {
    /// Config/CLI spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffMode::Staged => "staged",
            DiffMode::Unstaged => "unstaged",
            DiffMode::StagedAndUnstaged => "staged+unstaged",
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "staged" => Ok(DiffMode::Staged),
            "unstaged" => Ok(DiffMode::Unstaged),
            "staged+unstaged" => Ok(DiffMode::StagedAndUnstaged),
            other => Err(format!(
                "invalid diff mode '{}' (expected staged, unstaged, or staged+unstaged)",
                other
            )),
        }
    }
}

/// Produces diff snapshots for the generator.
pub trait DiffSource {
    /// Collect the pending changes for `mode`.
    fn get_diff(&self, mode: DiffMode) -> Result<DiffSnapshot>;
}
