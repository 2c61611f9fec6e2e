//! Context pruning: bound the diff data sent to the model.
//!
//! Pruning is a pure function of the snapshot, the ignore matcher and the
//! caps. Binary and ignored files are filtered out (stable order), the file
//! list is cut to `max_files`, and each remaining diff is cut to
//! `max_chars_per_file` characters. Character counts are Unicode scalar
//! values, so a cut never splits a code point. Truncation is not hunk-aware.

use crate::diff::{DiffFile, DiffSnapshot};
use crate::ignore::IgnoreMatcher;

/// Caps applied by [`ContextPruner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneOptions {
    /// Maximum number of files kept; `0` keeps none.
    pub max_files: usize,
    /// Maximum characters kept per diff; `0` empties every diff.
    pub max_chars_per_file: usize,
}

/// Record of a diff that was cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationInfo {
    /// File whose diff was cut.
    pub path: String,
    /// Diff length before truncation, in characters.
    pub original_length: usize,
    /// Diff length after truncation, in characters.
    pub truncated_to: usize,
}

/// Output of a prune pass. Lives for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneResult {
    /// The bounded snapshot (branch unchanged).
    pub snapshot: DiffSnapshot,
    /// One entry per truncated diff, in file order.
    pub truncated_files: Vec<TruncationInfo>,
    /// Eligible files beyond `max_files`.
    pub dropped_files_count: usize,
}

/// Filters and bounds diff snapshots.
#[derive(Debug, Clone, Copy)]
pub struct ContextPruner {
    options: PruneOptions,
}

impl ContextPruner {
    /// Create a pruner with the given caps.
    pub fn new(options: PruneOptions) -> Self {
        Self { options }
    }

    /// Prune `snapshot`. Never fails.
    pub fn prune(&self, snapshot: &DiffSnapshot, matcher: &dyn IgnoreMatcher) -> PruneResult {
        let eligible: Vec<&DiffFile> = snapshot
            .files
            .iter()
            .filter(|file| !file.is_binary && !matcher.ignores(&file.path))
            .collect();

        let dropped_files_count = eligible.len().saturating_sub(self.options.max_files);
        let mut truncated_files = Vec::new();

        let files = eligible
            .into_iter()
            .take(self.options.max_files)
            .map(|file| {
                let (diff, original_length) =
                    truncate_chars(&file.diff, self.options.max_chars_per_file);
                if let Some(original_length) = original_length {
                    truncated_files.push(TruncationInfo {
                        path: file.path.clone(),
                        original_length,
                        truncated_to: self.options.max_chars_per_file,
                    });
                }
                DiffFile {
                    path: file.path.clone(),
                    diff: diff.to_string(),
                    is_binary: false,
                }
            })
            .collect();

        PruneResult {
            snapshot: DiffSnapshot {
                branch: snapshot.branch.clone(),
                files,
            },
            truncated_files,
            dropped_files_count,
        }
    }
}

/// Cut `text` to `max` characters. Returns the original character count
/// when a cut happened.
fn truncate_chars(text: &str, max: usize) -> (&str, Option<usize>) {
    match text.char_indices().nth(max) {
        Some((byte_offset, _)) => (&text[..byte_offset], Some(text.chars().count())),
        None => (text, None),
    }
}
