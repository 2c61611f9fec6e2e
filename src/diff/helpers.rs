//! Helper functions for diff collection.

use super::DiffFile;

/// Normalize a path to forward slashes without a leading `/` or `./`.
pub fn normalize_path(path: &str) -> String {
    let normalized = path.trim().replace('\\', "/");
    let normalized = normalized.trim_start_matches('/');
    normalized
        .strip_prefix("./")
        .unwrap_or(normalized)
        .to_string()
}

/// Decide whether `git diff --numstat` output describes a binary file.
///
/// Git reports `-\t-\tpath` for binary changes instead of line counts. Only
/// the first non-blank line is inspected; malformed output counts as text.
pub fn is_binary_from_numstat(output: &str) -> bool {
    let Some(line) = output.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return false;
    };

    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 3 {
        return false;
    }

    parts[0] == "-" || parts[1] == "-"
}

/// Merge staged and unstaged entries into one entry per path.
///
/// Staged order is kept; unstaged-only paths follow in their own order.
/// When a path appears in both views the diffs are concatenated under
/// `### Staged` / `### Unstaged` headers (blank sides are omitted) and the
/// binary flag is the OR of both.
pub fn merge_diff_entries(staged: Vec<DiffFile>, unstaged: Vec<DiffFile>) -> Vec<DiffFile> {
    let mut merged = staged;

    for entry in unstaged {
        let Some(existing) = merged.iter_mut().find(|file| file.path == entry.path) else {
            merged.push(entry);
            continue;
        };

        let mut sections = Vec::new();
        if !existing.diff.trim().is_empty() {
            sections.push(format!("### Staged\n{}", existing.diff.trim_end()));
        }
        if !entry.diff.trim().is_empty() {
            sections.push(format!("### Unstaged\n{}", entry.diff.trim_end()));
        }

        existing.diff = sections.join("\n");
        existing.is_binary = existing.is_binary || entry.is_binary;
    }

    merged
}
