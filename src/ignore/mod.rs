//! Ignore-pattern matching for context pruning.
//!
//! Files matched here never reach the model. The shipped matcher reads
//! gitignore-style pattern files (`.gitignore`, `.llmignore` by default) and
//! compiles them with `globset`:
//!
//! - blank lines and `#` comments are skipped (`\#` and `\!` escape)
//! - `!pattern` re-includes a previously ignored path; the last match wins
//! - `dir/` only matches directories (and therefore everything under them)
//! - a pattern containing `/` is anchored at the root, otherwise it matches
//!   at any depth
//! - `*` never crosses `/`; `**` does
//! - files under an ignored directory stay ignored even if a later negation
//!   names them, as in git


use crate::diff::normalize_path;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::{debug, warn};

/// Decides whether a repository path is excluded from the model context.
pub trait IgnoreMatcher {
    /// `path` is repository-relative; implementations normalize it.
    fn ignores(&self, path: &str) -> bool;
}

/// Matcher that ignores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopIgnoreMatcher;

impl IgnoreMatcher for NoopIgnoreMatcher {
    fn ignores(&self, _path: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
struct IgnoreRule {
    negated: bool,
    dir_only: bool,
}

/// Gitignore-style matcher compiled from one or more pattern files.
#[derive(Debug, Clone)]
pub struct GitignoreMatcher {
    globs: GlobSet,
    rules: Vec<IgnoreRule>,
}

impl GitignoreMatcher {
    /// Compile the concatenation of `sources` (ignore-file contents).
    ///
    /// Patterns that fail to compile are skipped with a warning, the way git
    /// silently ignores malformed lines.
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut rules = Vec::new();

        for source in sources {
            for line in source.as_ref().lines() {
                let Some((glob, rule)) = parse_line(line) else {
                    continue;
                };
                match GlobBuilder::new(&glob).literal_separator(true).build() {
                    Ok(compiled) => {
                        builder.add(compiled);
                        rules.push(rule);
                    }
                    Err(e) => warn!(pattern = line, error = %e, "skipping invalid ignore pattern"),
                }
            }
        }

        let globs = builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "failed to compile ignore patterns; ignoring nothing");
            rules.clear();
            GlobSet::empty()
        });

        Self { globs, rules }
    }

    /// Number of active patterns.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no patterns were loaded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Last rule matching `candidate`; `dir_only` rules only apply to directories.
    fn last_match(&self, candidate: &str, is_dir: bool) -> Option<&IgnoreRule> {
        self.globs
            .matches(candidate)
            .into_iter()
            .filter(|&idx| is_dir || !self.rules[idx].dir_only)
            .max()
            .map(|idx| &self.rules[idx])
    }
}

impl IgnoreMatcher for GitignoreMatcher {
    fn ignores(&self, path: &str) -> bool {
        let path = normalize_path(path);
        if path.is_empty() || self.rules.is_empty() {
            return false;
        }

        let mut offset = 0;
        while let Some(pos) = path[offset..].find('/') {
            let dir = &path[..offset + pos];
            if self.last_match(dir, true).is_some_and(|rule| !rule.negated) {
                return true;
            }
            offset += pos + 1;
        }

        self.last_match(&path, false)
            .is_some_and(|rule| !rule.negated)
    }
}

/// Turn one ignore-file line into a glob plus its flags.
fn parse_line(line: &str) -> Option<(String, IgnoreRule)> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (negated, pattern) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let pattern = pattern
        .strip_prefix('\\')
        .filter(|rest| rest.starts_with('#') || rest.starts_with('!'))
        .unwrap_or(pattern);

    let (dir_only, pattern) = match pattern.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    if pattern.is_empty() {
        return None;
    }

    let glob = if pattern.contains('/') {
        pattern.trim_start_matches('/').to_string()
    } else {
        format!("**/{}", pattern)
    };
    if glob.is_empty() {
        return None;
    }

    Some((glob, IgnoreRule { negated, dir_only }))
}

/// Build a matcher from ignore files under `repo_root`.
///
/// Missing or unreadable files contribute no patterns.
pub fn load_ignore_matcher(repo_root: &Path, ignore_files: &[String]) -> GitignoreMatcher {
    let mut sources = Vec::new();

    for name in ignore_files {
        let path = repo_root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) if !content.trim().is_empty() => sources.push(content),
            Ok(_) => {}
            Err(e) => debug!(file = %path.display(), error = %e, "ignore file not loaded"),
        }
    }

    let matcher = GitignoreMatcher::from_sources(&sources);
    if matcher.is_empty() {
        debug!("no ignore patterns loaded");
    } else {
        debug!(patterns = matcher.len(), "loaded ignore patterns");
    }
    matcher
}
