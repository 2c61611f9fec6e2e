//! Secret redaction for text leaving the machine.
//!
//! Every diff and every free-text instruction passes through
//! [`SecretSanitizer`] before it is rendered into a prompt. The sanitizer is
//! an ordered list of independent [`Redactor`]s; each one finds a
//! credential-shaped span and replaces it with `<REDACTED:LABEL>`. New
//! detectors are appended with [`SecretSanitizer::with_rule`]; existing ones
//! are never edited to make room.

mod rules;


use crate::diff::{DiffFile, DiffSnapshot};
use crate::error::Result;
use std::borrow::Cow;

pub use rules::{DEFAULT_RULES, RedactionStrategy, RegexRedactor};

/// A detect-and-replace step.
pub trait Redactor: Send + Sync {
    /// Label used in the `<REDACTED:LABEL>` marker.
    fn label(&self) -> &str;

    /// Replace every secret this redactor recognizes. Text outside the
    /// matched spans must be returned unchanged.
    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Marker that replaces a secret.
pub fn redaction_marker(label: &str) -> String {
    format!("<REDACTED:{}>", label)
}

/// Ordered set of redactors applied to outgoing text.
pub struct SecretSanitizer {
    rules: Vec<Box<dyn Redactor>>,
}

impl std::fmt::Debug for SecretSanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSanitizer")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.label()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl SecretSanitizer {
    /// A sanitizer with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// A sanitizer loaded with [`DEFAULT_RULES`], in order.
    ///
    /// # Returns
    ///
    /// * `Err(DraftError::Internal)` - If a built-in pattern fails to compile
    pub fn with_default_rules() -> Result<Self> {
        let mut sanitizer = Self::empty();
        for (label, pattern, strategy) in DEFAULT_RULES {
            sanitizer = sanitizer.with_rule(RegexRedactor::new(label, pattern, *strategy)?);
        }
        Ok(sanitizer)
    }

    /// Append a redactor; it runs after every existing one.
    pub fn with_rule(mut self, rule: impl Redactor + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Labels of the active rules, in application order.
    pub fn labels(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.label()).collect()
    }

    /// Redact every secret in `text`.
    pub fn sanitize_text(&self, text: &str) -> String {
        let mut sanitized = text.to_string();
        for rule in &self.rules {
            if let Cow::Owned(replaced) = rule.redact(&sanitized) {
                sanitized = replaced;
            }
        }
        sanitized
    }

    /// Redact every file diff in `snapshot`; the branch name is untouched.
    pub fn sanitize_snapshot(&self, snapshot: &DiffSnapshot) -> DiffSnapshot {
        DiffSnapshot {
            branch: snapshot.branch.clone(),
            files: snapshot
                .files
                .iter()
                .map(|file| DiffFile {
                    path: file.path.clone(),
                    diff: if file.diff.is_empty() {
                        String::new()
                    } else {
                        self.sanitize_text(&file.diff)
                    },
                    is_binary: file.is_binary,
                })
                .collect(),
        }
    }
}
