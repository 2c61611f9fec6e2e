//! Built-in secret detectors.

use super::{Redactor, redaction_marker};
use crate::error::{DraftError, Result};
use regex::{Captures, NoExpand, Regex};
use std::borrow::Cow;

/// How a match is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactionStrategy {
    /// The whole match becomes the marker.
    WholeMatch,
    /// Capture group 1 (header name, assignment) is kept; the rest of the
    /// match becomes the marker.
    KeepPrefix,
}

/// Default rule set: `(label, pattern, strategy)`, applied in order.
///
/// `ANTHROPIC_KEY` precedes `OPENAI_KEY` because `sk-ant-` keys also fit
/// the generic `sk-` shape.
pub const DEFAULT_RULES: &[(&str, &str, RedactionStrategy)] = &[
    (
        "PRIVATE_KEY",
        r"(?s)-----BEGIN [A-Z ]*PRIVATE KEY-----.*?-----END [A-Z ]*PRIVATE KEY-----",
        RedactionStrategy::WholeMatch,
    ),
    (
        "ANTHROPIC_KEY",
        r"\bsk-ant-[A-Za-z0-9_-]{16,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "OPENAI_KEY",
        r"\bsk-(?:proj-)?[A-Za-z0-9_-]{16,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "GROQ_KEY",
        r"\bgsk_[A-Za-z0-9_-]{16,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "GITHUB_TOKEN",
        r"\bgh[pousr]_[A-Za-z0-9]{20,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "GITHUB_PAT",
        r"\bgithub_pat_[A-Za-z0-9_]{20,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "GITLAB_TOKEN",
        r"\bglpat-[A-Za-z0-9_-]{20,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "SLACK_TOKEN",
        r"\bxox[baprs]-[A-Za-z0-9-]{10,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "STRIPE_SECRET",
        r"\bsk_(?:live|test)_[A-Za-z0-9]{10,}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "GOOGLE_API_KEY",
        r"\bAIza[0-9A-Za-z_-]{35}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "AWS_ACCESS_KEY",
        r"\b(?:AKIA|ASIA)[A-Z0-9]{16}\b",
        RedactionStrategy::WholeMatch,
    ),
    (
        "AWS_SECRET_KEY",
        r#"(?i)(\baws_secret_access_key\s*[:=]\s*['"]?)[^'"\s]+"#,
        RedactionStrategy::KeepPrefix,
    ),
    (
        "BEARER_TOKEN",
        r"(?i)(\bAuthorization:\s*Bearer\s+)[A-Za-z0-9\-._~+/]+=*",
        RedactionStrategy::KeepPrefix,
    ),
];

/// A regex-backed redactor.
#[derive(Debug, Clone)]
pub struct RegexRedactor {
    label: String,
    regex: Regex,
    strategy: RedactionStrategy,
    marker: String,
}

impl RegexRedactor {
    /// Compile a redactor.
    ///
    /// `KeepPrefix` patterns must define capture group 1.
    pub fn new(label: &str, pattern: &str, strategy: RedactionStrategy) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            DraftError::Internal(format!(
                "invalid secret pattern for {}: '{}' - {}",
                label, pattern, e
            ))
        })?;

        if strategy == RedactionStrategy::KeepPrefix && regex.captures_len() < 2 {
            return Err(DraftError::Internal(format!(
                "secret pattern for {} keeps a prefix but has no capture group",
                label
            )));
        }

        Ok(Self {
            label: label.to_string(),
            regex,
            strategy,
            marker: redaction_marker(label),
        })
    }
}

impl Redactor for RegexRedactor {
    fn label(&self) -> &str {
        &self.label
    }

    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.strategy {
            RedactionStrategy::WholeMatch => self.regex.replace_all(text, NoExpand(&self.marker)),
            RedactionStrategy::KeepPrefix => self.regex.replace_all(text, |caps: &Captures| {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                format!("{}{}", prefix, self.marker)
            }),
        }
    }
}
