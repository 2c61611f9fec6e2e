//! Locate the JSON payload inside free-form model output.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static FENCED_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("Invalid fenced block regex")
});

static TRAILING_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("Invalid trailing comma regex"));

/// No JSON could be located.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No JSON payload found in LLM response.")]
    NoPayload,
}

/// Extract and clean the JSON payload from `raw`.
///
/// In priority order:
/// 1. The content of the first fenced code block (optionally tagged `json`,
///    any case), when non-empty
/// 2. The span from the first `{` to the last `}`
///
/// The result is passed through [`clean_json`].
pub fn extract_json_block(raw: &str) -> Result<String, ExtractError> {
    if let Some(inner) = FENCED_BLOCK_REGEX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|inner| !inner.is_empty())
    {
        return Ok(clean_json(inner.trim()));
    }

    if let (Some(first), Some(last)) = (raw.find('{'), raw.rfind('}'))
        && first < last
    {
        return Ok(clean_json(raw[first..=last].trim()));
    }

    Err(ExtractError::NoPayload)
}

/// Remove every comma that is followed only by whitespace and then `}` or `]`.
pub fn clean_json(json: &str) -> String {
    TRAILING_COMMA_REGEX.replace_all(json, "$1").into_owned()
}
