//! Jira task model and model-output parsing.
//!
//! A [`JiraTask`] is only ever produced by [`JiraTaskParser`]: free-form model
//! text is reduced to a JSON payload ([`extract_json_block`]), checked against
//! the task JSON Schema, then deserialized. Every failure along that path is a
//! [`TaskParserError`] carrying the raw text and a readable diagnosis, which
//! is what the repair prompt is built from.
//!
//! # Wire Format
//!
//! ```text
//! {
//!   "summary": "Add retry to upload client",
//!   "description": "...",
//!   "acceptanceCriteria": ["Uploads retry 3 times"],
//!   "priority": "High",
//!   "labels": ["backend"],
//!   "storyPoints": 3,
//!   "risk": "Low"
//! }
//! ```

mod extract;
mod parser;
mod schema;


use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use extract::{ExtractError, clean_json, extract_json_block};
pub use parser::{JiraTaskParser, TaskParserError};
pub use schema::JIRA_TASK_SCHEMA;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated task draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraTask {
    /// One-line title; never empty. Also the task's identity in storage.
    pub summary: String,

    /// Free-text body; never empty.
    pub description: String,

    /// Checklist items; each non-empty.
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Labels; each non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,

    /// Whole points; integral floats such as `3.0` are accepted.
    #[serde(
        default,
        deserialize_with = "deserialize_story_points",
        skip_serializing_if = "Option::is_none"
    )]
    pub story_points: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

fn deserialize_story_points<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let points = match number.as_u64() {
        Some(n) => u32::try_from(n).ok(),
        None => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
            .map(|f| f as u32),
    };

    points.map(Some).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "storyPoints must be a whole number between 0 and {}, got {}",
            u32::MAX,
            number
        ))
    })
}
