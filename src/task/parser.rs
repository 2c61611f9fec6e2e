//! Validating parser for model responses.

use super::JiraTask;
use super::extract::extract_json_block;
use super::schema::JIRA_TASK_SCHEMA;
use crate::error::{DraftError, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

/// A response that could not be turned into a [`JiraTask`].
///
/// Drives the repair cycle; only shown to users when repair fails too.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid Jira task JSON from LLM: {details}")]
pub struct TaskParserError {
    /// The unmodified model response.
    pub raw: String,
    /// Why it was rejected.
    pub details: String,
}

/// Parses model output into a [`JiraTask`].
///
/// The schema is compiled once in [`JiraTaskParser::new`].
pub struct JiraTaskParser {
    schema: JSONSchema,
}

impl std::fmt::Debug for JiraTaskParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraTaskParser").finish_non_exhaustive()
    }
}

impl JiraTaskParser {
    /// Compile the task schema.
    ///
    /// # Returns
    ///
    /// * `Err(DraftError::Internal)` - The built-in schema is not valid
    pub fn new() -> Result<Self> {
        let schema: Value = serde_json::from_str(JIRA_TASK_SCHEMA)
            .map_err(|e| DraftError::Internal(format!("task schema is not valid JSON: {}", e)))?;
        let schema = JSONSchema::options()
            .compile(&schema)
            .map_err(|e| DraftError::Internal(format!("task schema failed to compile: {}", e)))?;
        Ok(Self { schema })
    }

    /// Extract, validate and deserialize a task from `raw`.
    pub fn parse(&self, raw: &str) -> std::result::Result<JiraTask, TaskParserError> {
        self.parse_inner(raw).map_err(|details| TaskParserError {
            raw: raw.to_string(),
            details,
        })
    }

    fn parse_inner(&self, raw: &str) -> std::result::Result<JiraTask, String> {
        let block = extract_json_block(raw).map_err(|e| e.to_string())?;
        let value: Value = serde_json::from_str(&block).map_err(|e| e.to_string())?;

        self.schema.validate(&value).map_err(|errors| {
            errors
                .map(|error| format!("{}: {}", field_path(&error.instance_path.to_string()), error))
                .collect::<Vec<_>>()
                .join("; ")
        })?;

        serde_json::from_value(value).map_err(|e| e.to_string())
    }
}

/// `/labels/0` becomes `labels.0`; the document itself is `root`.
fn field_path(pointer: &str) -> String {
    let path = pointer.trim_start_matches('/').replace('/', ".");
    if path.is_empty() {
        "root".to_string()
    } else {
        path
    }
}
