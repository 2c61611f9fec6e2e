//! JSON Schema for model-produced tasks.

/// Structural contract for the task payload.
///
/// Mirrors [`super::JiraTask`]: `summary` and `description` are required
/// non-empty strings, list items must be non-empty, `priority` is one of four
/// values and `storyPoints` is an integer that fits in a `u32`. Extra fields are
/// tolerated and dropped during deserialization.
pub const JIRA_TASK_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "required": ["summary", "description"],
  "properties": {
    "summary": { "type": "string", "minLength": 1 },
    "description": { "type": "string", "minLength": 1 },
    "acceptanceCriteria": {
      "type": "array",
      "items": { "type": "string", "minLength": 1 }
    },
    "priority": { "enum": ["Low", "Medium", "High", "Critical"] },
    "labels": {
      "type": "array",
      "items": { "type": "string", "minLength": 1 }
    },
    "storyPoints": { "type": "integer", "minimum": 0, "maximum": 4294967295 },
    "risk": { "type": "string" }
  }
}"#;
