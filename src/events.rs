//! Audit log of generation runs.
//!
//! When `event_log` is configured, every run appends NDJSON records (one JSON
//! object per line) describing what was sent and what came back: pruning
//! warnings, repair attempts, the stored task summary, or the failure.
//! Diff content and prompts are never written to the log.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: What happened (`generate`, `truncate`, `drop`, `repair`, ...)
//! - `actor`: The user and machine (e.g., `user@HOST`)
//! - `details`: Freeform object with action-specific details

use crate::error::{DraftError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Diffs were cut to the per-file limit.
    Truncate,
    /// Files beyond the file limit were left out.
    Drop,
    /// The first response failed to parse; a repair prompt was sent.
    Repair,
    /// A task was generated and stored.
    Generate,
    /// Generation failed.
    Fail,
    /// Provider connectivity check.
    Check,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Truncate => write!(f, "truncate"),
            EventAction::Drop => write!(f, "drop"),
            EventAction::Repair => write!(f, "repair"),
            EventAction::Generate => write!(f, "generate"),
            EventAction::Fail => write!(f, "fail"),
            EventAction::Check => write!(f, "check"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// The actor who ran the command (e.g., `user@HOST`).
    pub actor: String,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DraftError::Internal(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// `USER@HOSTNAME`, with `unknown` for whichever part is unavailable.
fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append-only NDJSON file.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a line. Creates the file and its directory.
    ///
    /// # Returns
    ///
    /// * `Err(DraftError::Storage)` - The log could not be written
    pub fn append(&self, event: &Event) -> Result<()> {
        let line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                DraftError::Storage(format!(
                    "failed to create event log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                DraftError::Storage(format!(
                    "failed to open event log '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", line).map_err(|e| {
            DraftError::Storage(format!(
                "failed to write event log '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Read every event back, oldest first. A missing file is empty.
    pub fn read_all(&self) -> Result<Vec<Event>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DraftError::Storage(format!(
                    "failed to read event log '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    DraftError::Storage(format!(
                        "malformed event in '{}': {}",
                        self.path.display(),
                        e
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Generate);

        assert_eq!(event.action, EventAction::Generate);
        assert!(event.actor.contains('@'));
        assert!(event.details.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::new(EventAction::Drop).with_details(json!({"dropped_files": 3}));

        let line = event.to_ndjson_line().unwrap();

        assert!(!line.contains('\n'));
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["action"], "drop");
        assert_eq!(value["details"]["dropped_files"], 3);
        assert!(value["ts"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_event_action_display_matches_serde() {
        for action in [
            EventAction::Truncate,
            EventAction::Drop,
            EventAction::Repair,
            EventAction::Generate,
            EventAction::Fail,
            EventAction::Check,
        ] {
            let serialized = serde_json::to_value(action).unwrap();
            assert_eq!(serialized, json!(action.to_string()));
        }
    }

    #[test]
    fn test_append_creates_file_and_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join(".jiradraft").join("events.ndjson"));

        log.append(&Event::new(EventAction::Check)).unwrap();

        assert!(log.path().exists());
        let content = fs::read_to_string(log.path()).unwrap();
        assert!(content.ends_with('\n'));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_append_multiple_events_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("events.ndjson"));

        log.append(&Event::new(EventAction::Repair)).unwrap();
        log.append(
            &Event::new(EventAction::Generate).with_details(json!({"summary": "Fix login"})),
        )
        .unwrap();

        let events = log.read_all().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, EventAction::Repair);
        assert_eq!(events[1].action, EventAction::Generate);
        assert_eq!(events[1].details["summary"], "Fix login");
    }

    #[test]
    fn test_read_missing_log_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("none.ndjson"));
        assert!(log.read_all().unwrap().is_empty());
    }
}
