//! Non-fatal pipeline notifications.
//!
//! Truncation, dropped files and repair attempts are reported here instead of
//! failing the run. [`LogObserver`] turns them into `tracing` records and,
//! when an event log is configured, NDJSON audit events.

use super::GenerationReport;
use crate::error::DraftError;
use crate::events::{Event, EventAction, EventLog};
use crate::prune::TruncationInfo;
use crate::task::JiraTask;
use serde_json::json;
use tracing::{debug, info, warn};

/// Something worth reporting during a generation run.
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    /// Diffs were cut to the per-file character limit.
    Truncated { files: &'a [TruncationInfo] },
    /// Eligible files beyond the file limit were left out.
    Dropped { dropped: usize, kept: usize },
    /// The first response failed to parse; a repair prompt is being sent.
    RepairRequested { details: &'a str },
    /// A task was generated and stored.
    Completed {
        task: &'a JiraTask,
        report: &'a GenerationReport,
    },
    /// The run ended with an error.
    Failed { error: &'a DraftError },
}

/// Receives [`PipelineEvent`]s. Must not fail the run.
pub trait Observer {
    fn notify(&self, event: &PipelineEvent<'_>);
}

/// Logs events through `tracing` and optionally an NDJSON [`EventLog`].
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    event_log: Option<EventLog>,
}

impl LogObserver {
    pub fn new(event_log: Option<EventLog>) -> Self {
        Self { event_log }
    }

    fn record(&self, event: Event) {
        if let Some(log) = &self.event_log
            && let Err(e) = log.append(&event)
        {
            warn!(path = %log.path().display(), error = %e, "failed to append event");
        }
    }
}

impl Observer for LogObserver {
    fn notify(&self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::Truncated { files } => {
                for file in files.iter() {
                    warn!(
                        path = %file.path,
                        original_length = file.original_length,
                        truncated_to = file.truncated_to,
                        "diff truncated"
                    );
                }
                let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
                self.record(
                    Event::new(EventAction::Truncate).with_details(json!({ "files": paths })),
                );
            }
            PipelineEvent::Dropped { dropped, kept } => {
                warn!(dropped, kept, "file limit reached; remaining files left out of the prompt");
                self.record(
                    Event::new(EventAction::Drop)
                        .with_details(json!({ "dropped_files": dropped, "kept_files": kept })),
                );
            }
            PipelineEvent::RepairRequested { details } => {
                warn!(%details, "model response was not a valid task; requesting a repair");
                self.record(
                    Event::new(EventAction::Repair).with_details(json!({ "error": details })),
                );
            }
            PipelineEvent::Completed { task, report } => {
                info!(
                    summary = %task.summary,
                    files = report.files_sent.len(),
                    repaired = report.repaired,
                    "task generated"
                );
                self.record(Event::new(EventAction::Generate).with_details(json!({
                    "summary": task.summary,
                    "files_sent": report.files_sent,
                    "truncated_files": report.truncated_files.len(),
                    "dropped_files": report.dropped_files_count,
                    "repaired": report.repaired,
                })));
            }
            PipelineEvent::Failed { error } => {
                let mut details = json!({ "error": error.to_string() });
                if let DraftError::RepairFailed {
                    raw,
                    first_error,
                    repair_raw,
                    repair_error,
                } = error
                {
                    debug!(%raw, %repair_raw, "rejected model responses");
                    details["first_error"] = json!(first_error);
                    details["repair_error"] = json!(repair_error);
                }
                if error.is_user_facing() {
                    info!(error = %error, "generation failed");
                } else {
                    warn!(error = %error, "generation failed");
                }
                self.record(Event::new(EventAction::Fail).with_details(details));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report() -> GenerationReport {
        GenerationReport {
            files_sent: vec!["src/lib.rs".to_string()],
            truncated_files: Vec::new(),
            dropped_files_count: 2,
            repaired: true,
        }
    }

    #[test]
    fn test_log_observer_writes_events() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("events.ndjson"));
        let observer = LogObserver::new(Some(log.clone()));

        let truncated = vec![TruncationInfo {
            path: "big.rs".to_string(),
            original_length: 10,
            truncated_to: 4,
        }];
        let task = JiraTask {
            summary: "Fix login".to_string(),
            description: "d".to_string(),
            acceptance_criteria: Vec::new(),
            priority: None,
            labels: None,
            story_points: None,
            risk: None,
        };
        let report = report();

        observer.notify(&PipelineEvent::Truncated { files: &truncated });
        observer.notify(&PipelineEvent::Dropped { dropped: 2, kept: 1 });
        observer.notify(&PipelineEvent::RepairRequested { details: "summary: too short" });
        observer.notify(&PipelineEvent::Completed {
            task: &task,
            report: &report,
        });

        let events = log.read_all().unwrap();
        let actions: Vec<EventAction> = events.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                EventAction::Truncate,
                EventAction::Drop,
                EventAction::Repair,
                EventAction::Generate
            ]
        );
        assert_eq!(events[0].details["files"], json!(["big.rs"]));
        assert_eq!(events[1].details["dropped_files"], 2);
        assert_eq!(events[3].details["summary"], "Fix login");
        assert_eq!(events[3].details["repaired"], true);
    }

    #[test]
    fn test_failure_event_keeps_both_diagnoses() {
        let temp_dir = TempDir::new().unwrap();
        let log = EventLog::new(temp_dir.path().join("events.ndjson"));
        let observer = LogObserver::new(Some(log.clone()));

        let error = DraftError::RepairFailed {
            raw: "{".to_string(),
            first_error: "EOF".to_string(),
            repair_raw: "nope".to_string(),
            repair_error: "No JSON payload found in LLM response.".to_string(),
        };
        observer.notify(&PipelineEvent::Failed { error: &error });

        let events = log.read_all().unwrap();
        assert_eq!(events[0].action, EventAction::Fail);
        assert_eq!(events[0].details["first_error"], "EOF");
        assert_eq!(
            events[0].details["repair_error"],
            "No JSON payload found in LLM response."
        );
    }

    #[test]
    fn test_without_event_log_nothing_is_written() {
        let observer = LogObserver::new(None);
        observer.notify(&PipelineEvent::Dropped { dropped: 1, kept: 1 });
    }
}
