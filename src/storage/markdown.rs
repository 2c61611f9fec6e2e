//! Markdown task document.
//!
//! # Document Format
//!
//! ```text
//! ## Add retry to upload client
//!
//! Uploads fail permanently on the first 5xx.
//!
//! **Acceptance Criteria**
//! - Uploads retry 3 times
//!
//! **Labels**: backend, reliability
//! **Priority**: High
//! ```
//!
//! A section runs from its `## ` heading to the next `## ` heading (or the
//! end of the file). The file always ends with exactly one newline.
//!
//! Headings are the summary with its whitespace collapsed to single spaces.
//! Level-two headings inside a task body are written one level deeper so they
//! never split the section.

use super::TaskSink;
use crate::error::{DraftError, Result};
use crate::fs::atomic_write_file;
use crate::task::JiraTask;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Stores tasks as sections of a Markdown file.
#[derive(Debug, Clone)]
pub struct MarkdownTaskStore {
    path: PathBuf,
}

impl MarkdownTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_current(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(DraftError::Storage(format!(
                "failed to read '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }
}

impl TaskSink for MarkdownTaskStore {
    fn upsert_task(&self, task: &JiraTask) -> Result<()> {
        let current = self.read_current()?;
        let updated = upsert_section(&current, &task.summary, &render_task_section(task));
        debug!(path = %self.path.display(), summary = %task.summary, "writing task");
        atomic_write_file(&self.path, &updated)
    }
}

/// Render one task as a Markdown section (no trailing newline).
pub fn render_task_section(task: &JiraTask) -> String {
    let mut out = format!("{}\n\n**Acceptance Criteria**\n", task.description.trim());

    if task.acceptance_criteria.is_empty() {
        out.push_str("- TBD\n");
    } else {
        for item in &task.acceptance_criteria {
            out.push_str(&format!("- {}\n", item));
        }
    }

    let mut details = Vec::new();
    if let Some(labels) = task.labels.as_ref().filter(|l| !l.is_empty()) {
        details.push(format!("**Labels**: {}", labels.join(", ")));
    }
    if let Some(priority) = task.priority {
        details.push(format!("**Priority**: {}", priority));
    }
    if let Some(points) = task.story_points {
        details.push(format!("**Story Points**: {}", points));
    }
    if let Some(risk) = task.risk.as_deref().filter(|r| !r.trim().is_empty()) {
        details.push(format!("**Risk**: {}", risk));
    }

    if !details.is_empty() {
        out.push('\n');
        out.push_str(&details.join("\n"));
    }

    format!(
        "## {}\n\n{}",
        section_title(&task.summary),
        demote_headings(out.trim_end())
    )
}

/// Heading text for a summary: whitespace runs (newlines included) become one space.
fn section_title(summary: &str) -> String {
    summary.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn demote_headings(body: &str) -> String {
    body.split_inclusive('\n')
        .map(|line| {
            if heading_text(line).is_some() {
                format!("#{}", line)
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Replace the section headed `## {summary}` in `document`, or append it.
pub fn upsert_section(document: &str, summary: &str, section: &str) -> String {
    if document.trim().is_empty() {
        return format!("{}\n", section.trim_end());
    }

    let updated = match find_section(document, &section_title(summary)) {
        Some((start, end)) => {
            let rest = &document[end..];
            if rest.is_empty() {
                format!("{}{}", &document[..start], section)
            } else {
                format!("{}{}\n\n{}", &document[..start], section, rest)
            }
        }
        None => format!("{}\n\n{}", document.trim_end(), section),
    };

    format!("{}\n", updated.trim_end())
}

/// Byte range of the section whose heading text equals `summary`.
fn find_section(document: &str, summary: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    let mut start = None;

    for line in document.split_inclusive('\n') {
        if let Some(heading) = heading_text(line) {
            if start.is_some() {
                return start.map(|s| (s, offset));
            }
            if heading == summary {
                start = Some(offset);
            }
        }
        offset += line.len();
    }

    start.map(|s| (s, document.len()))
}

/// Text of a level-two heading line (`## text`).
fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    Some(rest.trim())
}
