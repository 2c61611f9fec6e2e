//! Durable task output.
//!
//! The generator hands every validated task to a [`TaskSink`]. The shipped
//! sink is [`MarkdownTaskStore`], which keeps one `## <summary>` section per
//! task in a Markdown file.

mod markdown;

pub use markdown::{MarkdownTaskStore, render_task_section, upsert_section};

use crate::error::Result;
use crate::task::JiraTask;

/// Receives generated tasks.
pub trait TaskSink {
    /// Store `task`. Calling this twice with the same summary updates the
    /// stored entry instead of adding a second one.
    fn upsert_task(&self, task: &JiraTask) -> Result<()>;
}
