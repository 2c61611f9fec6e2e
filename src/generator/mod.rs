//! Task generation pipeline.
//!
//! [`TaskGenerator::generate`] runs one request end to end:
//!
//! ```text
//! Fetch → Prune → Sanitize → Prompt → Complete₁ → Parse₁ ─┬─ Done
//!                                                         └─ Repair → Complete₂ → Parse₂ ─┬─ Done
//!                                                                                         └─ Fatal
//! ```
//!
//! - An empty snapshot after pruning fails with [`DraftError::NoChanges`]
//!   before the model is called.
//! - Model errors propagate unchanged and are never retried.
//! - Only a [`TaskParserError`] leads to the single repair round-trip; a
//!   second one becomes [`DraftError::RepairFailed`].
//! - The model is called at most twice per run.
//!
//! Nothing reaches the model without passing through the
//! [`SecretSanitizer`]: the pruned diffs and the custom instructions are
//! both redacted before the prompt is rendered.

mod observer;


pub use observer::{LogObserver, Observer, PipelineEvent};

use crate::diff::{DiffMode, DiffSource};
use crate::error::{DraftError, Result};
use crate::ignore::IgnoreMatcher;
use crate::llm::ModelClient;
use crate::prompt::{PromptBuilder, PromptVariables, RepairPromptBuilder, RepairPromptVariables};
use crate::prune::{ContextPruner, TruncationInfo};
use crate::sanitize::SecretSanitizer;
use crate::storage::TaskSink;
use crate::task::{JiraTask, JiraTaskParser, TaskParserError};
use tracing::{debug, info};

/// Message for a run with nothing to describe.
pub const NO_CHANGES_MESSAGE: &str = "No git changes found to analyze.";

/// Per-request inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Language code the task is written in.
    pub language: String,
    /// Extra instructions for the model.
    pub custom_instructions: Option<String>,
    /// Which changes to collect.
    pub diff_mode: DiffMode,
}

/// What a run sent and whether it needed repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Paths included in the prompt, in prompt order.
    pub files_sent: Vec<String>,
    pub truncated_files: Vec<TruncationInfo>,
    pub dropped_files_count: usize,
    /// The task came from the repair response.
    pub repaired: bool,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub task: JiraTask,
    pub report: GenerationReport,
}

/// Collaborators and stages for a [`TaskGenerator`].
pub struct GeneratorParts<'a> {
    pub diff_source: &'a dyn DiffSource,
    pub ignore_matcher: &'a dyn IgnoreMatcher,
    pub model: &'a dyn ModelClient,
    pub sink: &'a dyn TaskSink,
    pub observer: &'a dyn Observer,
    pub pruner: ContextPruner,
    pub sanitizer: SecretSanitizer,
    pub prompt_builder: PromptBuilder,
    pub repair_prompt_builder: RepairPromptBuilder,
    pub parser: JiraTaskParser,
}

/// Turns pending changes into a stored [`JiraTask`].
pub struct TaskGenerator<'a> {
    parts: GeneratorParts<'a>,
}

impl<'a> TaskGenerator<'a> {
    pub fn new(parts: GeneratorParts<'a>) -> Self {
        Self { parts }
    }

    /// Run the pipeline once.
    ///
    /// # Returns
    ///
    /// * `Ok(Generated)` - The task was parsed and stored
    /// * `Err(DraftError::NoChanges)` - Nothing left after pruning; the
    ///   model was not called
    /// * `Err(DraftError::Model)` - The model client failed
    /// * `Err(DraftError::RepairFailed)` - Both responses were invalid
    /// * `Err(DraftError::Git)` / `Err(DraftError::Storage)` - Collaborator
    ///   failures
    pub fn generate(&self, options: &GenerateOptions) -> Result<Generated> {
        let result = self.run(options);
        if let Err(error) = &result {
            self.parts.observer.notify(&PipelineEvent::Failed { error });
        }
        result
    }

    fn run(&self, options: &GenerateOptions) -> Result<Generated> {
        let parts = &self.parts;

        info!(mode = %options.diff_mode, "collecting changes");
        let snapshot = parts.diff_source.get_diff(options.diff_mode)?;

        let pruned = parts.pruner.prune(&snapshot, parts.ignore_matcher);
        info!(
            files = pruned.snapshot.files.len(),
            total = snapshot.files.len(),
            "pruned changes"
        );
        if pruned.snapshot.files.is_empty() {
            return Err(DraftError::NoChanges(NO_CHANGES_MESSAGE.to_string()));
        }
        if !pruned.truncated_files.is_empty() {
            parts.observer.notify(&PipelineEvent::Truncated {
                files: &pruned.truncated_files,
            });
        }
        if pruned.dropped_files_count > 0 {
            parts.observer.notify(&PipelineEvent::Dropped {
                dropped: pruned.dropped_files_count,
                kept: pruned.snapshot.files.len(),
            });
        }

        let sanitized = parts.sanitizer.sanitize_snapshot(&pruned.snapshot);
        let instructions = options
            .custom_instructions
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(|text| parts.sanitizer.sanitize_text(text));

        let prompt = parts.prompt_builder.build(&PromptVariables {
            language: &options.language,
            branch: &sanitized.branch,
            files: &sanitized.files,
            custom_instructions: instructions.as_deref(),
        });
        debug!(prompt_chars = prompt.chars().count(), "rendered prompt");

        let raw = parts.model.complete(&prompt)?;
        let (task, repaired) = match parts.parser.parse(&raw) {
            Ok(task) => (task, false),
            Err(first) => (self.repair(first)?, true),
        };

        parts.sink.upsert_task(&task)?;

        let report = GenerationReport {
            files_sent: sanitized.files.iter().map(|f| f.path.clone()).collect(),
            truncated_files: pruned.truncated_files,
            dropped_files_count: pruned.dropped_files_count,
            repaired,
        };
        parts.observer.notify(&PipelineEvent::Completed {
            task: &task,
            report: &report,
        });

        Ok(Generated { task, report })
    }

    /// The one repair round-trip.
    fn repair(&self, first: TaskParserError) -> Result<JiraTask> {
        let parts = &self.parts;
        parts.observer.notify(&PipelineEvent::RepairRequested {
            details: &first.details,
        });

        let prompt = parts.repair_prompt_builder.build(&RepairPromptVariables {
            raw: &first.raw,
            error: &first.details,
        });
        debug!(prompt_chars = prompt.chars().count(), "rendered repair prompt");

        let raw = parts.model.complete(&prompt)?;
        parts
            .parser
            .parse(&raw)
            .map_err(|second| DraftError::RepairFailed {
                raw: first.raw,
                first_error: first.details,
                repair_raw: second.raw,
                repair_error: second.details,
            })
    }
}
