//! Implementation of the `jiradraft generate` command.
//!
//! Wires the workspace, the config and the concrete collaborators into a
//! [`TaskGenerator`] and runs it once.

use super::{CommandResult, Failure};
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::context::WorkspaceContext;
use crate::diff::GitDiffSource;
use crate::error::Result;
use crate::events::EventLog;
use crate::generator::{GenerateOptions, Generated, GeneratorParts, LogObserver, TaskGenerator};
use crate::ignore::load_ignore_matcher;
use crate::llm::{ModelClient, create_model_client};
use crate::prompt::load_builders;
use crate::prune::ContextPruner;
use crate::sanitize::SecretSanitizer;
use crate::secrets::EnvSecretStore;
use crate::storage::MarkdownTaskStore;
use crate::task::JiraTaskParser;
use tracing::info;

/// Execute the `jiradraft generate` command.
pub fn cmd_generate(args: GenerateArgs) -> CommandResult {
    let ctx = WorkspaceContext::resolve()?;
    let config = ctx.load_config()?.with_overrides(&args.overrides())?;
    info!(provider = %config.provider, mode = %config.diff_mode, "starting generation");

    let model = create_model_client(&config, &EnvSecretStore)?;
    let generated = run_generate(&ctx, &config, model.as_ref())
        .map_err(|e| Failure::with_config(e, &config))?;

    print_summary(&generated, &ctx, &config);
    Ok(())
}

/// Build the pipeline for `ctx` and run it with `model`.
pub(crate) fn run_generate(
    ctx: &WorkspaceContext,
    config: &Config,
    model: &dyn ModelClient,
) -> Result<Generated> {
    let diff_source = GitDiffSource::new(ctx.repo_root.clone());
    let ignore_matcher = load_ignore_matcher(&ctx.repo_root, &config.ignore_files);
    let store = MarkdownTaskStore::new(ctx.storage_path(config));
    let observer = LogObserver::new(ctx.event_log_path(config).map(EventLog::new));
    let (prompt_builder, repair_prompt_builder) = load_builders(
        &ctx.repo_root,
        config.prompt_template_file.as_deref(),
        config.repair_prompt_template_file.as_deref(),
    )?;

    let generator = TaskGenerator::new(GeneratorParts {
        diff_source: &diff_source,
        ignore_matcher: &ignore_matcher,
        model,
        sink: &store,
        observer: &observer,
        pruner: ContextPruner::new(config.prune_options()),
        sanitizer: SecretSanitizer::with_default_rules()?,
        prompt_builder,
        repair_prompt_builder,
        parser: JiraTaskParser::new()?,
    });

    generator.generate(&GenerateOptions {
        language: config.prompt_language.clone(),
        custom_instructions: config.custom_instructions().map(str::to_string),
        diff_mode: config.diff_mode,
    })
}

fn print_summary(generated: &Generated, ctx: &WorkspaceContext, config: &Config) {
    let task = &generated.task;
    let report = &generated.report;

    println!("Saved task: {}", task.summary);
    println!();
    if let Some(priority) = task.priority {
        println!("  Priority: {}", priority);
    }
    println!("  Criteria: {}", task.acceptance_criteria.len());
    println!("  Files:    {}", report.files_sent.len());
    println!("  Path:     {}", ctx.storage_path(config).display());

    if !report.truncated_files.is_empty() || report.dropped_files_count > 0 {
        println!();
        println!(
            "Note: {} diff(s) truncated, {} file(s) left out to fit the prompt limits.",
            report.truncated_files.len(),
            report.dropped_files_count
        );
    }
    if report.repaired {
        println!("Note: the first model response was invalid and was repaired.");
    }
}
