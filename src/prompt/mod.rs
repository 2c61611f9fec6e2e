//! Prompt rendering.
//!
//! This module provides:
//!
//! - **Template**: a small `{{var}}` / `{{#each}}` / `{{#if}}` interpreter
//! - **Builders**: [`PromptBuilder`] and [`RepairPromptBuilder`], which turn
//!   typed variables into prompt text
//! - **Templates**: the built-in generation and repair prompts
//!
//! Either built-in template can be replaced by a file named in the config
//! (`prompt_template_file`, `repair_prompt_template_file`). Override files are
//! parsed when the builders are loaded, so a broken template is reported
//! before any git or model work happens.

mod builder;
mod template;
mod templates;

pub use builder::{PromptBuilder, PromptVariables, RepairPromptBuilder, RepairPromptVariables};
pub use template::{Context, Template, TemplateError, Value, render};
pub use templates::{DEFAULT_REPAIR_PROMPT_TEMPLATE, DEFAULT_TASK_PROMPT_TEMPLATE, JIRA_TASK_JSON_SHAPE};

use crate::error::{DraftError, Result};
use std::fs;
use std::path::Path;

/// Read an override template, or fall back to `default`.
///
/// Relative paths resolve against `repo_root`.
fn read_template(repo_root: &Path, file: Option<&str>, default: &str) -> Result<String> {
    let Some(file) = file else {
        return Ok(default.to_string());
    };

    let path = repo_root.join(file);
    fs::read_to_string(&path).map_err(|e| {
        DraftError::Config(format!(
            "failed to read prompt template '{}': {}",
            path.display(),
            e
        ))
    })
}

fn invalid_template(file: Option<&str>, error: TemplateError) -> DraftError {
    match file {
        Some(file) => DraftError::Config(format!("invalid prompt template '{}': {}", file, error)),
        None => DraftError::Internal(format!("built-in prompt template is invalid: {}", error)),
    }
}

/// Load the generation and repair builders, honoring template overrides.
///
/// # Returns
///
/// * `Err(DraftError::Config)` - An override file is unreadable or malformed
pub fn load_builders(
    repo_root: &Path,
    prompt_template_file: Option<&str>,
    repair_prompt_template_file: Option<&str>,
) -> Result<(PromptBuilder, RepairPromptBuilder)> {
    let prompt = read_template(repo_root, prompt_template_file, DEFAULT_TASK_PROMPT_TEMPLATE)?;
    let prompt = PromptBuilder::new(&prompt)
        .map_err(|e| invalid_template(prompt_template_file, e))?;

    let repair = read_template(
        repo_root,
        repair_prompt_template_file,
        DEFAULT_REPAIR_PROMPT_TEMPLATE,
    )?;
    let repair = RepairPromptBuilder::new(&repair)
        .map_err(|e| invalid_template(repair_prompt_template_file, e))?;

    Ok((prompt, repair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_builders_defaults() {
        let dir = TempDir::new().unwrap();
        let (prompt, repair) = load_builders(dir.path(), None, None).unwrap();

        let text = prompt.build(&PromptVariables {
            language: "en",
            branch: "main",
            files: &[],
            custom_instructions: None,
        });
        assert!(text.contains("Branch: main"));

        let text = repair.build(&RepairPromptVariables {
            raw: "oops",
            error: "bad",
        });
        assert!(text.contains("Original response:\noops"));
    }

    #[test]
    fn test_load_builders_with_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("prompt.hbs"), "Branch={{branch}}").unwrap();

        let (prompt, _) = load_builders(dir.path(), Some("prompt.hbs"), None).unwrap();
        let text = prompt.build(&PromptVariables {
            language: "en",
            branch: "dev",
            files: &[],
            custom_instructions: None,
        });
        assert_eq!(text, "Branch=dev");
    }

    #[test]
    fn test_missing_override_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = load_builders(dir.path(), None, Some("nope.hbs")).unwrap_err();
        assert!(matches!(err, DraftError::Config(_)));
    }

    #[test]
    fn test_malformed_override_is_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.hbs"), "{{#if x}}").unwrap();

        let err = load_builders(dir.path(), Some("bad.hbs"), None).unwrap_err();
        match err {
            DraftError::Config(msg) => assert!(msg.contains("bad.hbs")),
            other => panic!("expected Config error, got {:?}", other),
        }
    }
}
