//! Typed front ends over [`Template`] for the generation and repair prompts.

use super::template::{Context, Template, TemplateError, Value};
use super::templates::{DEFAULT_REPAIR_PROMPT_TEMPLATE, DEFAULT_TASK_PROMPT_TEMPLATE};
use crate::diff::DiffFile;

/// Inputs for the generation prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptVariables<'a> {
    /// Language code the task should be written in (e.g., `en`).
    pub language: &'a str,
    /// Current branch name.
    pub branch: &'a str,
    /// Files to describe, in prompt order.
    pub files: &'a [DiffFile],
    /// Free-text instructions appended to the prompt.
    pub custom_instructions: Option<&'a str>,
}

/// Renders the generation prompt.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: Template,
}

impl PromptBuilder {
    /// Parse `template` once; it is reused for every build.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            template: Template::parse(template)?,
        })
    }

    /// Builder over the built-in generation template.
    pub fn with_default_template() -> Result<Self, TemplateError> {
        Self::new(DEFAULT_TASK_PROMPT_TEMPLATE)
    }

    /// Render the prompt. Absent instructions render as empty text.
    pub fn build(&self, variables: &PromptVariables<'_>) -> String {
        let files: Vec<Value> = variables
            .files
            .iter()
            .map(|file| {
                Context::new()
                    .with("path", file.path.as_str())
                    .with("diff", file.diff.as_str())
                    .into()
            })
            .collect();

        let context = Context::new()
            .with("language", variables.language)
            .with("branch", variables.branch)
            .with("files", files)
            .with(
                "customInstructions",
                variables.custom_instructions.unwrap_or_default(),
            );

        self.template.render(&context)
    }
}

/// Inputs for the repair prompt.
#[derive(Debug, Clone, Copy)]
pub struct RepairPromptVariables<'a> {
    /// The response that failed to parse.
    pub raw: &'a str,
    /// Why it failed.
    pub error: &'a str,
}

/// Renders the repair prompt.
#[derive(Debug, Clone)]
pub struct RepairPromptBuilder {
    template: Template,
}

impl RepairPromptBuilder {
    /// Parse `template` once; it is reused for every build.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            template: Template::parse(template)?,
        })
    }

    /// Builder over the built-in repair template.
    pub fn with_default_template() -> Result<Self, TemplateError> {
        Self::new(DEFAULT_REPAIR_PROMPT_TEMPLATE)
    }

    pub fn build(&self, variables: &RepairPromptVariables<'_>) -> String {
        let context = Context::new()
            .with("raw", variables.raw)
            .with("error", variables.error);
        self.template.render(&context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::templates::JIRA_TASK_JSON_SHAPE;

    fn files() -> Vec<DiffFile> {
        vec![
            DiffFile::new("src/app.ts", "diff --git a/src/app.ts b/src/app.ts\n+x"),
            DiffFile::new("src/lib.rs", "+fn b() {}"),
        ]
    }

    #[test]
    fn test_renders_branch_files_and_instructions() {
        let builder = PromptBuilder::with_default_template().unwrap();
        let files = files();
        let prompt = builder.build(&PromptVariables {
            language: "en",
            branch: "feature/test",
            files: &files,
            custom_instructions: Some("Keep it short"),
        });

        assert!(prompt.contains("Language: en\n"));
        assert!(prompt.contains("Branch: feature/test\n"));
        assert!(prompt.contains(
            "Changes:\n---\nFile: src/app.ts\nDiff:\ndiff --git a/src/app.ts b/src/app.ts\n+x\n---\nFile: src/lib.rs\nDiff:\n+fn b() {}\n"
        ));
        assert!(prompt.contains("Custom instructions:\nKeep it short\n"));
        assert!(prompt.contains(JIRA_TASK_JSON_SHAPE));
    }

    #[test]
    fn test_missing_instructions_omit_the_section() {
        let builder = PromptBuilder::with_default_template().unwrap();
        let files = files();
        let prompt = builder.build(&PromptVariables {
            language: "de",
            branch: "main",
            files: &files,
            custom_instructions: None,
        });

        assert!(!prompt.contains("Custom instructions:"));
        assert!(prompt.ends_with("+fn b() {}\n\n"));
    }

    #[test]
    fn test_diff_text_is_not_interpreted_as_template() {
        let builder = PromptBuilder::new("{{#each files}}{{diff}}{{/each}}").unwrap();
        let files = vec![DiffFile::new("a.hbs", "+{{#each secrets}}{{this}}{{/each}}")];
        let prompt = builder.build(&PromptVariables {
            language: "en",
            branch: "main",
            files: &files,
            custom_instructions: None,
        });

        assert_eq!(prompt, "+{{#each secrets}}{{this}}{{/each}}");
    }

    #[test]
    fn test_custom_template() {
        let builder =
            PromptBuilder::new("{{branch}}/{{language}}:{{#each files}} {{path}}{{/each}}")
                .unwrap();
        let files = files();
        let prompt = builder.build(&PromptVariables {
            language: "fr",
            branch: "dev",
            files: &files,
            custom_instructions: None,
        });

        assert_eq!(prompt, "dev/fr: src/app.ts src/lib.rs");
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        assert!(PromptBuilder::new("{{#each files}}").is_err());
        assert!(RepairPromptBuilder::new("{{raw").is_err());
    }

    #[test]
    fn test_repair_prompt_contains_raw_and_error() {
        let builder = RepairPromptBuilder::with_default_template().unwrap();
        let prompt = builder.build(&RepairPromptVariables {
            raw: "{\"summary\": \"\"}",
            error: "/summary: \"\" is shorter than 1 character",
        });

        assert!(prompt.contains("Parse error:\n/summary: \"\" is shorter than 1 character\n"));
        assert!(prompt.contains("Original response:\n{\"summary\": \"\"}\n"));
        assert!(prompt.contains("- No markdown or code fences."));
        assert!(prompt.contains(JIRA_TASK_JSON_SHAPE));
    }
}
