//! Built-in prompt templates.

/// Expands to the JSON shape literal so `concat!` can embed it.
macro_rules! jira_task_json_shape {
    () => {
        r#"{
  "summary": "string",
  "description": "string",
  "acceptanceCriteria": ["string"],
  "priority": "Low" | "Medium" | "High" | "Critical",
  "labels": ["string"],
  "storyPoints": number,
  "risk": "string"
}"#
    };
}

/// Literal description of the JSON object the model must return.
pub const JIRA_TASK_JSON_SHAPE: &str = jira_task_json_shape!();

/// Generation prompt.
///
/// Variables: `language`, `branch`, `files` (each with `path` and `diff`),
/// `customInstructions`.
pub const DEFAULT_TASK_PROMPT_TEMPLATE: &str = concat!(
    "\nYou are generating a Jira task draft from git changes.\n",
    "\nReturn ONLY JSON that matches this shape:\n",
    jira_task_json_shape!(),
    "\n\nLanguage: {{language}}\n",
    "Branch: {{branch}}\n",
    "\nChanges:\n",
    "{{#each files}}\n",
    "---\n",
    "File: {{path}}\n",
    "Diff:\n",
    "{{diff}}\n",
    "{{/each}}\n",
    "\n{{#if customInstructions}}\n",
    "Custom instructions:\n",
    "{{customInstructions}}\n",
    "{{/if}}\n",
);

/// Repair prompt.
///
/// Variables: `raw` (the rejected response) and `error` (why it was rejected).
pub const DEFAULT_REPAIR_PROMPT_TEMPLATE: &str = concat!(
    "\nYou are fixing a Jira task JSON payload that failed to parse.\n",
    "\nReturn ONLY valid JSON that matches this shape:\n",
    jira_task_json_shape!(),
    "\n\nRules:\n",
    "- No markdown or code fences.\n",
    "- Include all required fields with non-empty strings.\n",
    "- Keep content concise and consistent with the original response.\n",
    "\nParse error:\n",
    "{{error}}\n",
    "\nOriginal response:\n",
    "{{raw}}\n",
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_embed_the_json_shape() {
        assert!(DEFAULT_TASK_PROMPT_TEMPLATE.contains(JIRA_TASK_JSON_SHAPE));
        assert!(DEFAULT_REPAIR_PROMPT_TEMPLATE.contains(JIRA_TASK_JSON_SHAPE));
    }

    #[test]
    fn test_generation_template_demands_json_only() {
        assert!(DEFAULT_TASK_PROMPT_TEMPLATE.contains("Return ONLY JSON"));
    }
}
