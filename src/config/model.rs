//! Config struct definition and default implementation.

use super::types::*;
use crate::diff::DiffMode;
use serde::{Deserialize, Serialize};

/// Configuration for jiradraft.
///
/// This struct represents the contents of `.jiradraft.yaml` at the repository
/// root. Unknown fields in the YAML are ignored for forward compatibility.
/// Credentials are never stored here; they come from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Provider settings
    // =========================================================================
    /// Model backend.
    #[serde(default)]
    pub provider: Provider,

    /// OpenRouter API base URL.
    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,

    #[serde(default = "default_openrouter_model")]
    pub openrouter_model: String,

    /// Sent as `HTTP-Referer` for OpenRouter attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_site_url: Option<String>,

    /// Sent as `X-Title` for OpenRouter attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_title: Option<String>,

    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Ollama server URL; `/v1` is appended when missing.
    #[serde(default = "default_ollama_base_url")]
    pub ollama_base_url: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    /// Command for the `command` provider (shell-words parsed; no shell).
    /// The prompt is written to its stdin and its stdout is the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Seconds before the `command` provider is killed.
    #[serde(default = "default_command_timeout_seconds")]
    pub command_timeout_seconds: u64,

    /// HTTP timeout for chat completion requests.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    // =========================================================================
    // Sampling settings
    // =========================================================================
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    // =========================================================================
    // Prompt settings
    // =========================================================================
    /// Language code the task is written in.
    #[serde(default = "default_prompt_language")]
    pub prompt_language: String,

    /// Extra instructions appended to every prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,

    /// Replacement for the built-in generation prompt (repo-relative).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template_file: Option<String>,

    /// Replacement for the built-in repair prompt (repo-relative).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_prompt_template_file: Option<String>,

    // =========================================================================
    // Context settings
    // =========================================================================
    /// Which changes to collect.
    #[serde(default)]
    pub diff_mode: DiffMode,

    /// Maximum number of files sent to the model.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Maximum characters of diff per file.
    #[serde(default = "default_max_chars_per_file")]
    pub max_chars_per_file: usize,

    /// Ignore files (gitignore syntax, repo-relative) excluding paths from
    /// the prompt. Missing files are skipped.
    #[serde(default = "default_ignore_files")]
    pub ignore_files: Vec<String>,

    // =========================================================================
    // Output settings
    // =========================================================================
    /// Markdown file receiving generated tasks (repo-relative).
    #[serde(default = "default_storage_file")]
    pub storage_file: String,

    /// NDJSON audit log of generation runs (repo-relative). Disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            openrouter_base_url: default_openrouter_base_url(),
            openrouter_model: default_openrouter_model(),
            openrouter_site_url: None,
            openrouter_title: None,
            groq_model: default_groq_model(),
            ollama_base_url: default_ollama_base_url(),
            ollama_model: default_ollama_model(),
            command: None,
            command_timeout_seconds: default_command_timeout_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
            temperature: default_temperature(),
            max_completion_tokens: default_max_completion_tokens(),
            top_p: default_top_p(),
            prompt_language: default_prompt_language(),
            custom_instructions: None,
            prompt_template_file: None,
            repair_prompt_template_file: None,
            diff_mode: DiffMode::default(),
            max_files: default_max_files(),
            max_chars_per_file: default_max_chars_per_file(),
            ignore_files: default_ignore_files(),
            storage_file: default_storage_file(),
            event_log: None,
        }
    }
}
