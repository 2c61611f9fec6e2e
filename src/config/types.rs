//! Configuration types and defaults for jiradraft.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File name of the per-repository config, relative to the repo root.
pub const CONFIG_FILE_NAME: &str = ".jiradraft.yaml";

/// Model backend used for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// OpenRouter chat completions (default).
    #[default]
    Openrouter,
    /// Groq chat completions.
    Groq,
    /// Local Ollama server through its OpenAI-compatible endpoint.
    Ollama,
    /// An arbitrary command that reads the prompt on stdin.
    Command,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Openrouter => "openrouter",
            Provider::Groq => "groq",
            Provider::Ollama => "ollama",
            Provider::Command => "command",
        }
    }

    /// Name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Openrouter => "OpenRouter",
            Provider::Groq => "Groq",
            Provider::Ollama => "Ollama",
            Provider::Command => "Command",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openrouter" => Ok(Self::Openrouter),
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            "command" => Ok(Self::Command),
            other => Err(format!(
                "unknown provider '{}' (expected openrouter, groq, ollama or command)",
                other
            )),
        }
    }
}

// Default value functions for serde
pub(crate) fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}
pub(crate) fn default_openrouter_model() -> String {
    "nvidia/nemotron-3-nano-30b-a3b:free".to_string()
}
pub(crate) fn default_groq_model() -> String {
    "moonshotai/kimi-k2-instruct-0905".to_string()
}
pub(crate) fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}
pub(crate) fn default_ollama_model() -> String {
    "llama3.1".to_string()
}
pub(crate) fn default_command_timeout_seconds() -> u64 {
    300
}
pub(crate) fn default_prompt_language() -> String {
    "en".to_string()
}
pub(crate) fn default_temperature() -> f64 {
    0.6
}
pub(crate) fn default_max_completion_tokens() -> u32 {
    4096
}
pub(crate) fn default_top_p() -> f64 {
    1.0
}
pub(crate) fn default_max_files() -> usize {
    40
}
pub(crate) fn default_max_chars_per_file() -> usize {
    6000
}
pub(crate) fn default_storage_file() -> String {
    "jira-tasks.md".to_string()
}
pub(crate) fn default_request_timeout_seconds() -> u64 {
    120
}

/// Default ignore files, read in order and concatenated.
pub fn default_ignore_files() -> Vec<String> {
    vec![".gitignore".to_string(), ".llmignore".to_string()]
}
