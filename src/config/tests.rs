//! Tests for config functionality.

use crate::config::types::default_ignore_files;
use crate::config::{Config, ConfigOverrides, Provider};
use crate::diff::DiffMode;
use crate::error::DraftError;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.provider, Provider::Openrouter);
    assert_eq!(config.openrouter_base_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.openrouter_model, "nvidia/nemotron-3-nano-30b-a3b:free");
    assert_eq!(config.groq_model, "moonshotai/kimi-k2-instruct-0905");
    assert_eq!(config.ollama_base_url, "http://localhost:11434");
    assert_eq!(config.ollama_model, "llama3.1");
    assert_eq!(config.command, None);
    assert_eq!(config.command_timeout_seconds, 300);
    assert_eq!(config.request_timeout_seconds, 120);
    assert_eq!(config.prompt_language, "en");
    assert_eq!(config.diff_mode, DiffMode::StagedAndUnstaged);
    assert_eq!(config.temperature, 0.6);
    assert_eq!(config.max_completion_tokens, 4096);
    assert_eq!(config.top_p, 1.0);
    assert_eq!(config.max_files, 40);
    assert_eq!(config.max_chars_per_file, 6000);
    assert_eq!(config.storage_file, "jira-tasks.md");
    assert_eq!(config.ignore_files, default_ignore_files());
    assert_eq!(config.event_log, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
provider: groq
max_files: 5
"#;
    let config = Config::from_yaml(yaml).unwrap();

    // Specified values should be used
    assert_eq!(config.provider, Provider::Groq);
    assert_eq!(config.max_files, 5);

    // Unspecified values should use defaults
    assert_eq!(config.max_chars_per_file, 6000);
    assert_eq!(config.storage_file, "jira-tasks.md");
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
provider: ollama
openrouter_base_url: https://proxy.example/api/v1
openrouter_model: meta/llama
openrouter_site_url: https://example.com
openrouter_title: Example
groq_model: llama-3.3-70b
ollama_base_url: http://gpu-box:11434
ollama_model: qwen2.5-coder
command: "llm -m local"
command_timeout_seconds: 30
request_timeout_seconds: 15
temperature: 0.2
max_completion_tokens: 1024
top_p: 0.9
prompt_language: de
custom_instructions: "Use the PROJ prefix."
prompt_template_file: prompts/task.hbs
repair_prompt_template_file: prompts/repair.hbs
diff_mode: staged
max_files: 10
max_chars_per_file: 2000
ignore_files: [.llmignore]
storage_file: docs/tasks.md
event_log: .jiradraft/events.ndjson
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.provider, Provider::Ollama);
    assert_eq!(config.openrouter_base_url, "https://proxy.example/api/v1");
    assert_eq!(config.openrouter_model, "meta/llama");
    assert_eq!(config.openrouter_site_url.as_deref(), Some("https://example.com"));
    assert_eq!(config.openrouter_title.as_deref(), Some("Example"));
    assert_eq!(config.groq_model, "llama-3.3-70b");
    assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
    assert_eq!(config.ollama_model, "qwen2.5-coder");
    assert_eq!(config.command.as_deref(), Some("llm -m local"));
    assert_eq!(config.command_timeout_seconds, 30);
    assert_eq!(config.request_timeout_seconds, 15);
    assert_eq!(config.temperature, 0.2);
    assert_eq!(config.max_completion_tokens, 1024);
    assert_eq!(config.top_p, 0.9);
    assert_eq!(config.prompt_language, "de");
    assert_eq!(config.custom_instructions(), Some("Use the PROJ prefix."));
    assert_eq!(config.prompt_template_file.as_deref(), Some("prompts/task.hbs"));
    assert_eq!(
        config.repair_prompt_template_file.as_deref(),
        Some("prompts/repair.hbs")
    );
    assert_eq!(config.diff_mode, DiffMode::Staged);
    assert_eq!(config.max_files, 10);
    assert_eq!(config.max_chars_per_file, 2000);
    assert_eq!(config.ignore_files, vec![".llmignore"]);
    assert_eq!(config.storage_file, "docs/tasks.md");
    assert_eq!(config.event_log.as_deref(), Some(".jiradraft/events.ndjson"));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
provider: groq
future_setting: 42
nested:
  anything: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.provider, Provider::Groq);
}

#[test]
fn test_parse_diff_modes() {
    let config = Config::from_yaml("diff_mode: unstaged").unwrap();
    assert_eq!(config.diff_mode, DiffMode::Unstaged);

    let config = Config::from_yaml("diff_mode: staged+unstaged").unwrap();
    assert_eq!(config.diff_mode, DiffMode::StagedAndUnstaged);

    assert!(Config::from_yaml("diff_mode: everything").is_err());
}

#[test]
fn test_unknown_provider_is_rejected() {
    let err = Config::from_yaml("provider: openai").unwrap_err();
    assert!(matches!(err, DraftError::Config(_)));
}

#[test]
fn test_validate_temperature_range() {
    assert!(Config::from_yaml("temperature: 0").is_ok());
    assert!(Config::from_yaml("temperature: 2").is_ok());

    let err = Config::from_yaml("temperature: 2.5").unwrap_err();
    assert!(err.to_string().contains("temperature"));

    assert!(Config::from_yaml("temperature: -0.1").is_err());
}

#[test]
fn test_validate_top_p_range() {
    assert!(Config::from_yaml("top_p: 0.1").is_ok());

    let err = Config::from_yaml("top_p: 0").unwrap_err();
    assert!(err.to_string().contains("top_p"));

    assert!(Config::from_yaml("top_p: 1.5").is_err());
}

#[test]
fn test_validate_max_completion_tokens_positive() {
    let err = Config::from_yaml("max_completion_tokens: 0").unwrap_err();
    assert!(err.to_string().contains("max_completion_tokens"));
}

#[test]
fn test_validate_storage_file_non_empty() {
    let err = Config::from_yaml("storage_file: '  '").unwrap_err();
    assert!(err.to_string().contains("storage_file"));
}

#[test]
fn test_zero_caps_are_valid() {
    let config = Config::from_yaml("max_files: 0\nmax_chars_per_file: 0").unwrap();
    assert_eq!(config.prune_options().max_files, 0);
    assert_eq!(config.prune_options().max_chars_per_file, 0);
}

#[test]
fn test_command_provider_requires_command() {
    let err = Config::from_yaml("provider: command").unwrap_err();
    assert!(err.to_string().contains("'command'"));

    let config = Config::from_yaml("provider: command\ncommand: cat").unwrap();
    assert_eq!(config.command.as_deref(), Some("cat"));
}

#[test]
fn test_blank_custom_instructions_are_absent() {
    let config = Config::from_yaml("custom_instructions: '   '").unwrap();
    assert_eq!(config.custom_instructions(), None);
}

#[test]
fn test_overrides_replace_config_values() {
    let overrides = ConfigOverrides {
        provider: Some(Provider::Groq),
        diff_mode: Some(DiffMode::Unstaged),
        prompt_language: Some("fr".to_string()),
        custom_instructions: Some("Be brief".to_string()),
    };

    let config = Config::default().with_overrides(&overrides).unwrap();

    assert_eq!(config.provider, Provider::Groq);
    assert_eq!(config.diff_mode, DiffMode::Unstaged);
    assert_eq!(config.prompt_language, "fr");
    assert_eq!(config.custom_instructions(), Some("Be brief"));
}

#[test]
fn test_overrides_are_validated() {
    let overrides = ConfigOverrides {
        provider: Some(Provider::Command),
        ..Default::default()
    };
    assert!(Config::default().with_overrides(&overrides).is_err());
}

#[test]
fn test_empty_overrides_keep_config() {
    let config = Config::from_yaml("prompt_language: pt").unwrap();
    let same = config.clone().with_overrides(&ConfigOverrides::default()).unwrap();
    assert_eq!(same, config);
}

#[test]
fn test_yaml_round_trip_of_defaults() {
    let yaml = Config::default().to_yaml().unwrap();
    assert!(yaml.contains("provider: openrouter"));
    assert!(yaml.contains("staged+unstaged"));
    assert!(!yaml.contains("event_log"));

    assert_eq!(Config::from_yaml(&yaml).unwrap(), Config::default());
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(dir.path().join(".jiradraft.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".jiradraft.yaml");
    std::fs::write(&path, "max_files: 3\n").unwrap();

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.max_files, 3);
}

#[test]
fn test_load_invalid_yaml_reports_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".jiradraft.yaml");
    std::fs::write(&path, "max_files: [not a number").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, DraftError::Config(_)));
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_provider_parsing() {
    assert_eq!("ollama".parse::<Provider>(), Ok(Provider::Ollama));
    assert!("openai".parse::<Provider>().is_err());
    assert_eq!(Provider::Openrouter.display_name(), "OpenRouter");
}
