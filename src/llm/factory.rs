//! Provider selection.

use super::{ChatCompletionClient, ChatOptions, CommandClient, ModelClient, TokenLimitField};
use crate::config::{Config, Provider};
use crate::error::{DraftError, Result};
use crate::secrets::{GROQ_API_KEY, OPENROUTER_API_KEY, SecretStore};
use std::time::Duration;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Build the model client for the configured provider.
///
/// # Returns
///
/// * `Err(DraftError::Config)` - A required API key is missing or the
///   command cannot be parsed
pub fn create_model_client(
    config: &Config,
    secrets: &dyn SecretStore,
) -> Result<Box<dyn ModelClient>> {
    let timeout = Duration::from_secs(config.request_timeout_seconds);

    let options = match config.provider {
        Provider::Openrouter => {
            let api_key = require_key(secrets, OPENROUTER_API_KEY, config.provider)?;
            let base_url = Some(config.openrouter_base_url.trim())
                .filter(|url| !url.is_empty())
                .unwrap_or(DEFAULT_OPENROUTER_BASE_URL);

            let mut headers = Vec::new();
            if let Some(site) = non_blank(config.openrouter_site_url.as_deref()) {
                headers.push(("HTTP-Referer".to_string(), site.to_string()));
            }
            if let Some(title) = non_blank(config.openrouter_title.as_deref()) {
                headers.push(("X-Title".to_string(), title.to_string()));
            }

            ChatOptions {
                provider: config.provider.display_name().to_string(),
                base_url: base_url.to_string(),
                api_key: Some(api_key),
                model: config.openrouter_model.clone(),
                temperature: config.temperature,
                max_completion_tokens: config.max_completion_tokens,
                top_p: config.top_p,
                token_limit_field: TokenLimitField::MaxCompletionTokens,
                headers,
                timeout,
            }
        }
        Provider::Groq => ChatOptions {
            provider: config.provider.display_name().to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            api_key: Some(require_key(secrets, GROQ_API_KEY, config.provider)?),
            model: config.groq_model.clone(),
            temperature: config.temperature,
            max_completion_tokens: config.max_completion_tokens,
            top_p: config.top_p,
            token_limit_field: TokenLimitField::MaxTokens,
            headers: Vec::new(),
            timeout,
        },
        Provider::Ollama => ChatOptions {
            provider: config.provider.display_name().to_string(),
            base_url: normalize_ollama_base_url(&config.ollama_base_url),
            api_key: None,
            model: config.ollama_model.clone(),
            temperature: config.temperature,
            max_completion_tokens: config.max_completion_tokens,
            top_p: config.top_p,
            token_limit_field: TokenLimitField::MaxTokens,
            headers: Vec::new(),
            timeout,
        },
        Provider::Command => {
            let command = non_blank(config.command.as_deref()).ok_or_else(|| {
                DraftError::Config(
                    "provider 'command' requires the 'command' setting in .jiradraft.yaml"
                        .to_string(),
                )
            })?;
            let client = CommandClient::new(
                command,
                Duration::from_secs(config.command_timeout_seconds),
            )
            .map_err(|e| DraftError::Config(e.to_string()))?;
            return Ok(Box::new(client));
        }
    };

    let client = ChatCompletionClient::new(options)
        .map_err(|e| DraftError::Internal(format!("failed to build HTTP client: {}", e)))?;
    Ok(Box::new(client))
}

/// Ollama's OpenAI-compatible API lives under `/v1`.
pub fn normalize_ollama_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_OLLAMA_BASE_URL.to_string()
    } else if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{}/v1", trimmed)
    }
}

fn require_key(secrets: &dyn SecretStore, key: &str, provider: Provider) -> Result<String> {
    secrets.get_secret(key).ok_or_else(|| {
        DraftError::Config(format!(
            "{} API key not found. Set the {} environment variable first.",
            provider.display_name(),
            key
        ))
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::StaticSecretStore;

    fn config(provider: Provider) -> Config {
        Config {
            provider,
            ..Config::default()
        }
    }

    #[test]
    fn test_openrouter_requires_key() {
        let err = create_model_client(&config(Provider::Openrouter), &StaticSecretStore::new())
            .err()
            .unwrap();
        assert!(matches!(err, DraftError::Config(_)));
        assert_eq!(
            err.to_string(),
            "OpenRouter API key not found. Set the OPENROUTER_API_KEY environment variable first."
        );
    }

    #[test]
    fn test_groq_requires_key() {
        let err = create_model_client(&config(Provider::Groq), &StaticSecretStore::new())
            .err()
            .unwrap();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn test_openrouter_with_key() {
        let secrets = StaticSecretStore::new().with(OPENROUTER_API_KEY, "sk-or-1");
        let client = create_model_client(&config(Provider::Openrouter), &secrets).unwrap();
        assert_eq!(client.provider(), "OpenRouter");
    }

    #[test]
    fn test_groq_with_key() {
        let secrets = StaticSecretStore::new().with(GROQ_API_KEY, "gsk_1");
        let client = create_model_client(&config(Provider::Groq), &secrets).unwrap();
        assert_eq!(client.provider(), "Groq");
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let client =
            create_model_client(&config(Provider::Ollama), &StaticSecretStore::new()).unwrap();
        assert_eq!(client.provider(), "Ollama");
    }

    #[test]
    fn test_command_provider() {
        let mut cfg = config(Provider::Command);
        cfg.command = Some("llm -m local".to_string());
        let client = create_model_client(&cfg, &StaticSecretStore::new()).unwrap();
        assert_eq!(client.provider(), "Command");

        cfg.command = None;
        assert!(create_model_client(&cfg, &StaticSecretStore::new()).is_err());
    }

    #[test]
    fn test_normalize_ollama_base_url() {
        assert_eq!(normalize_ollama_base_url(""), "http://localhost:11434/v1");
        assert_eq!(normalize_ollama_base_url("   "), "http://localhost:11434/v1");
        assert_eq!(
            normalize_ollama_base_url("http://localhost:11434"),
            "http://localhost:11434/v1"
        );
        assert_eq!(
            normalize_ollama_base_url("http://gpu:11434/v1/"),
            "http://gpu:11434/v1"
        );
        assert_eq!(
            normalize_ollama_base_url(" http://gpu:11434// "),
            "http://gpu:11434/v1"
        );
    }
}
