//! OpenAI-compatible chat completion client.
//!
//! Sends a single user message to `{base_url}/chat/completions` and returns
//! `choices[0].message.content`. OpenRouter, Groq and Ollama all speak this
//! protocol; they differ only in base URL, auth, extra headers and the name
//! of the token-limit field.

use super::{ModelClient, ModelError};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Name of the output-token limit in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitField {
    /// `max_completion_tokens` (OpenRouter).
    MaxCompletionTokens,
    /// `max_tokens` (Groq, Ollama).
    MaxTokens,
}

/// Everything needed to talk to one chat completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    /// Provider name for messages (e.g., `OpenRouter`).
    pub provider: String,
    /// Base URL without the `/chat/completions` suffix.
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_completion_tokens: u32,
    pub top_p: f64,
    pub token_limit_field: TokenLimitField,
    /// Extra request headers (e.g., OpenRouter attribution).
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// Blocking chat completion client.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    options: ChatOptions,
    http: Client,
}

impl ChatCompletionClient {
    /// Build the HTTP client. Fails only if the TLS backend cannot start.
    pub fn new(options: ChatOptions) -> Result<Self, ModelError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(options.timeout)
            .build()
            .map_err(|e| ModelError::Transport {
                provider: options.provider.clone(),
                message: e.to_string(),
                connect: false,
            })?;

        Ok(Self { options, http })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.options.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        let limit = self.options.max_completion_tokens;
        let (max_completion_tokens, max_tokens) = match self.options.token_limit_field {
            TokenLimitField::MaxCompletionTokens => (Some(limit), None),
            TokenLimitField::MaxTokens => (None, Some(limit)),
        };

        ChatRequest {
            model: &self.options.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.options.temperature,
            top_p: self.options.top_p,
            max_completion_tokens,
            max_tokens,
            stream: false,
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> ModelError {
        ModelError::Transport {
            provider: self.options.provider.clone(),
            message: error.to_string(),
            connect: error.is_connect(),
        }
    }
}

impl ModelClient for ChatCompletionClient {
    fn provider(&self) -> &str {
        &self.options.provider
    }

    fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let endpoint = self.endpoint();
        debug!(
            provider = %self.options.provider,
            model = %self.options.model,
            %endpoint,
            prompt_chars = prompt.chars().count(),
            "sending chat completion"
        );

        let mut request = self.http.post(&endpoint).json(&self.request_body(prompt));
        if let Some(key) = &self.options.api_key {
            request = request.bearer_auth(key);
        }
        for (name, value) in &self.options.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(ModelError::Http {
                provider: self.options.provider.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|e| self.transport_error(e))?;
        extract_content(&self.options.provider, &body)
    }
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_content(provider: &str, body: &str) -> Result<String, ModelError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ModelError::InvalidResponse {
            provider: provider.to_string(),
            message: e.to_string(),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| ModelError::MissingContent {
            provider: provider.to_string(),
        })
}
