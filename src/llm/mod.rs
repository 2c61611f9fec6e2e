//! Model clients.
//!
//! Every backend implements [`ModelClient`]: one prompt in, one text
//! response out. Clients never retry; the generator owns the single repair
//! round-trip. The concrete client is chosen once at startup by
//! [`create_model_client`] from the configured provider:
//!
//! - **openrouter / groq / ollama**: [`ChatCompletionClient`], an
//!   OpenAI-compatible `/chat/completions` client
//! - **command**: [`CommandClient`], which pipes the prompt to a local
//!   program's stdin

mod chat;
mod command;
mod errors;
mod factory;
mod health;

pub use chat::{ChatCompletionClient, ChatOptions, TokenLimitField};
pub use command::CommandClient;
pub use errors::describe_model_error;
pub use factory::{create_model_client, normalize_ollama_base_url};
pub use health::{HEALTH_CHECK_PROMPT, HealthCheck, check_connection};

use thiserror::Error;

/// Failure reported by a model backend.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The backend answered but returned no text.
    #[error("{provider} response missing content.")]
    MissingContent { provider: String },

    /// The backend answered with a non-success HTTP status.
    #[error("{provider} request failed with status {status}: {body}")]
    Http {
        provider: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (DNS, refused connection,
    /// timeout, TLS).
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: String,
        message: String,
        /// The connection itself could not be established.
        connect: bool,
    },

    /// The response body was not the expected JSON.
    #[error("{provider} returned an unreadable response: {message}")]
    InvalidResponse { provider: String, message: String },

    /// The model command could not be run or exited unsuccessfully.
    #[error("model command '{command}' failed: {message}")]
    Command { command: String, message: String },

    /// The model command ran past its timeout and was killed.
    #[error("model command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },
}

impl ModelError {
    /// HTTP status, when the backend answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ModelError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend could not be reached at all.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ModelError::Transport { connect: true, .. })
    }
}

/// A text-completion backend.
pub trait ModelClient {
    /// Provider name used in messages and logs (e.g., `OpenRouter`).
    fn provider(&self) -> &str;

    /// Send `prompt` and return the response text.
    ///
    /// Implementations make exactly one attempt and fail with
    /// [`ModelError::MissingContent`] when the response has no text.
    fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

impl<T: ModelClient + ?Sized> ModelClient for Box<T> {
    fn provider(&self) -> &str {
        (**self).provider()
    }

    fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).complete(prompt)
    }
}
