//! User-facing descriptions of model failures.

use super::ModelError;
use crate::config::Provider;

/// Turn a model failure into a message for the terminal.
///
/// Auth and missing-model statuses get a hint; an unreachable Ollama server
/// names the URL that was tried. Everything else keeps the error's own text.
pub fn describe_model_error(
    error: &ModelError,
    provider: Provider,
    ollama_base_url: Option<&str>,
) -> String {
    match error.status() {
        Some(401) | Some(403) => {
            return "Invalid key or insufficient permissions.".to_string();
        }
        Some(404) => return "Model not available. Check the model name.".to_string(),
        Some(429) => return "Rate limited by the provider. Try again shortly.".to_string(),
        _ => {}
    }

    if provider == Provider::Ollama && error.is_connection_error() {
        let base_url = ollama_base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or("http://localhost:11434");
        return format!("Cannot reach Ollama at {}. Is it running?", base_url);
    }

    error.to_string()
}
