//! Credential lookup.
//!
//! Provider API keys never live in the config file. They are read through a
//! [`SecretStore`] when the model client is built; a missing key is a
//! configuration error raised before any git or model work starts.

use std::collections::HashMap;

/// Environment variable holding the OpenRouter API key.
pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";

/// Read-only source of credentials.
pub trait SecretStore {
    /// The secret for `key`, or `None` when unset or blank.
    fn get_secret(&self, key: &str) -> Option<String>;
}

/// Reads secrets from process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get_secret(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().and_then(non_blank)
    }
}

/// Fixed in-memory secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), value.into());
        self
    }
}

impl SecretStore for StaticSecretStore {
    fn get_secret(&self, key: &str) -> Option<String> {
        self.secrets.get(key).cloned().and_then(non_blank)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_store_lookup() {
        let store = StaticSecretStore::new().with(GROQ_API_KEY, "gsk_test");
        assert_eq!(store.get_secret(GROQ_API_KEY).as_deref(), Some("gsk_test"));
        assert_eq!(store.get_secret(OPENROUTER_API_KEY), None);
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let store = StaticSecretStore::new().with(OPENROUTER_API_KEY, "   ");
        assert_eq!(store.get_secret(OPENROUTER_API_KEY), None);
    }

    #[test]
    fn test_values_are_trimmed() {
        let store = StaticSecretStore::new().with(OPENROUTER_API_KEY, " sk-or-1\n");
        assert_eq!(store.get_secret(OPENROUTER_API_KEY).as_deref(), Some("sk-or-1"));
    }

    #[test]
    fn test_env_store_missing_variable() {
        let store = EnvSecretStore;
        assert_eq!(store.get_secret("JIRADRAFT_TEST_DEFINITELY_UNSET_VARIABLE"), None);
    }
}
