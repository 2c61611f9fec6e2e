//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::Provider;
use crate::diff::DiffMode;
use crate::error::{DraftError, Result};
use crate::prune::PruneOptions;
use std::path::Path;

/// Values given on the command line; each one replaces its config key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub provider: Option<Provider>,
    pub diff_mode: Option<DiffMode>,
    pub prompt_language: Option<String>,
    pub custom_instructions: Option<String>,
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `.jiradraft.yaml` file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(DraftError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            DraftError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| DraftError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| DraftError::Internal(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `temperature` must be within `0..=2`
    /// - `top_p` must be within `(0, 1]`
    /// - `max_completion_tokens` must be positive
    /// - `storage_file` must be non-empty
    /// - `command` must be set when `provider` is `command`
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DraftError::Config(format!(
                "config validation failed: temperature must be between 0 and 2 (found {})",
                self.temperature
            )));
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(DraftError::Config(format!(
                "config validation failed: top_p must be greater than 0 and at most 1 (found {})",
                self.top_p
            )));
        }

        if self.max_completion_tokens == 0 {
            return Err(DraftError::Config(
                "config validation failed: max_completion_tokens must be greater than 0"
                    .to_string(),
            ));
        }

        if self.storage_file.trim().is_empty() {
            return Err(DraftError::Config(
                "config validation failed: storage_file must be non-empty".to_string(),
            ));
        }

        if self.provider == Provider::Command
            && self.command.as_deref().is_none_or(|c| c.trim().is_empty())
        {
            return Err(DraftError::Config(
                "config validation failed: provider 'command' requires the 'command' setting"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }
        if let Some(mode) = overrides.diff_mode {
            self.diff_mode = mode;
        }
        if let Some(language) = &overrides.prompt_language {
            self.prompt_language = language.clone();
        }
        if let Some(instructions) = &overrides.custom_instructions {
            self.custom_instructions = Some(instructions.clone());
        }

        self.validate()?;
        Ok(self)
    }

    /// Caps for the context pruner.
    pub fn prune_options(&self) -> PruneOptions {
        PruneOptions {
            max_files: self.max_files,
            max_chars_per_file: self.max_chars_per_file,
        }
    }

    /// Custom instructions, treating blank text as absent.
    pub fn custom_instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}
