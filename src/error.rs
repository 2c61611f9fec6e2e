//! Error types for jiradraft.
//!
//! Uses thiserror for derive macros. Every variant knows whether its message
//! is safe to show to the user as-is and which exit code it maps to.

use crate::exit_codes;
use crate::llm::ModelError;
use thiserror::Error;

/// Main error type for jiradraft operations.
#[derive(Error, Debug)]
pub enum DraftError {
    /// Invalid configuration, missing credential, or no workspace.
    /// Raised before the pipeline starts.
    #[error("{0}")]
    Config(String),

    /// Nothing left to analyze after pruning.
    #[error("{0}")]
    NoChanges(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    Git(String),

    /// The model client failed. Propagated unmodified from the provider.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The model returned invalid JSON twice (original response and repair).
    #[error("LLM failed to return valid JSON after a repair attempt.")]
    RepairFailed {
        /// The first raw response.
        raw: String,
        /// Why the first response was rejected.
        first_error: String,
        /// The raw response to the repair prompt.
        repair_raw: String,
        /// Why the repaired response was rejected.
        repair_error: String,
    },

    /// Writing the task to storage failed.
    #[error("Failed to save task: {0}")]
    Storage(String),

    /// Unexpected failure; details are for logs, not for display.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DraftError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DraftError::Config(_) | DraftError::NoChanges(_) => exit_codes::USER_ERROR,
            DraftError::RepairFailed { .. } | DraftError::Storage(_) | DraftError::Internal(_) => {
                exit_codes::GENERATION_FAILURE
            }
            DraftError::Git(_) => exit_codes::GIT_FAILURE,
            DraftError::Model(_) => exit_codes::MODEL_FAILURE,
        }
    }

    /// Whether the message can be displayed verbatim to an end user.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, DraftError::Internal(_))
    }
}

/// Result type alias for jiradraft operations.
pub type Result<T> = std::result::Result<T, DraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_has_user_exit_code() {
        let err = DraftError::Config("OpenRouter API key not found.".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.is_user_facing());
    }

    #[test]
    fn no_changes_error_has_user_exit_code() {
        let err = DraftError::NoChanges("No git changes found to analyze.".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert_eq!(err.to_string(), "No git changes found to analyze.");
    }

    #[test]
    fn git_error_has_correct_exit_code() {
        let err = DraftError::Git("git diff failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
        assert_eq!(err.to_string(), "Git operation failed: git diff failed");
    }

    #[test]
    fn model_error_is_transparent() {
        let err = DraftError::from(ModelError::MissingContent {
            provider: "Groq".to_string(),
        });
        assert_eq!(err.exit_code(), exit_codes::MODEL_FAILURE);
        assert_eq!(err.to_string(), "Groq response missing content.");
    }

    #[test]
    fn repair_failure_shows_one_consolidated_message() {
        let err = DraftError::RepairFailed {
            raw: "{bad".to_string(),
            first_error: "EOF while parsing".to_string(),
            repair_raw: "still bad".to_string(),
            repair_error: "No JSON payload found in LLM response.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "LLM failed to return valid JSON after a repair attempt."
        );
        assert_eq!(err.exit_code(), exit_codes::GENERATION_FAILURE);
    }

    #[test]
    fn internal_error_is_not_user_facing() {
        let err = DraftError::Internal("schema failed to compile".to_string());
        assert!(!err.is_user_facing());
    }
}
