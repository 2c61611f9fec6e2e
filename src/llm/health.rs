//! Provider connectivity check.

use super::{ModelClient, ModelError};
use std::time::{Duration, Instant};

/// Prompt used to check that the model answers at all.
pub const HEALTH_CHECK_PROMPT: &str = "Reply with \"OK\" only.";

/// Outcome of a successful health check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    /// Round-trip time of the completion call.
    pub duration: Duration,
    /// Trimmed response text.
    pub response: String,
}

/// Send [`HEALTH_CHECK_PROMPT`] and time the answer.
pub fn check_connection(client: &dyn ModelClient) -> Result<HealthCheck, ModelError> {
    let start = Instant::now();
    let response = client.complete(HEALTH_CHECK_PROMPT)?;

    Ok(HealthCheck {
        duration: start.elapsed(),
        response: response.trim().to_string(),
    })
}
