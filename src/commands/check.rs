//! Implementation of the `jiradraft check` command.

use super::{CommandResult, Failure};
use crate::cli::CheckArgs;
use crate::context::WorkspaceContext;
use crate::error::Result;
use crate::events::{Event, EventAction, EventLog};
use crate::llm::{HealthCheck, ModelClient, check_connection, create_model_client};
use crate::secrets::EnvSecretStore;
use serde_json::json;
use tracing::warn;

/// Execute the `jiradraft check` command.
pub fn cmd_check(args: CheckArgs) -> CommandResult {
    let ctx = WorkspaceContext::resolve()?;
    let config = ctx.load_config()?.with_overrides(&args.overrides())?;
    let model = create_model_client(&config, &EnvSecretStore)?;
    let event_log = ctx.event_log_path(&config).map(EventLog::new);

    println!("Contacting {}...", config.provider.display_name());
    let result = run_check(model.as_ref(), event_log.as_ref())
        .map_err(|e| Failure::with_config(e, &config))?;

    println!(
        "LLM connection successful ({} ms).",
        result.duration.as_millis()
    );
    if !result.response.is_empty() {
        println!("  Response: {}", result.response);
    }
    Ok(())
}

/// Run the health check and record its outcome.
pub(crate) fn run_check(model: &dyn ModelClient, event_log: Option<&EventLog>) -> Result<HealthCheck> {
    let outcome = check_connection(model);

    if let Some(log) = event_log {
        let details = match &outcome {
            Ok(check) => json!({
                "provider": model.provider(),
                "ok": true,
                "duration_ms": check.duration.as_millis() as u64,
            }),
            Err(e) => json!({
                "provider": model.provider(),
                "ok": false,
                "error": e.to_string(),
            }),
        };
        if let Err(e) = log.append(&Event::new(EventAction::Check).with_details(details)) {
            warn!(path = %log.path().display(), error = %e, "failed to append event");
        }
    }

    Ok(outcome?)
}
