use serde_json::Value;
use tracing::{error, info};

use super::helpers;
use super::parsing::ProxyRequest;
use super::state::AppState;
use crate::command::{CommandContext, dispatch, parser::parse_form_data};
use crate::core::config::AppConfig;

/// Answers `POST /command` with an ephemeral command response.
#[tracing::instrument(level = "info", skip_all, fields(correlation_id = %correlation_id))]
pub async fn handle_slash_command(
    state: &AppState,
    config: &AppConfig,
    request: &ProxyRequest,
    correlation_id: &str,
) -> Value {
    let command = match request
        .body_str()
        .map_err(|e| e.to_string())
        .and_then(parse_form_data)
    {
        Ok(command) => command,
        Err(e) => {
            error!("Failed to parse slash command: {}", e);
            return helpers::err_response(400, &format!("Parse Error: {e}"));
        }
    };

    if command.token != config.command_token {
        error!(user_id = %command.user_id, "Slash command token mismatch");
        return helpers::err_response(401, "Invalid command token");
    }

    #[cfg(feature = "debug-logs")]
    info!(user_id = %command.user_id, text = %command.text, "Slash command");

    #[cfg(not(feature = "debug-logs"))]
    info!(user_id = %command.user_id, "Slash command");

    let ctx = CommandContext {
        config,
        platform: state.platform.as_ref(),
        notifications: state.notifications.as_ref(),
        command: &command,
        correlation_id,
    };
    let response = dispatch(&state.commands, &ctx).await;
    helpers::ok_json(&response)
}
