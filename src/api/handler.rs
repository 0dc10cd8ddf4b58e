//! API Lambda handler: a thin router in front of the endpoint handlers.
//!
//! It checks the method, the content type and, for the editor and button
//! endpoints, the request signature before anything reaches the chat
//! server or the notification service.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::parsing::{ProxyRequest, media_type};
use super::state::AppState;
use super::{helpers, notice_handler, routes, signature, slash_handler};
use crate::core::config::AppConfig;
use crate::errors::MbotcError;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

pub const SIGNATURE_HEADER: &str = "X-Mbotc-Signature";
pub const TIMESTAMP_HEADER: &str = "X-Mbotc-Request-Timestamp";

/// Lambda entrypoint. Reloads a stale configuration, then answers the event.
///
/// # Errors
///
/// Never fails; every problem is turned into a proxy response.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler(state: &AppState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    state.config.refresh_if_stale().await;
    Ok(handle_request(state, &event.payload).await)
}

/// Routes one proxy event to its endpoint handler.
pub async fn handle_request(state: &AppState, payload: &Value) -> Value {
    let correlation_id = Uuid::new_v4().to_string();

    let request = match ProxyRequest::from_event(payload) {
        Ok(request) => request,
        Err(e) => {
            error!(correlation_id = %correlation_id, "Unreadable event: {}", e);
            return helpers::bad_request();
        }
    };

    info!(
        correlation_id = %correlation_id,
        method = %request.method,
        path = %request.path,
        "Request received"
    );

    if request.method != "POST" {
        return helpers::bad_request();
    }

    let config = state.config.current();
    let content_type = media_type(request.content_type());

    if request.is_route(routes::SLASH_COMMAND) {
        if content_type != FORM_URLENCODED {
            return helpers::bad_request();
        }
        return slash_handler::handle_slash_command(state, &config, &request, &correlation_id)
            .await;
    }

    if request.is_route(routes::CREATE_WITH_COMMAND) {
        if content_type != JSON {
            return helpers::bad_request();
        }
        return notice_handler::create_with_command(state, &config, &request, &correlation_id)
            .await;
    }

    if request.is_route(routes::CREATE_WITH_EDITOR) {
        if content_type != MULTIPART {
            return helpers::bad_request();
        }
        if let Err(e) = verify_signature(&request, &config) {
            return unauthorized(&e);
        }
        return notice_handler::create_with_editor(state, &request, &correlation_id).await;
    }

    if request.is_route(routes::CREATE_WITH_BUTTON) {
        if content_type != JSON {
            return helpers::bad_request();
        }
        if let Err(e) = verify_signature(&request, &config) {
            return unauthorized(&e);
        }
        return notice_handler::create_with_button(state, &config, &request, &correlation_id)
            .await;
    }

    warn!(correlation_id = %correlation_id, path = %request.path, "Unknown route");
    helpers::bad_request()
}

fn verify_signature(request: &ProxyRequest, config: &AppConfig) -> Result<(), MbotcError> {
    let (Some(timestamp), Some(sig)) = (
        request.header(TIMESTAMP_HEADER),
        request.header(SIGNATURE_HEADER),
    ) else {
        return Err(MbotcError::Unauthorized("missing signature headers".into()));
    };

    if signature::verify_request_signature(&request.body, timestamp, sig, &config.signing_secret) {
        Ok(())
    } else {
        Err(MbotcError::Unauthorized("signature mismatch".into()))
    }
}

fn unauthorized(e: &MbotcError) -> Value {
    error!("{}", e);
    helpers::err_response(401, &e.to_string())
}
