//! Proxy response builders and small shared operations for API handlers.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::mattermost::Platform;

/// Returns a 200 OK response with an empty JSON body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "headers": { "Content-Type": "application/json" }, "body": "{}" })
}

/// Returns a 200 OK response with `body` serialized as JSON.
#[must_use]
pub fn ok_json<T: Serialize>(body: &T) -> Value {
    match serde_json::to_string(body) {
        Ok(body) => json!({
            "statusCode": 200,
            "headers": { "Content-Type": "application/json" },
            "body": body
        }),
        Err(e) => err_response(500, &format!("Failed to encode response: {e}")),
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": message }).to_string()
    })
}

#[must_use]
pub fn bad_request() -> Value {
    err_response(400, "Bad Request")
}

/// Sends an ephemeral message, logging instead of failing when it cannot be
/// delivered.
pub async fn tell_user(platform: &dyn Platform, user_id: &str, channel_id: &str, message: &str) {
    if let Err(e) = platform.send_ephemeral(user_id, channel_id, message).await {
        warn!("Failed to send ephemeral message to {}: {}", user_id, e);
    }
}
