//! The three ways to create a notice: dialog, editor and button.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers::{self, tell_user};
use super::parsing::ProxyRequest;
use super::signature;
use super::state::AppState;
use crate::core::config::AppConfig;
use crate::errors::MbotcError;
use crate::notice::membership::ensure_registered;
use crate::notice::normalizer::{self, NormalizeError};
use crate::notice::{NoticePublisher, Published, messages};

/// Body of a successful creation response.
#[derive(Debug, Serialize)]
pub struct CreatedNotice {
    pub post_id: String,
    pub registered: bool,
}

impl From<&Published> for CreatedNotice {
    fn from(published: &Published) -> Self {
        Self {
            post_id: published.notice.post_id.clone(),
            registered: published.is_registered(),
        }
    }
}

fn created(published: &Published) -> Value {
    helpers::ok_json(&CreatedNotice::from(published))
}

fn post_failed(e: &MbotcError) -> Value {
    helpers::err_response(500, &format!("Failed to create post: {e}"))
}

/// `POST /api/v1/create-notification-with-command`, the dialog callback.
///
/// A rejected timestamp is answered with an ephemeral echo and an empty 200
/// so that the dialog closes.
#[tracing::instrument(level = "info", skip_all, fields(correlation_id = %correlation_id))]
pub async fn create_with_command(
    state: &AppState,
    config: &AppConfig,
    request: &ProxyRequest,
    correlation_id: &str,
) -> Value {
    let submission = match normalizer::decode_dialog(&request.body) {
        Ok(submission) => submission,
        Err(e) => {
            error!("Dialog submission decode failed: {}", e);
            return helpers::bad_request();
        }
    };

    if submission.cancelled {
        info!(user_id = %submission.user_id, "Dialog cancelled");
        return helpers::ok_empty();
    }

    if !signature::verify_dialog_state(
        &config.signing_secret,
        &submission.user_id,
        &submission.channel_id,
        &submission.state,
    ) {
        error!(user_id = %submission.user_id, "Dialog state does not verify");
        return helpers::err_response(401, "Invalid dialog state");
    }

    let notice = match normalizer::from_dialog(&submission) {
        Ok(notice) => notice,
        Err(NormalizeError::InvalidTime(rejected)) => {
            tell_user(
                state.platform.as_ref(),
                &rejected.user_id,
                &rejected.channel_id,
                &messages::validation_echo(&rejected),
            )
            .await;
            return helpers::ok_empty();
        }
        Err(e) => {
            error!("Dialog submission rejected: {}", e);
            return helpers::bad_request();
        }
    };

    let publisher = NoticePublisher::new(
        state.platform.as_ref(),
        state.notifications.as_ref(),
        correlation_id,
    );
    match publisher.publish(notice).await {
        Ok(published) => created(&published),
        Err(e) => post_failed(&e),
    }
}

/// `POST /api/v1/create-notification-with-editor`, a multipart form from the
/// web editor.
#[tracing::instrument(level = "info", skip_all, fields(correlation_id = %correlation_id))]
pub async fn create_with_editor(
    state: &AppState,
    request: &ProxyRequest,
    correlation_id: &str,
) -> Value {
    let platform = state.platform.as_ref();

    let notice = match normalizer::from_multipart(
        platform,
        request.content_type(),
        request.body.clone(),
    )
    .await
    {
        Ok(notice) => notice,
        Err(NormalizeError::InvalidTime(rejected)) => {
            tell_user(
                platform,
                &rejected.user_id,
                &rejected.channel_id,
                &messages::validation_echo(&rejected),
            )
            .await;
            return helpers::err_response(400, "Invalid time format");
        }
        Err(NormalizeError::Platform(e)) => {
            error!("File upload failed: {}", e);
            return helpers::err_response(500, &format!("Failed to upload file: {e}"));
        }
        Err(e) => {
            error!("Editor form rejected: {}", e);
            return helpers::bad_request();
        }
    };

    let publisher = NoticePublisher::new(platform, state.notifications.as_ref(), correlation_id);
    match publisher.publish(notice).await {
        Ok(published) => created(&published),
        Err(e) => post_failed(&e),
    }
}

/// `POST /api/v1/create-notification-with-button`: promotes an existing post.
#[tracing::instrument(level = "info", skip_all, fields(correlation_id = %correlation_id))]
pub async fn create_with_button(
    state: &AppState,
    config: &AppConfig,
    request: &ProxyRequest,
    correlation_id: &str,
) -> Value {
    let platform = state.platform.as_ref();

    let button = match normalizer::decode_button(&request.body) {
        Ok(button) => button,
        Err(e) => {
            error!("Button request decode failed: {}", e);
            return helpers::bad_request();
        }
    };

    let notice = match normalizer::from_button(platform, &button, &config.now()).await {
        Ok(notice) => notice,
        Err(NormalizeError::NotOwner {
            user_id,
            post_id,
            channel_id,
        }) => {
            warn!(
                user_id = %user_id,
                post_id = %post_id,
                "Button used by someone other than the author"
            );
            tell_user(platform, &user_id, &channel_id, messages::NOT_OWNER).await;
            return helpers::ok_empty();
        }
        Err(NormalizeError::Platform(e)) => {
            error!(post_id = %button.post_id, "Post lookup failed: {}", e);
            return helpers::err_response(500, &format!("Failed to fetch post: {e}"));
        }
        Err(e) => {
            error!("Button request rejected: {}", e);
            return helpers::bad_request();
        }
    };

    if let Err(denied) = ensure_registered(state.notifications.as_ref(), &notice.user_id).await {
        tell_user(
            platform,
            &notice.user_id,
            &notice.channel_id,
            &denied.message(&config.client_url),
        )
        .await;
        return helpers::ok_empty();
    }

    let publisher = NoticePublisher::new(platform, state.notifications.as_ref(), correlation_id);
    created(&publisher.promote(notice).await)
}
