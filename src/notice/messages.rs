//! Texts sent back to the requester as ephemeral messages.

use crate::core::models::Notice;

pub const REGISTRATION_SUCCESS: &str = "Registration success";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const POST_FAILED: &str = "Oops! Failed to post your notification.";
pub const NOT_OWNER: &str = "Only post owner can create notification";
pub const SOMETHING_WRONG: &str = "Oops! Something wrong";

/// First eight characters of a correlation id, for `(ref: ...)` suffixes.
#[must_use]
pub fn short_ref(correlation_id: &str) -> &str {
    correlation_id.get(..8).unwrap_or(correlation_id)
}

#[must_use]
pub fn with_ref(message: &str, correlation_id: &str) -> String {
    format!("{message} (ref: {})", short_ref(correlation_id))
}

#[must_use]
pub fn login_required(client_url: &str) -> String {
    format!("Please login first to use MBotC service.\n[Login here]({client_url})")
}

/// Echoes a rejected submission back to its author.
#[must_use]
pub fn validation_echo(notice: &Notice) -> String {
    let end_time = if notice.is_deadline() {
        ""
    } else {
        notice.end_time.as_str()
    };

    format!(
        "Oops! Failed to Create Notification.\nYour Input: \n\nDate: {}\nEnd date: {}\nMessage: {}",
        notice.start_time, end_time, notice.message
    )
}
