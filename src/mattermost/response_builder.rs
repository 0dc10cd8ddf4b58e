//! Slash command responses.

use serde::Serialize;

use super::Attachment;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandResponse {
    pub response_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// A response only the invoking user sees.
#[must_use]
pub fn ephemeral(text: &str) -> CommandResponse {
    CommandResponse {
        response_type: "ephemeral".to_string(),
        text: text.to_string(),
        attachments: Vec::new(),
    }
}

#[must_use]
pub fn ephemeral_attachment(attachment: Attachment) -> CommandResponse {
    CommandResponse {
        response_type: "ephemeral".to_string(),
        text: String::new(),
        attachments: vec![attachment],
    }
}
