//! The downstream notification service: system of record for notices.

pub mod client;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::core::models::{DigestEntry, Notice};
use crate::errors::MbotcError;

pub use client::NotificationClient;

/// A fully read HTTP response. The connection is released before this value
/// exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx reply into `ServiceError`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError` carrying the status and body.
    pub fn ensure_success(self) -> Result<Self, MbotcError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(MbotcError::ServiceError {
                status: self.status,
                body: self.body,
            })
        }
    }
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// `POST /api/v1/notification`
    async fn register(&self, notice: &Notice) -> Result<(), MbotcError>;

    /// `GET /api/v1/notification/today`; only a transport failure is an error.
    async fn todays_notices(&self, user_id: &str) -> Result<Vec<DigestEntry>, MbotcError>;

    /// `GET /api/v1/user`; `false` when the service answers 404.
    async fn user_exists(&self, user_id: &str) -> Result<bool, MbotcError>;
}

/// Digest entries carried by a reply to `GET /api/v1/notification/today`.
///
/// A non-2xx reply yields no entries, like a body that does not decode.
#[must_use]
pub fn digest_from_reply(reply: &HttpReply) -> Vec<DigestEntry> {
    if !reply.is_success() {
        warn!(
            "Digest request answered with status={}, treating as empty",
            reply.status
        );
        return Vec::new();
    }
    decode_digest(&reply.body)
}

/// Decodes a digest body leniently: anything but a JSON array yields no
/// entries, non-object items are skipped and missing or `null` fields become
/// empty strings.
#[must_use]
pub fn decode_digest(body: &str) -> Vec<DigestEntry> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(body) else {
        warn!("Digest payload is not a JSON array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut fields) => {
                fields.retain(|_, v| !v.is_null());
                serde_json::from_value(Value::Object(fields)).ok()
            }
            _ => None,
        })
        .collect()
}
