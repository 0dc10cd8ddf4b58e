use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{error, info};

use super::{HttpReply, NotificationService, digest_from_reply};
use crate::core::config::SharedConfig;
use crate::core::models::{DigestEntry, Notice};
use crate::errors::MbotcError;

/// Header the notification service identifies the caller by.
const USER_ID_HEADER: &str = "userId";

/// HTTP client for the notification service at the configured base URL.
pub struct NotificationClient {
    http: Client,
    config: SharedConfig,
}

impl NotificationClient {
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.current().service_url, path)
    }

    /// Sends the request and reads the body to the end, so the response is
    /// dropped on every path out of this function.
    async fn execute(request: RequestBuilder) -> Result<HttpReply, MbotcError> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpReply { status, body })
    }
}

#[async_trait]
impl NotificationService for NotificationClient {
    async fn register(&self, notice: &Notice) -> Result<(), MbotcError> {
        let request = self.http.post(self.url("/api/v1/notification")).json(notice);
        let reply = Self::execute(request).await?;
        if !reply.is_success() {
            error!(
                "Notification registration rejected: status={} body={}",
                reply.status, reply.body
            );
        }
        reply.ensure_success().map(|_| {
            info!(post_id = %notice.post_id, "Notification registered");
        })
    }

    async fn todays_notices(&self, user_id: &str) -> Result<Vec<DigestEntry>, MbotcError> {
        let request = self
            .http
            .get(self.url("/api/v1/notification/today"))
            .header(USER_ID_HEADER, user_id);
        let reply = Self::execute(request).await?;
        Ok(digest_from_reply(&reply))
    }

    async fn user_exists(&self, user_id: &str) -> Result<bool, MbotcError> {
        let request = self
            .http
            .get(self.url("/api/v1/user"))
            .header(USER_ID_HEADER, user_id);
        let reply = Self::execute(request).await?;
        if reply.status == 404 {
            return Ok(false);
        }
        reply.ensure_success().map(|_| true)
    }
}
