//! Mattermost REST v4 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

use super::{Channel, NewPost, Platform, Post, Team, User};
use crate::core::config::SharedConfig;
use crate::errors::MbotcError;

#[derive(Debug, Deserialize)]
struct FileUploadResponse {
    #[serde(default)]
    file_infos: Vec<FileInfo>,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    id: String,
}

/// Talks to the Mattermost server named by the current configuration, as the
/// bot account.
pub struct MattermostClient {
    http: Client,
    config: SharedConfig,
}

impl MattermostClient {
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http, config }
    }

    fn endpoint(&self, path: &str) -> Result<(Url, String), MbotcError> {
        let config = self.config.current();
        let raw = format!("{}/api/v4/{}", config.mattermost_url, path);
        let url = Url::parse(&raw)
            .map_err(|e| MbotcError::ConfigError(format!("bad Mattermost URL {raw}: {e}")))?;
        Ok((url, config.mattermost_bot_token.clone()))
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, MbotcError> {
        let (url, token) = self.endpoint(path)?;
        Ok(self.http.get(url).bearer_auth(token))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, MbotcError> {
        let (url, token) = self.endpoint(path)?;
        Ok(self.http.post(url).bearer_auth(token))
    }

    async fn execute(&self, request: RequestBuilder, what: &str) -> Result<String, MbotcError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());

        if !status.is_success() {
            error!("{} failed: status={} body={}", what, status, body);
            return Err(MbotcError::ApiError(format!("{what} HTTP {status}")));
        }
        debug!("{} succeeded: status={}", what, status);
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, MbotcError> {
        let body = self.execute(request, what).await?;
        serde_json::from_str(&body)
            .map_err(|e| MbotcError::ApiError(format!("{what} JSON parse error: {e}")))
    }
}

#[async_trait]
impl Platform for MattermostClient {
    async fn get_post(&self, post_id: &str) -> Result<Post, MbotcError> {
        let request = self.get(&format!("posts/{post_id}"))?;
        self.execute_json(request, "posts.get").await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, MbotcError> {
        let payload = json!({
            "channel_id": post.channel_id,
            "message": post.message,
            "file_ids": post.file_ids,
            "props": { "attachments": post.attachments },
        });
        let request = self.post("posts")?.json(&payload);
        self.execute_json(request, "posts.create").await
    }

    async fn send_ephemeral(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
    ) -> Result<(), MbotcError> {
        let payload = json!({
            "user_id": user_id,
            "post": { "channel_id": channel_id, "message": message },
        });
        let request = self.post("posts/ephemeral")?.json(&payload);
        self.execute(request, "posts.ephemeral").await.map(|_| ())
    }

    async fn add_reaction(&self, post_id: &str, emoji_name: &str) -> Result<(), MbotcError> {
        let payload = json!({
            "user_id": self.config.current().mattermost_bot_user_id,
            "post_id": post_id,
            "emoji_name": emoji_name,
        });
        let request = self.post("reactions")?.json(&payload);
        self.execute(request, "reactions.save").await.map(|_| ())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, MbotcError> {
        let request = self.get(&format!("users/{user_id}"))?;
        self.execute_json(request, "users.get").await
    }

    async fn get_channel(&self, channel_id: &str) -> Result<Channel, MbotcError> {
        let request = self.get(&format!("channels/{channel_id}"))?;
        self.execute_json(request, "channels.get").await
    }

    async fn get_team(&self, team_id: &str) -> Result<Team, MbotcError> {
        let request = self.get(&format!("teams/{team_id}"))?;
        self.execute_json(request, "teams.get").await
    }

    async fn upload_file(
        &self,
        channel_id: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<String, MbotcError> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())?;
        let form = Form::new()
            .text("channel_id", channel_id.to_string())
            .part("files", part);

        let request = self.post("files")?.multipart(form);
        let uploaded: FileUploadResponse = self.execute_json(request, "files.upload").await?;

        uploaded
            .file_infos
            .into_iter()
            .next()
            .map(|info| info.id)
            .ok_or_else(|| MbotcError::ApiError("files.upload returned no file info".into()))
    }

    async fn open_dialog(
        &self,
        trigger_id: &str,
        callback_url: &str,
        dialog: &Value,
    ) -> Result<(), MbotcError> {
        let payload = json!({
            "trigger_id": trigger_id,
            "url": callback_url,
            "dialog": dialog,
        });
        let request = self.post("actions/dialogs/open")?.json(&payload);
        self.execute(request, "dialogs.open").await.map(|_| ())
    }
}
