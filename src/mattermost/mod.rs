//! Everything that talks to the Mattermost server.

pub mod client;
pub mod dialog;
pub mod response_builder;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MbotcError;

pub use client::MattermostClient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub file_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: String,
}

impl User {
    /// Nickname when set, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Message attachment ("card") in Mattermost's Slack-compatible format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub author_name: String,
    pub color: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub channel_id: String,
    pub message: String,
    pub file_ids: Vec<String>,
    pub attachments: Vec<Attachment>,
}

/// Operations the notice flows need from the chat server.
#[async_trait]
pub trait Platform: Send + Sync {
    async fn get_post(&self, post_id: &str) -> Result<Post, MbotcError>;

    async fn create_post(&self, post: &NewPost) -> Result<Post, MbotcError>;

    /// Posts a message only `user_id` can see.
    async fn send_ephemeral(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
    ) -> Result<(), MbotcError>;

    async fn add_reaction(&self, post_id: &str, emoji_name: &str) -> Result<(), MbotcError>;

    async fn get_user(&self, user_id: &str) -> Result<User, MbotcError>;

    async fn get_channel(&self, channel_id: &str) -> Result<Channel, MbotcError>;

    async fn get_team(&self, team_id: &str) -> Result<Team, MbotcError>;

    /// Uploads one file into `channel_id` and returns its file id.
    async fn upload_file(
        &self,
        channel_id: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<String, MbotcError>;

    async fn open_dialog(
        &self,
        trigger_id: &str,
        callback_url: &str,
        dialog: &Value,
    ) -> Result<(), MbotcError>;
}
