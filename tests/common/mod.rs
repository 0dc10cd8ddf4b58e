//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use mbotc::api::AppState;
use mbotc::core::config::{AppConfig, SharedConfig};
use mbotc::core::models::{DigestEntry, Notice};
use mbotc::errors::MbotcError;
use mbotc::mattermost::{Channel, NewPost, Platform, Post, Team, User};
use mbotc::notify::{HttpReply, NotificationService, digest_from_reply};

pub const SECRET: &str = "test-signing-secret";
pub const COMMAND_TOKEN: &str = "command-token";
pub const CREATED_POST_ID: &str = "created-post";

/// Every collaborator call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetPost(String),
    CreatePost(NewPost),
    Ephemeral {
        user_id: String,
        channel_id: String,
        message: String,
    },
    Reaction {
        post_id: String,
        emoji: String,
    },
    GetUser(String),
    GetChannel(String),
    GetTeam(String),
    Upload {
        channel_id: String,
        file_name: String,
        size: usize,
    },
    OpenDialog {
        trigger_id: String,
        callback_url: String,
        dialog: Value,
    },
    Register(Notice),
    TodaysNotices(String),
    UserExists(String),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

pub fn ephemerals(log: &CallLog) -> Vec<String> {
    calls(log)
        .into_iter()
        .filter_map(|call| match call {
            Call::Ephemeral { message, .. } => Some(message),
            _ => None,
        })
        .collect()
}

pub fn registered(log: &CallLog) -> Vec<Notice> {
    calls(log)
        .into_iter()
        .filter_map(|call| match call {
            Call::Register(notice) => Some(notice),
            _ => None,
        })
        .collect()
}

pub fn created_posts(log: &CallLog) -> Vec<NewPost> {
    calls(log)
        .into_iter()
        .filter_map(|call| match call {
            Call::CreatePost(post) => Some(post),
            _ => None,
        })
        .collect()
}

fn platform_error(what: &str) -> MbotcError {
    MbotcError::ApiError(format!("{what} failed"))
}

#[derive(Default)]
pub struct FakePlatform {
    pub log: CallLog,
    pub posts: HashMap<String, Post>,
    pub users: HashMap<String, User>,
    pub channels: HashMap<String, Channel>,
    pub teams: HashMap<String, Team>,
    pub fail_create_post: bool,
    pub fail_upload: bool,
    pub fail_open_dialog: bool,
    uploads: AtomicUsize,
}

impl FakePlatform {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    /// A platform that knows user `u1` ("Alice"), channel `c1` ("General")
    /// and team `t1` ("Core").
    pub fn with_directory(log: CallLog) -> Self {
        let mut platform = Self::new(log);
        platform.users.insert(
            "u1".into(),
            User {
                id: "u1".into(),
                username: "alice".into(),
                nickname: "Alice".into(),
            },
        );
        platform.channels.insert(
            "c1".into(),
            Channel {
                id: "c1".into(),
                team_id: "t1".into(),
                display_name: "General".into(),
            },
        );
        platform.teams.insert(
            "t1".into(),
            Team {
                id: "t1".into(),
                display_name: "Core".into(),
            },
        );
        platform
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.posts.insert(post.id.clone(), post);
        self
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn get_post(&self, post_id: &str) -> Result<Post, MbotcError> {
        self.record(Call::GetPost(post_id.to_string()));
        self.posts
            .get(post_id)
            .cloned()
            .ok_or_else(|| platform_error("get_post"))
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, MbotcError> {
        self.record(Call::CreatePost(post.clone()));
        if self.fail_create_post {
            return Err(platform_error("create_post"));
        }
        Ok(Post {
            id: CREATED_POST_ID.to_string(),
            user_id: "bot".to_string(),
            channel_id: post.channel_id.clone(),
            message: post.message.clone(),
            file_ids: Some(post.file_ids.clone()),
        })
    }

    async fn send_ephemeral(
        &self,
        user_id: &str,
        channel_id: &str,
        message: &str,
    ) -> Result<(), MbotcError> {
        self.record(Call::Ephemeral {
            user_id: user_id.to_string(),
            channel_id: channel_id.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn add_reaction(&self, post_id: &str, emoji_name: &str) -> Result<(), MbotcError> {
        self.record(Call::Reaction {
            post_id: post_id.to_string(),
            emoji: emoji_name.to_string(),
        });
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, MbotcError> {
        self.record(Call::GetUser(user_id.to_string()));
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| platform_error("get_user"))
    }

    async fn get_channel(&self, channel_id: &str) -> Result<Channel, MbotcError> {
        self.record(Call::GetChannel(channel_id.to_string()));
        self.channels
            .get(channel_id)
            .cloned()
            .ok_or_else(|| platform_error("get_channel"))
    }

    async fn get_team(&self, team_id: &str) -> Result<Team, MbotcError> {
        self.record(Call::GetTeam(team_id.to_string()));
        self.teams
            .get(team_id)
            .cloned()
            .ok_or_else(|| platform_error("get_team"))
    }

    async fn upload_file(
        &self,
        channel_id: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<String, MbotcError> {
        self.record(Call::Upload {
            channel_id: channel_id.to_string(),
            file_name: file_name.to_string(),
            size: content.len(),
        });
        if self.fail_upload {
            return Err(platform_error("upload_file"));
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("file-{n}"))
    }

    async fn open_dialog(
        &self,
        trigger_id: &str,
        callback_url: &str,
        dialog: &Value,
    ) -> Result<(), MbotcError> {
        self.record(Call::OpenDialog {
            trigger_id: trigger_id.to_string(),
            callback_url: callback_url.to_string(),
            dialog: dialog.clone(),
        });
        if self.fail_open_dialog {
            return Err(platform_error("open_dialog"));
        }
        Ok(())
    }
}

/// How the fake notification service answers the sign-up check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Membership {
    #[default]
    Registered,
    Unknown,
    Unreachable,
}

#[derive(Default)]
pub struct FakeService {
    pub log: CallLog,
    pub fail_register: bool,
    pub membership: Membership,
    pub digest: Vec<DigestEntry>,
    pub digest_status: Option<u16>,
    pub digest_unreachable: bool,
}

impl FakeService {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NotificationService for FakeService {
    async fn register(&self, notice: &Notice) -> Result<(), MbotcError> {
        self.record(Call::Register(notice.clone()));
        if self.fail_register {
            return Err(MbotcError::ServiceError {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(())
    }

    async fn todays_notices(&self, user_id: &str) -> Result<Vec<DigestEntry>, MbotcError> {
        self.record(Call::TodaysNotices(user_id.to_string()));
        if self.digest_unreachable {
            return Err(MbotcError::HttpError("connection refused".into()));
        }
        match self.digest_status {
            Some(status) => Ok(digest_from_reply(&HttpReply {
                status,
                body: "{\"error\":\"unavailable\"}".to_string(),
            })),
            None => Ok(self.digest.clone()),
        }
    }

    async fn user_exists(&self, user_id: &str) -> Result<bool, MbotcError> {
        self.record(Call::UserExists(user_id.to_string()));
        match self.membership {
            Membership::Registered => Ok(true),
            Membership::Unknown => Ok(false),
            Membership::Unreachable => Err(MbotcError::HttpError("connection refused".into())),
        }
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        mattermost_url: "https://chat.example.com".into(),
        mattermost_bot_token: "bot-token".into(),
        mattermost_bot_user_id: "bot".into(),
        command_token: COMMAND_TOKEN.into(),
        signing_secret: SECRET.into(),
        service_url: "https://service.example.com".into(),
        client_url: "https://www.example.com".into(),
        public_url: "https://hooks.example.com".into(),
        timezone: chrono_tz::Asia::Seoul,
        reload_interval: Duration::from_secs(3600),
    }
}

pub fn app_state(platform: FakePlatform, service: FakeService) -> AppState {
    AppState::new(
        SharedConfig::new(test_config()),
        Arc::new(platform),
        Arc::new(service),
    )
}

/// A one-file multipart body with the given boundary.
pub fn multipart_body(boundary: &str, fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, content) in files {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
