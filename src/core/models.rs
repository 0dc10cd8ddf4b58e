use serde::{Deserialize, Serialize};

/// A notice as registered with the notification service.
///
/// `end_time == start_time` marks a deadline-only notice. `post_id` stays
/// empty until the announcing post exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub user_id: String,
    pub message: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub file_ids: Vec<String>,
    pub channel_id: String,
    #[serde(default)]
    pub post_id: String,
}

impl Notice {
    #[must_use]
    pub fn is_deadline(&self) -> bool {
        self.start_time == self.end_time
    }
}

/// Body the chat server posts when a user submits the creation dialog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogSubmission {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub callback_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub submission: DialogFields,
    #[serde(default)]
    pub cancelled: bool,
}

// Optional dialog elements arrive as `null` when left blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogFields {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the "promote this post" button request.
#[derive(Debug, Clone, Deserialize)]
pub struct ButtonRequest {
    pub post_id: String,
    #[serde(default)]
    pub user_id: String,
}

/// One row of the "today" digest returned by the notification service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DigestEntry {
    #[serde(alias = "teamName")]
    pub team_name: String,
    #[serde(alias = "channelName")]
    pub channel_name: String,
    #[serde(alias = "userName")]
    pub user_name: String,
    pub message: String,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
}
