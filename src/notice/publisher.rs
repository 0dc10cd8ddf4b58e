//! Posts a notice into its channel and registers it with the notification
//! service.
//!
//! One publisher handles one request and walks
//! `Start -> PostCreated -> Forwarded -> Acknowledged`. Nothing is retried
//! and a post that exists is never removed again, even when registration
//! fails afterwards.

use tracing::{error, info, warn};

use super::card::{build_card, resolve_context};
use super::messages;
use crate::core::models::Notice;
use crate::errors::MbotcError;
use crate::mattermost::{NewPost, Platform};
use crate::notify::NotificationService;

/// Emoji added to a promoted post once it is registered.
pub const ACK_EMOJI: &str = "ok_hand";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    PostCreated,
    Forwarded,
    Acknowledged,
}

#[derive(Debug)]
pub enum Outcome {
    Registered,
    RegistrationFailed(MbotcError),
}

/// Result of a publish whose post exists.
#[derive(Debug)]
pub struct Published {
    pub notice: Notice,
    pub stage: Stage,
    pub outcome: Outcome,
}

impl Published {
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self.outcome, Outcome::Registered)
    }
}

pub struct NoticePublisher<'a> {
    platform: &'a dyn Platform,
    service: &'a dyn NotificationService,
    correlation_id: &'a str,
}

impl<'a> NoticePublisher<'a> {
    #[must_use]
    pub fn new(
        platform: &'a dyn Platform,
        service: &'a dyn NotificationService,
        correlation_id: &'a str,
    ) -> Self {
        Self {
            platform,
            service,
            correlation_id,
        }
    }

    /// Creates the notice card post, then forwards the notice.
    ///
    /// # Errors
    ///
    /// Returns the platform error when the post cannot be created; the
    /// notification service is not contacted in that case.
    pub async fn publish(&self, mut notice: Notice) -> Result<Published, MbotcError> {
        info!(
            correlation_id = %self.correlation_id,
            stage = ?Stage::Start,
            channel_id = %notice.channel_id,
            "Publishing notice"
        );

        #[cfg(feature = "debug-logs")]
        info!("Notice message:\n{}", notice.message);

        #[cfg(not(feature = "debug-logs"))]
        info!("Notice message has {} characters", notice.message.chars().count());

        let context = resolve_context(self.platform, &notice).await;
        let card = build_card(&notice, &context);
        let new_post = NewPost {
            channel_id: notice.channel_id.clone(),
            message: String::new(),
            file_ids: notice.file_ids.clone(),
            attachments: vec![card],
        };

        let post = match self.platform.create_post(&new_post).await {
            Ok(post) => post,
            Err(e) => {
                error!(
                    correlation_id = %self.correlation_id,
                    "Failed to create notice post: {}", e
                );
                self.tell(
                    &notice,
                    &messages::with_ref(messages::POST_FAILED, self.correlation_id),
                )
                .await;
                return Err(e);
            }
        };

        notice.post_id = post.id;
        info!(
            correlation_id = %self.correlation_id,
            stage = ?Stage::PostCreated,
            post_id = %notice.post_id,
            "Notice post created"
        );

        Ok(self.forward(notice, false).await)
    }

    /// Registers a notice built from a post that already exists and marks
    /// that post with [`ACK_EMOJI`] on success.
    pub async fn promote(&self, notice: Notice) -> Published {
        info!(
            correlation_id = %self.correlation_id,
            stage = ?Stage::PostCreated,
            post_id = %notice.post_id,
            "Promoting existing post"
        );
        self.forward(notice, true).await
    }

    async fn forward(&self, notice: Notice, react: bool) -> Published {
        if let Err(e) = self.service.register(&notice).await {
            warn!(
                correlation_id = %self.correlation_id,
                post_id = %notice.post_id,
                "Notification registration failed, post is kept: {}", e
            );
            self.tell(
                &notice,
                &messages::with_ref(messages::REGISTRATION_FAILED, self.correlation_id),
            )
            .await;
            return Published {
                notice,
                stage: Stage::PostCreated,
                outcome: Outcome::RegistrationFailed(e),
            };
        }

        info!(
            correlation_id = %self.correlation_id,
            stage = ?Stage::Forwarded,
            post_id = %notice.post_id,
            "Notice forwarded"
        );

        if react
            && let Err(e) = self.platform.add_reaction(&notice.post_id, ACK_EMOJI).await
        {
            warn!(
                correlation_id = %self.correlation_id,
                "Failed to add acknowledgement reaction: {}", e
            );
        }
        self.tell(&notice, messages::REGISTRATION_SUCCESS).await;

        info!(
            correlation_id = %self.correlation_id,
            stage = ?Stage::Acknowledged,
            post_id = %notice.post_id,
            "Notice acknowledged"
        );

        Published {
            notice,
            stage: Stage::Acknowledged,
            outcome: Outcome::Registered,
        }
    }

    async fn tell(&self, notice: &Notice, message: &str) {
        if let Err(e) = self
            .platform
            .send_ephemeral(&notice.user_id, &notice.channel_id, message)
            .await
        {
            warn!(
                correlation_id = %self.correlation_id,
                "Failed to send ephemeral message to {}: {}", notice.user_id, e
            );
        }
    }
}
