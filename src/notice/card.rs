use tracing::warn;

use crate::core::models::Notice;
use crate::mattermost::{Attachment, AttachmentField, Platform};

pub const CARD_COLOR: &str = "#1352ab";

/// Names shown on a notice card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardContext {
    pub team_name: String,
    pub channel_name: String,
    pub author: String,
}

/// Looks up the team, channel and author names for a card.
///
/// A failed lookup falls back to the raw identifier.
pub async fn resolve_context(platform: &dyn Platform, notice: &Notice) -> CardContext {
    let author = match platform.get_user(&notice.user_id).await {
        Ok(user) => user.display_name().to_string(),
        Err(e) => {
            warn!("Author lookup failed for {}: {}", notice.user_id, e);
            notice.user_id.clone()
        }
    };

    let (team_name, channel_name) = match platform.get_channel(&notice.channel_id).await {
        Ok(channel) => {
            let team_name = match platform.get_team(&channel.team_id).await {
                Ok(team) => team.display_name,
                Err(e) => {
                    warn!("Team lookup failed for {}: {}", channel.team_id, e);
                    channel.team_id.clone()
                }
            };
            (team_name, channel.display_name)
        }
        Err(e) => {
            warn!("Channel lookup failed for {}: {}", notice.channel_id, e);
            (String::new(), notice.channel_id.clone())
        }
    };

    CardContext {
        team_name,
        channel_name,
        author,
    }
}

#[must_use]
pub fn build_card(notice: &Notice, context: &CardContext) -> Attachment {
    let mut fields = Vec::with_capacity(3);

    if notice.is_deadline() {
        fields.push(AttachmentField {
            title: ":calendar: Deadline".to_string(),
            value: notice.start_time.clone(),
            short: false,
        });
    } else {
        fields.push(AttachmentField {
            title: ":calendar: Start Time".to_string(),
            value: notice.start_time.clone(),
            short: true,
        });
        fields.push(AttachmentField {
            title: ":calendar: End Time".to_string(),
            value: notice.end_time.clone(),
            short: true,
        });
    }

    fields.push(AttachmentField {
        title: ":fountain_pen: Author".to_string(),
        value: context.author.clone(),
        short: false,
    });

    Attachment {
        author_name: format!("{} / {}", context.team_name, context.channel_name),
        color: CARD_COLOR.to_string(),
        text: notice.message.clone(),
        fields,
    }
}
