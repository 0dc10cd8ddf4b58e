//! The "today" digest: a markdown table of the notices due today.

use std::fmt::Write as _;

use chrono::DateTime;
use chrono_tz::Tz;

use super::card::CARD_COLOR;
use crate::core::models::DigestEntry;
use crate::errors::MbotcError;
use crate::mattermost::Attachment;
use crate::notify::NotificationService;

/// Longest preview shown per row, in characters.
pub const PREVIEW_LIMIT: usize = 100;

/// One-line preview of a notice message.
#[must_use]
pub fn preview(message: &str) -> String {
    let flat = message.replace('\n', " ");
    if flat.chars().count() > PREVIEW_LIMIT {
        let head: String = flat.chars().take(PREVIEW_LIMIT).collect();
        format!("{head} ...")
    } else {
        flat
    }
}

#[must_use]
pub fn render_digest(entries: &[DigestEntry], client_url: &str, today: &DateTime<Tz>) -> String {
    let mut text = String::from(
        "# Today's Notification\n\
         | Preview :loudspeaker: | Deadline :calendar: |\n\
         | --- | --- |\n",
    );

    if entries.is_empty() {
        text.push_str("| Nothing ... | - |\n");
    } else {
        for entry in entries {
            let _ = writeln!(text, "| {} | {} |", preview(&entry.message), entry.end_time);
        }
    }

    let _ = write!(
        text,
        "[See More]({client_url}/main/detail/{})",
        today.format("%Y%m%d")
    );
    text
}

/// Fetches `user_id`'s notices for today and renders them as a card.
///
/// # Errors
///
/// Returns an error when the notification service cannot be reached. A
/// non-2xx status or an unreadable body renders as an empty digest instead.
pub async fn fetch_digest(
    service: &dyn NotificationService,
    user_id: &str,
    client_url: &str,
    today: &DateTime<Tz>,
) -> Result<Attachment, MbotcError> {
    let entries = service.todays_notices(user_id).await?;
    Ok(Attachment {
        color: CARD_COLOR.to_string(),
        text: render_digest(&entries, client_url, today),
        ..Attachment::default()
    })
}
