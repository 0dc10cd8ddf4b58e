//! Turns each inbound surface into a [`Notice`].

use bytes::Bytes;
use chrono::DateTime;
use chrono_tz::Tz;
use futures::stream;
use multer::{Constraints, Multipart, SizeLimit};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::models::{ButtonRequest, DialogSubmission, Notice};
use crate::core::timestamp;
use crate::errors::MbotcError;
use crate::mattermost::Platform;

/// Upper bound for an editor submission, attachments included.
pub const MAX_FORM_BYTES: u64 = 32 << 20;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed request body: {0}")]
    Decode(String),

    #[error("start and end time must look like YYYY-MM-DD hh:mm")]
    InvalidTime(Box<Notice>),

    #[error("user {user_id} is not the author of post {post_id}")]
    NotOwner {
        user_id: String,
        post_id: String,
        channel_id: String,
    },

    #[error(transparent)]
    Platform(#[from] MbotcError),
}

/// Missing end time means a deadline: mirror the start.
fn end_or_start(start_time: &str, end_time: Option<String>) -> String {
    match end_time {
        Some(end) if !end.is_empty() => end,
        _ => start_time.to_string(),
    }
}

/// Checks both timestamps of a freshly built notice.
///
/// # Errors
///
/// Returns `InvalidTime` with the rejected notice when either timestamp is
/// not in `YYYY-MM-DD hh:mm` form.
pub fn validate(notice: Notice) -> Result<Notice, NormalizeError> {
    if timestamp::is_valid(&notice.start_time) && timestamp::is_valid(&notice.end_time) {
        Ok(notice)
    } else {
        info!(
            start_time = %notice.start_time,
            end_time = %notice.end_time,
            "Rejected notice with malformed time"
        );
        Err(NormalizeError::InvalidTime(Box::new(notice)))
    }
}

/// # Errors
///
/// Returns `Decode` when the body is not a dialog submission.
pub fn decode_dialog(body: &[u8]) -> Result<DialogSubmission, NormalizeError> {
    serde_json::from_slice(body).map_err(|e| NormalizeError::Decode(e.to_string()))
}

/// # Errors
///
/// Returns `InvalidTime` when a submitted time is malformed.
pub fn from_dialog(submission: &DialogSubmission) -> Result<Notice, NormalizeError> {
    let fields = &submission.submission;
    let start_time = fields.start_time.clone().unwrap_or_default();
    let end_time = end_or_start(&start_time, fields.end_time.clone());

    validate(Notice {
        user_id: submission.user_id.clone(),
        message: fields.message.clone().unwrap_or_default(),
        start_time,
        end_time,
        file_ids: Vec::new(),
        channel_id: submission.channel_id.clone(),
        post_id: String::new(),
    })
}

struct UploadedPart {
    file_name: String,
    content: Bytes,
}

/// Reads an editor submission, then uploads its files in submission order.
///
/// Files are only uploaded once the times have been validated.
///
/// # Errors
///
/// Returns `Decode` for a body that is not valid multipart or exceeds
/// [`MAX_FORM_BYTES`], `InvalidTime` for malformed times and `Platform` when
/// an upload fails.
pub async fn from_multipart(
    platform: &dyn Platform,
    content_type: &str,
    body: Bytes,
) -> Result<Notice, NormalizeError> {
    let boundary =
        multer::parse_boundary(content_type).map_err(|e| NormalizeError::Decode(e.to_string()))?;

    if body.len() as u64 > MAX_FORM_BYTES {
        return Err(NormalizeError::Decode(format!(
            "form body of {} bytes exceeds {MAX_FORM_BYTES}",
            body.len()
        )));
    }

    let constraints =
        Constraints::new().size_limit(SizeLimit::new().whole_stream(MAX_FORM_BYTES));
    let chunks = stream::once(async move { Ok::<Bytes, std::io::Error>(body) });
    let mut multipart = Multipart::with_constraints(chunks, boundary, constraints);

    let mut notice = Notice::default();
    let mut end_time = None;
    let mut files: Vec<UploadedPart> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| NormalizeError::Decode(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content = field
                .bytes()
                .await
                .map_err(|e| NormalizeError::Decode(e.to_string()))?;
            // Browsers send an empty part when no file was picked.
            if file_name.is_empty() && content.is_empty() {
                continue;
            }
            files.push(UploadedPart { file_name, content });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| NormalizeError::Decode(e.to_string()))?;
        match name.as_str() {
            "user_id" => notice.user_id = value,
            "message" => notice.message = value,
            "start_time" => notice.start_time = value,
            "end_time" => end_time = Some(value),
            "channel_id" => notice.channel_id = value,
            other => debug!("Ignoring unknown form field {}", other),
        }
    }

    notice.end_time = end_or_start(&notice.start_time, end_time);
    let mut notice = validate(notice)?;

    for file in files {
        let file_id = platform
            .upload_file(&notice.channel_id, &file.file_name, file.content.to_vec())
            .await?;
        notice.file_ids.push(file_id);
    }

    Ok(notice)
}

/// # Errors
///
/// Returns `Decode` when the body is not JSON or names no post.
pub fn decode_button(body: &[u8]) -> Result<ButtonRequest, NormalizeError> {
    let request: ButtonRequest =
        serde_json::from_slice(body).map_err(|e| NormalizeError::Decode(e.to_string()))?;
    if request.post_id.is_empty() {
        return Err(NormalizeError::Decode("post_id is empty".to_string()));
    }
    Ok(request)
}

/// Builds a notice from an existing post, valid from `now` until the end of
/// that day.
///
/// # Errors
///
/// Returns `Platform` when the post cannot be fetched and `NotOwner` when the
/// requester did not write it.
pub async fn from_button(
    platform: &dyn Platform,
    request: &ButtonRequest,
    now: &DateTime<Tz>,
) -> Result<Notice, NormalizeError> {
    let post = platform.get_post(&request.post_id).await?;

    if request.user_id != post.user_id {
        return Err(NormalizeError::NotOwner {
            user_id: request.user_id.clone(),
            post_id: post.id,
            channel_id: post.channel_id,
        });
    }

    Ok(Notice {
        user_id: post.user_id,
        message: post.message,
        start_time: timestamp::format(now),
        end_time: timestamp::end_of_day(now),
        file_ids: post.file_ids.unwrap_or_default(),
        channel_id: post.channel_id,
        post_id: post.id,
    })
}
