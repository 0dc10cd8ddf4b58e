mod common;

use std::sync::{Arc, Mutex};

use common::{
    CREATED_POST_ID, Call, FakePlatform, FakeService, calls, created_posts, ephemerals, registered,
};
use mbotc::core::models::Notice;
use mbotc::notice::card::{CARD_COLOR, CardContext, build_card, resolve_context};
use mbotc::notice::publisher::ACK_EMOJI;
use mbotc::notice::{NoticePublisher, Outcome, Stage};

const CORRELATION_ID: &str = "abcdef0123456789";

fn notice(start: &str, end: &str) -> Notice {
    Notice {
        user_id: "u1".into(),
        message: "All hands".into(),
        start_time: start.into(),
        end_time: end.into(),
        file_ids: vec!["file-1".into()],
        channel_id: "c1".into(),
        post_id: String::new(),
    }
}

#[test]
fn test_deadline_card_has_single_time_field() {
    let context = CardContext {
        team_name: "Core".into(),
        channel_name: "General".into(),
        author: "Alice".into(),
    };
    let card = build_card(&notice("2024-06-01 09:00", "2024-06-01 09:00"), &context);

    assert_eq!(card.author_name, "Core / General");
    assert_eq!(card.color, CARD_COLOR);
    assert_eq!(card.text, "All hands");
    let titles: Vec<&str> = card.fields.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec![":calendar: Deadline", ":fountain_pen: Author"]);
    assert!(!card.fields[0].short);
    assert_eq!(card.fields[1].value, "Alice");
}

#[test]
fn test_range_card_has_start_and_end() {
    let card = build_card(
        &notice("2024-06-01 09:00", "2024-06-01 18:00"),
        &CardContext::default(),
    );
    let titles: Vec<&str> = card.fields.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            ":calendar: Start Time",
            ":calendar: End Time",
            ":fountain_pen: Author"
        ]
    );
    assert!(card.fields[0].short && card.fields[1].short);
    assert_eq!(card.fields[1].value, "2024-06-01 18:00");
}

#[tokio::test]
async fn test_context_falls_back_to_ids() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let platform = FakePlatform::new(log.clone());
    let context = resolve_context(&platform, &notice("2024-06-01 09:00", "2024-06-01 09:00")).await;
    assert_eq!(context.author, "u1");
    assert_eq!(context.channel_name, "c1");
}

#[tokio::test]
async fn test_publish_posts_then_registers() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let platform = FakePlatform::with_directory(log.clone());
    let service = FakeService::new(log.clone());
    let publisher = NoticePublisher::new(&platform, &service, CORRELATION_ID);

    let published = publisher
        .publish(notice("2024-06-01 09:00", "2024-06-01 09:00"))
        .await
        .unwrap();

    assert_eq!(published.stage, Stage::Acknowledged);
    assert!(published.is_registered());
    assert_eq!(published.notice.post_id, CREATED_POST_ID);

    let posts = created_posts(&log);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].channel_id, "c1");
    assert_eq!(posts[0].file_ids, vec!["file-1"]);
    assert_eq!(posts[0].attachments[0].author_name, "Core / General");
    assert_eq!(posts[0].attachments[0].fields[1].value, "Alice");

    let forwarded = registered(&log);
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].post_id, CREATED_POST_ID);

    let calls = calls(&log);
    let post_at = calls
        .iter()
        .position(|c| matches!(c, Call::CreatePost(_)))
        .unwrap();
    let register_at = calls
        .iter()
        .position(|c| matches!(c, Call::Register(_)))
        .unwrap();
    assert!(post_at < register_at);
    assert!(!calls.iter().any(|c| matches!(c, Call::Reaction { .. })));
    assert_eq!(ephemerals(&log), vec!["Registration success"]);
}

#[tokio::test]
async fn test_post_failure_skips_registration() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut platform = FakePlatform::with_directory(log.clone());
    platform.fail_create_post = true;
    let service = FakeService::new(log.clone());
    let publisher = NoticePublisher::new(&platform, &service, CORRELATION_ID);

    let result = publisher
        .publish(notice("2024-06-01 09:00", "2024-06-01 18:00"))
        .await;

    assert!(result.is_err());
    assert!(registered(&log).is_empty());
    assert_eq!(
        ephemerals(&log),
        vec!["Oops! Failed to post your notification. (ref: abcdef01)"]
    );
}

#[tokio::test]
async fn test_registration_failure_keeps_post() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let platform = FakePlatform::with_directory(log.clone());
    let mut service = FakeService::new(log.clone());
    service.fail_register = true;
    let publisher = NoticePublisher::new(&platform, &service, CORRELATION_ID);

    let published = publisher
        .publish(notice("2024-06-01 09:00", "2024-06-01 18:00"))
        .await
        .unwrap();

    assert_eq!(published.stage, Stage::PostCreated);
    assert!(matches!(published.outcome, Outcome::RegistrationFailed(_)));
    assert_eq!(published.notice.post_id, CREATED_POST_ID);
    assert_eq!(created_posts(&log).len(), 1);
    assert_eq!(ephemerals(&log), vec!["Registration failed (ref: abcdef01)"]);
}

#[tokio::test]
async fn test_promote_reacts_and_skips_posting() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let platform = FakePlatform::new(log.clone());
    let service = FakeService::new(log.clone());
    let publisher = NoticePublisher::new(&platform, &service, CORRELATION_ID);

    let mut existing = notice("2024-06-01 14:05", "2024-06-01 23:59");
    existing.post_id = "p1".into();
    let published = publisher.promote(existing).await;

    assert!(published.is_registered());
    assert!(created_posts(&log).is_empty());
    let calls = calls(&log);
    assert!(matches!(&calls[0], Call::Register(n) if n.post_id == "p1"));
    assert_eq!(
        calls[1],
        Call::Reaction {
            post_id: "p1".into(),
            emoji: ACK_EMOJI.into()
        }
    );
    assert_eq!(ephemerals(&log), vec!["Registration success"]);
}

#[tokio::test]
async fn test_promote_failure_leaves_post_untouched() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let platform = FakePlatform::new(log.clone());
    let mut service = FakeService::new(log.clone());
    service.fail_register = true;
    let publisher = NoticePublisher::new(&platform, &service, CORRELATION_ID);

    let mut existing = notice("2024-06-01 14:05", "2024-06-01 23:59");
    existing.post_id = "p1".into();
    let published = publisher.promote(existing).await;

    assert!(!published.is_registered());
    assert!(!calls(&log).iter().any(|c| matches!(c, Call::Reaction { .. })));
    assert_eq!(ephemerals(&log), vec!["Registration failed (ref: abcdef01)"]);
}
