//! The notice pipeline: normalize an inbound request, publish it, and render
//! digests.

pub mod card;
pub mod digest;
pub mod membership;
pub mod messages;
pub mod normalizer;
pub mod publisher;

pub use normalizer::NormalizeError;
pub use publisher::{NoticePublisher, Outcome, Published, Stage};
