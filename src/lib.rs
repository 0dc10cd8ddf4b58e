//! MBotC - turns Mattermost messages into tracked notices.
//!
//! One API Lambda serves the `/mbotc` slash command and three ways of
//! creating a notice:
//! 1. The creation dialog opened by `/mbotc create`
//! 2. The web editor, which submits a multipart form with attachments
//! 3. A button that promotes an existing post
//!
//! Every notice is posted into its channel as a card and then registered with
//! the external notification service, which also answers `/mbotc today`.
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - SSM Parameter Store for the bot token
//! - reqwest for the Mattermost REST API and the notification service
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```no_run
//! use mbotc::command::parser::parse_form_data;
//! use mbotc::command::split_command_line;
//!
//! mbotc::setup_logging();
//!
//! let command = parse_form_data("token=t&command=%2Fmbotc&text=today").unwrap();
//! let line = command.command_line();
//! let args = split_command_line(&line, mbotc::command::TRIGGER);
//! assert_eq!(args, Some(vec!["today"]));
//! ```

// Module declarations
pub mod api;
pub mod command;
pub mod core;
pub mod errors;
pub mod mattermost;
pub mod notice;
pub mod notify;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to `CloudWatch` Logs as one JSON object per line. The filter is
/// read from `RUST_LOG` and defaults to `info`. Calling it more than once is
/// harmless; only the first call installs a subscriber.
///
/// # Example
///
/// ```
/// mbotc::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
