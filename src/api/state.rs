use std::sync::Arc;

use crate::command::{CommandHandler, CommandTable, command_table};
use crate::core::config::SharedConfig;
use crate::mattermost::{MattermostClient, Platform};
use crate::notify::{NotificationClient, NotificationService};

/// Everything a warm Lambda container keeps between invocations.
pub struct AppState {
    pub config: SharedConfig,
    pub platform: Arc<dyn Platform>,
    pub notifications: Arc<dyn NotificationService>,
    pub commands: CommandTable<CommandHandler>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: SharedConfig,
        platform: Arc<dyn Platform>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            config,
            platform,
            notifications,
            commands: command_table(),
        }
    }

    /// Wires the HTTP clients for Mattermost and the notification service.
    #[must_use]
    pub fn from_config(config: SharedConfig) -> Self {
        let platform = Arc::new(MattermostClient::new(config.clone()));
        let notifications = Arc::new(NotificationClient::new(config.clone()));
        Self::new(config, platform, notifications)
    }
}
