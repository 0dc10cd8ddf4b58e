use tracing::{error, info};

use super::messages;
use crate::notify::NotificationService;

/// Why a user may not use notice features yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denied {
    /// The notification service does not know the user.
    NotRegistered,
    /// The notification service could not answer.
    Unavailable,
}

impl Denied {
    #[must_use]
    pub fn message(&self, client_url: &str) -> String {
        match self {
            Denied::NotRegistered => messages::login_required(client_url),
            Denied::Unavailable => messages::SOMETHING_WRONG.to_string(),
        }
    }
}

/// Checks that `user_id` has signed up with the notification service.
///
/// # Errors
///
/// Returns the reason the user is turned away.
pub async fn ensure_registered(
    service: &dyn NotificationService,
    user_id: &str,
) -> Result<(), Denied> {
    match service.user_exists(user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            info!("User {} is not registered with the notification service", user_id);
            Err(Denied::NotRegistered)
        }
        Err(e) => {
            error!("User lookup failed for {}: {}", user_id, e);
            Err(Denied::Unavailable)
        }
    }
}
