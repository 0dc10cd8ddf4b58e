use std::env;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use aws_sdk_ssm::Client as SsmClient;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::errors::MbotcError;

const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
const DEFAULT_CONFIG_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mattermost_url: String,
    pub mattermost_bot_token: String,
    pub mattermost_bot_user_id: String,
    pub command_token: String,
    pub signing_secret: String,
    pub service_url: String,
    pub client_url: String,
    pub public_url: String,
    pub timezone: Tz,
    pub reload_interval: Duration,
}

fn required(name: &str) -> Result<String, MbotcError> {
    env::var(name).map_err(|e| MbotcError::ConfigError(format!("{name}: {e}")))
}

fn trimmed_url(raw: String) -> String {
    raw.trim_end_matches('/').to_string()
}

impl AppConfig {
    /// Reads every setting from the environment.
    ///
    /// The bot token must be given either directly (`MATTERMOST_BOT_TOKEN`) or
    /// as the name of an SSM parameter (`MATTERMOST_BOT_TOKEN_PARAM`); in the
    /// latter case `from_env` leaves it empty and [`AppConfig::load`] fills it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or the
    /// timezone name is unknown.
    pub fn from_env() -> Result<Self, MbotcError> {
        let timezone_name = env::var("MBOTC_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.into());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| MbotcError::ConfigError(format!("MBOTC_TIMEZONE: {e}")))?;

        let reload_secs = env::var("MBOTC_CONFIG_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_CONFIG_TTL_SECS);

        let mattermost_bot_token = match env::var("MATTERMOST_BOT_TOKEN") {
            Ok(token) => token,
            Err(_) if env::var("MATTERMOST_BOT_TOKEN_PARAM").is_ok() => String::new(),
            Err(e) => {
                return Err(MbotcError::ConfigError(format!("MATTERMOST_BOT_TOKEN: {e}")));
            }
        };

        Ok(Self {
            mattermost_url: trimmed_url(required("MATTERMOST_URL")?),
            mattermost_bot_token,
            mattermost_bot_user_id: required("MATTERMOST_BOT_USER_ID")?,
            command_token: required("MATTERMOST_COMMAND_TOKEN")?,
            signing_secret: required("MBOTC_SIGNING_SECRET")?,
            service_url: trimmed_url(required("MBOTC_SERVICE_URL")?),
            client_url: trimmed_url(required("MBOTC_CLIENT_URL")?),
            public_url: trimmed_url(required("MBOTC_PUBLIC_URL")?),
            timezone,
            reload_interval: Duration::from_secs(reload_secs),
        })
    }

    /// Reads the environment and resolves the bot token from SSM when it is
    /// stored there.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment is incomplete or the SSM lookup fails.
    pub async fn load() -> Result<Self, MbotcError> {
        let mut config = Self::from_env()?;
        if config.mattermost_bot_token.is_empty() {
            let param = required("MATTERMOST_BOT_TOKEN_PARAM")?;
            config.mattermost_bot_token = fetch_secure_parameter(&param).await?;
        }
        Ok(config)
    }

    /// Current wall-clock time in the reference timezone.
    #[must_use]
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}

async fn fetch_secure_parameter(name: &str) -> Result<String, MbotcError> {
    let shared = aws_config::from_env().load().await;
    let client = SsmClient::new(&shared);

    let resp = client
        .get_parameter()
        .name(name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| MbotcError::AwsError(format!("ssm get_parameter: {e}")))?;

    resp.parameter
        .and_then(|p| p.value)
        .ok_or_else(|| MbotcError::ConfigError(format!("SSM parameter {name} has no value")))
}

struct Snapshot {
    config: Arc<AppConfig>,
    loaded_at: Instant,
}

/// Configuration shared by every invocation of a warm Lambda container.
///
/// Readers clone the inner `Arc`; a reload swaps it under the write lock.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<Snapshot>>,
}

impl SharedConfig {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot {
                config: Arc::new(config),
                loaded_at: Instant::now(),
            })),
        }
    }

    #[must_use]
    pub fn current(&self) -> Arc<AppConfig> {
        let guard = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(&guard.config)
    }

    pub fn replace(&self, config: AppConfig) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.config = Arc::new(config);
        guard.loaded_at = Instant::now();
    }

    /// Restarts the reload interval without swapping the configuration.
    fn touch(&self) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.loaded_at = Instant::now();
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        let guard = self
            .inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.loaded_at.elapsed() >= guard.config.reload_interval
    }

    /// Reloads the configuration once its snapshot is older than the reload
    /// interval. A failed reload keeps serving the previous snapshot until the
    /// next interval has passed.
    pub async fn refresh_if_stale(&self) {
        if !self.is_stale() {
            return;
        }
        match AppConfig::load().await {
            Ok(config) => {
                self.replace(config);
                info!("Configuration reloaded");
            }
            Err(e) => {
                self.touch();
                warn!("Configuration reload failed, keeping previous: {}", e);
            }
        }
    }
}
