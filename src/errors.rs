use thiserror::Error;

#[derive(Debug, Error)]
pub enum MbotcError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Failed to access Mattermost API: {0}")]
    ApiError(String),

    #[error("Notification service rejected the request: HTTP {status}")]
    ServiceError { status: u16, body: String },

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Unauthorized request: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<reqwest::Error> for MbotcError {
    fn from(error: reqwest::Error) -> Self {
        MbotcError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for MbotcError {
    fn from(error: serde_json::Error) -> Self {
        MbotcError::ParseError(error.to_string())
    }
}

impl From<anyhow::Error> for MbotcError {
    fn from(error: anyhow::Error) -> Self {
        MbotcError::GeneralError(error.to_string())
    }
}
