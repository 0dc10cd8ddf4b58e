use std::sync::Arc;

use mbotc::api::{AppState, function_handler};
use mbotc::core::config::{AppConfig, SharedConfig};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    mbotc::setup_logging();

    let config = AppConfig::load().await?;
    let state = Arc::new(AppState::from_config(SharedConfig::new(config)));

    lambda_runtime::run(lambda_runtime::service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { function_handler(&state, event).await }
    }))
    .await
}
