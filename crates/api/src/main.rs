//! Symptom intake API server.

use std::sync::Arc;

use intake_api::{app, AppState, Config};
use intake_core::{hash_prompt, FOLLOW_UP_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT};
use openai_provider::OpenAiProvider;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "intake_api=info,intake_core=info,openai_provider=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let provider = OpenAiProvider::from_env()?;
    let model = provider.model().to_string();

    info!(
        summary = %hash_prompt(SUMMARY_SYSTEM_PROMPT),
        follow_up = %hash_prompt(FOLLOW_UP_SYSTEM_PROMPT),
        "System prompt fingerprints"
    );

    let state = AppState::new(Arc::new(provider), model);

    info!(addr = %config.addr, "Intake API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
