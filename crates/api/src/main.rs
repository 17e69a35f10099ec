use std::env;

use anyhow::{Context, Result};
use flightdesk_api::{build_app, ApiSettings};
use flightdesk_core::{config::DEFAULT_ENV_FILE, load_env_file, AppConfig};
use flightdesk_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("flightdesk_api");

    let env_file = env::var("FLIGHTDESK_ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
    let env_loaded = load_env_file(&env_file)?;
    let config = AppConfig::from_env().context("invalid flightdesk configuration")?;
    let settings = ApiSettings::from_env();

    let app = build_app(&config, settings.api_key.clone())?;

    let listener = tokio::net::TcpListener::bind(&settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;
    tracing::info!(
        bind = %settings.bind,
        env_file = %env_file,
        env_loaded,
        "flightdesk api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
