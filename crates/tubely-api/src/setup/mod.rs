//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a servable router.

pub mod database;
pub mod media;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    crate::error::configure_error_details(config.is_production());

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let repository = database::setup_repository(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let backend = media::setup_media_backend(&config).await?;

    let state = Arc::new(AppState::new(&config, repository, storage, backend));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
