//! Record store initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{create_video_repository, VideoRepository};

pub async fn setup_repository(config: &Config) -> Result<Arc<dyn VideoRepository>> {
    let repository = create_video_repository(config)
        .await
        .context("Failed to initialize video repository")?;

    tracing::info!(
        persistent = config.database_url().is_some(),
        "Video repository ready"
    );

    Ok(repository)
}
