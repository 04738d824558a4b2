//! Media tooling and staging directory

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_processing::{FfmpegBackend, MediaBackend};

/// Build the ffmpeg-backed media backend and make sure uploads have somewhere to land.
pub async fn setup_media_backend(config: &Config) -> Result<Arc<dyn MediaBackend>> {
    let backend = FfmpegBackend::from_config(config).context("Invalid media tool configuration")?;

    let temp_dir = config.upload_temp_dir();
    tokio::fs::create_dir_all(&temp_dir)
        .await
        .with_context(|| format!("Failed to create upload temp dir {}", temp_dir.display()))?;

    tracing::info!(
        ffmpeg_path = %config.ffmpeg_path(),
        ffprobe_path = %config.ffprobe_path(),
        upload_temp_dir = %temp_dir.display(),
        tool_timeout_secs = config.media_tool_timeout().map(|t| t.as_secs()),
        "Media backend configured"
    );

    Ok(Arc::new(backend))
}
