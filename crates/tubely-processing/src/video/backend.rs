use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tubely_core::Config;

use super::{FaststartRemuxer, FfprobeProber, VideoDimensions};
use crate::error::ProcessingError;
use crate::staging::ProcessedFile;

/// External media tooling used by the ingestion pipeline.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Dimensions of the first video stream in the file at `path`.
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError>;

    /// Remux `path` for fast start into `<path>.processing`.
    async fn remux_faststart(&self, path: &Path) -> Result<ProcessedFile, ProcessingError>;
}

/// ffprobe + ffmpeg subprocess backend
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    prober: FfprobeProber,
    remuxer: FaststartRemuxer,
}

impl FfmpegBackend {
    pub fn new(
        ffmpeg_path: String,
        ffprobe_path: String,
        timeout: Option<Duration>,
    ) -> Result<Self, ProcessingError> {
        Ok(Self {
            prober: FfprobeProber::new(ffprobe_path, timeout)?,
            remuxer: FaststartRemuxer::new(ffmpeg_path, timeout)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ProcessingError> {
        Self::new(
            config.ffmpeg_path().to_string(),
            config.ffprobe_path().to_string(),
            config.media_tool_timeout(),
        )
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError> {
        self.prober.probe(path).await
    }

    async fn remux_faststart(&self, path: &Path) -> Result<ProcessedFile, ProcessingError> {
        self.remuxer.remux(path).await
    }
}
