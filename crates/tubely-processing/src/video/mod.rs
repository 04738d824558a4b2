//! Video probing and fast-start remuxing via ffprobe/ffmpeg

pub mod backend;
pub(crate) mod command;
pub mod faststart;
pub mod prober;

pub use backend::{FfmpegBackend, MediaBackend};
pub use faststart::{processing_path, FaststartRemuxer};
pub use prober::{parse_probe_output, FfprobeProber};

use tubely_core::models::AspectRatio;

use crate::error::ProcessingError;

/// Width and height of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, ProcessingError> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn classification(&self) -> AspectRatio {
        AspectRatio::from_ratio(self.width as f64 / self.height as f64)
    }
}
