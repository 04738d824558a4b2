//! Tubely Processing Library
//!
//! Local media handling for the ingestion pipeline: content type validation,
//! staging uploads on disk, probing dimensions with ffprobe and remuxing for
//! fast start with ffmpeg.

pub mod error;
pub mod staging;
pub mod validator;
pub mod video;

pub use error::ProcessingError;
pub use staging::{ProcessedFile, StagedUpload};
pub use validator::{validate_video_content_type, ValidationError};
pub use video::{FfmpegBackend, MediaBackend, VideoDimensions};
