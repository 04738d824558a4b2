use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;

use super::command::{run_tool, validate_tool_path};
use crate::error::ProcessingError;
use crate::staging::ProcessedFile;

const PROCESSING_SUFFIX: &str = ".processing";

/// `<input>.processing`, the remux output path for `input`.
pub fn processing_path(input: &Path) -> PathBuf {
    let mut path: OsString = input.as_os_str().to_owned();
    path.push(PROCESSING_SUFFIX);
    PathBuf::from(path)
}

/// Rewrites an MP4 so the `moov` atom precedes the media data, without re-encoding.
#[derive(Debug, Clone)]
pub struct FaststartRemuxer {
    ffmpeg_path: String,
    timeout: Option<Duration>,
}

impl FaststartRemuxer {
    pub fn new(ffmpeg_path: String, timeout: Option<Duration>) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input: &Path) -> Result<ProcessedFile, ProcessingError> {
        let start = std::time::Instant::now();
        let output_path = processing_path(input);

        // Owned before ffmpeg starts so partial output is removed on failure.
        let processed = ProcessedFile::adopt(output_path.clone());

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-i")
            .arg(input)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(&output_path);

        run_tool("ffmpeg", command, self.timeout).await?;

        if !tokio::fs::try_exists(&output_path).await? {
            return Err(ProcessingError::MissingOutput(output_path));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output = %output_path.display(),
            "Fast-start remux completed"
        );

        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_path_appends_suffix() {
        assert_eq!(
            processing_path(Path::new("/tmp/tubely-upload-abc.mp4")),
            PathBuf::from("/tmp/tubely-upload-abc.mp4.processing")
        );
    }
}
