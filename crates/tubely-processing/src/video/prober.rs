use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command;

use super::command::{run_tool, validate_tool_path};
use super::VideoDimensions;
use crate::error::ProcessingError;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default, alias = "Width")]
    width: Option<u32>,
    #[serde(default, alias = "Height")]
    height: Option<u32>,
}

/// Extract the first stream's dimensions from `ffprobe -print_format json` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoDimensions, ProcessingError> {
    let probe: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::MalformedProbeOutput(e.to_string()))?;

    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or(ProcessingError::NoVideoStream)?;

    VideoDimensions::new(stream.width.unwrap_or(0), stream.height.unwrap_or(0))
}

/// Reads stream dimensions with ffprobe.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    ffprobe_path: String,
    timeout: Option<Duration>,
}

impl FfprobeProber {
    pub fn new(ffprobe_path: String, timeout: Option<Duration>) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError> {
        let start = std::time::Instant::now();

        let mut command = Command::new(&self.ffprobe_path);
        command
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(path);

        let output = run_tool("ffprobe", command, self.timeout).await?;
        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = dimensions.width,
            height = dimensions.height,
            classification = %dimensions.classification(),
            "Video probe completed"
        );

        Ok(dimensions)
    }
}
