use std::path::PathBuf;
use std::time::Duration;

/// Failures of the local media pipeline
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to execute {tool}: {source}")]
    ToolLaunch {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with status {status:?}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} did not finish within {timeout:?}")]
    Timeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    MalformedProbeOutput(String),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Invalid video dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Remux produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
