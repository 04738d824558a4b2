use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::ProcessingError;

/// Characters refused in configured tool paths.
const DANGEROUS_CHARS: [char; 11] = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

pub(crate) fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    if path.trim().is_empty() || path.chars().any(|c| DANGEROUS_CHARS.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(path.to_string()));
    }
    Ok(())
}

/// Run a media tool to completion and return its output on a zero exit status.
///
/// The child is killed if the returned future is dropped, which is also how the
/// optional timeout takes effect.
pub(crate) async fn run_tool(
    tool: &'static str,
    mut command: Command,
    timeout: Option<Duration>,
) -> Result<Output, ProcessingError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, command.output())
            .await
            .map_err(|_| ProcessingError::Timeout {
                tool,
                timeout: limit,
            })?,
        None => command.output().await,
    }
    .map_err(|source| ProcessingError::ToolLaunch { tool, source })?;

    if !output.status.success() {
        return Err(ProcessingError::ToolFailed {
            tool,
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
