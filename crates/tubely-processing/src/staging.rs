//! On-disk staging for uploads in flight.
//!
//! Both guards delete their file when dropped, so every exit path of a request,
//! including client disconnects and pipeline errors, leaves the staging
//! directory as it found it.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

const STAGED_PREFIX: &str = "tubely-upload-";
const STAGED_SUFFIX: &str = ".mp4";

/// An uploaded body being written to a uniquely named temp file.
pub struct StagedUpload {
    file: File,
    path: TempPath,
    bytes_written: u64,
}

impl StagedUpload {
    /// Create an empty staged file inside `dir`.
    pub fn create_in(dir: &Path) -> std::io::Result<Self> {
        let named = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(STAGED_SUFFIX)
            .tempfile_in(dir)?;
        let (file, path) = named.into_parts();

        Ok(Self {
            file: File::from_std(file),
            path,
            bytes_written: 0,
        })
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flush buffered writes and seek back to the start.
    pub async fn rewind(&mut self) -> std::io::Result<()> {
        self.file.flush().await?;
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_empty(&self) -> bool {
        self.bytes_written == 0
    }
}

/// Output of a remux pass, owned so it is removed once placement is done.
pub struct ProcessedFile {
    path: TempPath,
}

impl ProcessedFile {
    /// Take ownership of a file the caller is about to create or has created.
    ///
    /// The path need not exist yet; dropping the guard removes it if it does.
    pub fn adopt(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open for reading from the start.
    pub async fn open(&self) -> std::io::Result<File> {
        File::open(&self.path).await
    }
}
