//! Storage abstraction trait
//!
//! This module defines the Storage trait the ingestion pipeline places objects through.

use async_trait::async_trait;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object store used for placement and signed retrieval.
///
/// Every operation names its bucket explicitly; the bucket and key pair is what
/// gets persisted on the video record.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Bucket new uploads are placed in.
    fn default_bucket(&self) -> &str;

    /// Upload the reader's contents to `(bucket, key)` with the given content type.
    ///
    /// The reader is consumed until EOF. Returns the number of bytes stored.
    /// A single attempt is made.
    async fn upload_stream(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64>;

    /// Generate a presigned GET URL for `(bucket, key)` valid for `expires_in`.
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Delete the object at `(bucket, key)`.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;
}
