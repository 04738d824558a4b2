//! In-process stand-ins for the record store, object store and media tooling.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::video::processing_path;
use tubely_processing::{MediaBackend, ProcessedFile, ProcessingError, VideoDimensions};
use tubely_storage::{Storage, StorageError, StorageResult};
use uuid::Uuid;

/// In-memory repository whose updates can be made to fail.
#[derive(Default)]
pub struct TestRepository {
    inner: InMemoryVideoRepository,
    fail_updates: AtomicBool,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for TestRepository {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        self.inner.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.inner.get_video(id).await
    }

    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        self.inner.list_videos(user_id).await
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        self.inner.update_video(video).await
    }
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Object store that keeps uploads in memory and signs with a fake host.
pub struct RecordingStorage {
    bucket: String,
    uploads: Mutex<Vec<RecordedUpload>>,
    deletes: Mutex<Vec<(String, String)>>,
    fail_uploads: AtomicBool,
    fail_signing: AtomicBool,
}

impl RecordingStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
            fail_signing: AtomicBool::new(false),
        }
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn fail_signing(&self) {
        self.fail_signing.store(true, Ordering::SeqCst);
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    fn default_bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_stream(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("connection reset".to_string()));
        }
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        let size = data.len() as u64;
        self.uploads.lock().unwrap().push(RecordedUpload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        Ok(size)
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("credentials expired".to_string()));
        }
        Ok(format!(
            "https://signed.test/{}/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.deletes
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// Media backend reporting fixed dimensions; remux copies the input byte for byte.
pub struct FakeMediaBackend {
    dimensions: Mutex<(u32, u32)>,
    fail_probe: AtomicBool,
    probes: AtomicUsize,
    probed_paths: Mutex<Vec<PathBuf>>,
}

impl FakeMediaBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Mutex::new((width, height)),
            fail_probe: AtomicBool::new(false),
            probes: AtomicUsize::new(0),
            probed_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn set_dimensions(&self, width: u32, height: u32) {
        *self.dimensions.lock().unwrap() = (width, height);
    }

    pub fn fail_probe(&self) {
        self.fail_probe.store(true, Ordering::SeqCst);
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaBackend for FakeMediaBackend {
    async fn probe(&self, path: &Path) -> Result<VideoDimensions, ProcessingError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.probed_paths.lock().unwrap().push(path.to_path_buf());
        if self.fail_probe.load(Ordering::SeqCst) {
            return Err(ProcessingError::ToolFailed {
                tool: "ffprobe",
                status: Some(1),
                stderr: "moov atom not found".to_string(),
            });
        }
        let (width, height) = *self.dimensions.lock().unwrap();
        VideoDimensions::new(width, height)
    }

    async fn remux_faststart(&self, path: &Path) -> Result<ProcessedFile, ProcessingError> {
        let output = ProcessedFile::adopt(processing_path(path));
        tokio::fs::copy(path, output.path()).await?;
        Ok(output)
    }
}
