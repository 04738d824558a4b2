use axum::extract::multipart::Field;
use axum::extract::Multipart;
use std::pin::Pin;
use tokio::io::AsyncRead;
use tubely_core::constants::{VIDEO_CONTENT_TYPE, VIDEO_UPLOAD_FIELD};
use tubely_core::models::{StorageReference, Video};
use tubely_core::AppError;
use tubely_processing::{validate_video_content_type, StagedUpload};
use tubely_storage::generate_video_key;

use crate::error::HttpAppError;
use crate::state::MediaState;

/// Runs an authorized upload through stage, probe, remux, place and persist.
///
/// Callers must have authenticated the user and checked ownership of `video`
/// before handing over the multipart body. The record is written once, after
/// the object has been placed; any earlier failure leaves it untouched.
pub struct VideoIngestService<'a> {
    media: &'a MediaState,
}

impl<'a> VideoIngestService<'a> {
    pub fn new(media: &'a MediaState) -> Self {
        Self { media }
    }

    #[tracing::instrument(skip(self, video, multipart), fields(video_id = %video.id, user_id = %video.user_id))]
    pub async fn ingest(
        &self,
        mut video: Video,
        mut multipart: Multipart,
    ) -> Result<Video, HttpAppError> {
        let start = std::time::Instant::now();

        let mut staged = None;
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(VIDEO_UPLOAD_FIELD) {
                continue;
            }
            validate_video_content_type(field.content_type())?;
            staged = Some(self.stage(field).await?);
            break;
        }
        let staged = staged.ok_or_else(|| {
            AppError::BadRequest(format!("Missing '{}' file field", VIDEO_UPLOAD_FIELD))
        })?;
        tracing::debug!(size_bytes = staged.len(), "Upload staged");

        let dimensions = self.media.backend.probe(staged.path()).await?;
        let classification = dimensions.classification();

        let processed = self.media.backend.remux_faststart(staged.path()).await?;
        drop(staged);

        let bucket = self.media.storage.default_bucket().to_string();
        let key = generate_video_key(classification);

        let file = processed.open().await.map_err(|e| {
            AppError::Internal(format!("Failed to open processed video: {}", e))
        })?;
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(file);
        let size_bytes = self
            .media
            .storage
            .upload_stream(&bucket, &key, VIDEO_CONTENT_TYPE, reader)
            .await?;
        drop(processed);

        let reference = StorageReference::new(bucket, key);
        video.set_storage_reference(&reference);

        let updated = match self.media.repository.update_video(&video).await {
            Ok(updated) => updated,
            Err(e) => {
                self.spawn_orphan_cleanup(reference);
                return Err(e.into());
            }
        };

        tracing::info!(
            bucket = %reference.bucket,
            key = %reference.key,
            classification = %classification,
            size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video ingested"
        );

        Ok(updated)
    }

    /// Copy the field into a fresh staged file and rewind it.
    async fn stage(&self, mut field: Field<'_>) -> Result<StagedUpload, HttpAppError> {
        let mut staged = StagedUpload::create_in(&self.media.upload_temp_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;

        while let Some(chunk) = field.chunk().await? {
            staged
                .write_chunk(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write temp file: {}", e)))?;
        }

        if staged.is_empty() {
            return Err(AppError::BadRequest("Uploaded video is empty".to_string()).into());
        }

        staged
            .rewind()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to rewind temp file: {}", e)))?;

        Ok(staged)
    }

    /// Best-effort removal of an object whose record update failed.
    fn spawn_orphan_cleanup(&self, reference: StorageReference) {
        let storage = self.media.storage.clone();
        tokio::spawn(async move {
            if let Err(cleanup_err) = storage.delete(&reference.bucket, &reference.key).await {
                tracing::warn!(
                    error = %cleanup_err,
                    bucket = %reference.bucket,
                    key = %reference.key,
                    "Failed to cleanup placed object after record update error"
                );
            }
        });
    }
}
