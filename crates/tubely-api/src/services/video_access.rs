//! Read-path signing: stored `{bucket},{key}` references become pre-signed URLs.

use crate::error::HttpAppError;
use std::time::Duration;
use tubely_core::models::{StorageReference, Video, VideoResponse};
use tubely_storage::Storage;

/// Build the client view of `video`, signing its stored reference afresh.
///
/// Records without a reference pass through with `video_url: null`. A reference
/// that does not decode into exactly two components is also rendered as null; a
/// signing failure fails the whole response.
pub async fn sign_video(
    storage: &dyn Storage,
    video: Video,
    ttl: Duration,
) -> Result<VideoResponse, HttpAppError> {
    let Some(raw) = video.video_url.as_deref() else {
        return Ok(VideoResponse::with_signed_url(video, None));
    };

    let Some(reference) = StorageReference::parse(raw) else {
        tracing::warn!(
            video_id = %video.id,
            "Stored video reference is not in bucket,key form; omitting URL"
        );
        return Ok(VideoResponse::with_signed_url(video, None));
    };

    let url = storage
        .presigned_get_url(&reference.bucket, &reference.key, ttl)
        .await?;

    Ok(VideoResponse::with_signed_url(video, Some(url)))
}

/// Sign every record in order; the first signing failure fails the batch.
pub async fn sign_videos(
    storage: &dyn Storage,
    videos: Vec<Video>,
    ttl: Duration,
) -> Result<Vec<VideoResponse>, HttpAppError> {
    let mut responses = Vec::with_capacity(videos.len());
    for video in videos {
        responses.push(sign_video(storage, video, ttl).await?);
    }
    Ok(responses)
}
