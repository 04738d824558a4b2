use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::storage_reference::StorageReference;

/// Video record as persisted by the record store.
///
/// `video_url` holds the encoded [`StorageReference`] (`{bucket},{key}`) once an
/// upload has completed. It is only ever written after a fully successful
/// ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl Video {
    /// Build a fresh draft record owned by `user_id`.
    pub fn new_draft(user_id: Uuid, title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title,
            description,
            thumbnail_url: None,
            video_url: None,
            user_id,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Decoded storage reference, if one is set and well-formed.
    pub fn storage_reference(&self) -> Option<StorageReference> {
        self.video_url.as_deref().and_then(StorageReference::parse)
    }

    /// Attach a placed object to this record and bump `updated_at`.
    pub fn set_storage_reference(&mut self, reference: &StorageReference) {
        self.video_url = Some(reference.encode());
        self.updated_at = Utc::now();
    }
}

/// Video record as returned to clients.
///
/// There is no `From<Video>`: the only way to build one is with an already
/// signed URL, so the stored `{bucket},{key}` form cannot leak into a response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Time-limited signed URL for the processed video, if one has been uploaded
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl VideoResponse {
    pub fn with_signed_url(video: Video, signed_url: Option<String>) -> Self {
        VideoResponse {
            id: video.id,
            created_at: video.created_at,
            updated_at: video.updated_at,
            title: video.title,
            description: video.description,
            thumbnail_url: video.thumbnail_url,
            video_url: signed_url,
            user_id: video.user_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}
