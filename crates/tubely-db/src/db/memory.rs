use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tubely_core::models::Video;
use tubely_core::AppError;
use uuid::Uuid;

use super::VideoRepository;

/// Process-local video repository.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::BadRequest(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut owned: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(video.clone())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::models::StorageReference;

    #[tokio::test]
    async fn test_create_then_get_returns_same_record() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new_draft(Uuid::new_v4(), "Boots".to_string(), None);

        repo.create_video(&video).await.unwrap();

        assert_eq!(repo.get_video(video.id).await.unwrap(), Some(video));
        assert_eq!(repo.get_video(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_only_returns_owned_videos() {
        let repo = InMemoryVideoRepository::new();
        let owner = Uuid::new_v4();
        repo.create_video(&Video::new_draft(owner, "a".to_string(), None))
            .await
            .unwrap();
        repo.create_video(&Video::new_draft(owner, "b".to_string(), None))
            .await
            .unwrap();
        repo.create_video(&Video::new_draft(Uuid::new_v4(), "c".to_string(), None))
            .await
            .unwrap();

        let listed = repo.list_videos(owner).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|v| v.user_id == owner));
    }

    #[tokio::test]
    async fn test_update_persists_storage_reference() {
        let repo = InMemoryVideoRepository::new();
        let mut video = Video::new_draft(Uuid::new_v4(), "Boots".to_string(), None);
        repo.create_video(&video).await.unwrap();

        video.set_storage_reference(&StorageReference::new("tubely", "landscape/abc.mp4"));
        repo.update_video(&video).await.unwrap();

        let stored = repo.get_video(video.id).await.unwrap().unwrap();
        assert_eq!(stored.video_url.as_deref(), Some("tubely,landscape/abc.mp4"));
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new_draft(Uuid::new_v4(), "ghost".to_string(), None);
        let err = repo.update_video(&video).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
