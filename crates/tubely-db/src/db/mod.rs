//! Video record repositories
//!
//! The API depends only on [`VideoRepository`]. `PgVideoRepository` is used whenever
//! `DATABASE_URL` is configured; `InMemoryVideoRepository` backs development runs
//! without a database and the test suites.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::PgVideoRepository;

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tubely_core::models::Video;
use tubely_core::{AppError, Config};
use uuid::Uuid;

/// Persistence operations the ingestion and read paths rely on.
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError>;

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Records owned by `user_id`, newest first.
    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Replace the mutable fields of an existing record in a single write.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;
}

/// Apply the SQL migrations shipped with the workspace.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run migrations: {}", e)))
}

/// Build the repository selected by configuration.
///
/// Without `DATABASE_URL` records live in process memory and are lost on restart;
/// `Config::validate` refuses that setup in production.
pub async fn create_video_repository(
    config: &Config,
) -> Result<Arc<dyn VideoRepository>, AppError> {
    match config.database_url() {
        Some(url) => {
            tracing::info!(
                max_connections = config.db_max_connections(),
                "Connecting to PostgreSQL"
            );
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections())
                .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
                .connect(url)
                .await?;
            run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");
            Ok(Arc::new(PgVideoRepository::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory video repository");
            Ok(Arc::new(InMemoryVideoRepository::new()))
        }
    }
}
