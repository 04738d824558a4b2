//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in process: records live in memory, the object store records
//! what it is asked to do and the media backend never shells out.
//! Run from workspace root: `cargo test -p tubely-api`.

pub mod doubles;

use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use doubles::{FakeMediaBackend, RecordingStorage, TestRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::auth::JwtService;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::constants::API_PREFIX;
use tubely_core::models::Video;
use tubely_core::{BaseConfig, Config, ServiceConfig};
use tubely_db::VideoRepository;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long";
pub const TEST_BUCKET: &str = "tubely-test";

/// API path prefix for tests (e.g. `/api/videos`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

/// Test application: server, collaborators under inspection and owned resources.
pub struct TestApp {
    pub server: TestServer,
    /// The same router, for requests axum-test cannot express (e.g. streamed bodies).
    pub router: Router,
    pub repository: Arc<TestRepository>,
    pub storage: Arc<RecordingStorage>,
    pub backend: Arc<FakeMediaBackend>,
    jwt: JwtService,
    upload_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Bearer header value for `user_id`.
    pub fn bearer(&self, user_id: Uuid) -> String {
        let token = self
            .jwt
            .issue(user_id, chrono::Duration::hours(1))
            .expect("Failed to issue test token");
        format!("Bearer {}", token)
    }

    /// Insert a draft record owned by `user_id` directly into the repository.
    pub async fn seed_video(&self, user_id: Uuid) -> Video {
        let draft = Video::new_draft(user_id, "Boots".to_string(), None);
        self.repository
            .create_video(&draft)
            .await
            .expect("Failed to seed video")
    }

    pub async fn stored_video(&self, id: Uuid) -> Video {
        self.repository
            .get_video(id)
            .await
            .expect("Repository lookup failed")
            .expect("Video missing from repository")
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Number of files left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .expect("Failed to read upload dir")
            .count()
    }
}

pub fn test_config(upload_dir: &Path, max_video_upload_bytes: u64) -> Config {
    Config(Box::new(ServiceConfig {
        base: BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            jwt_secret: TEST_JWT_SECRET.to_string(),
        },
        database_url: None,
        db_max_connections: 1,
        db_timeout_seconds: 5,
        s3_bucket: TEST_BUCKET.to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        aws_access_key_id: None,
        aws_secret_access_key: None,
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        upload_temp_dir: Some(upload_dir.to_path_buf()),
        max_video_upload_bytes,
        presigned_url_ttl_secs: 300,
        media_tool_timeout_secs: 0,
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limit(1 << 30).await
}

/// Setup test app with a custom upload cap.
pub async fn setup_test_app_with_limit(max_video_upload_bytes: u64) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("uploads");
    std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");

    let config = test_config(&upload_dir, max_video_upload_bytes);
    config.validate().expect("Test config must be valid");

    let repository = Arc::new(TestRepository::new());
    let storage = Arc::new(RecordingStorage::new(TEST_BUCKET));
    let backend = Arc::new(FakeMediaBackend::new(1920, 1080));

    let state = Arc::new(AppState::new(
        &config,
        repository.clone(),
        storage.clone(),
        backend.clone(),
    ));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router.clone().into_make_service())
        .expect("Failed to create test server");

    TestApp {
        server,
        router,
        repository,
        storage,
        backend,
        jwt: JwtService::new(TEST_JWT_SECRET),
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Multipart body with one part named `field`.
pub fn video_form(field: &str, data: &[u8], mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(Bytes::copy_from_slice(data))
            .file_name("boots.mp4")
            .mime_type(mime_type),
    )
}

/// Stand-in MP4 payload; the fake backend never parses it.
pub fn sample_video_bytes() -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.extend((0..4096u32).map(|i| (i % 251) as u8));
    data
}
