//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so handlers and extractors can take only what
//! they need via Axum's `FromRef`.

use crate::auth::JwtService;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::MediaBackend;
use tubely_storage::Storage;

/// Collaborators and limits of the ingestion pipeline and read path.
#[derive(Clone)]
pub struct MediaState {
    pub repository: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub backend: Arc<dyn MediaBackend>,
    pub upload_temp_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub presigned_url_ttl: Duration,
}

/// Token validation for the `AuthUser` extractor and the upload handler.
#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<JwtService>,
}

impl AuthState {
    pub fn new(jwt: JwtService) -> Self {
        Self { jwt: Arc::new(jwt) }
    }
}

/// Main application state.
#[derive(Clone)]
pub struct AppState {
    pub media: MediaState,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(
        config: &Config,
        repository: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        backend: Arc<dyn MediaBackend>,
    ) -> Self {
        let media = MediaState {
            repository,
            storage,
            backend,
            upload_temp_dir: config.upload_temp_dir(),
            max_upload_bytes: config.max_video_upload_bytes(),
            presigned_url_ttl: config.presigned_url_ttl(),
        };

        Self {
            media,
            auth: AuthState::new(JwtService::new(config.jwt_secret())),
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for AuthState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.auth.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
