//! Route configuration

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tubely_core::constants::API_PREFIX;
use tubely_core::Config;
use utoipa::OpenApi;

/// Build the application router
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(config)?;

    // Covers chunked bodies; declared lengths are rejected up front by the handler.
    let upload_limit = usize::try_from(config.max_video_upload_bytes()).unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .route(
            "/videos",
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route("/videos/{videoID}", get(handlers::videos::get_video))
        .route(
            "/video_upload/{videoID}",
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/openapi.json", get(openapi_json));

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest(API_PREFIX, api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(router)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };

    Ok(cors)
}
