use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::video_access::{sign_video, sign_videos};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::models::{CreateVideoRequest, Video, VideoResponse};
use tubely_core::AppError;
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 255;

/// Create a draft video record owned by the caller.
#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.user_id))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let title = request.title.trim().to_string();
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(AppError::InvalidInput(format!(
            "Title must be between 1 and {} characters",
            MAX_TITLE_LEN
        ))
        .into());
    }

    let draft = Video::new_draft(auth.user_id, title, request.description);
    let video = state.media.repository.create_video(&draft).await?;

    tracing::info!(video_id = %video.id, "Video draft created");

    Ok((
        StatusCode::CREATED,
        Json(VideoResponse::with_signed_url(video, None)),
    ))
}

/// Fetch one of the caller's videos with a freshly signed URL.
#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video record ID")),
    responses(
        (status = 200, description = "Video", body = VideoResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 401, description = "Missing/invalid token or not the owner", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id).map_err(AppError::from)?;

    let video = state
        .media
        .repository
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if !video.is_owned_by(auth.user_id) {
        return Err(AppError::Unauthorized("Video does not belong to user".to_string()).into());
    }

    let response = sign_video(
        state.media.storage.as_ref(),
        video,
        state.media.presigned_url_ttl,
    )
    .await?;

    Ok(Json(response))
}

/// List the caller's videos, newest first.
#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Videos", body = Vec<VideoResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Signing failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.user_id))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.media.repository.list_videos(auth.user_id).await?;

    let responses = sign_videos(
        state.media.storage.as_ref(),
        videos,
        state.media.presigned_url_ttl,
    )
    .await?;

    Ok(Json(responses))
}
