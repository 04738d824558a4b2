use crate::auth::authenticate;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::VideoIngestService;
use crate::services::video_access::sign_video;
use crate::state::AppState;
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_LENGTH,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tubely_core::models::VideoResponse;
use tubely_core::AppError;
use uuid::Uuid;

/// Upload the media file for an existing video record.
///
/// The body is only read after the caller is authenticated and shown to own the
/// record, so rejected requests never touch the staging directory.
#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video record ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded and processed", body = VideoResponse),
        (status = 400, description = "Invalid ID, malformed body or file too large", body = ErrorResponse),
        (status = 401, description = "Missing/invalid token or not the owner", body = ErrorResponse),
        (status = 415, description = "Part is not video/mp4", body = ErrorResponse),
        (status = 500, description = "Lookup, processing or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    request: Request,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id).map_err(AppError::from)?;

    let user_id = authenticate(request.headers(), &state.auth.jwt)?;

    // A missing record is a lookup failure here, not a 404.
    let video = state
        .media
        .repository
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Error getting video {}", video_id)))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized(
            "Unauthorized access, video does not belong to user".to_string(),
        )
        .into());
    }

    let declared_length = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared_length.is_some_and(|len| len > state.media.max_upload_bytes) {
        return Err(AppError::BadRequest("File is too large".to_string()).into());
    }

    let multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart request: {}", e)))?;

    let updated = VideoIngestService::new(&state.media)
        .ingest(video, multipart)
        .await?;

    let response = sign_video(
        state.media.storage.as_ref(),
        updated,
        state.media.presigned_url_ttl,
    )
    .await?;

    Ok(Json(response))
}
