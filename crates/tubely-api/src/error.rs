//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors from the
//! storage and processing crates convert into `HttpAppError` with `?`, so every
//! failure renders with the same status mapping, body shape and log level.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::OnceLock;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::{ProcessingError, ValidationError};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: IntoResponse is external and so is AppError)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

static EXPOSE_ERROR_DETAILS: OnceLock<bool> = OnceLock::new();

/// Set once at startup from `Config::is_production`. Details stay hidden until set.
pub fn configure_error_details(is_production: bool) {
    if EXPOSE_ERROR_DETAILS.set(!is_production).is_err() {
        tracing::debug!("Error detail mode already configured");
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let expose_details = EXPOSE_ERROR_DETAILS.get().copied().unwrap_or(false);
        self.render(expose_details)
    }
}

impl HttpAppError {
    fn render(self, expose_details: bool) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only leave the process for non-sensitive errors outside production.
        let (details, error_type) = if !expose_details || app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        let body = Json(ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        });

        (status, body).into_response()
    }
}

// Convert domain errors to HttpAppError

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::SigningFailed(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::Storage(format!("Invalid key: {}", msg)),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Storage(msg),
        };
        HttpAppError(app)
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app = match err {
            ProcessingError::Io(err) => AppError::Internal(format!("IO error: {}", err)),
            other => AppError::MediaProcessing(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::MissingContentType => {
                AppError::UnsupportedMediaType("Missing content type, expected video/mp4".to_string())
            }
            ValidationError::InvalidContentType { content_type } => AppError::UnsupportedMediaType(
                format!("Unsupported media type '{}', expected video/mp4", content_type),
            ),
        };
        HttpAppError(app)
    }
}

/// Unreadable, truncated or oversized multipart bodies are all client errors.
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let message = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            "File is too large".to_string()
        } else {
            format!("Invalid multipart body: {}", err.body_text())
        };
        HttpAppError(AppError::BadRequest(message))
    }
}
