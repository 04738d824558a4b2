//! Wire-level constants shared by the API and the pipeline.

/// Prefix for every API route.
pub const API_PREFIX: &str = "/api";

/// Multipart field that carries the uploaded video.
pub const VIDEO_UPLOAD_FIELD: &str = "video";

/// The only accepted declared content type for uploads, and the content type placed objects carry.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Hard cap on an upload request body (1 GiB).
pub const DEFAULT_MAX_VIDEO_UPLOAD_BYTES: u64 = 1 << 30;

/// Validity window of signed retrieval URLs.
pub const DEFAULT_PRESIGNED_URL_TTL_SECS: u64 = 5 * 60;

/// Longest expiry S3 accepts for a SigV4 presigned URL (7 days).
pub const MAX_PRESIGNED_URL_TTL_SECS: u64 = 7 * 24 * 60 * 60;
