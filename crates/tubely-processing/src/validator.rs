use tubely_core::constants::VIDEO_CONTENT_TYPE;

/// Upload validation errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing content type")]
    MissingContentType,

    #[error("Invalid content type: {content_type} (allowed: video/mp4)")]
    InvalidContentType { content_type: String },
}

/// Media type of a declared `Content-Type`, lowercased and without parameters.
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Accept only parts declared as `video/mp4`.
///
/// Parameters such as `; codecs=...` are ignored and the comparison is
/// case-insensitive. The bytes themselves are not sniffed here; ffprobe is the
/// authority on what the file actually contains.
pub fn validate_video_content_type(declared: Option<&str>) -> Result<(), ValidationError> {
    let declared = declared
        .filter(|ct| !ct.trim().is_empty())
        .ok_or(ValidationError::MissingContentType)?;

    if media_type_essence(declared) != VIDEO_CONTENT_TYPE {
        return Err(ValidationError::InvalidContentType {
            content_type: declared.to_string(),
        });
    }

    Ok(())
}
