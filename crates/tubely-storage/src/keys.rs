//! Key generation for placed video objects.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use tubely_core::models::AspectRatio;

use crate::traits::{StorageError, StorageResult};

const KEY_TOKEN_BYTES: usize = 32;

/// Derive a fresh object key for a video of the given classification.
///
/// Keys are `{classification}/{token}.mp4`. The token is drawn from the OS-seeded
/// thread RNG, so collisions are not checked for.
pub fn generate_video_key(classification: AspectRatio) -> String {
    let token: [u8; KEY_TOKEN_BYTES] = rand::random();
    format!("{}/{}.mp4", classification, URL_SAFE.encode(token))
}

/// Reject keys that could escape their prefix or clash with the reference encoding.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.starts_with('/') || key.contains("..") || key.contains(',') {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
