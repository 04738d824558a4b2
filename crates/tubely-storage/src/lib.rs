//! Tubely Storage Library
//!
//! Object placement and access signing for processed videos.
//!
//! # Storage key format
//!
//! Video objects are keyed `{classification}/{token}.mp4`, where `classification` is
//! one of `landscape`, `portrait` or `other` and `token` is 32 random bytes encoded
//! with the URL-safe base64 alphabet. Key generation is centralized in the `keys`
//! module.

pub mod factory;
pub mod keys;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_video_key;
pub use s3::{S3Settings, S3Storage};
pub use traits::{Storage, StorageError, StorageResult};
