//! Persisted `{bucket},{key}` reference to a placed object.
//!
//! The comma-joined form is the on-record encoding and must stay readable
//! across storage backends. It is never returned to clients.

use std::fmt::{Display, Formatter, Result as FmtResult};

const SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReference {
    pub bucket: String,
    pub key: String,
}

impl StorageReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Encode for persistence on the video record.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.bucket, SEPARATOR, self.key)
    }

    /// Decode a persisted reference.
    ///
    /// Returns `None` unless the value splits into exactly two non-empty
    /// components; callers treat that as "no video".
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split(SEPARATOR);
        let bucket = parts.next()?;
        let key = parts.next()?;
        if parts.next().is_some() || bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self::new(bucket, key))
    }
}

impl Display for StorageReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}{}", self.bucket, SEPARATOR, self.key)
    }
}
