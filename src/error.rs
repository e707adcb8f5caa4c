//! Error types shared across the crate.

use thiserror::Error;

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("value {value} does not fit in a {width}-digit path segment")]
    PathEncoding { value: u64, width: usize },

    #[error("origin unavailable: {0}")]
    OriginUnavailable(String),

    #[error("no such prefix: {0}")]
    PrefixNotFound(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("unrecognized filename '{name}': {reason}")]
    UnrecognizedFilename { name: String, reason: String },

    #[error("fetch of {key} failed: {reason}")]
    Fetch { key: String, reason: String },

    #[error("invalid scan selection: {0}")]
    InvalidSelection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Wraps a transport-level failure from either origin.
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        ArchiveError::OriginUnavailable(err.to_string())
    }

    pub fn unrecognized(name: &str, reason: impl Into<String>) -> Self {
        ArchiveError::UnrecognizedFilename {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn fetch(key: &str, err: impl std::fmt::Display) -> Self {
        ArchiveError::Fetch {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}
