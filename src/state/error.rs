// ABOUTME: Errors from loading, upgrading, and saving persisted resource state.
// ABOUTME: Uses thiserror like the rest of the application-level errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("state holds a {found} resource, expected {expected}")]
    KindMismatch { expected: String, found: String },

    #[error("malformed state in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid state: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
