// ABOUTME: Error types for tag lifecycle operations.
// ABOUTME: Each variant carries the name or reference being processed.

use snafu::Snafu;

use crate::runtime::{ImageError, ResolveError};
use crate::types::TagNameError;

/// Errors from tag create, read, update, and delete.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TagError {
    #[snafu(display("invalid tag name: {source}"))]
    InvalidName { source: TagNameError },

    #[snafu(display("failed to resolve digest for {name}: {source}"))]
    Resolution { name: String, source: ResolveError },

    #[snafu(display("unable to pull image {reference}: {source}"))]
    Pull {
        reference: String,
        source: ImageError,
    },

    #[snafu(display("failed to list local images for {name}: {source}"))]
    List { name: String, source: ImageError },

    #[snafu(display("failed to remove image {reference}: {source}"))]
    Removal {
        reference: String,
        source: ImageError,
    },

    #[snafu(display("tag {name} has no identifier; create it first"))]
    NotCreated { name: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagErrorKind {
    InvalidName,
    Resolution,
    Pull,
    Removal,
    NotCreated,
}

impl TagError {
    /// Returns the error kind for programmatic handling.
    ///
    /// A failed image listing during pruning counts as a removal failure.
    pub fn kind(&self) -> TagErrorKind {
        match self {
            TagError::InvalidName { .. } => TagErrorKind::InvalidName,
            TagError::Resolution { .. } => TagErrorKind::Resolution,
            TagError::Pull { .. } => TagErrorKind::Pull,
            TagError::List { .. } | TagError::Removal { .. } => TagErrorKind::Removal,
            TagError::NotCreated { .. } => TagErrorKind::NotCreated,
        }
    }

    /// True when the registry reported that the name no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TagError::Resolution { source, .. } if source.is_not_found())
    }
}
