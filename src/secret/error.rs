// ABOUTME: Error types for secret lifecycle operations.
// ABOUTME: Wraps store errors with the secret name or identifier involved.

use snafu::Snafu;

use crate::runtime::SecretError;

use super::data::DecodeError;

/// Errors from secret create, read, and delete.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SecretManagerError {
    #[snafu(display("invalid secret data: {source}"))]
    Decode { source: DecodeError },

    #[snafu(display("failed to create secret {name}: {source}"))]
    Create { name: String, source: SecretError },

    #[snafu(display("failed to inspect secret {id}: {source}"))]
    Inspect { id: String, source: SecretError },

    #[snafu(display("failed to remove secret {id}: {source}"))]
    Remove { id: String, source: SecretError },
}

impl From<DecodeError> for SecretManagerError {
    fn from(source: DecodeError) -> Self {
        SecretManagerError::Decode { source }
    }
}
