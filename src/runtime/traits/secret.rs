// ABOUTME: Secret store trait for container runtimes.
// ABOUTME: Create, inspect, and remove immutable secret objects.

use super::shared_types::{SecretConfig, SecretInfo};
use crate::types::SecretId;
use async_trait::async_trait;

/// Secret store operations. Secrets are immutable once created.
#[async_trait]
pub trait SecretOps: Send + Sync {
    /// Create a secret and return the store-assigned identifier.
    async fn create_secret(&self, config: &SecretConfig) -> Result<SecretId, SecretError>;

    /// Look up a secret by identifier.
    async fn inspect_secret(&self, id: &SecretId) -> Result<SecretInfo, SecretError>;

    /// Remove a secret by identifier.
    async fn remove_secret(&self, id: &SecretId) -> Result<(), SecretError>;
}

/// Errors from secret store operations.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("secret already exists: {0}")]
    AlreadyExists(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
