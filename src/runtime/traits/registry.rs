// ABOUTME: Registry digest resolution trait.
// ABOUTME: Asks the registry which digest a repository name currently points at.

use super::shared_types::RegistryAuth;
use crate::types::{Digest, TagName};
use async_trait::async_trait;

/// Resolves the digest a registry considers current for a name.
#[async_trait]
pub trait DigestResolver: Send + Sync {
    async fn resolve_digest(
        &self,
        name: &TagName,
        auth: Option<&RegistryAuth>,
    ) -> Result<Digest, ResolveError>;
}

/// Errors from digest resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The registry no longer knows the name.
    #[error("not found in registry: {0}")]
    NotFound(String),

    #[error("authentication failed for registry: {0}")]
    AuthenticationFailed(String),

    #[error("registry returned an invalid digest for {name}: {digest}")]
    InvalidDigest { name: String, digest: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}
