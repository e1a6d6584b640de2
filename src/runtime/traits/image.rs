// ABOUTME: Local image store operations a tag resource needs.
// ABOUTME: Pull a pinned reference, list what is held, force-remove what is stale.

use super::shared_types::{LocalImages, RegistryAuth};
use crate::types::ImageRef;
use async_trait::async_trait;

#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Pull `reference`, normally pinned as `name@digest`. Pulling something
    /// already held is a no-op.
    async fn pull_image(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<(), ImageError>;

    /// Snapshot of the local store.
    async fn list_images(&self) -> Result<LocalImages, ImageError>;

    /// Remove one image. A missing image is `ImageError::NotFound`.
    async fn remove_image(&self, reference: &ImageRef, force: bool) -> Result<(), ImageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("no local image {0}")]
    NotFound(String),

    #[error("registry refused credentials for {0}")]
    AuthenticationFailed(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("{0} is used by a container")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ImageError {
    /// The image was already gone, which removal treats as done.
    pub fn is_absent(&self) -> bool {
        matches!(self, ImageError::NotFound(_))
    }
}
