// ABOUTME: Tag lifecycle manager: create, read, update, delete against a runtime.
// ABOUTME: Resolves digests, pulls them, and prunes the digests it no longer needs.

use nonempty::NonEmpty;
use snafu::ResultExt;
use tracing::{info, warn};

use crate::runtime::{DigestResolver, ImageOps, RegistryAuth};
use crate::types::{Digest, TagId, TagName};

use super::error::{NotCreatedSnafu, PullSnafu, ResolutionSnafu, TagError};
use super::prune::{PruneReport, prune_digests};
use super::state::{TagSpec, TagState};

/// Drives the lifecycle of tag resources.
///
/// Every call is issued sequentially and errors are returned as-is; retrying
/// is left to the caller.
pub struct TagManager<R> {
    runtime: R,
    auth: Option<RegistryAuth>,
}

impl<R> TagManager<R>
where
    R: DigestResolver + ImageOps,
{
    pub fn new(runtime: R) -> Self {
        Self {
            runtime,
            auth: None,
        }
    }

    /// Use these credentials for digest resolution and pulls.
    pub fn with_auth(mut self, auth: Option<RegistryAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Resolve the current digest for `spec.name`, pull it, and start
    /// tracking it.
    ///
    /// Nothing is returned unless both the resolution and the pull succeed.
    pub async fn create(&self, spec: TagSpec) -> Result<TagState, TagError> {
        let digest = self.resolve(&spec.name).await?;
        self.pull(&spec.name, &digest).await?;

        info!(name = %spec.name, digest = %digest, "tag created");

        let mut state = TagState {
            id: Some(TagId::from(&spec.name)),
            full_image_name: spec.name.full_image_name(&digest),
            latest: digest.clone(),
            all: NonEmpty::new(digest),
            name: spec.name,
            pull_triggers: spec.pull_triggers,
            labels: spec.labels,
        };

        self.read(&mut state).await?;
        Ok(state)
    }

    /// Refresh `latest` and `full_image_name` from the registry.
    ///
    /// When the registry reports the name as gone, the identifier is cleared
    /// and no error is returned. The managed digest list is never touched.
    pub async fn read(&self, state: &mut TagState) -> Result<(), TagError> {
        match self.resolve(&state.name).await {
            Ok(digest) => {
                state.full_image_name = state.name.full_image_name(&digest);
                state.latest = digest;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                warn!(name = %state.name, "tag not found in registry, removing from state");
                state.id = None;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Pull the digest in `state.latest` and prune every previously managed
    /// digest other than it.
    ///
    /// `latest` must already be fresh from a `read` in the same cycle. A pull
    /// failure leaves `state` untouched. Once the pull succeeds the managed
    /// list becomes `[latest, previous head]` even when pruning then fails;
    /// the retained previous head is retried by the next update. The list is
    /// not deduplicated when the digest did not change.
    pub async fn update(&self, state: &mut TagState) -> Result<PruneReport, TagError> {
        if !state.exists() {
            return NotCreatedSnafu {
                name: state.name.as_str(),
            }
            .fail();
        }

        let digest = state.latest.clone();
        self.pull(&state.name, &digest).await?;

        let previous = state.all.head.clone();
        let stale: Vec<Digest> = state
            .all
            .iter()
            .filter(|d| **d != digest)
            .cloned()
            .collect();

        let pruned = prune_digests(&self.runtime, &state.name, &stale).await;

        state.full_image_name = state.name.full_image_name(&digest);
        state.all = NonEmpty {
            head: digest,
            tail: vec![previous],
        };

        let report = match pruned {
            Ok(report) => report,
            Err(e) => {
                warn!(name = %state.name, error = %e, "pruning incomplete, keeping previous digest for retry");
                return Err(e);
            }
        };

        info!(
            name = %state.name,
            digest = %state.latest,
            removed = report.removed.len(),
            "tag updated"
        );

        self.read(state).await?;
        Ok(report)
    }

    /// Remove the local image of every managed digest, then clear the
    /// identifier.
    ///
    /// On a removal failure the identifier stays set so the delete can be
    /// retried.
    pub async fn delete(&self, state: &mut TagState) -> Result<PruneReport, TagError> {
        let digests: Vec<Digest> = state.all.iter().cloned().collect();
        let report = prune_digests(&self.runtime, &state.name, &digests).await?;

        info!(name = %state.name, removed = report.removed.len(), "tag deleted");
        state.id = None;
        Ok(report)
    }

    async fn resolve(&self, name: &TagName) -> Result<Digest, TagError> {
        self.runtime
            .resolve_digest(name, self.auth.as_ref())
            .await
            .context(ResolutionSnafu {
                name: name.as_str(),
            })
    }

    async fn pull(&self, name: &TagName, digest: &Digest) -> Result<(), TagError> {
        let reference = name.pinned(digest);
        self.runtime
            .pull_image(&reference, self.auth.as_ref())
            .await
            .context(PullSnafu {
                reference: reference.to_string(),
            })
    }
}
