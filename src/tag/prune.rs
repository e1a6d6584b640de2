// ABOUTME: Removal of locally cached images for managed digests.
// ABOUTME: Sequential, in stored order, tolerant of images that are already gone.

use snafu::ResultExt;
use tracing::{debug, info};

use crate::runtime::ImageOps;
use crate::types::{Digest, TagName};

use super::error::{ListSnafu, RemovalSnafu, TagError};

/// What a pruning pass did with each digest it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Digests whose local image was removed.
    pub removed: Vec<Digest>,
    /// Digests with no local image (removed earlier or never pulled).
    pub absent: Vec<Digest>,
}

impl PruneReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.absent.is_empty()
    }
}

/// Force-remove the local image of every digest in `digests`.
///
/// The local store is listed once up front and digests it does not hold are
/// skipped without a removal call. Removal stops at the first failure; the
/// digests before it stay removed. A digest appearing twice is handled once.
pub async fn prune_digests<R>(
    runtime: &R,
    name: &TagName,
    digests: &[Digest],
) -> Result<PruneReport, TagError>
where
    R: ImageOps + ?Sized,
{
    let mut report = PruneReport::default();
    if digests.is_empty() {
        return Ok(report);
    }

    let local = runtime
        .list_images()
        .await
        .context(ListSnafu { name: name.as_str() })?;

    for digest in digests {
        if report.removed.contains(digest) || report.absent.contains(digest) {
            continue;
        }

        let reference = name.pinned(digest);
        if !local.contains(&reference) {
            debug!(reference = %reference, "image already absent, skipping");
            report.absent.push(digest.clone());
            continue;
        }

        match runtime.remove_image(&reference, true).await {
            Ok(()) => {
                info!(reference = %reference, "removed image");
                report.removed.push(digest.clone());
            }
            // Gone between listing and removal
            Err(e) if e.is_absent() => {
                debug!(reference = %reference, "image vanished before removal");
                report.absent.push(digest.clone());
            }
            Err(source) => {
                return Err(source).context(RemovalSnafu {
                    reference: reference.to_string(),
                });
            }
        }
    }

    Ok(report)
}
