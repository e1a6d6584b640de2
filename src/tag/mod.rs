// ABOUTME: Image tag tracking: pull the digest a tag points at and prune old ones.
// ABOUTME: Exports the lifecycle manager, its state types, and pruning.

mod error;
mod manager;
mod plan;
mod prune;
mod state;

pub use error::{TagError, TagErrorKind};
pub use manager::TagManager;
pub use plan::{TagPlan, plan};
pub use prune::{PruneReport, prune_digests};
pub use state::{TagSpec, TagState};
