// ABOUTME: Persisted resource state: schema versions, migration, and file storage.
// ABOUTME: Every stored state is upgraded to the current schema before use.

mod error;
mod migrate;
mod store;

pub use error::StateError;
pub use migrate::{
    SCHEMA_VERSION, SecretStateV0, StoredResource, TagStateV0, Versioned, upgrade_labels,
};
pub use store::StateStore;
