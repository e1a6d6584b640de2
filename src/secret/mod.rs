// ABOUTME: Immutable secret objects: create once, read back, delete.
// ABOUTME: Exports the secret manager, payload validation, and state types.

mod data;
mod error;
mod manager;
mod state;

pub use data::{DecodeError, SecretData};
pub use error::SecretManagerError;
pub use manager::SecretManager;
pub use state::{SecretSpec, SecretState};
