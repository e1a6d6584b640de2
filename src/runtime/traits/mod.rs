// ABOUTME: Capability traits for the collaborators the resource managers drive.
// ABOUTME: Defines DigestResolver, ImageOps, SecretOps, RuntimeInfo.

mod daemon;
mod image;
mod registry;
mod secret;
mod shared_types;

pub use daemon::{RuntimeInfo, RuntimeInfoError, RuntimeMetadata};
pub use image::{ImageError, ImageOps};
pub use registry::{DigestResolver, ResolveError};
pub use secret::{SecretError, SecretOps};
pub use shared_types::*;
