// ABOUTME: Container runtime access for the resource managers.
// ABOUTME: Collaborator traits, the bollard backend, an in-memory backend, and detection.

mod bollard;
mod detection;
mod error;
mod memory;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectionError, detect_local};
pub use error::{RuntimeError, RuntimeErrorKind};
pub(crate) use error::{ConnectSnafu, DetectionSnafu, PingSnafu};
pub use memory::{Call, InMemoryRuntime};
pub use traits::{
    DigestResolver, ImageError, ImageOps, LocalImage, LocalImages, RegistryAuth,
    ResolveError, RuntimeInfo as RuntimeInfoTrait, RuntimeInfoError, RuntimeMetadata, SecretConfig,
    SecretError, SecretInfo, SecretOps,
};
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};
