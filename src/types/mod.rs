// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Digests, image references, tag names, and label sets.

mod digest;
mod id;
mod image_ref;
mod label;
mod tag_name;

pub use digest::{Digest, DigestError};
pub use id::{Id, ImageId, SecretId, TagId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use label::{Label, Labels};
pub use tag_name::{TagName, TagNameError};
