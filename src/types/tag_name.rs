// ABOUTME: Tracked tag name: an image reference without a digest segment.
// ABOUTME: Builds the pinned name@digest strings persisted in tag state.

use super::{Digest, ImageRef, ParseImageRefError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagNameError {
    #[error(transparent)]
    Parse(#[from] ParseImageRefError),

    #[error("tag name must not contain a digest segment: {0}")]
    HasDigest(String),
}

/// The repository reference a tag resource tracks, e.g. `library/nginx`.
///
/// Keeps the text exactly as written so that `full_image_name` is
/// `<name>@<digest>` with no normalization applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagName {
    raw: String,
    reference: ImageRef,
}

impl TagName {
    pub fn parse(input: &str) -> Result<Self, TagNameError> {
        let reference = ImageRef::parse(input)?;
        if reference.digest().is_some() {
            return Err(TagNameError::HasDigest(input.to_string()));
        }
        Ok(Self {
            raw: input.trim().to_string(),
            reference,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn reference(&self) -> &ImageRef {
        &self.reference
    }

    /// The image reference to pull or remove for one digest of this tag.
    pub fn pinned(&self, digest: &Digest) -> ImageRef {
        self.reference.with_digest(digest)
    }

    /// The persisted `full_image_name`: `<name>@<digest>`.
    pub fn full_image_name(&self, digest: &Digest) -> String {
        format!("{}@{}", self.raw, digest)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for TagName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TagName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TagName::parse(&s).map_err(serde::de::Error::custom)
    }
}
