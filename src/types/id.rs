// ABOUTME: Phantom-typed identifiers for compile-time type safety.
// ABOUTME: Keeps secret, tag, and image identifiers from being swapped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::TagName;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Empty enums cannot be instantiated and need no trait bounds.
pub enum SecretMarker {}
pub enum TagMarker {}
pub enum ImageMarker {}

/// An identifier assigned to a managed resource.
///
/// The phantom parameter makes a `SecretId` and a `TagId` different types,
/// so a store-assigned secret id can never be handed to tag operations.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// T is only a marker, so these impls must not require T: Trait.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type SecretId = Id<SecretMarker>;
pub type TagId = Id<TagMarker>;
pub type ImageId = Id<ImageMarker>;

/// A tag resource is identified by the name it tracks.
impl From<&TagName> for TagId {
    fn from(name: &TagName) -> Self {
        Self::new(name.as_str())
    }
}

impl SecretId {
    /// First 12 characters, as `docker secret ls` shows them.
    pub fn short(&self) -> &str {
        self.value.get(..12).unwrap_or(&self.value)
    }
}
