// ABOUTME: Desired and persisted state of a tag resource.
// ABOUTME: TagSpec is what the caller declares; TagState is what gets stored.

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{Digest, Label, Labels, TagId, TagName};

use super::error::TagError;

/// The declared configuration of a tag resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub name: TagName,
    pub pull_triggers: BTreeSet<String>,
    pub labels: Labels,
}

impl TagSpec {
    pub fn new(name: &str) -> Result<Self, TagError> {
        let name = TagName::parse(name).map_err(|source| TagError::InvalidName { source })?;
        Ok(Self {
            name,
            pull_triggers: BTreeSet::new(),
            labels: Labels::new(),
        })
    }

    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.pull_triggers.insert(trigger.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(Label::new(label, value));
        self
    }
}

/// Persisted state of a tag resource.
///
/// `all` holds every digest this resource pulled and still answers for;
/// `all.head` is the digest made current by the last create or update and
/// the tail is pending pruning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagState {
    /// Present while the resource exists. Equal to the tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TagId>,
    pub name: TagName,
    #[serde(default)]
    pub pull_triggers: BTreeSet<String>,
    #[serde(default)]
    pub labels: Labels,
    pub latest: Digest,
    pub full_image_name: String,
    #[serde(with = "digest_list")]
    pub all: NonEmpty<Digest>,
}

impl TagState {
    /// Whether the resource still exists. A read that finds the name gone
    /// from the registry clears the identifier.
    pub fn exists(&self) -> bool {
        self.id.is_some()
    }
}

mod digest_list {
    use nonempty::NonEmpty;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::types::Digest;

    pub fn serialize<S: Serializer>(
        digests: &NonEmpty<Digest>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&Digest> = digests.iter().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NonEmpty<Digest>, D::Error> {
        let list = Vec::<Digest>::deserialize(deserializer)?;
        NonEmpty::from_vec(list)
            .ok_or_else(|| serde::de::Error::custom("managed digest list cannot be empty"))
    }
}
