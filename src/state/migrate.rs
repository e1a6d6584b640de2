// ABOUTME: Versioned state envelope and the one-time schema 0 -> 1 upgrade.
// ABOUTME: Schema 0 stored labels as a map; schema 1 stores a set of label pairs.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::secret::{SecretData, SecretState};
use crate::tag::TagState;
use crate::types::{Digest, Labels, SecretId, TagId, TagName};

use super::error::StateError;

/// Current state schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Convert schema 0 labels (a keyed map) into schema 1 label pairs.
pub fn upgrade_labels(labels: BTreeMap<String, String>) -> Labels {
    Labels::from_map(labels)
}

/// A resource state type with a persisted schema history.
pub trait Versioned: Serialize + DeserializeOwned {
    /// Resource kind, used for storage paths and envelope checks.
    const KIND: &'static str;

    /// The schema 0 shape of this state.
    type V0: DeserializeOwned + Into<Self>;
}

/// On-disk envelope around a resource state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResource {
    #[serde(default)]
    pub schema_version: u32,
    pub kind: String,
    #[serde(default)]
    pub written_at: Option<DateTime<Utc>>,
    pub state: serde_json::Value,
}

impl StoredResource {
    /// Wrap a state at the current schema version.
    pub fn encode<T: Versioned>(state: &T) -> Result<Self, StateError> {
        Ok(Self {
            schema_version: SCHEMA_VERSION,
            kind: T::KIND.to_string(),
            written_at: Some(Utc::now()),
            state: serde_json::to_value(state)?,
        })
    }

    /// Unwrap a state, upgrading it first if it predates the current schema.
    pub fn decode<T: Versioned>(self) -> Result<T, StateError> {
        if self.kind != T::KIND {
            return Err(StateError::KindMismatch {
                expected: T::KIND.to_string(),
                found: self.kind,
            });
        }

        match self.schema_version {
            0 => {
                let old: T::V0 = serde_json::from_value(self.state)?;
                info!(kind = T::KIND, "upgraded state from schema 0");
                Ok(old.into())
            }
            SCHEMA_VERSION => Ok(serde_json::from_value(self.state)?),
            found => Err(StateError::UnsupportedVersion {
                found,
                supported: SCHEMA_VERSION,
            }),
        }
    }
}

/// Schema 0 secret state.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretStateV0 {
    #[serde(default)]
    pub id: Option<SecretId>,
    pub name: String,
    pub data: SecretData,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl From<SecretStateV0> for SecretState {
    fn from(old: SecretStateV0) -> Self {
        SecretState {
            id: old.id,
            name: old.name,
            data: old.data,
            labels: upgrade_labels(old.labels),
        }
    }
}

impl Versioned for SecretState {
    const KIND: &'static str = "secret";
    type V0 = SecretStateV0;
}

/// Schema 0 tag state.
#[derive(Debug, Clone, Deserialize)]
pub struct TagStateV0 {
    #[serde(default)]
    pub id: Option<TagId>,
    pub name: TagName,
    #[serde(default)]
    pub pull_triggers: std::collections::BTreeSet<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub latest: Digest,
    pub full_image_name: String,
    pub all: Vec<Digest>,
}

impl From<TagStateV0> for TagState {
    fn from(old: TagStateV0) -> Self {
        // Schema 0 never stored an empty list; fall back to `latest` if it did.
        let all = nonempty::NonEmpty::from_vec(old.all)
            .unwrap_or_else(|| nonempty::NonEmpty::new(old.latest.clone()));
        TagState {
            id: old.id,
            name: old.name,
            pull_triggers: old.pull_triggers,
            labels: upgrade_labels(old.labels),
            latest: old.latest,
            full_image_name: old.full_image_name,
            all,
        }
    }
}

impl Versioned for TagState {
    const KIND: &'static str = "tag";
    type V0 = TagStateV0;
}
