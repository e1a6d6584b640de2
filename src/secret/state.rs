// ABOUTME: Desired and persisted state of a secret resource.
// ABOUTME: All attributes are immutable; any change means replacement.

use serde::{Deserialize, Serialize};

use crate::types::{Label, Labels, SecretId};

use super::data::{DecodeError, SecretData};

/// The declared configuration of a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSpec {
    pub name: String,
    pub data: SecretData,
    pub labels: Labels,
}

impl SecretSpec {
    /// Build a spec from a base64 payload, validating it.
    pub fn new(name: impl Into<String>, data_base64: &str) -> Result<Self, DecodeError> {
        Ok(Self {
            name: name.into(),
            data: SecretData::from_base64(data_base64)?,
            labels: Labels::new(),
        })
    }

    pub fn label(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(Label::new(label, value));
        self
    }
}

/// Persisted state of a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretState {
    /// Store-assigned identifier, present while the secret exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SecretId>,
    pub name: String,
    pub data: SecretData,
    #[serde(default)]
    pub labels: Labels,
}

impl SecretState {
    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// Whether `spec` differs from what was created. Secrets cannot be
    /// modified in place, so a difference calls for replacement.
    pub fn requires_replacement(&self, spec: &SecretSpec) -> bool {
        self.name != spec.name || self.data != spec.data || self.labels != spec.labels
    }
}
