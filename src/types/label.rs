// ABOUTME: Label key/value pairs attached to managed resources.
// ABOUTME: Labels are stored as an ordered set of pairs, not a map.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A single label record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label {
    pub label: String,
    pub value: String,
}

impl Label {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Parse a `key=value` argument. The value may itself contain `=`.
    pub fn parse(input: &str) -> Result<Self, String> {
        match input.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Self::new(key.trim(), value)),
            _ => Err(format!("label must be key=value, got: {}", input)),
        }
    }
}

/// A set of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeSet<Label>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: Label) -> bool {
        self.0.insert(label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    /// Collapse into the key/value map the runtime API expects.
    /// A later pair wins when two pairs share a key.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|l| (l.label.clone(), l.value.clone()))
            .collect()
    }

    pub fn from_map<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        map.into_iter().map(|(k, v)| Label::new(k, v)).collect()
    }
}

impl FromIterator<Label> for Labels {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::from_map(map)
    }
}
