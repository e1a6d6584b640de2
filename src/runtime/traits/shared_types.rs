// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: RegistryAuth, LocalImages, SecretConfig, SecretInfo.

use crate::types::{ImageId, ImageRef, SecretId};
use std::collections::HashMap;

/// Registry authentication credentials.
#[derive(Clone)]
pub struct RegistryAuth {
    /// Username.
    pub username: String,
    /// Password or token.
    pub password: String,
    /// Registry server (e.g., "ghcr.io").
    pub server: Option<String>,
}

impl std::fmt::Debug for RegistryAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

/// One image in the local store.
#[derive(Debug, Clone)]
pub struct LocalImage {
    /// Image ID (config digest).
    pub id: ImageId,
    /// Tags pointing at this image, e.g. `nginx:latest`.
    pub repo_tags: Vec<String>,
    /// Pinned references for this image, e.g. `nginx@sha256:...`.
    pub repo_digests: Vec<String>,
}

/// Index over the local image store.
///
/// Every image is reachable by its id, each repo tag, and each repo digest.
/// Tags ending in `:latest` are also indexed under the bare repository.
/// Keys are normalized so `docker.io/library/nginx@sha256:..`,
/// `library/nginx@sha256:..` and `nginx:1.25@sha256:..` find the image
/// Docker lists as `nginx@sha256:..`.
#[derive(Debug, Clone, Default)]
pub struct LocalImages {
    by_key: HashMap<String, LocalImage>,
}

impl LocalImages {
    pub fn new(images: impl IntoIterator<Item = LocalImage>) -> Self {
        let mut by_key = HashMap::new();
        for image in images {
            by_key.insert(image.id.as_str().to_string(), image.clone());
            for tag in &image.repo_tags {
                if let Some(bare) = tag.strip_suffix(":latest") {
                    by_key.insert(normalize_key(bare), image.clone());
                }
                by_key.insert(normalize_key(tag), image.clone());
            }
            for digest in &image.repo_digests {
                by_key.insert(normalize_key(digest), image.clone());
            }
        }
        Self { by_key }
    }

    pub fn contains(&self, reference: &ImageRef) -> bool {
        self.get(&reference.to_string()).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&LocalImage> {
        self.by_key
            .get(key)
            .or_else(|| self.by_key.get(&normalize_key(key)))
    }
}

fn normalize_key(key: &str) -> String {
    let key = key
        .strip_prefix("docker.io/")
        .or_else(|| key.strip_prefix("index.docker.io/"))
        .unwrap_or(key);
    let key = key.strip_prefix("library/").unwrap_or(key);

    // Pinned references are listed without their tag
    match key.split_once('@') {
        Some((name, digest)) => {
            let name = match name.rsplit_once(':') {
                Some((repo, tag)) if !tag.contains('/') => repo,
                _ => name,
            };
            format!("{}@{}", name, digest)
        }
        None => key.to_string(),
    }
}

/// Configuration for creating a secret.
#[derive(Clone)]
pub struct SecretConfig {
    /// Secret name.
    pub name: String,
    /// Decoded payload.
    pub data: Vec<u8>,
    /// Labels to apply.
    pub labels: HashMap<String, String>,
}

impl std::fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretConfig")
            .field("name", &self.name)
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("labels", &self.labels)
            .finish()
    }
}

/// Information about a stored secret. The payload is never read back.
#[derive(Debug, Clone)]
pub struct SecretInfo {
    /// Secret ID.
    pub id: SecretId,
    /// Secret name.
    pub name: String,
    /// Labels.
    pub labels: HashMap<String, String>,
}
