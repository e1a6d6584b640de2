// ABOUTME: In-process runtime that keeps registry, image store, and secrets in memory.
// ABOUTME: Lets lifecycle code run without a daemon; failures are injectable.

use crate::runtime::traits::{
    DigestResolver, ImageError, ImageOps, LocalImage, LocalImages, RegistryAuth, ResolveError,
    RuntimeInfo, RuntimeInfoError, RuntimeMetadata, SecretConfig, SecretError, SecretInfo,
    SecretOps,
};
use crate::types::{Digest, DigestError, ImageId, ImageRef, SecretId, TagName};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A call made against the in-memory runtime, in the order received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Resolve(String),
    Pull(String),
    ListImages,
    Remove(String),
    CreateSecret(String),
    InspectSecret(String),
    RemoveSecret(String),
}

#[derive(Default)]
struct Inner {
    registry: HashMap<String, Digest>,
    local: BTreeSet<String>,
    secrets: BTreeMap<String, SecretConfig>,
    next_secret: u64,
    failing_resolves: HashMap<String, String>,
    failing_pulls: HashSet<String>,
    failing_removes: HashSet<String>,
    failing_list: bool,
    calls: Vec<Call>,
}

/// Runtime holding all state in process memory.
///
/// Local images are keyed by the reference they were pulled as; each one is
/// listed with that reference as its repo digest.
#[derive(Default)]
pub struct InMemoryRuntime {
    inner: Mutex<Inner>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point a registry name at a digest.
    pub fn publish(&self, name: &str, digest: &str) -> Result<(), DigestError> {
        let digest = Digest::parse(digest)?;
        self.inner.lock().registry.insert(name.to_string(), digest);
        Ok(())
    }

    /// Remove a name from the registry so resolution reports not-found.
    pub fn unpublish(&self, name: &str) {
        self.inner.lock().registry.remove(name);
    }

    /// Place an image in the local store as if it had been pulled.
    pub fn insert_image(&self, reference: &str) {
        self.inner.lock().local.insert(reference.to_string());
    }

    /// Remove an image from the local store behind the manager's back.
    pub fn evict_image(&self, reference: &str) {
        self.inner.lock().local.remove(reference);
    }

    pub fn has_image(&self, reference: &str) -> bool {
        self.inner.lock().local.contains(reference)
    }

    pub fn local_images(&self) -> Vec<String> {
        self.inner.lock().local.iter().cloned().collect()
    }

    /// Make resolution of `name` fail with a non-not-found error.
    pub fn fail_resolve(&self, name: &str, message: &str) {
        self.inner
            .lock()
            .failing_resolves
            .insert(name.to_string(), message.to_string());
    }

    pub fn fail_pull(&self, reference: &str) {
        self.inner.lock().failing_pulls.insert(reference.to_string());
    }

    pub fn fail_remove(&self, reference: &str) {
        self.inner
            .lock()
            .failing_removes
            .insert(reference.to_string());
    }

    pub fn fail_list(&self) {
        self.inner.lock().failing_list = true;
    }

    pub fn clear_failures(&self) {
        let mut inner = self.inner.lock();
        inner.failing_resolves.clear();
        inner.failing_pulls.clear();
        inner.failing_removes.clear();
        inner.failing_list = false;
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// References removed so far, in order.
    pub fn removals(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Remove(reference) => Some(reference),
                _ => None,
            })
            .collect()
    }

    /// References pulled so far, in order.
    pub fn pulls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Pull(reference) => Some(reference),
                _ => None,
            })
            .collect()
    }

    /// Stored secret by id, with its decoded payload.
    pub fn secret(&self, id: &str) -> Option<SecretConfig> {
        self.inner.lock().secrets.get(id).cloned()
    }

    /// Delete a secret behind the manager's back.
    pub fn drop_secret(&self, id: &str) {
        self.inner.lock().secrets.remove(id);
    }

    pub fn secret_count(&self) -> usize {
        self.inner.lock().secrets.len()
    }
}

#[async_trait]
impl RuntimeInfo for InMemoryRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        Ok(RuntimeMetadata {
            name: "memory".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_version: "none".to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        Ok(())
    }
}

#[async_trait]
impl DigestResolver for InMemoryRuntime {
    async fn resolve_digest(
        &self,
        name: &TagName,
        _auth: Option<&RegistryAuth>,
    ) -> Result<Digest, ResolveError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Resolve(name.to_string()));

        if let Some(message) = inner.failing_resolves.get(name.as_str()) {
            return Err(ResolveError::Runtime(message.clone()));
        }

        inner
            .registry
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}

#[async_trait]
impl ImageOps for InMemoryRuntime {
    async fn pull_image(
        &self,
        reference: &ImageRef,
        _auth: Option<&RegistryAuth>,
    ) -> Result<(), ImageError> {
        let key = reference.to_string();
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Pull(key.clone()));

        if inner.failing_pulls.contains(&key) {
            return Err(ImageError::PullFailed(key));
        }

        inner.local.insert(key);
        Ok(())
    }

    async fn list_images(&self) -> Result<LocalImages, ImageError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::ListImages);

        if inner.failing_list {
            return Err(ImageError::Runtime("image listing failed".to_string()));
        }

        Ok(LocalImages::new(inner.local.iter().enumerate().map(
            |(n, reference)| LocalImage {
                id: ImageId::new(format!("sha256:{:064x}", n)),
                repo_tags: Vec::new(),
                repo_digests: vec![reference.clone()],
            },
        )))
    }

    async fn remove_image(&self, reference: &ImageRef, _force: bool) -> Result<(), ImageError> {
        let key = reference.to_string();
        let mut inner = self.inner.lock();
        inner.calls.push(Call::Remove(key.clone()));

        if inner.failing_removes.contains(&key) {
            return Err(ImageError::InUse(key));
        }

        if inner.local.remove(&key) {
            Ok(())
        } else {
            Err(ImageError::NotFound(key))
        }
    }
}

#[async_trait]
impl SecretOps for InMemoryRuntime {
    async fn create_secret(&self, config: &SecretConfig) -> Result<SecretId, SecretError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::CreateSecret(config.name.clone()));

        if inner.secrets.values().any(|s| s.name == config.name) {
            return Err(SecretError::AlreadyExists(config.name.clone()));
        }

        inner.next_secret += 1;
        let id = format!("{:025x}", inner.next_secret);
        inner.secrets.insert(id.clone(), config.clone());
        Ok(SecretId::new(id))
    }

    async fn inspect_secret(&self, id: &SecretId) -> Result<SecretInfo, SecretError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::InspectSecret(id.to_string()));

        inner
            .secrets
            .get(id.as_str())
            .map(|s| SecretInfo {
                id: id.clone(),
                name: s.name.clone(),
                labels: s.labels.clone(),
            })
            .ok_or_else(|| SecretError::NotFound(id.to_string()))
    }

    async fn remove_secret(&self, id: &SecretId) -> Result<(), SecretError> {
        let mut inner = self.inner.lock();
        inner.calls.push(Call::RemoveSecret(id.to_string()));

        inner
            .secrets
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| SecretError::NotFound(id.to_string()))
    }
}
