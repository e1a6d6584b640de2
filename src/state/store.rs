// ABOUTME: File-backed store for resource state, one JSON document per resource.
// ABOUTME: Writes go to a temp file first and are renamed into place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::StateError;
use super::migrate::{StoredResource, Versioned};

/// Directory of persisted resource states: `<root>/<kind>/<key>.json`.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the state file for a resource key.
    pub fn path<T: Versioned>(&self, key: &str) -> PathBuf {
        self.root
            .join(T::KIND)
            .join(format!("{}.json", file_stem(key)))
    }

    /// Load and upgrade a resource state. `None` when nothing is stored.
    pub fn load<T: Versioned>(&self, key: &str) -> Result<Option<T>, StateError> {
        let path = self.path::<T>(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StateError::Io { path, source }),
        };

        let stored: StoredResource = serde_json::from_str(&content)
            .map_err(|source| StateError::Malformed { path, source })?;
        stored.decode().map(Some)
    }

    /// Persist a resource state at the current schema version.
    pub fn save<T: Versioned>(&self, key: &str, state: &T) -> Result<PathBuf, StateError> {
        let path = self.path::<T>(key);
        let stored = StoredResource::encode(state)?;
        let content = serde_json::to_string_pretty(&stored)?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| StateError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|source| StateError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StateError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "state saved");
        Ok(path)
    }

    /// Forget a resource. Removing a missing file is not an error.
    pub fn remove<T: Versioned>(&self, key: &str) -> Result<(), StateError> {
        let path = self.path::<T>(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StateError::Io { path, source }),
        }
    }
}

/// Map a resource name onto a file stem. Distinct names never share a file.
fn file_stem(key: &str) -> String {
    let encoded = urlencoding::encode(key);
    // `.` survives percent-encoding; a leading one would hide the file or
    // name a parent directory.
    match encoded.strip_prefix('.') {
        Some(rest) => format!("%2E{rest}"),
        None => encoded.into_owned(),
    }
}
