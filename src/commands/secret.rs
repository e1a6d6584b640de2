// ABOUTME: Secret command handlers: create, refresh, destroy, show.
// ABOUTME: Secrets are immutable, so a changed spec replaces the stored secret.

use crate::error::{Error, Result};
use crate::output::Output;
use crate::runtime::SecretOps;
use crate::secret::{SecretManager, SecretSpec, SecretState};
use crate::state::{StateError, StateStore};

fn load(store: &StateStore, name: &str) -> Result<SecretState> {
    store
        .load::<SecretState>(name)?
        .ok_or_else(|| Error::NotTracked {
            kind: "secret",
            name: name.to_string(),
        })
}

/// Create the secret described by `spec`.
///
/// An existing secret with identical attributes is left alone; one that
/// differs is deleted first and created again.
pub async fn create_secret<S: SecretOps>(
    manager: &SecretManager<S>,
    store: &StateStore,
    spec: SecretSpec,
    output: &Output,
) -> Result<SecretState> {
    let key = spec.name.clone();

    if let Some(mut state) = store.load::<SecretState>(&key)? {
        manager.read(&mut state).await?;

        if state.exists() && !state.requires_replacement(&spec) {
            store.save(&key, &state)?;
            output.success(&format!("Secret {} unchanged", state.name));
            return Ok(state);
        }

        if state.exists() {
            output.progress(&format!("  → Replacing secret {}...", state.name));
            manager.delete(&mut state).await?;
            store.save(&key, &state)?;
        }
    }

    let state = manager.create(spec).await?;
    store.save(&key, &state)?;

    if let Some(id) = &state.id {
        output.success(&format!("Created secret {} ({})", state.name, id.short()));
    }
    Ok(state)
}

/// Check that a stored secret still exists.
pub async fn refresh_secret<S: SecretOps>(
    manager: &SecretManager<S>,
    store: &StateStore,
    name: &str,
    output: &Output,
) -> Result<SecretState> {
    let mut state = load(store, name)?;
    manager.read(&mut state).await?;
    store.save(name, &state)?;

    if state.exists() {
        output.success(&format!("Secret {} exists", name));
    } else {
        output.warning(&format!("Secret {} no longer exists", name));
    }
    Ok(state)
}

/// Delete a stored secret and forget it.
pub async fn destroy_secret<S: SecretOps>(
    manager: &SecretManager<S>,
    store: &StateStore,
    name: &str,
    output: &Output,
) -> Result<()> {
    let mut state = load(store, name)?;
    manager.delete(&mut state).await?;
    store.remove::<SecretState>(name)?;

    output.success(&format!("Deleted secret {}", name));
    Ok(())
}

/// Print the stored state of a secret with the payload masked.
pub fn show_secret(store: &StateStore, name: &str, output: &Output) -> Result<SecretState> {
    let state = load(store, name)?;

    let mut view = serde_json::to_value(&state).map_err(StateError::from)?;
    if let Some(fields) = view.as_object_mut() {
        fields.insert("data".to_string(), "(sensitive)".into());
    }
    output.state(&view);
    Ok(state)
}
