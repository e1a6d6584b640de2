// ABOUTME: Secret lifecycle manager: create once, read back, delete.
// ABOUTME: Talks to an injected secret store; there is no update path.

use snafu::ResultExt;
use tracing::{info, warn};

use crate::runtime::{SecretConfig, SecretError, SecretOps};

use super::error::{CreateSnafu, InspectSnafu, RemoveSnafu, SecretManagerError};
use super::state::{SecretSpec, SecretState};

/// Drives the lifecycle of secret resources.
pub struct SecretManager<S> {
    store: S,
}

impl<S: SecretOps> SecretManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Submit the decoded payload and adopt the store-assigned identifier.
    pub async fn create(&self, spec: SecretSpec) -> Result<SecretState, SecretManagerError> {
        let config = SecretConfig {
            name: spec.name.clone(),
            data: spec.data.as_bytes().to_vec(),
            labels: spec.labels.to_map(),
        };

        let id = self
            .store
            .create_secret(&config)
            .await
            .context(CreateSnafu {
                name: spec.name.as_str(),
            })?;

        info!(name = %spec.name, id = %id, "secret created");

        let mut state = SecretState {
            id: Some(id),
            name: spec.name,
            data: spec.data,
            labels: spec.labels,
        };
        self.read(&mut state).await?;
        Ok(state)
    }

    /// Confirm the secret still exists. A secret the store no longer knows
    /// has its identifier cleared; that is not an error.
    pub async fn read(&self, state: &mut SecretState) -> Result<(), SecretManagerError> {
        let Some(id) = state.id.clone() else {
            return Ok(());
        };

        match self.store.inspect_secret(&id).await {
            Ok(info) => {
                state.id = Some(info.id);
                Ok(())
            }
            Err(SecretError::NotFound(_)) => {
                warn!(id = %id, "secret not found, removing from state");
                state.id = None;
                Ok(())
            }
            Err(source) => Err(source).context(InspectSnafu { id: id.as_str() }),
        }
    }

    /// Remove the secret and clear the identifier.
    pub async fn delete(&self, state: &mut SecretState) -> Result<(), SecretManagerError> {
        let Some(id) = state.id.clone() else {
            return Ok(());
        };

        self.store
            .remove_secret(&id)
            .await
            .context(RemoveSnafu { id: id.as_str() })?;

        info!(name = %state.name, id = %id, "secret deleted");
        state.id = None;
        Ok(())
    }
}
