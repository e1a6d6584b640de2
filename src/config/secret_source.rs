// ABOUTME: Where a registry password comes from: inline, an environment variable, or a file.
// ABOUTME: Resolved only when credentials are needed, so tagkeep.yml can be committed.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SecretSource {
    Inline(String),
    Env {
        env: String,
        #[serde(default)]
        default: Option<String>,
    },
    /// Read from a file such as a mounted token. Trailing newlines are dropped.
    File { file: PathBuf },
}

impl SecretSource {
    pub fn resolve(&self) -> Result<String> {
        match self {
            SecretSource::Inline(value) => Ok(value.clone()),
            SecretSource::Env { env, default } => std::env::var(env)
                .ok()
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(env.clone())),
            SecretSource::File { file } => {
                let content = std::fs::read_to_string(file).map_err(|source| {
                    Error::InvalidConfig(format!(
                        "cannot read password file {}: {}",
                        file.display(),
                        source
                    ))
                })?;
                Ok(content.trim_end_matches(['\r', '\n']).to_string())
            }
        }
    }
}
