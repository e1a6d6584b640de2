// ABOUTME: Configuration types and parsing for tagkeep.yml.
// ABOUTME: Runtime override, state directory, timeouts, and registry credentials.

mod init;
mod registry;
mod secret_source;

pub use init::init_config;
pub use registry::{DEFAULT_REGISTRY, RegistryConfig};
pub use secret_source::SecretSource;

use crate::error::{Error, Result};
use crate::runtime::{RegistryAuth, RuntimeConfig, RuntimeType};
use crate::types::TagName;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "tagkeep.yml";
pub const CONFIG_FILENAME_ALT: &str = "tagkeep.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".tagkeep/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub runtime: Option<RuntimeType>,

    #[serde(default)]
    pub socket: Option<String>,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    #[serde(default)]
    pub registries: Vec<RegistryConfig>,
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".tagkeep/state")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            runtime: None,
            socket: None,
            timeout: default_timeout(),
            state_dir: default_state_dir(),
            registries: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                let mut config = Self::load(path)?;
                if config.state_dir.is_relative() {
                    config.state_dir = dir.join(&config.state_dir);
                }
                Ok(config)
            }
            None => Ok(Config {
                state_dir: dir.join(default_state_dir()),
                ..Config::default()
            }),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidConfig("timeout must be positive".to_string()));
        }
        if let Some(r) = self.registries.iter().find(|r| r.server.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "registry entry for user {} has no server",
                r.username
            )));
        }
        Ok(())
    }

    /// Convert to RuntimeConfig for use with detect_local.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            runtime: self.runtime,
            socket: self.socket.clone(),
        }
    }

    /// Credentials for the registry hosting `name`, if configured.
    pub fn auth_for(&self, name: &TagName) -> Result<Option<RegistryAuth>> {
        self.registries
            .iter()
            .find(|r| r.matches(name))
            .map(RegistryConfig::to_auth)
            .transpose()
    }
}
