// ABOUTME: Registry credential entries from tagkeep.yml.
// ABOUTME: Matches a tag name to the credentials for its registry host.

use serde::Deserialize;

use crate::error::Result;
use crate::runtime::RegistryAuth;
use crate::types::TagName;

use super::SecretSource;

/// Registry host Docker assumes when a name has none.
pub const DEFAULT_REGISTRY: &str = "docker.io";

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub server: String,
    pub username: String,
    pub password: SecretSource,
}

impl RegistryConfig {
    pub fn matches(&self, name: &TagName) -> bool {
        let host = name.reference().registry().unwrap_or(DEFAULT_REGISTRY);
        let server = self
            .server
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        server == host || (host == DEFAULT_REGISTRY && server == "index.docker.io")
    }

    pub fn to_auth(&self) -> Result<RegistryAuth> {
        Ok(RegistryAuth {
            username: self.username.clone(),
            password: self.password.resolve()?,
            server: Some(self.server.clone()),
        })
    }
}
