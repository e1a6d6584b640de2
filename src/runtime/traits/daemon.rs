// ABOUTME: Connectivity check and version report for the daemon behind a runtime.
// ABOUTME: Used once per CLI run, before any lifecycle operation.

use async_trait::async_trait;
use std::fmt;

/// What the daemon reports about itself.
#[derive(Debug, Clone)]
pub struct RuntimeMetadata {
    /// "docker" or "podman".
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
}

impl fmt::Display for RuntimeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (API {}, {}/{})",
            self.name, self.version, self.api_version, self.os, self.arch
        )
    }
}

#[async_trait]
pub trait RuntimeInfo: Send + Sync {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError>;

    /// Fails when the socket is unreachable or the daemon does not answer.
    async fn ping(&self) -> Result<(), RuntimeInfoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The socket answered, but with an error status.
    #[error("daemon error: {0}")]
    Runtime(String),
}
