// ABOUTME: Which daemon tagkeep talks to and over which socket.
// ABOUTME: RuntimeType knows its default socket; RuntimeConfig carries tagkeep.yml overrides.

use serde::{Deserialize, Serialize};

const ROOTFUL_PODMAN_SOCKET: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl RuntimeType {
    /// System-wide socket the daemon listens on by default.
    pub fn default_socket(self) -> &'static str {
        match self {
            RuntimeType::Docker => DOCKER_SOCKET,
            RuntimeType::Podman => ROOTFUL_PODMAN_SOCKET,
        }
    }

    /// Best guess from a socket path. Podman sockets carry the name.
    pub fn from_socket(path: &str) -> Self {
        if path.contains("podman") {
            RuntimeType::Podman
        } else {
            RuntimeType::Docker
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        })
    }
}

/// A runtime found on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeInfo {
    pub runtime_type: RuntimeType,
    pub socket_path: String,
}

impl RuntimeInfo {
    pub fn at_socket(runtime_type: RuntimeType, socket_path: impl Into<String>) -> Self {
        Self {
            runtime_type,
            socket_path: socket_path.into(),
        }
    }
}

/// `runtime` and `socket` from tagkeep.yml. Either one skips detection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeConfig {
    pub runtime: Option<RuntimeType>,
    pub socket: Option<String>,
}
