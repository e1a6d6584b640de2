// ABOUTME: Finds the container runtime socket on the local machine.
// ABOUTME: Honors explicit config and DOCKER_HOST, then probes Podman and Docker sockets.

use super::types::{RuntimeConfig, RuntimeInfo, RuntimeType};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("unsupported DOCKER_HOST (only unix:// sockets are supported): {0}")]
    UnsupportedHost(String),
}

/// Detect the container runtime on the local system.
///
/// Detection order:
/// 1. `runtime` and/or `socket` from configuration
/// 2. `DOCKER_HOST` when it names a unix socket
/// 3. Rootless Podman (`/run/user/$UID/podman/podman.sock`)
/// 4. Rootful Podman, then Docker, at their default sockets
pub fn detect_local(config: Option<&RuntimeConfig>) -> Result<RuntimeInfo, DetectionError> {
    if let Some(cfg) = config {
        match (cfg.runtime, &cfg.socket) {
            (Some(runtime), Some(socket)) => return Ok(RuntimeInfo::at_socket(runtime, socket)),
            (Some(runtime), None) => {
                return Ok(RuntimeInfo::at_socket(runtime, runtime.default_socket()));
            }
            (None, Some(socket)) => {
                return Ok(RuntimeInfo::at_socket(RuntimeType::from_socket(socket), socket));
            }
            (None, None) => {}
        }
    }

    if let Ok(host) = std::env::var("DOCKER_HOST")
        && !host.is_empty()
    {
        let socket = host
            .strip_prefix("unix://")
            .ok_or_else(|| DetectionError::UnsupportedHost(host.clone()))?;
        return Ok(RuntimeInfo::at_socket(RuntimeType::from_socket(socket), socket));
    }

    if let Some(uid) = current_uid() {
        let rootless = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless).exists() {
            return Ok(RuntimeInfo::at_socket(RuntimeType::Podman, rootless));
        }
    }

    [RuntimeType::Podman, RuntimeType::Docker]
        .into_iter()
        .find(|runtime| Path::new(runtime.default_socket()).exists())
        .map(|runtime| RuntimeInfo::at_socket(runtime, runtime.default_socket()))
        .ok_or(DetectionError::NoRuntimeFound)
}

fn current_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        status
            .lines()
            .find(|l| l.starts_with("Uid:"))
            .and_then(|l| l.split_whitespace().nth(1))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_runtime_uses_default_socket() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Podman),
            socket: None,
        };
        let info = detect_local(Some(&config)).unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Podman);
        assert_eq!(info.socket_path, "/run/podman/podman.sock");
    }

    #[test]
    fn explicit_runtime_and_socket_are_taken_as_is() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Docker),
            socket: Some("/tmp/podman-compat.sock".to_string()),
        };
        let info = detect_local(Some(&config)).unwrap();
        assert_eq!(info, RuntimeInfo::at_socket(RuntimeType::Docker, "/tmp/podman-compat.sock"));
    }

    #[test]
    fn explicit_socket_guesses_runtime() {
        let config = RuntimeConfig {
            runtime: None,
            socket: Some("/run/user/1000/podman/podman.sock".to_string()),
        };
        let info = detect_local(Some(&config)).unwrap();
        assert_eq!(info.runtime_type, RuntimeType::Podman);
    }

    #[test]
    fn docker_host_unix_socket() {
        temp_env::with_var("DOCKER_HOST", Some("unix:///tmp/docker.sock"), || {
            let info = detect_local(None).unwrap();
            assert_eq!(info.runtime_type, RuntimeType::Docker);
            assert_eq!(info.socket_path, "/tmp/docker.sock");
        });
    }

    #[test]
    fn docker_host_tcp_is_rejected() {
        temp_env::with_var("DOCKER_HOST", Some("tcp://10.0.0.1:2375"), || {
            assert!(matches!(
                detect_local(None),
                Err(DetectionError::UnsupportedHost(_))
            ));
        });
    }
}
