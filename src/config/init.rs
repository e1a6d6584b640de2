// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates tagkeep.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# Container runtime (docker or podman). Detected when omitted.
# runtime: docker
# socket: /var/run/docker.sock

# Timeout for calls to the runtime.
timeout: 120s

# Where resource state is kept, relative to this file.
state_dir: .tagkeep/state

# Registry credentials, matched by registry host.
registries: []
#  - server: ghcr.io
#    username: deploy
#    password:
#      env: GHCR_TOKEN
#  - server: quay.io
#    username: robot
#    password:
#      file: /run/secrets/quay-token
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(())
}
