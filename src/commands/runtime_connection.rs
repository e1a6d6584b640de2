// ABOUTME: Opens the local container runtime for the tag and secret commands.
// ABOUTME: Detects the socket, connects through bollard, and checks the daemon answers.

use snafu::ResultExt;

use crate::config::Config;
use crate::error::Result;
use crate::output::Output;
use crate::runtime::{
    BollardRuntime, ConnectSnafu, DetectionSnafu, PingSnafu, RuntimeInfoTrait, detect_local,
};

/// Connect to the container runtime on this machine.
pub async fn connect_local(config: &Config, output: &Output) -> Result<BollardRuntime> {
    let info = detect_local(Some(&config.runtime_config())).context(DetectionSnafu)?;
    output.progress(&format!(
        "  → Using {} at {}",
        info.runtime_type, info.socket_path
    ));

    let socket = info.socket_path.as_str();
    let runtime = BollardRuntime::connect(&info, config.timeout.as_secs())
        .context(ConnectSnafu { socket })?;
    runtime.ping().await.context(PingSnafu { socket })?;

    // Informational only
    match runtime.info().await {
        Ok(meta) => output.progress(&format!("  → Connected to {meta}")),
        Err(e) => tracing::debug!(error = %e, "runtime info unavailable"),
    }

    Ok(runtime)
}
