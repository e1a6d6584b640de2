// ABOUTME: Errors from finding and reaching the local container runtime.
// ABOUTME: Connection failures name the socket so the fix is obvious.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("cannot open {socket}: {source}"))]
    Connect {
        socket: String,
        source: RuntimeInfoError,
    },

    #[snafu(display("no answer from the daemon at {socket}: {source}"))]
    Ping {
        socket: String,
        source: RuntimeInfoError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    NoRuntimeFound,
    /// DOCKER_HOST points somewhere other than a unix socket.
    UnsupportedHost,
    /// The socket could not be opened.
    ConnectionFailed,
    /// The socket opened but the daemon did not respond.
    Unresponsive,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection {
                source: DetectionError::NoRuntimeFound,
            } => RuntimeErrorKind::NoRuntimeFound,
            RuntimeError::Detection {
                source: DetectionError::UnsupportedHost(_),
            } => RuntimeErrorKind::UnsupportedHost,
            RuntimeError::Connect { .. } => RuntimeErrorKind::ConnectionFailed,
            RuntimeError::Ping { .. } => RuntimeErrorKind::Unresponsive,
        }
    }
}
