// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup and a seeded in-memory runtime for lifecycle tests.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use std::sync::Once;
use tagkeep::runtime::InMemoryRuntime;

static TRACING_INIT: Once = Once::new();

pub const NGINX: &str = "library/nginx";
pub const AAA: &str = "sha256:aaa";
pub const BBB: &str = "sha256:bbb";
pub const CCC: &str = "sha256:ccc";

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("tagkeep=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A runtime whose registry answers `name` with `digest`.
pub fn runtime_with(name: &str, digest: &str) -> InMemoryRuntime {
    init_tracing();
    let runtime = InMemoryRuntime::new();
    runtime.publish(name, digest).unwrap();
    runtime
}

/// The reference the runtime stores for `NGINX` pinned at `digest`.
pub fn pinned(digest: &str) -> String {
    format!("{NGINX}@{digest}")
}
