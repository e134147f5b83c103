// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

use std::io::Write;
use std::sync::OnceLock;
use tempfile::{Builder, NamedTempFile};

/// Cached result of the Docker availability check.
#[allow(dead_code)]
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks whether a Docker daemon answers `docker ps`.
///
/// The result is cached after the first call.
#[allow(dead_code)]
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a notice that a test was skipped for lack of Docker.
#[allow(dead_code)]
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\nSKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.\n");
}

/// Writes `content` to a temporary file whose name ends with `suffix`.
#[allow(dead_code)]
pub fn config_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .prefix("treecfg-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Installs a test subscriber so `tracing` output shows up with `--nocapture`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
