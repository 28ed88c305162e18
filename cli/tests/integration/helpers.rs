//! Shared helpers for binary-level tests.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use tempfile::TempDir;

pub fn stratus() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stratus"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("STRATUS_LOG");
    cmd
}

/// A temp directory holding `config.yaml` with the given contents.
pub fn config_with(contents: &str) -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path.to_string_lossy().into_owned())
}

/// A temp directory and a config path inside it that does not exist yet.
pub fn empty_config() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

/// Endpoint configured, but nobody logged in.
pub const ENDPOINT_ONLY: &str = "api:\n  endpoint: http://127.0.0.1:9\n";

/// Logged in, no org targeted.
pub const NO_ORG: &str = "api:\n  endpoint: http://127.0.0.1:9\ntarget:\n  user: some-user\n";
