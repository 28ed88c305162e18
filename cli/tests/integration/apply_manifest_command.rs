//! Integration tests for `stratus apply-manifest` preconditions.
//!
//! The configured endpoint points at a closed local port, so the API version
//! check fails before targeting is looked at.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::helpers::{ENDPOINT_ONLY, config_with, empty_config, stratus};

#[test]
fn test_apply_manifest_requires_path_flag() {
    stratus()
        .arg("apply-manifest")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--path"));
}

#[test]
fn test_apply_manifest_without_endpoint_fails() {
    let (_dir, path) = empty_config();
    stratus()
        .args(["apply-manifest", "-f", "manifest.yml"])
        .env("STRATUS_CONFIG", &path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("EXPERIMENTAL"))
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("No API endpoint set"));
}

#[test]
fn test_apply_manifest_unreachable_api_fails_before_targeting() {
    let (_dir, path) = config_with(ENDPOINT_ONLY);
    stratus()
        .args(["apply-manifest", "-f", "manifest.yml"])
        .env("STRATUS_CONFIG", &path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("EXPERIMENTAL"))
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("Request error"))
        .stderr(predicate::str::contains("Not logged in").not());
}

#[test]
fn test_apply_manifest_json_error_carries_code() {
    let (_dir, path) = config_with(ENDPOINT_ONLY);
    let output = stratus()
        .args(["apply-manifest", "-f", "manifest.yml", "--json"])
        .env("STRATUS_CONFIG", &path)
        .output()
        .expect("run stratus");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "transport");
    assert_eq!(v["warnings"], serde_json::json!([]));
}
