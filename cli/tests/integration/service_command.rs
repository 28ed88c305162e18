//! Integration tests for `stratus service` preconditions.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::helpers::{ENDPOINT_ONLY, NO_ORG, config_with, stratus};

#[test]
fn test_service_requires_name() {
    stratus().arg("service").assert().code(2);
}

#[test]
fn test_service_help_mentions_guid_flag() {
    stratus()
        .args(["service", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--guid"));
}

#[test]
fn test_service_not_logged_in_fails() {
    let (_dir, path) = config_with(ENDPOINT_ONLY);
    stratus()
        .args(["service", "some-service"])
        .env("STRATUS_CONFIG", &path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED"))
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_service_guid_no_org_targeted_fails() {
    let (_dir, path) = config_with(NO_ORG);
    stratus()
        .args(["service", "some-service", "--guid"])
        .env("STRATUS_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No org targeted"));
}
