//! Integration tests for the stratus CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. Every
//! test points `STRATUS_CONFIG` at a temp file so `~/.stratus` is never read.

mod apply_manifest_command;
mod helpers;
mod service_command;
