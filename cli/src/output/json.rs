//! JSON output helpers.
//!
//! Every `--json` document carries the accumulated warnings, so machine
//! consumers see them on failure as well as on success.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::Warnings;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "...",
///   "warnings": []
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str, warnings: &Warnings) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
        "warnings": warnings,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Format a successful result under `key`, alongside its warnings.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn format_success<T: Serialize>(key: &str, value: &T, warnings: &Warnings) -> Result<String> {
    let mut obj = serde_json::Map::new();
    obj.insert(
        key.to_string(),
        serde_json::to_value(value).context("JSON serialization failed")?,
    );
    obj.insert(
        "warnings".to_string(),
        serde_json::to_value(warnings).context("JSON serialization failed")?,
    );
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
