//! Command implementations

pub mod apply_manifest;
pub mod config;
pub mod service;
pub mod version;

use std::fmt::Display;
use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::{ApiError, ConfigError, TargetError, Warnings};
use crate::output::json;

/// Stable machine code for an error surfaced by a command.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        api.code()
    } else if err.downcast_ref::<TargetError>().is_some() {
        "target"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else {
        "error"
    }
}

/// Report a failed command along with the warnings gathered before it failed.
///
/// Human mode prints the warnings, then `FAILED` and the message. JSON mode
/// prints a single error object carrying both.
pub(crate) fn fail(
    app: &AppContext,
    err: &impl Display,
    code: &str,
    warnings: &Warnings,
) -> Result<ExitCode> {
    if app.is_json() {
        println!("{}", json::format_error(&err.to_string(), code, warnings)?);
    } else {
        app.output.warnings(warnings);
        app.output.failed(&err.to_string());
    }
    Ok(ExitCode::FAILURE)
}

/// [`fail`] for errors raised before any remote step ran.
pub(crate) fn fail_setup(app: &AppContext, err: &anyhow::Error) -> Result<ExitCode> {
    fail(app, &format!("{err:#}"), error_code(err), &Warnings::new())
}
