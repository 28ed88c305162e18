//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::time::Duration;

use thiserror::Error;

// ── Remote API errors ─────────────────────────────────────────────────────────

/// Errors reported by (or on behalf of) the remote platform API.
///
/// `NotApplicable` is not a failure in aggregation contexts: it marks a
/// sub-resource the queried entity kind does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{kind} {name} not found")]
    NotFound { kind: String, name: String },

    #[error("The request is invalid: {0}")]
    Validation(String),

    #[error("You are not authorized to perform the requested action: {0}")]
    Forbidden(String),

    #[error("{reason}")]
    RemoteJobFailed { reason: String },

    #[error("Timed out after {}s waiting for job {job_url} to complete", waited.as_secs())]
    JobTimeout { job_url: String, waited: Duration },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Not applicable for this entity")]
    NotApplicable,

    #[error("Request error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Shorthand for a `NotFound` of the given kind.
    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Forbidden(_) => "forbidden",
            Self::RemoteJobFailed { .. } => "remote_job_failed",
            Self::JobTimeout { .. } => "job_timeout",
            Self::Cancelled => "cancelled",
            Self::NotApplicable => "not_applicable",
            Self::Transport(_) => "transport",
        }
    }
}

// ── Targeting errors ──────────────────────────────────────────────────────────

/// Errors raised before any remote operation when the CLI is not set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("No API endpoint set. Use 'stratus config set api.endpoint <url>' to set an endpoint.")]
    NoApiEndpoint,

    #[error("Not logged in. Use 'stratus config set target.user <name>' and 'api.token' to log in.")]
    NotLoggedIn,

    #[error("No org targeted, use 'stratus config set target.org <org>' to target an org.")]
    NoOrganizationTargeted,

    #[error(
        "No space targeted, use 'stratus config set target.space <space>' and 'target.space_guid <guid>' to target a space."
    )]
    NoSpaceTargeted,

    #[error(
        "This command requires API version {minimum} or higher. Your target is {current}."
    )]
    MinimumApiVersionNotMet { current: String, minimum: String },

    #[error("Unable to parse API version '{0}'")]
    InvalidApiVersion(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
