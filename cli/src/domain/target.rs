//! Targeting checks run before any remote operation.

use semver::Version;

use crate::domain::config::TargetConfig;
use crate::domain::error::TargetError;

/// Minimum remote API version for manifest application.
pub const MIN_VERSION_APPLY_MANIFEST: &str = "3.27.0";

/// A fully-resolved target: who is acting, and in which org and space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub user: String,
    pub org: String,
    pub space: String,
    pub space_guid: String,
}

/// Resolve the current target from configuration.
///
/// The user is checked first, then the org, then the space.
///
/// # Errors
///
/// Returns the first missing piece as a `TargetError`.
pub fn resolve_target(cfg: &TargetConfig) -> Result<Target, TargetError> {
    let user = non_empty(cfg.user.as_deref()).ok_or(TargetError::NotLoggedIn)?;
    let org = non_empty(cfg.org.as_deref()).ok_or(TargetError::NoOrganizationTargeted)?;
    let space = non_empty(cfg.space.as_deref()).ok_or(TargetError::NoSpaceTargeted)?;
    let space_guid = non_empty(cfg.space_guid.as_deref()).ok_or(TargetError::NoSpaceTargeted)?;
    Ok(Target {
        user: user.to_string(),
        org: org.to_string(),
        space: space.to_string(),
        space_guid: space_guid.to_string(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check that the remote reports at least `minimum`.
///
/// Versions such as `3.27` are padded to `3.27.0` before comparison.
///
/// # Errors
///
/// Returns `MinimumApiVersionNotMet` when too old, or `InvalidApiVersion`
/// when the reported version does not parse.
pub fn check_minimum_version(current: &str, minimum: &str) -> Result<(), TargetError> {
    let parsed_current =
        parse_lenient(current).ok_or_else(|| TargetError::InvalidApiVersion(current.to_string()))?;
    let parsed_minimum =
        parse_lenient(minimum).ok_or_else(|| TargetError::InvalidApiVersion(minimum.to_string()))?;
    if parsed_current < parsed_minimum {
        return Err(TargetError::MinimumApiVersionNotMet {
            current: current.to_string(),
            minimum: minimum.to_string(),
        });
    }
    Ok(())
}

fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim().trim_start_matches('v');
    if let Ok(v) = Version::parse(trimmed) {
        return Some(v);
    }
    let padded = match trimmed.matches('.').count() {
        0 => format!("{trimmed}.0.0"),
        1 => format!("{trimmed}.0"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}
