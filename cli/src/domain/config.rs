//! Domain types and validators for Stratus configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::polling::{self, PollPolicy};

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api.endpoint",
    "api.token",
    "api.skip_ssl_validation",
    "target.user",
    "target.org",
    "target.space",
    "target.space_guid",
    "polling.interval_secs",
    "polling.max_interval_secs",
    "polling.timeout_secs",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.stratus/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StratusConfig {
    /// Remote API connection settings.
    pub api: ApiConfig,
    /// Current user and targeted org/space.
    pub target: TargetConfig,
    /// Job polling settings.
    pub polling: PollingConfig,
}

/// Remote API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub skip_ssl_validation: bool,
}

/// Logged-in user and targeted org/space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TargetConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_guid: Option<String>,
}

/// Job polling settings, in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_secs: u64,
    pub max_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: polling::DEFAULT_INITIAL_INTERVAL.as_secs(),
            max_interval_secs: polling::DEFAULT_MAX_INTERVAL.as_secs(),
            timeout_secs: polling::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl PollingConfig {
    /// Rejects zero intervals and budgets, which a hand-edited file can hold.
    /// Checked when the policy is built so `config set` can still repair them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        for (key, secs) in [
            ("polling.interval_secs", self.interval_secs),
            ("polling.max_interval_secs", self.max_interval_secs),
            ("polling.timeout_secs", self.timeout_secs),
        ] {
            validate_config_value(key, &secs.to_string())?;
        }
        Ok(())
    }

    /// Build the polling policy.
    ///
    /// # Errors
    ///
    /// Returns an error if any setting is zero.
    pub fn policy(&self) -> Result<PollPolicy> {
        self.validate()?;
        Ok(PollPolicy {
            initial_interval: Duration::from_secs(self.interval_secs),
            max_interval: Duration::from_secs(self.max_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |expected: &str| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    };
    match key {
        "api.skip_ssl_validation" => {
            value.parse::<bool>().map_err(|_| invalid("true, false"))?;
        }
        "polling.interval_secs" | "polling.max_interval_secs" | "polling.timeout_secs" => {
            match value.parse::<u64>() {
                Ok(n) if n > 0 => {}
                _ => return Err(invalid("a positive whole number of seconds").into()),
            }
        }
        "api.endpoint" => {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(invalid("an http:// or https:// URL").into());
            }
        }
        _ => {
            if value.trim().is_empty() {
                return Err(invalid("a non-empty value").into());
            }
        }
    }
    Ok(())
}

/// Apply an already-validated key/value pair to `config`.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value does not parse.
pub fn apply_config_value(config: &mut StratusConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    match key {
        "api.endpoint" => config.api.endpoint = Some(value.trim_end_matches('/').to_string()),
        "api.token" => config.api.token = Some(value.to_string()),
        "api.skip_ssl_validation" => config.api.skip_ssl_validation = value.parse()?,
        "target.user" => config.target.user = Some(value.to_string()),
        "target.org" => config.target.org = Some(value.to_string()),
        "target.space" => config.target.space = Some(value.to_string()),
        "target.space_guid" => config.target.space_guid = Some(value.to_string()),
        "polling.interval_secs" => config.polling.interval_secs = value.parse()?,
        "polling.max_interval_secs" => config.polling.max_interval_secs = value.parse()?,
        "polling.timeout_secs" => config.polling.timeout_secs = value.parse()?,
        _ => anyhow::bail!("Unknown setting: {key}"),
    }
    Ok(())
}

/// Mask a secret for display, keeping only its last four characters.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("****{tail}")
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
