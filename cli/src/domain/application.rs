//! Application and asynchronous job types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A remote application resolved by name within a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRef {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
}

/// Opaque locator of an asynchronous job, as returned by a submit call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobUrl(String);

impl JobUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// State of a remote job as reported by a single status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Processing,
    Succeeded,
    /// Terminal failure; the reason is the remote's own message.
    Failed(String),
}
