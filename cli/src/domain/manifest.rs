//! Declarative application manifest, as handed over by the manifest loader.
//!
//! The core only ever reads the first entry's `name`; every other attribute
//! is carried through untouched so the document can be resubmitted as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::ApiError;

/// An already-parsed, already-merged manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
    #[serde(default)]
    pub applications: Vec<ManifestApplication>,
    /// Top-level keys other than `applications`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// One application entry in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestApplication {
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_yaml::Value>,
}

impl ManifestDocument {
    /// Name of the first application entry.
    ///
    /// Additional entries are ignored here; rejecting multi-application
    /// documents is the loader's call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the document has no entries or the
    /// first entry has an empty name.
    pub fn first_application_name(&self) -> Result<&str, ApiError> {
        let first = self.applications.first().ok_or_else(|| {
            ApiError::Validation("manifest does not contain any applications".to_string())
        })?;
        if first.name.trim().is_empty() {
            return Err(ApiError::Validation(
                "first application in manifest has no name".to_string(),
            ));
        }
        Ok(&first.name)
    }
}
