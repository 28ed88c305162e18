//! Infrastructure implementation of the `ManifestSource` port.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ManifestSource;
use crate::domain::ManifestDocument;

/// Reads a single YAML manifest file from disk.
pub struct YamlManifestReader;

impl ManifestSource for YamlManifestReader {
    fn load(&self, path: &Path) -> Result<ManifestDocument> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read manifest {}", path.display()))?;
        parse_manifest(&content).with_context(|| format!("cannot parse manifest {}", path.display()))
    }
}

/// Parse manifest YAML text.
///
/// # Errors
///
/// Returns an error if the text is not valid YAML or `applications` is
/// malformed. A document without `applications` parses as empty.
pub fn parse_manifest(content: &str) -> Result<ManifestDocument> {
    if content.trim().is_empty() {
        return Ok(ManifestDocument::default());
    }
    Ok(serde_yaml::from_str(content)?)
}
