//! # Assembler Configuration
//!
//! Limits and switches for the document front ends. Every field has a
//! default, so an empty YAML file (or no file) yields
//! [`AssemblerConfig::default`].
//!
//! ```yaml
//! max_depth: 64
//! trim_text: true
//! strict_root: true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssemblerConfig {
    /// Maximum element (or JSON/YAML container) nesting depth.
    pub max_depth: usize,
    /// Trim leading and trailing whitespace from XML text content.
    pub trim_text: bool,
    /// Require the root element to be named `VAST`. When off, a document
    /// with a single root element of any name is accepted.
    pub strict_root: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_depth: 64,
            trim_text: true,
            strict_root: true,
        }
    }
}

impl AssemblerConfig {
    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocumentError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| DocumentError::Config {
            path: "<inline>".to_string(),
            reason: format!("invalid YAML: {e}"),
        })
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Config {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            DocumentError::Config { reason, .. } => DocumentError::Config {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }
}
