//! Input formats understood by the document front ends.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Serialization format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// VAST XML.
    Xml,
    /// The generic tree as JSON (`@attr`, `#text` keys).
    Json,
    /// The generic tree as YAML.
    Yaml,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Format; 3] = [Self::Xml, Self::Json, Self::Yaml];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        match ext.to_ascii_lowercase().as_str() {
            "xml" | "vast" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s) || (s.eq_ignore_ascii_case("yml") && *f == Self::Yaml))
            .ok_or_else(|| DocumentError::UnknownFormat { name: s.to_string() })
    }
}
