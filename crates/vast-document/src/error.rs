//! # Document Errors
//!
//! Everything that can go wrong between input text and a validated
//! [`vast_model::Vast`]. Markup and root problems are reported before
//! any entity is built; entity problems arrive as one aggregated
//! [`ValidationError`].

use thiserror::Error;
use vast_core::ValidationError;

use crate::format::Format;

/// Error turning a document into a validated VAST object graph.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input is not well-formed in its declared format.
    #[error("malformed {format} document: {reason}")]
    Malformed {
        /// Input format being read.
        format: Format,
        /// Parser message, including the position where available.
        reason: String,
    },

    /// The document root is not a `VAST` element.
    #[error("root must be a VAST element but found {found:?}")]
    NoVastRoot {
        /// Names of the top-level elements actually present.
        found: Vec<String>,
    },

    /// The `VAST` element has no child elements.
    #[error("VAST element must have child elements")]
    EmptyRoot,

    /// The `VAST` element has no (or an empty) `version` attribute.
    #[error("VAST element is missing its version attribute")]
    MissingVersion,

    /// No assembler is registered for the declared version.
    #[error("cannot parse VAST version {version:?} (supported: {})", .supported.join(", "))]
    UnsupportedVersion {
        /// Declared document version.
        version: String,
        /// Versions this build can assemble.
        supported: Vec<&'static str>,
    },

    /// Nesting is deeper than `AssemblerConfig::max_depth`.
    #[error("document nesting exceeds the configured maximum depth of {max_depth}")]
    DepthExceeded {
        /// Configured limit.
        max_depth: usize,
    },

    /// The format name is not one of `xml`, `json`, `yaml`.
    #[error("unknown document format '{name}'")]
    UnknownFormat {
        /// Name as given.
        name: String,
    },

    /// The assembler configuration could not be loaded.
    #[error("config load error for '{path}': {reason}")]
    Config {
        /// Path of the configuration file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// The document was well-formed but the object graph is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl DocumentError {
    /// The aggregated entity violations, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn malformed(format: Format, reason: impl std::fmt::Display) -> Self {
        Self::Malformed {
            format,
            reason: reason.to_string(),
        }
    }
}
