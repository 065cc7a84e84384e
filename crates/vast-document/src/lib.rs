//! # vast-document — Document Front Ends
//!
//! Turns VAST documents into validated [`vast_model::Vast`] object graphs:
//!
//! ```text
//! XML ──quick-xml──┐
//! JSON ─serde_json─┼─> element tree ──assembler──> field tree ──Vast::from_raw──> Vast
//! YAML ─serde_yaml─┘
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Front ends only reshape.** Markup is read into the generic raw
//!    tree and renamed onto entity fields. Every content check lives in
//!    the entity descriptors, so all front ends report identical
//!    violations for identical content.
//!
//! 2. **Version dispatch.** The root `version` attribute selects an
//!    assembler from a fixed table. Unknown versions fail before any
//!    entity is built.
//!
//! ## Crate Policy
//!
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Malformed or hostile input is an error, never a crash. Nesting depth
//!   is bounded by [`AssemblerConfig::max_depth`].

pub mod assembler;
pub mod config;
pub mod error;
pub mod format;
pub mod markup;
pub mod tree;

use vast_core::{Entity, RawMap, RawValue};
use vast_model::Vast;

// Re-export primary types for ergonomic imports.
pub use config::AssemblerConfig;
pub use error::DocumentError;
pub use format::Format;
pub use markup::parse_xml;
pub use tree::{from_json, from_yaml};

/// Assembles the field tree for one document version.
type AssembleFn = fn(&RawMap) -> Result<RawMap, DocumentError>;

const ASSEMBLERS: &[(&str, AssembleFn)] = &[(vast_model::VAST_VERSION, assembler::assemble)];

/// VAST versions this build can read.
pub fn supported_versions() -> Vec<&'static str> {
    ASSEMBLERS.iter().map(|(version, _)| *version).collect()
}

/// Read `input` as `format` into the element-shaped raw tree.
pub fn read_tree(input: &str, format: Format, config: &AssemblerConfig) -> Result<RawMap, DocumentError> {
    match format {
        Format::Xml => markup::parse_xml(input, config),
        Format::Json => tree::from_json(input, config),
        Format::Yaml => tree::from_yaml(input, config),
    }
}

/// Locate the `VAST` element, dispatch on its version, and assemble the
/// field tree accepted by [`Vast::from_raw`].
pub fn assemble_tree(tree: &RawMap, config: &AssemblerConfig) -> Result<RawMap, DocumentError> {
    let root = find_root(tree, config)?;
    let element = match root {
        RawValue::Map(element) => element,
        _ => return Err(DocumentError::EmptyRoot),
    };

    let version = element
        .text("@version")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(DocumentError::MissingVersion)?;

    let (_, assemble) = ASSEMBLERS
        .iter()
        .find(|(supported, _)| *supported == version)
        .ok_or_else(|| DocumentError::UnsupportedVersion {
            version: version.to_string(),
            supported: supported_versions(),
        })?;

    tracing::debug!(version, "assembling VAST document");
    assemble(element)
}

/// Parse, assemble, and validate a complete document.
pub fn parse_document(input: &str, format: Format, config: &AssemblerConfig) -> Result<Vast, DocumentError> {
    let tree = read_tree(input, format, config)?;
    let fields = assemble_tree(&tree, config)?;
    let vast = Vast::from_raw(&fields)?;
    tracing::debug!(
        format = %format,
        ad = vast.ad().id(),
        kind = %vast.ad().kind(),
        "document validated"
    );
    Ok(vast)
}

fn find_root<'a>(tree: &'a RawMap, config: &AssemblerConfig) -> Result<&'a RawValue, DocumentError> {
    if let Some(root) = tree.get("VAST") {
        return Ok(root);
    }
    let found: Vec<String> = tree.keys().map(str::to_string).collect();
    match (config.strict_root, tree.iter().next()) {
        (false, Some((name, root))) if tree.len() == 1 => {
            tracing::warn!(root = name, "accepting non-VAST root element");
            Ok(root)
        }
        _ => Err(DocumentError::NoVastRoot { found }),
    }
}
