//! # JSON and YAML Front Ends
//!
//! The generic tree may also be supplied directly as JSON or YAML using
//! the same conventions as the XML front end (`@attr`, `#text`, repeated
//! elements as arrays). Scalars of any type become text; `null` is
//! treated as absent.

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use vast_core::{RawMap, RawValue};

use crate::config::AssemblerConfig;
use crate::error::DocumentError;
use crate::format::Format;

/// Parse a JSON document into a raw tree.
pub fn from_json(input: &str, config: &AssemblerConfig) -> Result<RawMap, DocumentError> {
    let value: JsonValue = serde_json::from_str(input)
        .map_err(|e| DocumentError::malformed(Format::Json, e))?;
    match json_to_raw(value, 1, config.max_depth)? {
        Some(RawValue::Map(map)) => Ok(map),
        _ => Err(DocumentError::malformed(Format::Json, "document root must be an object")),
    }
}

/// Parse a YAML document into a raw tree.
pub fn from_yaml(input: &str, config: &AssemblerConfig) -> Result<RawMap, DocumentError> {
    let value: YamlValue = serde_yaml::from_str(input)
        .map_err(|e| DocumentError::malformed(Format::Yaml, e))?;
    match yaml_to_raw(value, 1, config.max_depth)? {
        Some(RawValue::Map(map)) => Ok(map),
        _ => Err(DocumentError::malformed(Format::Yaml, "document root must be a mapping")),
    }
}

fn json_to_raw(value: JsonValue, depth: usize, max_depth: usize) -> Result<Option<RawValue>, DocumentError> {
    if depth > max_depth {
        return Err(DocumentError::DepthExceeded { max_depth });
    }
    Ok(match value {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(RawValue::Text(b.to_string())),
        JsonValue::Number(n) => Some(RawValue::Text(n.to_string())),
        JsonValue::String(s) => Some(RawValue::Text(s)),
        JsonValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.extend(json_to_raw(item, depth + 1, max_depth)?);
            }
            Some(RawValue::List(out))
        }
        JsonValue::Object(entries) => {
            let mut map = RawMap::new();
            for (key, item) in entries {
                if let Some(node) = json_to_raw(item, depth + 1, max_depth)? {
                    map.insert(&key, node);
                }
            }
            Some(RawValue::Map(map))
        }
    })
}

fn yaml_to_raw(value: YamlValue, depth: usize, max_depth: usize) -> Result<Option<RawValue>, DocumentError> {
    if depth > max_depth {
        return Err(DocumentError::DepthExceeded { max_depth });
    }
    Ok(match value {
        YamlValue::Null => None,
        YamlValue::Bool(b) => Some(RawValue::Text(b.to_string())),
        YamlValue::Number(n) => Some(RawValue::Text(n.to_string())),
        YamlValue::String(s) => Some(RawValue::Text(s)),
        YamlValue::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.extend(yaml_to_raw(item, depth + 1, max_depth)?);
            }
            Some(RawValue::List(out))
        }
        YamlValue::Mapping(entries) => {
            let mut map = RawMap::new();
            for (key, item) in entries {
                let key = match key {
                    YamlValue::String(s) => s,
                    YamlValue::Number(n) => n.to_string(),
                    YamlValue::Bool(b) => b.to_string(),
                    other => {
                        return Err(DocumentError::malformed(
                            Format::Yaml,
                            format!("unsupported mapping key: {other:?}"),
                        ))
                    }
                };
                if let Some(node) = yaml_to_raw(item, depth + 1, max_depth)? {
                    map.insert(&key, node);
                }
            }
            Some(RawValue::Map(map))
        }
        YamlValue::Tagged(tagged) => yaml_to_raw(tagged.value, depth, max_depth)?,
    })
}
