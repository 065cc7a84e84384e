//! # Raw Field Trees
//!
//! The engine's input: a generic tree of text, string-keyed maps, and lists.
//! It is produced by an external front end (the XML/JSON/YAML readers in
//! `vast-document`, or a test). The engine never reaches outside it.
//!
//! An absent key is "not present". There is no null node.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The raw shape of a node, used by the `type_of` primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    /// A leaf string.
    Text,
    /// A string-keyed map of nested nodes.
    Map,
    /// An ordered sequence of nodes.
    List,
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Map => "map",
            Self::List => "list",
        })
    }
}

/// One node of a raw field tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Leaf text.
    Text(String),
    /// Nested field map.
    Map(RawMap),
    /// Sequence of nodes (usually maps).
    List(Vec<RawValue>),
}

impl RawValue {
    /// The shape of this node.
    pub fn kind(&self) -> RawKind {
        match self {
            Self::Text(_) => RawKind::Text,
            Self::Map(_) => RawKind::Map,
            Self::List(_) => RawKind::List,
        }
    }

    /// Borrow the text if this is a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the map if this is a nested map.
    pub fn as_map(&self) -> Option<&RawMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the items if this is a list.
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this node counts as absent for required-field checks.
    ///
    /// An empty list means "no children".
    pub fn is_vacant(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<RawMap> for RawValue {
    fn from(m: RawMap) -> Self {
        Self::Map(m)
    }
}

impl From<Vec<RawMap>> for RawValue {
    fn from(items: Vec<RawMap>) -> Self {
        Self::List(items.into_iter().map(Self::Map).collect())
    }
}

/// A string-keyed map of raw nodes.
///
/// Keys are kept sorted so that rendering and iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawMap(BTreeMap<String, RawValue>);

impl RawMap {
    /// An empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    pub fn with_opt<V: Into<RawValue>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.insert(key, v);
        }
        self
    }

    /// Insert or replace `key`.
    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Remove `key`, returning its node.
    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.0.remove(key)
    }

    /// Look up `key`.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    /// Look up `key` as text.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(RawValue::as_text)
    }

    /// Whether `key` is present (an empty list counts as absent).
    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_vacant())
    }

    /// Iterate over the keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for RawMap {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
