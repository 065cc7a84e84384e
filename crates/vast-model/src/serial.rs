//! Helpers shared by the `to_raw` and `Serialize` impls.

use std::time::Duration;

use serde::Serializer;
use vast_core::{format_duration, format_flag, Entity, RawMap};

/// Raw form of a repeated child. An empty list is written as absent.
pub(crate) fn list<T: Entity>(items: &[T]) -> Option<Vec<RawMap>> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().map(Entity::to_raw).collect())
    }
}

/// Raw form of an optional singular child.
pub(crate) fn child<T: Entity>(item: Option<&T>) -> Option<RawMap> {
    item.map(Entity::to_raw)
}

pub(crate) fn number<N: ToString>(value: Option<N>) -> Option<String> {
    value.map(|n| n.to_string())
}

pub(crate) fn flag(value: Option<bool>) -> Option<String> {
    value.map(format_flag)
}

pub(crate) fn duration(value: Duration) -> String {
    format_duration(value.as_secs())
}

/// Serialize a duration as `HH:MM:SS`.
pub(crate) fn hhmmss<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&duration(*value))
}

/// Serialize an optional duration as `HH:MM:SS`.
pub(crate) fn hhmmss_opt<S: Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(d) => serializer.serialize_some(&duration(*d)),
        None => serializer.serialize_none(),
    }
}
