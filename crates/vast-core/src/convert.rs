//! # Scalar Conversion
//!
//! Turns one raw node into a typed [`Scalar`] according to a declared
//! [`Target`]. Conversions are pure and never panic. Any failure is a
//! [`Rejection`] naming the field, and the engine records it as a
//! conversion failure.
//!
//! The `format_*` helpers are the inverse used by `Entity::to_raw`.

use crate::error::Rejection;
use crate::primitives::{member_of, type_of};
use crate::raw::{RawKind, RawValue};
use crate::rules::Target;

/// A converted scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// A string.
    Text(String),
    /// An integer, or a duration in whole seconds.
    Integer(i64),
    /// A boolean flag.
    Flag(bool),
    /// A token from a closed vocabulary.
    Token(&'static str),
}

impl Scalar {
    /// Name of the scalar type, used in descriptor-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Integer(_) => "integer",
            Self::Flag(_) => "boolean",
            Self::Token(_) => "token",
        }
    }
}

/// Convert `value` of `field` into `target`.
pub fn convert(target: Target, value: &RawValue, field: &str) -> Result<Scalar, Rejection> {
    type_of(RawKind::Text)(value, field)?;
    let text = value.as_text().unwrap_or_default();

    match target {
        Target::Text => Ok(Scalar::Text(text.to_string())),
        Target::Integer => parse_integer(text, field).map(Scalar::Integer),
        Target::IntegerAtMost(max) => {
            let value = parse_integer(text, field)?;
            if value > max {
                return Err(Rejection::new(
                    field,
                    format!("'{field}' value {value} exceeds the maximum of {max}"),
                ));
            }
            Ok(Scalar::Integer(value))
        }
        Target::Flag => parse_flag(text)
            .map(Scalar::Flag)
            .ok_or_else(|| Rejection::new(field, format!("'{field}' must be a boolean but got {text:?}"))),
        Target::Duration => parse_duration(text).map(Scalar::Integer).ok_or_else(|| {
            Rejection::new(
                field,
                format!("'{field}' must be a duration in HH:MM:SS or HH:MM:SS.mmm format but got {text:?}"),
            )
        }),
        Target::Token(vocab) => {
            let token = text.trim();
            member_of::<str>(vocab.tokens)(token, field)?;
            vocab
                .tokens
                .iter()
                .copied()
                .find(|t| *t == token)
                .map(Scalar::Token)
                .ok_or_else(|| Rejection::new(field, format!("'{field}' is not a known {}", vocab.name)))
        }
    }
}

fn parse_integer(text: &str, field: &str) -> Result<i64, Rejection> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| Rejection::new(field, format!("'{field}' must be an integer but got {text:?}")))
}

/// Parse an XML Schema boolean.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Render a flag in its canonical form.
pub fn format_flag(flag: bool) -> String {
    flag.to_string()
}

/// Parse `HH:MM:SS` or `HH:MM:SS.mmm` into whole seconds.
///
/// Hours may have any number of digits. Minutes and seconds must be
/// below 60. Milliseconds (1-3 digits) are validated and truncated.
pub fn parse_duration(text: &str) -> Option<i64> {
    let mut parts = text.trim().split(':');
    let (hours, minutes, rest) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let (seconds, millis) = match rest.split_once('.') {
        Some((s, ms)) => (s, Some(ms)),
        None => (rest, None),
    };
    if let Some(ms) = millis {
        if ms.is_empty() || ms.len() > 3 || !all_digits(ms) {
            return None;
        }
    }

    let h = parse_component(hours, None)?;
    let m = parse_component(minutes, Some(59))?;
    let s = parse_component(seconds, Some(59))?;
    h.checked_mul(3600)?.checked_add(m * 60 + s)
}

/// Render whole seconds as `HH:MM:SS`.
pub fn format_duration(total_seconds: u64) -> String {
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

fn parse_component(text: &str, max: Option<i64>) -> Option<i64> {
    if text.is_empty() || !all_digits(text) {
        return None;
    }
    let value = text.parse::<i64>().ok()?;
    match max {
        Some(max) if value > max => None,
        _ => Some(value),
    }
}

fn all_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn duration_format_then_parse_is_identity(secs in 0u64..10_000_000) {
            prop_assert_eq!(parse_duration(&format_duration(secs)), Some(secs as i64));
        }

        #[test]
        fn conversion_never_panics(text in "\\PC{0,24}") {
            let value = RawValue::from(text.as_str());
            let _ = convert(Target::Integer, &value, "f");
            let _ = convert(Target::U32, &value, "f");
            let _ = convert(Target::Flag, &value, "f");
            let _ = convert(Target::Duration, &value, "f");
        }
    }
}
