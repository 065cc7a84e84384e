//! # Converted Field Slots
//!
//! [`Fields`] holds the converted scalars and the constructed children of
//! one entity between conversion and assembly. An entity's `assemble`
//! takes typed values out of it. Absence and descriptor mismatches come
//! back as violations, never as panics.

use std::any::Any;
use std::collections::HashMap;
use std::time::Duration;

use crate::convert::Scalar;
use crate::entity::Entity;
use crate::error::{Violation, ViolationKind};
use crate::primitives::{at_least, greater_than};
use crate::rules::{Bound, FieldKey};
use crate::vocabulary::Vocabulary;

/// Converted scalars and built children of one entity under construction.
pub struct Fields<F: FieldKey> {
    entity: &'static str,
    scalars: HashMap<F, Scalar>,
    children: HashMap<F, Box<dyn Any + Send>>,
}

impl<F: FieldKey> Fields<F> {
    pub(crate) fn new(entity: &'static str) -> Self {
        Self {
            entity,
            scalars: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub(crate) fn set_scalar(&mut self, key: F, value: Scalar) {
        self.scalars.insert(key, value);
    }

    pub(crate) fn set_child(&mut self, key: F, child: Box<dyn Any + Send>) {
        self.children.insert(key, child);
    }

    /// Whether `key` holds a converted scalar or a built child.
    pub fn has(&self, key: F) -> bool {
        self.scalars.contains_key(&key) || self.children.contains_key(&key)
    }

    pub(crate) fn apply_defaults(&mut self, defaults: &[(F, bool)]) {
        for (key, default) in defaults {
            self.scalars.entry(*key).or_insert(Scalar::Flag(*default));
        }
    }

    pub(crate) fn check_bound(&self, bound: &Bound<F>) -> Result<(), Violation> {
        let name = bound.field.as_str();
        let value = match self.scalars.get(&bound.field) {
            Some(Scalar::Integer(v)) => *v,
            Some(other) => {
                tracing::warn!(
                    entity = self.entity,
                    field = name,
                    scalar = other.type_name(),
                    "bound declared on a non-numeric field"
                );
                return Err(self.mismatch(bound.field, "integer", other));
            }
            None if bound.allow_absent => return Ok(()),
            None => {
                return Err(Violation::semantic(
                    self.entity,
                    name,
                    format!("'{name}' must be present"),
                ))
            }
        };

        let outcome = if bound.inclusive {
            at_least(bound.floor)(&value, name)
        } else {
            greater_than(bound.floor)(&value, name)
        };
        outcome.map_err(|r| r.into_violation(ViolationKind::SemanticValidationFailure, self.entity))
    }

    // ─── Scalars ─────────────────────────────────────────────────────

    /// Take an optional text field.
    pub fn text(&mut self, key: F) -> Result<Option<String>, Violation> {
        match self.scalars.remove(&key) {
            None => Ok(None),
            Some(Scalar::Text(s)) => Ok(Some(s)),
            Some(other) => Err(self.mismatch(key, "text", &other)),
        }
    }

    /// Take a required text field.
    pub fn require_text(&mut self, key: F) -> Result<String, Violation> {
        self.text(key)?.ok_or_else(|| self.missing(key))
    }

    /// Take an optional integer field, narrowed to `N`.
    pub fn integer<N: TryFrom<i64>>(&mut self, key: F) -> Result<Option<N>, Violation> {
        match self.scalars.remove(&key) {
            None => Ok(None),
            Some(Scalar::Integer(v)) => N::try_from(v).map(Some).map_err(|_| {
                let name = key.as_str();
                Violation::new(
                    ViolationKind::ConversionFailure,
                    self.entity,
                    [name],
                    format!("'{name}' value {v} is out of range"),
                )
            }),
            Some(other) => Err(self.mismatch(key, "integer", &other)),
        }
    }

    /// Take a required integer field, narrowed to `N`.
    pub fn require_integer<N: TryFrom<i64>>(&mut self, key: F) -> Result<N, Violation> {
        self.integer(key)?.ok_or_else(|| self.missing(key))
    }

    /// Take an optional duration field.
    pub fn duration(&mut self, key: F) -> Result<Option<Duration>, Violation> {
        Ok(self.integer::<u64>(key)?.map(Duration::from_secs))
    }

    /// Take a required duration field.
    pub fn require_duration(&mut self, key: F) -> Result<Duration, Violation> {
        self.duration(key)?.ok_or_else(|| self.missing(key))
    }

    /// Take an optional flag.
    pub fn flag(&mut self, key: F) -> Result<Option<bool>, Violation> {
        match self.scalars.remove(&key) {
            None => Ok(None),
            Some(Scalar::Flag(b)) => Ok(Some(b)),
            Some(other) => Err(self.mismatch(key, "boolean", &other)),
        }
    }

    /// Take a flag that is required or carries a declared default.
    pub fn require_flag(&mut self, key: F) -> Result<bool, Violation> {
        self.flag(key)?.ok_or_else(|| self.missing(key))
    }

    /// Take an optional vocabulary token.
    pub fn token<V: Vocabulary>(&mut self, key: F) -> Result<Option<V>, Violation> {
        match self.scalars.remove(&key) {
            None => Ok(None),
            Some(Scalar::Token(t)) => V::from_token(t)
                .map(Some)
                .ok_or_else(|| self.mismatch(key, V::NAME, &Scalar::Token(t))),
            Some(other) => Err(self.mismatch(key, V::NAME, &other)),
        }
    }

    /// Take a required vocabulary token.
    pub fn require_token<V: Vocabulary>(&mut self, key: F) -> Result<V, Violation> {
        self.token(key)?.ok_or_else(|| self.missing(key))
    }

    // ─── Children ────────────────────────────────────────────────────

    /// Take an optional singular child.
    pub fn child<T: Entity>(&mut self, key: F) -> Result<Option<T>, Violation> {
        match self.children.remove(&key) {
            None => Ok(None),
            Some(boxed) => boxed
                .downcast::<T>()
                .map(|child| Some(*child))
                .map_err(|_| self.child_mismatch(key, T::NAME)),
        }
    }

    /// Take a required singular child.
    pub fn require_child<T: Entity>(&mut self, key: F) -> Result<T, Violation> {
        self.child(key)?.ok_or_else(|| self.missing(key))
    }

    /// Take a repeated child list. Absent means empty.
    pub fn children<T: Entity>(&mut self, key: F) -> Result<Vec<T>, Violation> {
        match self.children.remove(&key) {
            None => Ok(Vec::new()),
            Some(boxed) => boxed
                .downcast::<Vec<T>>()
                .map(|items| *items)
                .map_err(|_| self.child_mismatch(key, T::NAME)),
        }
    }

    /// Take a repeated child list that must not be empty.
    pub fn require_children<T: Entity>(&mut self, key: F) -> Result<Vec<T>, Violation> {
        let items = self.children::<T>(key)?;
        if items.is_empty() {
            Err(self.missing(key))
        } else {
            Ok(items)
        }
    }

    // ─── Violations ──────────────────────────────────────────────────

    fn missing(&self, key: F) -> Violation {
        let name = key.as_str();
        Violation::new(
            ViolationKind::MissingRequiredField,
            self.entity,
            [name],
            format!("missing required field '{name}'"),
        )
    }

    fn mismatch(&self, key: F, expected: &str, actual: &Scalar) -> Violation {
        let name = key.as_str();
        Violation::new(
            ViolationKind::ConversionFailure,
            self.entity,
            [name],
            format!("'{name}' was read as {expected} but converted as {}", actual.type_name()),
        )
    }

    fn child_mismatch(&self, key: F, expected: &'static str) -> Violation {
        let name = key.as_str();
        Violation::new(
            ViolationKind::ConversionFailure,
            self.entity,
            [name],
            format!("'{name}' was read as {expected} but built as a different entity"),
        )
    }
}
