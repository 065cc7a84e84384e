//! # Error Types — Structured Violation Taxonomy
//!
//! Every failed entity construction produces exactly one [`ValidationError`].
//! It carries the ordered list of every individual [`Violation`] found in the
//! entity and in all of its nested children.
//!
//! ## Design
//!
//! - Violations stay structured end to end. Text rendering happens only in
//!   the `Display` impls, at the presentation boundary.
//! - Each violation records the entity type that detected it, the path from
//!   the constructed root down to that entity, and the offending field names.
//! - Validator primitives return a [`Rejection`], which knows nothing about
//!   entities. The engine turns it into a [`Violation`] of the right kind.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ─── Violation Kinds ─────────────────────────────────────────────────

/// The four classes of construction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field was absent (or an empty list for a repeated child).
    MissingRequiredField,
    /// A present raw value could not be converted to its declared type,
    /// or had the wrong raw shape.
    ConversionFailure,
    /// A mutual-exclusion group had too many (or, when non-empty is
    /// required, zero) of its fields present.
    ExclusionGroupViolation,
    /// A declared bound or an entity-level semantic validator failed.
    SemanticValidationFailure,
}

impl ViolationKind {
    /// Stable snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::ConversionFailure => "conversion_failure",
            Self::ExclusionGroupViolation => "exclusion_group_violation",
            Self::SemanticValidationFailure => "semantic_validation_failure",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Paths ───────────────────────────────────────────────────────────

/// One step from a parent entity down to a child entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A singular nested field, or the field holding a repeated list.
    Field(&'static str),
    /// Position inside a repeated nested field.
    Index(usize),
}

/// Location of an entity relative to the root of a construction call.
///
/// The root itself has an empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path (the entity being constructed).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this path points at the root entity.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The individual segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Prepend a step, used when a parent absorbs a child's violation.
    pub(crate) fn prepend(&mut self, field: &'static str, index: Option<usize>) {
        match index {
            Some(i) => {
                self.0.insert(0, PathSegment::Index(i));
                self.0.insert(0, PathSegment::Field(field));
            }
            None => self.0.insert(0, PathSegment::Field(field)),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

// ─── Rejection ───────────────────────────────────────────────────────

/// Failure of a single validator primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Name of the field the primitive was applied to.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl Rejection {
    /// Create a rejection for `field`.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Attribute this rejection to `entity` as a violation of `kind`.
    pub fn into_violation(self, kind: ViolationKind, entity: &'static str) -> Violation {
        Violation::new(kind, entity, [self.field], self.reason)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

// ─── Violation ───────────────────────────────────────────────────────

/// A single violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Class of failure.
    pub kind: ViolationKind,
    /// Entity type that detected the violation.
    pub entity: &'static str,
    /// Path from the constructed root to the detecting entity.
    pub path: FieldPath,
    /// Offending field name(s) within the detecting entity.
    pub fields: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Create a violation detected at the root of the current construction.
    pub fn new<I, S>(kind: ViolationKind, entity: &'static str, fields: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            entity,
            path: FieldPath::root(),
            fields: fields.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`ViolationKind::SemanticValidationFailure`] on one field.
    pub fn semantic(entity: &'static str, field: &str, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::SemanticValidationFailure, entity, [field], message)
    }

    /// Whether `field` is one of the offending fields.
    pub fn names_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Re-anchor this violation under a parent's nested field.
    pub(crate) fn nested_under(mut self, field: &'static str, index: Option<usize>) -> Self {
        self.path.prepend(field, index);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root) {}: {}", self.entity, self.message)
        } else {
            write!(f, "  {} {}: {}", self.path, self.entity, self.message)
        }
    }
}

/// Ordered collection of violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over violations of a given kind.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

// ─── Validation Error ────────────────────────────────────────────────

/// The aggregated failure of one construction attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{entity} failed validation with {} violation(s):\n{violations}", .violations.len())]
pub struct ValidationError {
    /// Entity type whose construction was attempted.
    pub entity: &'static str,
    /// Every violation found in the entity and its subtree.
    pub violations: Violations,
}

impl ValidationError {
    /// Wrap a non-empty violation list.
    pub fn new(entity: &'static str, violations: Vec<Violation>) -> Self {
        Self {
            entity,
            violations: violations.into(),
        }
    }

    /// Slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        self.violations.violations()
    }

    /// Number of violations of `kind`.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.of_kind(kind).count()
    }
}
