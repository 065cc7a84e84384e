//! # vast-core — Declarative Entity Construction
//!
//! The validation engine behind the VAST object model. An entity type
//! declares what it expects from a raw field map (required keys, scalar
//! conversions, nested children, exclusion groups, numeric bounds,
//! defaults) and the engine turns a raw map into either a fully validated
//! value or one [`ValidationError`] that enumerates every violation in the
//! subtree.
//!
//! ## Key Design Principles
//!
//! 1. **One checkpoint.** [`Entity::from_raw`] is the only way to obtain an
//!    entity. Entities have private fields and no `Deserialize` impl.
//!
//! 2. **Typed descriptors.** [`FieldRules`] is a `const` value keyed by the
//!    entity's own [`FieldKey`] enum, so a descriptor cannot name a field the
//!    entity does not have.
//!
//! 3. **Collect, don't stop.** Presence, conversion, nesting and exclusion
//!    checks all run and all report. Semantic checks run once those pass.
//!
//! 4. **Structured paths.** Every [`Violation`] carries the [`FieldPath`]
//!    from the top-level entity down to the offending node.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vast-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Construction is deterministic: the same raw map always yields the
//!   same entity or the same violation list.

pub mod convert;
pub mod engine;
pub mod entity;
pub mod error;
pub mod fields;
pub mod primitives;
pub mod raw;
pub mod rules;
pub mod vocabulary;

// Re-export primary types for ergonomic imports.
pub use convert::{format_duration, format_flag, parse_duration, parse_flag, Scalar};
pub use engine::construct;
pub use entity::{Entity, SemanticValidator};
pub use error::{FieldPath, PathSegment, Rejection, ValidationError, Violation, ViolationKind, Violations};
pub use fields::Fields;
pub use raw::{RawKind, RawMap, RawValue};
pub use rules::{Bound, Converter, ExclusionGroup, FieldKey, FieldRules, Nested, Target, Vocab};
pub use vocabulary::Vocabulary;
