//! # Entity Contract
//!
//! Every type in the object graph implements [`Entity`]: a name, a
//! [`FieldRules`] descriptor, an `assemble` step that reads typed values
//! out of [`Fields`], optional semantic validators, and `to_raw` for
//! re-serialization.
//!
//! [`Entity::from_raw`] is the single integrity checkpoint. Implementors
//! keep their fields private and do not implement `Deserialize`, so there
//! is no other way to obtain a value.

use crate::error::{ValidationError, Violation};
use crate::fields::Fields;
use crate::raw::RawMap;
use crate::rules::{FieldKey, FieldRules};

/// A semantic validator over a fully assembled candidate.
pub type SemanticValidator<T> = fn(&T) -> Vec<Violation>;

/// An immutable, validated node of the object graph.
pub trait Entity: Sized + Send + Sync + 'static {
    /// The entity's field-key enum.
    type Field: FieldKey;

    /// Entity type name, used in violations.
    const NAME: &'static str;

    /// Declarative construction rules.
    const RULES: FieldRules<Self::Field>;

    /// Validators run on the assembled candidate, in order. All run.
    const VALIDATORS: &'static [SemanticValidator<Self>] = &[];

    /// Build the candidate from converted slots.
    ///
    /// Called only after presence, conversion, nesting, exclusion and
    /// bound checks all passed, so required accessors always succeed for
    /// a consistent descriptor.
    fn assemble(fields: &mut Fields<Self::Field>) -> Result<Self, Violation>;

    /// Re-serialize into the raw shape accepted by [`Entity::from_raw`].
    fn to_raw(&self) -> RawMap;

    /// The factory: validate `raw` and build the entity.
    fn from_raw(raw: &RawMap) -> Result<Self, ValidationError> {
        crate::engine::construct::<Self>(raw)
    }
}
