//! # Field-Rule Descriptors
//!
//! Static, declarative descriptions of what an entity type expects from its
//! raw field map. A descriptor is a `const` value typed by the entity's own
//! field-key enum, so a misspelled or foreign field name does not compile.
//!
//! A descriptor declares:
//!
//! - `required`: keys whose absence is always a violation.
//! - `converters`: target types for scalar keys.
//! - `nested`: child entity types for nested keys, singular or repeated.
//! - `exclusions`: "at most k of" groups over optional keys.
//! - `bounds`: numeric lower bounds, inclusive or exclusive per field.
//! - `defaults`: boolean defaults for absent flags.
//!
//! Entity-level semantic validators live on the entity itself
//! (`Entity::VALIDATORS`) because they need the typed candidate.

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use crate::entity::Entity;
use crate::error::Violation;
use crate::raw::RawValue;
use crate::vocabulary::Vocabulary;

/// Per-entity field-key enum. Each variant maps to its raw map key.
pub trait FieldKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// The raw map key for this field.
    fn as_str(&self) -> &'static str;

    /// Every field of the entity.
    fn all() -> &'static [Self];
}

/// Declare a field-key enum and its [`FieldKey`] impl.
///
/// ```ignore
/// field_keys! {
///     /// Raw keys of a tracking event.
///     pub enum TrackingEventField {
///         Uri => "uri",
///         Event => "event",
///     }
/// }
/// ```
#[macro_export]
macro_rules! field_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( #[doc = concat!("Raw key `", $key, "`.")] $variant ),+
        }

        impl $crate::rules::FieldKey for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $key ),+
                }
            }

            fn all() -> &'static [Self] {
                &[ $( Self::$variant ),+ ]
            }
        }
    };
}

// ─── Converters ──────────────────────────────────────────────────────

/// A closed vocabulary, erased to its name and token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocab {
    /// Name of the value set.
    pub name: &'static str,
    /// Accepted tokens.
    pub tokens: &'static [&'static str],
}

/// The type a raw text value is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Kept as a string.
    Text,
    /// Signed decimal integer.
    Integer,
    /// Signed decimal integer no greater than the given maximum, the
    /// storage limit of the typed field it fills.
    IntegerAtMost(i64),
    /// `true` / `false` / `1` / `0`.
    Flag,
    /// `HH:MM:SS` or `HH:MM:SS.mmm`, stored as whole seconds.
    Duration,
    /// A token from a closed vocabulary.
    Token(Vocab),
}

impl Target {
    /// An integer stored as `u32`. Values below zero still convert, so
    /// that declared bounds report them.
    pub const U32: Self = Self::IntegerAtMost(u32::MAX as i64);

    /// Conversion into the vocabulary `V`.
    pub const fn token<V: Vocabulary>() -> Self {
        Self::Token(Vocab {
            name: V::NAME,
            tokens: V::TOKENS,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Integer | Self::IntegerAtMost(_) => f.write_str("integer"),
            Self::Flag => f.write_str("boolean"),
            Self::Duration => f.write_str("duration"),
            Self::Token(vocab) => write!(f, "{}", vocab.name),
        }
    }
}

/// Converts every listed field into `target`.
#[derive(Debug, Clone, Copy)]
pub struct Converter<F: 'static> {
    /// Target type.
    pub target: Target,
    /// Fields the conversion applies to.
    pub fields: &'static [F],
}

impl<F> Converter<F> {
    /// Declare a converter.
    pub const fn new(target: Target, fields: &'static [F]) -> Self {
        Self { target, fields }
    }
}

// ─── Nested Entities ─────────────────────────────────────────────────

/// Type-erased child construction: `(raw, parent entity, field key)`.
///
/// On success the box holds either `T` (singular) or `Vec<T>` (repeated).
/// On failure every violation is already anchored under the field key.
pub type ChildBuilder =
    fn(&RawValue, &'static str, &'static str) -> Result<Box<dyn Any + Send>, Vec<Violation>>;

/// A nested child entity under one field.
#[derive(Clone, Copy)]
pub struct Nested<F> {
    /// Field holding the child (or list of children).
    pub field: F,
    /// Whether the raw value is a list of child maps.
    pub repeated: bool,
    /// Child entity type name.
    pub entity: &'static str,
    /// Monomorphized child constructor.
    pub build: ChildBuilder,
}

impl<F> Nested<F> {
    /// A single child of type `T`.
    pub const fn one<T: Entity>(field: F) -> Self {
        Self {
            field,
            repeated: false,
            entity: T::NAME,
            build: crate::engine::build_one::<T>,
        }
    }

    /// A list of children of type `T`.
    pub const fn many<T: Entity>(field: F) -> Self {
        Self {
            field,
            repeated: true,
            entity: T::NAME,
            build: crate::engine::build_many::<T>,
        }
    }
}

impl<F: fmt::Debug> fmt::Debug for Nested<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nested")
            .field("field", &self.field)
            .field("repeated", &self.repeated)
            .field("entity", &self.entity)
            .finish()
    }
}

// ─── Exclusion Groups ────────────────────────────────────────────────

/// At most `at_most` of `fields` may be present.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionGroup<F: 'static> {
    /// Group name, used in messages.
    pub name: &'static str,
    /// Optional fields in the group.
    pub fields: &'static [F],
    /// Maximum number of simultaneously present fields.
    pub at_most: usize,
    /// Whether at least one field must be present.
    pub non_empty: bool,
}

impl<F> ExclusionGroup<F> {
    /// "At most `k` of `fields`".
    pub const fn at_most(name: &'static str, fields: &'static [F], k: usize) -> Self {
        Self {
            name,
            fields,
            at_most: k,
            non_empty: false,
        }
    }

    /// A tagged choice: exactly one of `fields`.
    pub const fn exactly_one(name: &'static str, fields: &'static [F]) -> Self {
        Self {
            name,
            fields,
            at_most: 1,
            non_empty: true,
        }
    }

    /// Additionally require at least one field.
    pub const fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// A bound of at least the group's size can never be violated.
    pub const fn is_vacuous(&self) -> bool {
        self.at_most >= self.fields.len()
    }
}

// ─── Bounds ──────────────────────────────────────────────────────────

/// A numeric lower bound on an integer or duration field.
#[derive(Debug, Clone, Copy)]
pub struct Bound<F> {
    /// Bounded field.
    pub field: F,
    /// The bound value.
    pub floor: i64,
    /// Whether `value == floor` passes.
    pub inclusive: bool,
    /// Whether an absent value passes.
    pub allow_absent: bool,
}

impl<F> Bound<F> {
    /// `value > floor`; absent passes.
    pub const fn above(field: F, floor: i64) -> Self {
        Self {
            field,
            floor,
            inclusive: false,
            allow_absent: true,
        }
    }

    /// `value >= floor`; absent passes.
    pub const fn at_least(field: F, floor: i64) -> Self {
        Self {
            field,
            floor,
            inclusive: true,
            allow_absent: true,
        }
    }

    /// Absent fails as well.
    pub const fn present(mut self) -> Self {
        self.allow_absent = false;
        self
    }
}

// ─── Field Rules ─────────────────────────────────────────────────────

/// The complete declaration for one entity type.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules<F: 'static> {
    /// Keys that must be present.
    pub required: &'static [F],
    /// Scalar conversions.
    pub converters: &'static [Converter<F>],
    /// Nested child entities.
    pub nested: &'static [Nested<F>],
    /// Mutual-exclusion groups.
    pub exclusions: &'static [ExclusionGroup<F>],
    /// Numeric lower bounds.
    pub bounds: &'static [Bound<F>],
    /// Defaults for absent boolean flags.
    pub defaults: &'static [(F, bool)],
}

impl<F: FieldKey> FieldRules<F> {
    /// A descriptor with nothing declared. Use with struct update syntax.
    pub const fn new() -> Self {
        Self {
            required: &[],
            converters: &[],
            nested: &[],
            exclusions: &[],
            bounds: &[],
            defaults: &[],
        }
    }

    /// Whether `field` is required.
    pub fn is_required(&self, field: F) -> bool {
        self.required.contains(&field)
    }

    /// The conversion target declared for `field`, if any.
    pub fn target_of(&self, field: F) -> Option<Target> {
        self.converters
            .iter()
            .find(|c| c.fields.contains(&field))
            .map(|c| c.target)
    }

    /// The nested descriptor declared for `field`, if any.
    pub fn nested_of(&self, field: F) -> Option<&Nested<F>> {
        self.nested.iter().find(|n| n.field == field)
    }

    /// Whether some rule mentions the raw key `key`.
    pub fn declares(&self, key: &str) -> bool {
        F::all()
            .iter()
            .find(|f| f.as_str() == key)
            .is_some_and(|f| self.target_of(*f).is_some() || self.nested_of(*f).is_some())
    }

    /// Exclusion groups whose bound can never be exceeded.
    pub fn vacuous_groups(&self) -> impl Iterator<Item = &ExclusionGroup<F>> {
        self.exclusions.iter().filter(|g| g.is_vacuous())
    }
}
