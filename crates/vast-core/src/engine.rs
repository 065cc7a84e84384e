//! # Construction Engine
//!
//! Turns a raw field map into a validated entity, or into one
//! [`ValidationError`] that lists every violation in the entity's subtree.
//!
//! ## Pipeline
//!
//! 1. Presence: every missing required field is recorded.
//! 2. Conversion: every present scalar is converted; failures are recorded
//!    and leave the field unset.
//! 3. Nesting: every present child is constructed recursively. Its
//!    violations are absorbed under the child's field key and index.
//! 4. Exclusion: every group with too many (or, if non-empty, zero)
//!    present fields is recorded once. A non-empty group whose only
//!    supplied member failed steps 2-3 is not reported again.
//! 5. Semantics: only when 1-4 are clean. Defaults are applied, every
//!    declared bound is checked, the candidate is assembled, and every
//!    validator runs on it. Bound and validator violations are collected
//!    together.
//! 6. Result: any violation fails the whole construction. No partial
//!    entity escapes.
//!
//! No step stops the pipeline early, except that step 5 waits on 1-4.
//! Validators are skipped only when a value below its bound cannot be
//! stored in its typed field (a negative `u32`), since there is no
//! candidate to run them on.

use std::any::Any;

use crate::convert::convert;
use crate::entity::Entity;
use crate::error::{ValidationError, Violation, ViolationKind};
use crate::fields::Fields;
use crate::primitives::type_of;
use crate::raw::{RawKind, RawMap, RawValue};
use crate::rules::FieldKey;

/// Construct `T` from `raw`.
pub fn construct<T: Entity>(raw: &RawMap) -> Result<T, ValidationError> {
    construct_tree::<T>(raw).map_err(|violations| {
        tracing::debug!(
            entity = T::NAME,
            violations = violations.len(),
            "entity construction rejected"
        );
        ValidationError::new(T::NAME, violations)
    })
}

/// Run the pipeline, returning the raw violation list on failure.
fn construct_tree<T: Entity>(raw: &RawMap) -> Result<T, Vec<Violation>> {
    let rules = &T::RULES;
    let mut violations = Vec::new();

    for key in raw.keys() {
        if !rules.declares(key) {
            tracing::trace!(entity = T::NAME, key, "ignoring undeclared raw key");
        }
    }

    // 1. Presence.
    for field in rules.required {
        let name = field.as_str();
        if !raw.is_present(name) {
            violations.push(Violation::new(
                ViolationKind::MissingRequiredField,
                T::NAME,
                [name],
                format!("missing required field '{name}'"),
            ));
        }
    }

    let mut fields = Fields::<T::Field>::new(T::NAME);

    // 2. Conversion.
    for converter in rules.converters {
        for field in converter.fields {
            let name = field.as_str();
            let Some(value) = raw.get(name) else { continue };
            match convert(converter.target, value, name) {
                Ok(scalar) => fields.set_scalar(*field, scalar),
                Err(rejection) => violations
                    .push(rejection.into_violation(ViolationKind::ConversionFailure, T::NAME)),
            }
        }
    }

    // 3. Nesting.
    for nested in rules.nested {
        let name = nested.field.as_str();
        let Some(value) = raw.get(name) else { continue };
        if value.is_vacant() {
            continue;
        }
        match (nested.build)(value, T::NAME, name) {
            Ok(child) => fields.set_child(nested.field, child),
            Err(child_violations) => violations.extend(child_violations),
        }
    }

    // 4. Exclusion.
    for group in rules.exclusions {
        if group.is_vacuous() {
            tracing::debug!(
                entity = T::NAME,
                group = group.name,
                at_most = group.at_most,
                size = group.fields.len(),
                "evaluating vacuous exclusion group"
            );
        }
        let present: Vec<&'static str> = group
            .fields
            .iter()
            .filter(|f| fields.has(**f))
            .map(|f| f.as_str())
            .collect();
        if present.len() > group.at_most {
            violations.push(Violation::new(
                ViolationKind::ExclusionGroupViolation,
                T::NAME,
                present.iter().copied(),
                format!(
                    "at most {} of group '{}' may be present but found {}: {}",
                    group.at_most,
                    group.name,
                    present.len(),
                    present.join(", "),
                ),
            ));
        } else if present.is_empty()
            && group.non_empty
            && !group.fields.iter().any(|f| raw.is_present(f.as_str()))
        {
            let names: Vec<&'static str> = group.fields.iter().map(|f| f.as_str()).collect();
            violations.push(Violation::new(
                ViolationKind::ExclusionGroupViolation,
                T::NAME,
                names.iter().copied(),
                format!(
                    "one of group '{}' must be present: {}",
                    group.name,
                    names.join(", "),
                ),
            ));
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    // 5. Semantics.
    fields.apply_defaults(rules.defaults);
    for bound in rules.bounds {
        if let Err(violation) = fields.check_bound(bound) {
            violations.push(violation);
        }
    }

    match T::assemble(&mut fields) {
        Ok(candidate) => {
            for validator in T::VALIDATORS {
                violations.extend(validator(&candidate));
            }
            // 6. Result.
            if violations.is_empty() {
                return Ok(candidate);
            }
        }
        Err(violation) if violations.is_empty() => violations.push(violation),
        // A value below its bound may not fit the typed field. The bound
        // violation already reports it.
        Err(violation) => tracing::trace!(
            entity = T::NAME,
            reason = %violation.message,
            "candidate not assembled after bound failure"
        ),
    }
    Err(violations)
}

/// Build a singular child of type `T` for `parent.field`.
pub(crate) fn build_one<T: Entity>(
    value: &RawValue,
    parent: &'static str,
    field: &'static str,
) -> Result<Box<dyn Any + Send>, Vec<Violation>> {
    type_of(RawKind::Map)(value, field)
        .map_err(|r| vec![r.into_violation(ViolationKind::ConversionFailure, parent)])?;
    let map = value.as_map().ok_or_else(Vec::new)?;

    construct_tree::<T>(map)
        .map(|child| Box::new(child) as Box<dyn Any + Send>)
        .map_err(|violations| {
            violations
                .into_iter()
                .map(|v| v.nested_under(field, None))
                .collect()
        })
}

/// Build every child of type `T` in the list at `parent.field`.
///
/// All elements are attempted. Violations from every failing element are
/// returned, each anchored at its index.
pub(crate) fn build_many<T: Entity>(
    value: &RawValue,
    parent: &'static str,
    field: &'static str,
) -> Result<Box<dyn Any + Send>, Vec<Violation>> {
    type_of(RawKind::List)(value, field)
        .map_err(|r| vec![r.into_violation(ViolationKind::ConversionFailure, parent)])?;
    let items = value.as_list().unwrap_or_default();

    let mut built = Vec::with_capacity(items.len());
    let mut violations = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(map) = item.as_map() else {
            let element = format!("{field}[{index}]");
            if let Err(rejection) = type_of(RawKind::Map)(item, &element) {
                violations.push(rejection.into_violation(ViolationKind::ConversionFailure, parent));
            }
            continue;
        };
        match construct_tree::<T>(map) {
            Ok(child) => built.push(child),
            Err(child_violations) => violations.extend(
                child_violations
                    .into_iter()
                    .map(|v| v.nested_under(field, Some(index))),
            ),
        }
    }

    if violations.is_empty() {
        Ok(Box::new(built))
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SemanticValidator;
    use crate::rules::{Bound, Converter, ExclusionGroup, FieldRules, Nested, Target};

    crate::field_keys! {
        enum PixelField {
            Width => "width",
            Label => "label",
        }
    }

    #[derive(Debug, PartialEq)]
    struct Pixel {
        width: u32,
        label: Option<String>,
    }

    impl Entity for Pixel {
        type Field = PixelField;
        const NAME: &'static str = "Pixel";
        const RULES: FieldRules<PixelField> = FieldRules {
            required: &[PixelField::Width],
            converters: &[
                Converter::new(Target::U32, &[PixelField::Width]),
                Converter::new(Target::Text, &[PixelField::Label]),
            ],
            bounds: &[Bound::above(PixelField::Width, 0)],
            ..FieldRules::new()
        };
        const VALIDATORS: &'static [SemanticValidator<Self>] = &[pixel_label_not_blank];

        fn assemble(fields: &mut Fields<PixelField>) -> Result<Self, Violation> {
            Ok(Self {
                width: fields.require_integer(PixelField::Width)?,
                label: fields.text(PixelField::Label)?,
            })
        }

        fn to_raw(&self) -> RawMap {
            RawMap::new()
                .with("width", self.width.to_string())
                .with_opt("label", self.label.clone())
        }
    }

    fn pixel_label_not_blank(pixel: &Pixel) -> Vec<Violation> {
        match pixel.label.as_deref() {
            Some(label) if label.trim().is_empty() => {
                vec![Violation::semantic("Pixel", "label", "'label' must not be blank")]
            }
            _ => Vec::new(),
        }
    }

    crate::field_keys! {
        enum FrameField {
            Name => "name",
            Pixels => "pixels",
            Cover => "cover",
            Left => "left",
            Right => "right",
            Visible => "visible",
        }
    }

    #[derive(Debug)]
    struct Frame {
        name: String,
        pixels: Vec<Pixel>,
        cover: Option<Pixel>,
        visible: bool,
    }

    fn frame_has_no_duplicate_labels(frame: &Frame) -> Vec<Violation> {
        let mut seen = std::collections::HashSet::new();
        frame
            .pixels
            .iter()
            .filter_map(|p| p.label.as_deref())
            .filter(|label| !seen.insert(*label))
            .map(|label| Violation::semantic("Frame", "pixels", format!("duplicate label {label}")))
            .collect()
    }

    fn frame_name_is_lowercase(frame: &Frame) -> Vec<Violation> {
        if frame.name.chars().any(|c| c.is_uppercase()) {
            vec![Violation::semantic("Frame", "name", "'name' must be lowercase")]
        } else {
            Vec::new()
        }
    }

    impl Entity for Frame {
        type Field = FrameField;
        const NAME: &'static str = "Frame";
        const RULES: FieldRules<FrameField> = FieldRules {
            required: &[FrameField::Name, FrameField::Pixels],
            converters: &[
                Converter::new(Target::Text, &[FrameField::Name, FrameField::Left, FrameField::Right]),
                Converter::new(Target::Flag, &[FrameField::Visible]),
            ],
            nested: &[
                Nested::many::<Pixel>(FrameField::Pixels),
                Nested::one::<Pixel>(FrameField::Cover),
            ],
            exclusions: &[ExclusionGroup::at_most("side", &[FrameField::Left, FrameField::Right], 1)],
            defaults: &[(FrameField::Visible, true)],
            ..FieldRules::new()
        };
        const VALIDATORS: &'static [SemanticValidator<Self>] =
            &[frame_has_no_duplicate_labels, frame_name_is_lowercase];

        fn assemble(fields: &mut Fields<FrameField>) -> Result<Self, Violation> {
            Ok(Self {
                name: fields.require_text(FrameField::Name)?,
                pixels: fields.require_children(FrameField::Pixels)?,
                cover: fields.child(FrameField::Cover)?,
                visible: fields.require_flag(FrameField::Visible)?,
            })
        }

        fn to_raw(&self) -> RawMap {
            RawMap::new()
                .with("name", self.name.as_str())
                .with("pixels", self.pixels.iter().map(Pixel::to_raw).collect::<Vec<_>>())
        }
    }


    fn pixel(width: &str) -> RawMap {
        RawMap::new().with("width", width)
    }

    fn frame(pixels: Vec<RawMap>) -> RawMap {
        RawMap::new().with("name", "strip").with("pixels", pixels)
    }

    #[test]
    fn test_valid_tree_constructs() {
        let f = Frame::from_raw(&frame(vec![pixel("4"), pixel("8")])).unwrap();
        assert_eq!(f.pixels.len(), 2);
        assert_eq!(f.pixels[1].width, 8);
        assert!(f.cover.is_none());
        assert!(f.visible);
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let err = Frame::from_raw(&RawMap::new()).unwrap_err();
        assert_eq!(err.entity, "Frame");
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 2);
    }

    #[test]
    fn test_nested_violation_is_anchored_at_index() {
        let err = Frame::from_raw(&frame(vec![pixel("4"), pixel("0"), pixel("x")])).unwrap_err();
        assert_eq!(err.violations().len(), 2);

        let bound = &err.violations()[0];
        assert_eq!(bound.kind, ViolationKind::SemanticValidationFailure);
        assert_eq!(bound.entity, "Pixel");
        assert_eq!(bound.path.to_string(), "pixels[1]");
        assert!(bound.names_field("width"));

        let conversion = &err.violations()[1];
        assert_eq!(conversion.kind, ViolationKind::ConversionFailure);
        assert_eq!(conversion.path.to_string(), "pixels[2]");
    }

    #[test]
    fn test_failures_across_steps_aggregate() {
        let raw = RawMap::new()
            .with("pixels", vec![pixel("-1")])
            .with("left", "l")
            .with("right", "r")
            .with("visible", "maybe");
        let err = Frame::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 1);
        assert_eq!(err.count(ViolationKind::ConversionFailure), 1);
        assert_eq!(err.count(ViolationKind::ExclusionGroupViolation), 1);
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 1);
    }

    #[test]
    fn test_every_validator_runs() {
        let raw = RawMap::new().with("name", "Strip").with(
            "pixels",
            vec![
                pixel("1").with("label", "a"),
                pixel("2").with("label", "a"),
            ],
        );
        let err = Frame::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 2);
    }

    #[test]
    fn test_bound_and_validator_violations_collected_together() {
        let err = Pixel::from_raw(&pixel("0").with("label", " ")).unwrap_err();
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 2);
        assert!(err.violations().iter().any(|v| v.names_field("width")));
        assert!(err.violations().iter().any(|v| v.names_field("label")));
    }

    #[test]
    fn test_unstorable_bound_failure_reported_once() {
        let err = Pixel::from_raw(&pixel("-1").with("label", " ")).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.violations()[0].names_field("width"));
        assert!(err.violations()[0].message.contains("greater than 0"));
    }

    #[test]
    fn test_wrong_shape_is_conversion_failure_on_parent() {
        let raw = frame(vec![]).with("cover", "not a map");
        let err = Frame::from_raw(&raw).unwrap_err();
        // An empty list counts as absent.
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 1);
        let shape = err.violations().iter().find(|v| v.names_field("cover")).unwrap();
        assert_eq!(shape.kind, ViolationKind::ConversionFailure);
        assert_eq!(shape.entity, "Frame");
        assert!(shape.path.is_root());
    }

    #[test]
    fn test_singular_child_path_has_no_index() {
        let raw = frame(vec![pixel("3")]).with("cover", pixel("0"));
        let err = Frame::from_raw(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].path.to_string(), "cover");
    }

    #[test]
    fn test_exclusion_counts_after_conversion() {
        let raw = frame(vec![pixel("3")]).with("left", "l").with("right", RawMap::new());
        let err = Frame::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::ConversionFailure), 1);
        assert_eq!(err.count(ViolationKind::ExclusionGroupViolation), 0);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = frame(vec![pixel("3")]).with("colour", "red");
        assert!(Frame::from_raw(&raw).is_ok());
    }

    #[test]
    fn test_round_trip_through_raw() {
        let raw = frame(vec![pixel("3").with("label", "x")]);
        let f = Frame::from_raw(&raw).unwrap();
        let again = Frame::from_raw(&f.to_raw()).unwrap();
        assert_eq!(again.pixels, f.pixels);
    }
}
