//! # Document Root
//!
//! [`Vast`] is the root of the object graph. Only VAST `2.0` is modelled.

use serde::Serialize;
use vast_core::{
    field_keys, Converter, Entity, FieldRules, Fields, Nested, RawMap, SemanticValidator, Target,
    Violation,
};

use crate::ad::Ad;

/// The one document version this model accepts.
pub const VAST_VERSION: &str = "2.0";

field_keys! {
    /// Raw keys of the [`Vast`] root.
    pub enum VastField {
        Version => "version",
        Ad => "ad",
    }
}

/// A validated VAST 2.0 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vast {
    version: String,
    ad: Ad,
}

impl Vast {
    /// Always `2.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn ad(&self) -> &Ad {
        &self.ad
    }
}

fn validate_version(vast: &Vast) -> Vec<Violation> {
    if vast.version == VAST_VERSION {
        Vec::new()
    } else {
        vec![Violation::semantic(
            Vast::NAME,
            "version",
            format!(
                "'version' must be {VAST_VERSION} for a VAST 2 document but was {:?}",
                vast.version
            ),
        )]
    }
}

impl Entity for Vast {
    type Field = VastField;
    const NAME: &'static str = "Vast";
    const RULES: FieldRules<VastField> = FieldRules {
        required: &[VastField::Version, VastField::Ad],
        converters: &[Converter::new(Target::Text, &[VastField::Version])],
        nested: &[Nested::one::<Ad>(VastField::Ad)],
        ..FieldRules::new()
    };
    const VALIDATORS: &'static [SemanticValidator<Self>] = &[validate_version];

    fn assemble(fields: &mut Fields<VastField>) -> Result<Self, Violation> {
        Ok(Self {
            version: fields.require_text(VastField::Version)?,
            ad: fields.require_child(VastField::Ad)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("version", self.version.as_str())
            .with("ad", self.ad.to_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vast_core::ViolationKind;

    fn wrapper_ad() -> RawMap {
        RawMap::new().with("id", "70470").with(
            "wrapper",
            RawMap::new()
                .with("ad_system", "MagU")
                .with("vast_ad_tag_uri", "//vast.dv.com/v3/vast?_vast"),
        )
    }

    #[test]
    fn test_vast_root() {
        let vast = Vast::from_raw(&RawMap::new().with("version", "2.0").with("ad", wrapper_ad()))
            .unwrap();
        assert_eq!(vast.version(), "2.0");
        assert_eq!(vast.ad().id(), "70470");
    }

    #[test]
    fn test_wrong_version() {
        let err = Vast::from_raw(&RawMap::new().with("version", "3.0").with("ad", wrapper_ad()))
            .unwrap_err();
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 1);
        assert!(err.violations()[0].names_field("version"));
    }

    #[test]
    fn test_missing_root_fields() {
        let err = Vast::from_raw(&RawMap::new()).unwrap_err();
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 2);
        assert_eq!(err.entity, "Vast");
    }
}
