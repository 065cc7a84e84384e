//! # Creative
//!
//! A creative is one file-backed unit of an ad. Each creative is exactly
//! one of linear, non-linear or companion; [`CreativeKind`] carries the
//! choice as a sum type, and the `kind` exclusion group guards the raw
//! input.

use serde::Serialize;
use vast_core::{
    field_keys, Bound, Converter, Entity, ExclusionGroup, FieldRules, Fields, Nested, RawMap,
    Target, Violation, ViolationKind,
};

use crate::companion::CompanionCreative;
use crate::enums::ApiFramework;
use crate::linear::LinearCreative;
use crate::nonlinear::NonLinearCreative;
use crate::serial;

/// The three creative variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeKind {
    Linear(LinearCreative),
    NonLinear(NonLinearCreative),
    Companion(CompanionCreative),
}

impl CreativeKind {
    /// Raw key of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::NonLinear(_) => "non_linear",
            Self::Companion(_) => "companion",
        }
    }
}

impl std::fmt::Display for CreativeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

field_keys! {
    /// Raw keys of a [`Creative`].
    pub enum CreativeField {
        Id => "id",
        AdId => "ad_id",
        Sequence => "sequence",
        ApiFramework => "api_framework",
        Linear => "linear",
        NonLinear => "non_linear",
        Companion => "companion",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Creative {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_framework: Option<ApiFramework>,
    #[serde(flatten)]
    kind: CreativeKind,
}

impl Creative {
    /// Ad-server identifier of the creative.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Identifier of the ad the creative is served with.
    pub fn ad_id(&self) -> Option<&str> {
        self.ad_id.as_deref()
    }

    /// Display order among sequenced creatives. Never negative.
    pub fn sequence(&self) -> Option<u32> {
        self.sequence
    }

    pub fn api_framework(&self) -> Option<ApiFramework> {
        self.api_framework
    }

    pub fn kind(&self) -> &CreativeKind {
        &self.kind
    }

    pub fn linear(&self) -> Option<&LinearCreative> {
        match &self.kind {
            CreativeKind::Linear(linear) => Some(linear),
            _ => None,
        }
    }

    pub fn non_linear(&self) -> Option<&NonLinearCreative> {
        match &self.kind {
            CreativeKind::NonLinear(non_linear) => Some(non_linear),
            _ => None,
        }
    }

    pub fn companion(&self) -> Option<&CompanionCreative> {
        match &self.kind {
            CreativeKind::Companion(companion) => Some(companion),
            _ => None,
        }
    }
}

impl Entity for Creative {
    type Field = CreativeField;
    const NAME: &'static str = "Creative";
    const RULES: FieldRules<CreativeField> = FieldRules {
        converters: &[
            Converter::new(Target::Text, &[CreativeField::Id, CreativeField::AdId]),
            Converter::new(Target::token::<ApiFramework>(), &[CreativeField::ApiFramework]),
            Converter::new(Target::U32, &[CreativeField::Sequence]),
        ],
        nested: &[
            Nested::one::<LinearCreative>(CreativeField::Linear),
            Nested::one::<NonLinearCreative>(CreativeField::NonLinear),
            Nested::one::<CompanionCreative>(CreativeField::Companion),
        ],
        exclusions: &[ExclusionGroup::exactly_one(
            "kind",
            &[CreativeField::Linear, CreativeField::NonLinear, CreativeField::Companion],
        )],
        bounds: &[Bound::at_least(CreativeField::Sequence, 0)],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<CreativeField>) -> Result<Self, Violation> {
        let linear = fields.child(CreativeField::Linear)?;
        let non_linear = fields.child(CreativeField::NonLinear)?;
        let companion = fields.child(CreativeField::Companion)?;
        let kind = match (linear, non_linear, companion) {
            (Some(linear), None, None) => CreativeKind::Linear(linear),
            (None, Some(non_linear), None) => CreativeKind::NonLinear(non_linear),
            (None, None, Some(companion)) => CreativeKind::Companion(companion),
            _ => {
                return Err(Violation::new(
                    ViolationKind::ExclusionGroupViolation,
                    Self::NAME,
                    ["linear", "non_linear", "companion"],
                    "exactly one of group 'kind' must be present",
                ))
            }
        };

        Ok(Self {
            id: fields.text(CreativeField::Id)?,
            ad_id: fields.text(CreativeField::AdId)?,
            sequence: fields.integer(CreativeField::Sequence)?,
            api_framework: fields.token(CreativeField::ApiFramework)?,
            kind,
        })
    }

    fn to_raw(&self) -> RawMap {
        let raw = RawMap::new()
            .with_opt("id", self.id.clone())
            .with_opt("ad_id", self.ad_id.clone())
            .with_opt("sequence", serial::number(self.sequence))
            .with_opt("api_framework", self.api_framework.map(|a| a.to_string()));
        match &self.kind {
            CreativeKind::Linear(linear) => raw.with("linear", linear.to_raw()),
            CreativeKind::NonLinear(non_linear) => raw.with("non_linear", non_linear.to_raw()),
            CreativeKind::Companion(companion) => raw.with("companion", companion.to_raw()),
        }
    }
}
