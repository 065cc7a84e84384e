//! # Ads
//!
//! An [`Ad`] is either a [`Wrapper`] that redirects to another ad server,
//! or an [`Inline`] ad that carries everything needed to play. The choice
//! is the sum type [`AdKind`].

use serde::Serialize;
use vast_core::{
    field_keys, Converter, Entity, ExclusionGroup, FieldRules, Fields, Nested, RawMap, Target,
    Violation, ViolationKind,
};

use crate::creative::Creative;
use crate::serial;

// ─── Inline ──────────────────────────────────────────────────────────

field_keys! {
    /// Raw keys of an [`Inline`] ad.
    pub enum InlineField {
        AdSystem => "ad_system",
        AdTitle => "ad_title",
        Impression => "impression",
        Creatives => "creatives",
        Description => "description",
        Error => "error",
    }
}

/// The last ad in the supply chain: all files and URIs needed to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inline {
    ad_system: String,
    ad_title: String,
    impression: String,
    creatives: Vec<Creative>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Inline {
    /// Name of the ad server that returned the ad.
    pub fn ad_system(&self) -> &str {
        &self.ad_system
    }

    pub fn ad_title(&self) -> &str {
        &self.ad_title
    }

    /// URI requested when the first frame is displayed.
    pub fn impression(&self) -> &str {
        &self.impression
    }

    /// Never empty.
    pub fn creatives(&self) -> &[Creative] {
        &self.creatives
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// URI requested when the ad fails to play.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Entity for Inline {
    type Field = InlineField;
    const NAME: &'static str = "Inline";
    const RULES: FieldRules<InlineField> = FieldRules {
        required: &[
            InlineField::AdSystem,
            InlineField::AdTitle,
            InlineField::Impression,
            InlineField::Creatives,
        ],
        converters: &[Converter::new(
            Target::Text,
            &[
                InlineField::AdSystem,
                InlineField::AdTitle,
                InlineField::Impression,
                InlineField::Description,
                InlineField::Error,
            ],
        )],
        nested: &[Nested::many::<Creative>(InlineField::Creatives)],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<InlineField>) -> Result<Self, Violation> {
        Ok(Self {
            ad_system: fields.require_text(InlineField::AdSystem)?,
            ad_title: fields.require_text(InlineField::AdTitle)?,
            impression: fields.require_text(InlineField::Impression)?,
            creatives: fields.require_children(InlineField::Creatives)?,
            description: fields.text(InlineField::Description)?,
            error: fields.text(InlineField::Error)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("ad_system", self.ad_system.as_str())
            .with("ad_title", self.ad_title.as_str())
            .with("impression", self.impression.as_str())
            .with_opt("creatives", serial::list(&self.creatives))
            .with_opt("description", self.description.clone())
            .with_opt("error", self.error.clone())
    }
}

// ─── Wrapper ─────────────────────────────────────────────────────────

field_keys! {
    /// Raw keys of a [`Wrapper`] ad.
    pub enum WrapperField {
        AdSystem => "ad_system",
        VastAdTagUri => "vast_ad_tag_uri",
        AdTitle => "ad_title",
        Impression => "impression",
        Error => "error",
        Creatives => "creatives",
    }
}

/// A redirect to another VAST document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wrapper {
    ad_system: String,
    vast_ad_tag_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    impression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    creatives: Vec<Creative>,
}

impl Wrapper {
    pub fn ad_system(&self) -> &str {
        &self.ad_system
    }

    /// URI of the next VAST document in the chain.
    pub fn vast_ad_tag_uri(&self) -> &str {
        &self.vast_ad_tag_uri
    }

    pub fn ad_title(&self) -> Option<&str> {
        self.ad_title.as_deref()
    }

    pub fn impression(&self) -> Option<&str> {
        self.impression.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn creatives(&self) -> &[Creative] {
        &self.creatives
    }
}

impl Entity for Wrapper {
    type Field = WrapperField;
    const NAME: &'static str = "Wrapper";
    const RULES: FieldRules<WrapperField> = FieldRules {
        required: &[WrapperField::AdSystem, WrapperField::VastAdTagUri],
        converters: &[Converter::new(
            Target::Text,
            &[
                WrapperField::AdSystem,
                WrapperField::VastAdTagUri,
                WrapperField::AdTitle,
                WrapperField::Impression,
                WrapperField::Error,
            ],
        )],
        nested: &[Nested::many::<Creative>(WrapperField::Creatives)],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<WrapperField>) -> Result<Self, Violation> {
        Ok(Self {
            ad_system: fields.require_text(WrapperField::AdSystem)?,
            vast_ad_tag_uri: fields.require_text(WrapperField::VastAdTagUri)?,
            ad_title: fields.text(WrapperField::AdTitle)?,
            impression: fields.text(WrapperField::Impression)?,
            error: fields.text(WrapperField::Error)?,
            creatives: fields.children(WrapperField::Creatives)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("ad_system", self.ad_system.as_str())
            .with("vast_ad_tag_uri", self.vast_ad_tag_uri.as_str())
            .with_opt("ad_title", self.ad_title.clone())
            .with_opt("impression", self.impression.clone())
            .with_opt("error", self.error.clone())
            .with_opt("creatives", serial::list(&self.creatives))
    }
}

// ─── Ad ──────────────────────────────────────────────────────────────

/// Wrapper or inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdKind {
    Wrapper(Wrapper),
    Inline(Inline),
}

impl AdKind {
    /// Raw key of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrapper(_) => "wrapper",
            Self::Inline(_) => "inline",
        }
    }

    /// Creatives of either variant.
    pub fn creatives(&self) -> &[Creative] {
        match self {
            Self::Wrapper(wrapper) => wrapper.creatives(),
            Self::Inline(inline) => inline.creatives(),
        }
    }
}

impl std::fmt::Display for AdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

field_keys! {
    /// Raw keys of an [`Ad`].
    pub enum AdField {
        Id => "id",
        Wrapper => "wrapper",
        Inline => "inline",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ad {
    id: String,
    #[serde(flatten)]
    kind: AdKind,
}

impl Ad {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &AdKind {
        &self.kind
    }

    pub fn wrapper(&self) -> Option<&Wrapper> {
        match &self.kind {
            AdKind::Wrapper(wrapper) => Some(wrapper),
            AdKind::Inline(_) => None,
        }
    }

    pub fn inline(&self) -> Option<&Inline> {
        match &self.kind {
            AdKind::Inline(inline) => Some(inline),
            AdKind::Wrapper(_) => None,
        }
    }
}

impl Entity for Ad {
    type Field = AdField;
    const NAME: &'static str = "Ad";
    const RULES: FieldRules<AdField> = FieldRules {
        required: &[AdField::Id],
        converters: &[Converter::new(Target::Text, &[AdField::Id])],
        nested: &[
            Nested::one::<Wrapper>(AdField::Wrapper),
            Nested::one::<Inline>(AdField::Inline),
        ],
        exclusions: &[ExclusionGroup::exactly_one("kind", &[AdField::Wrapper, AdField::Inline])],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<AdField>) -> Result<Self, Violation> {
        let wrapper = fields.child(AdField::Wrapper)?;
        let inline = fields.child(AdField::Inline)?;
        let kind = match (wrapper, inline) {
            (Some(wrapper), None) => AdKind::Wrapper(wrapper),
            (None, Some(inline)) => AdKind::Inline(inline),
            _ => {
                return Err(Violation::new(
                    ViolationKind::ExclusionGroupViolation,
                    Self::NAME,
                    ["wrapper", "inline"],
                    "exactly one of group 'kind' must be present",
                ))
            }
        };

        Ok(Self {
            id: fields.require_text(AdField::Id)?,
            kind,
        })
    }

    fn to_raw(&self) -> RawMap {
        let raw = RawMap::new().with("id", self.id.as_str());
        match &self.kind {
            AdKind::Wrapper(wrapper) => raw.with("wrapper", wrapper.to_raw()),
            AdKind::Inline(inline) => raw.with("inline", inline.to_raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapper() -> RawMap {
        RawMap::new()
            .with("ad_system", "MagU")
            .with("vast_ad_tag_uri", "//vast.dv.com/v3/vast?_vast")
            .with("impression", "//magu.d.com/vidimp")
            .with("error", "//magu.d.com/viderr?err=[ERRORCODE]")
    }

    fn inline() -> RawMap {
        RawMap::new()
            .with("ad_system", "Acudeo Compatible")
            .with("ad_title", "VAST 2.0 Instream Test 1")
            .with("impression", "https://x.example.com/imp")
            .with(
                "creatives",
                vec![RawMap::new().with(
                    "companion",
                    RawMap::new().with(
                        "companion_ads",
                        vec![RawMap::new().with("width", "300").with("height", "60")],
                    ),
                )],
            )
    }

    #[test]
    fn test_wrapper_ad() {
        let ad = Ad::from_raw(&RawMap::new().with("id", "70470").with("wrapper", wrapper())).unwrap();
        assert_eq!(ad.kind().as_str(), "wrapper");
        let w = ad.wrapper().unwrap();
        assert_eq!(w.ad_system(), "MagU");
        assert_eq!(w.vast_ad_tag_uri(), "//vast.dv.com/v3/vast?_vast");
        assert!(w.creatives().is_empty());
        assert!(ad.inline().is_none());
    }

    #[test]
    fn test_inline_ad() {
        let ad = Ad::from_raw(&RawMap::new().with("id", "1").with("inline", inline())).unwrap();
        assert!(matches!(ad.kind(), AdKind::Inline(_)));
        assert_eq!(ad.kind().creatives().len(), 1);
    }

    #[test]
    fn test_both_kinds_is_one_exclusion_violation() {
        let raw = RawMap::new()
            .with("id", "1")
            .with("wrapper", wrapper())
            .with("inline", inline());
        let err = Ad::from_raw(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.count(ViolationKind::ExclusionGroupViolation), 1);
    }

    #[test]
    fn test_neither_kind_fails() {
        let err = Ad::from_raw(&RawMap::new().with("id", "1")).unwrap_err();
        assert_eq!(err.count(ViolationKind::ExclusionGroupViolation), 1);
    }

    #[test]
    fn test_inline_missing_fields_aggregate() {
        let raw = RawMap::new().with("id", "1").with("inline", RawMap::new());
        let err = Ad::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 4);
        assert!(err.violations().iter().all(|v| v.path.to_string() == "inline"));
    }

    #[test]
    fn test_serializes_kind_as_key() {
        let ad = Ad::from_raw(&RawMap::new().with("id", "70470").with("wrapper", wrapper())).unwrap();
        let json = serde_json::to_value(&ad).unwrap();
        assert_eq!(json["id"], "70470");
        assert_eq!(json["wrapper"]["ad_system"], "MagU");
    }
}
