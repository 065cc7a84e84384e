//! # Companion Creative
//!
//! Display units that run alongside the player: banners, rich media, or
//! skins around the video frame.

use serde::Serialize;
use vast_core::{
    field_keys, Bound, Converter, Entity, ExclusionGroup, FieldRules, Fields, Nested, RawMap,
    Target, Violation,
};

use crate::enums::ApiFramework;
use crate::media::{AdParameters, TrackingEvent};
use crate::resource::StaticResource;
use crate::serial;

field_keys! {
    /// Raw keys of a [`CompanionAd`].
    pub enum CompanionAdField {
        Width => "width",
        Height => "height",
        ExpandedWidth => "expanded_width",
        ExpandedHeight => "expanded_height",
        ApiFramework => "api_framework",
        Id => "id",
        StaticResource => "static_resource",
        IframeResource => "iframe_resource",
        HtmlResource => "html_resource",
        ClickThrough => "click_through",
        AltText => "alt_text",
        AdParameters => "ad_parameters",
        TrackingEvents => "tracking_events",
    }
}

/// One companion unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionAd {
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_framework: Option<ApiFramework>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    static_resource: Option<StaticResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iframe_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    click_through: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_parameters: Option<AdParameters>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tracking_events: Vec<TrackingEvent>,
}

impl CompanionAd {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn expanded_width(&self) -> Option<u32> {
        self.expanded_width
    }

    pub fn expanded_height(&self) -> Option<u32> {
        self.expanded_height
    }

    pub fn api_framework(&self) -> Option<ApiFramework> {
        self.api_framework
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn static_resource(&self) -> Option<&StaticResource> {
        self.static_resource.as_ref()
    }

    pub fn iframe_resource(&self) -> Option<&str> {
        self.iframe_resource.as_deref()
    }

    pub fn html_resource(&self) -> Option<&str> {
        self.html_resource.as_deref()
    }

    /// Landing page opened when the companion is clicked.
    pub fn click_through(&self) -> Option<&str> {
        self.click_through.as_deref()
    }

    /// Alternative text for the rendered unit.
    pub fn alt_text(&self) -> Option<&str> {
        self.alt_text.as_deref()
    }

    pub fn ad_parameters(&self) -> Option<&AdParameters> {
        self.ad_parameters.as_ref()
    }

    /// Typically `creativeView` hooks.
    pub fn tracking_events(&self) -> &[TrackingEvent] {
        &self.tracking_events
    }
}

impl Entity for CompanionAd {
    type Field = CompanionAdField;
    const NAME: &'static str = "CompanionAd";
    const RULES: FieldRules<CompanionAdField> = FieldRules {
        required: &[CompanionAdField::Width, CompanionAdField::Height],
        converters: &[
            Converter::new(
                Target::Text,
                &[
                    CompanionAdField::IframeResource,
                    CompanionAdField::HtmlResource,
                    CompanionAdField::Id,
                    CompanionAdField::AltText,
                    CompanionAdField::ClickThrough,
                ],
            ),
            Converter::new(
                Target::U32,
                &[
                    CompanionAdField::Width,
                    CompanionAdField::Height,
                    CompanionAdField::ExpandedWidth,
                    CompanionAdField::ExpandedHeight,
                ],
            ),
            Converter::new(Target::token::<ApiFramework>(), &[CompanionAdField::ApiFramework]),
        ],
        nested: &[
            Nested::one::<StaticResource>(CompanionAdField::StaticResource),
            Nested::one::<AdParameters>(CompanionAdField::AdParameters),
            Nested::many::<TrackingEvent>(CompanionAdField::TrackingEvents),
        ],
        exclusions: &[ExclusionGroup::at_most(
            "resource",
            &[
                CompanionAdField::IframeResource,
                CompanionAdField::HtmlResource,
                CompanionAdField::StaticResource,
            ],
            3,
        )],
        bounds: &[
            Bound::above(CompanionAdField::Width, 0),
            Bound::above(CompanionAdField::Height, 0),
            Bound::above(CompanionAdField::ExpandedWidth, 0),
            Bound::above(CompanionAdField::ExpandedHeight, 0),
        ],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<CompanionAdField>) -> Result<Self, Violation> {
        Ok(Self {
            width: fields.require_integer(CompanionAdField::Width)?,
            height: fields.require_integer(CompanionAdField::Height)?,
            expanded_width: fields.integer(CompanionAdField::ExpandedWidth)?,
            expanded_height: fields.integer(CompanionAdField::ExpandedHeight)?,
            api_framework: fields.token(CompanionAdField::ApiFramework)?,
            id: fields.text(CompanionAdField::Id)?,
            static_resource: fields.child(CompanionAdField::StaticResource)?,
            iframe_resource: fields.text(CompanionAdField::IframeResource)?,
            html_resource: fields.text(CompanionAdField::HtmlResource)?,
            click_through: fields.text(CompanionAdField::ClickThrough)?,
            alt_text: fields.text(CompanionAdField::AltText)?,
            ad_parameters: fields.child(CompanionAdField::AdParameters)?,
            tracking_events: fields.children(CompanionAdField::TrackingEvents)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("width", self.width.to_string())
            .with("height", self.height.to_string())
            .with_opt("expanded_width", serial::number(self.expanded_width))
            .with_opt("expanded_height", serial::number(self.expanded_height))
            .with_opt("api_framework", self.api_framework.map(|a| a.to_string()))
            .with_opt("id", self.id.clone())
            .with_opt("static_resource", serial::child(self.static_resource.as_ref()))
            .with_opt("iframe_resource", self.iframe_resource.clone())
            .with_opt("html_resource", self.html_resource.clone())
            .with_opt("click_through", self.click_through.clone())
            .with_opt("alt_text", self.alt_text.clone())
            .with_opt("ad_parameters", serial::child(self.ad_parameters.as_ref()))
            .with_opt("tracking_events", serial::list(&self.tracking_events))
    }
}

field_keys! {
    /// Raw keys of a [`CompanionCreative`].
    pub enum CompanionCreativeField {
        CompanionAds => "companion_ads",
    }
}

/// Container for the companion units of one creative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionCreative {
    companion_ads: Vec<CompanionAd>,
}

impl CompanionCreative {
    /// Never empty.
    pub fn companion_ads(&self) -> &[CompanionAd] {
        &self.companion_ads
    }
}

impl Entity for CompanionCreative {
    type Field = CompanionCreativeField;
    const NAME: &'static str = "CompanionCreative";
    const RULES: FieldRules<CompanionCreativeField> = FieldRules {
        required: &[CompanionCreativeField::CompanionAds],
        nested: &[Nested::many::<CompanionAd>(CompanionCreativeField::CompanionAds)],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<CompanionCreativeField>) -> Result<Self, Violation> {
        Ok(Self {
            companion_ads: fields.require_children(CompanionCreativeField::CompanionAds)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new().with_opt("companion_ads", serial::list(&self.companion_ads))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vast_core::ViolationKind;

    fn banner() -> RawMap {
        RawMap::new()
            .with("width", "300")
            .with("height", "250")
            .with(
                "static_resource",
                RawMap::new()
                    .with("resource", "https://x.example.com/300x250.png")
                    .with("creative_type", "image/png"),
            )
            .with("click_through", "https://x.example.com")
            .with(
                "tracking_events",
                vec![RawMap::new()
                    .with("uri", "https://t.example.com/cv")
                    .with("event", "creativeView")],
            )
    }

    #[test]
    fn test_companion_ad() {
        let ad = CompanionAd::from_raw(&banner().with("alt_text", "Sale")).unwrap();
        assert_eq!(ad.width(), 300);
        assert_eq!(ad.click_through(), Some("https://x.example.com"));
        assert_eq!(ad.alt_text(), Some("Sale"));
        assert_eq!(ad.tracking_events().len(), 1);
    }

    #[test]
    fn test_companion_bad_static_resource_anchored() {
        let raw = banner().with("static_resource", RawMap::new().with("resource", "x"));
        let err = CompanionAd::from_raw(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        let v = &err.violations()[0];
        assert_eq!(v.entity, "StaticResource");
        assert_eq!(v.path.to_string(), "static_resource");
        assert!(v.names_field("creative_type"));
    }

    #[test]
    fn test_companion_creative() {
        let creative =
            CompanionCreative::from_raw(&RawMap::new().with("companion_ads", vec![banner(), banner()]))
                .unwrap();
        assert_eq!(creative.companion_ads().len(), 2);
        let err = CompanionCreative::from_raw(&RawMap::new()).unwrap_err();
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 1);
    }
}
