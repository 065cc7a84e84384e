//! # Non-Linear Creative
//!
//! Overlays that run concurrently with the content: text, banners, or
//! interactive units drawn over the video.
//!
//! A [`NonLinearAd`] may carry its creative as a static resource, an
//! iframe URI, or an HTML snippet. The three are declared as a resource
//! group bounded at three, which admits any combination.

use std::time::Duration;

use serde::Serialize;
use vast_core::{
    field_keys, Bound, Converter, Entity, ExclusionGroup, FieldRules, Fields, Nested, RawMap,
    Target, Violation,
};

use crate::enums::ApiFramework;
use crate::media::{AdParameters, TrackingEvent};
use crate::resource::{StaticResource, UriWithId};
use crate::serial;

field_keys! {
    /// Raw keys of a [`NonLinearAd`].
    pub enum NonLinearAdField {
        Width => "width",
        Height => "height",
        ExpandedWidth => "expanded_width",
        ExpandedHeight => "expanded_height",
        Scalable => "scalable",
        MaintainAspectRatio => "maintain_aspect_ratio",
        MinSuggestedDuration => "min_suggested_duration",
        ApiFramework => "api_framework",
        Id => "id",
        StaticResource => "static_resource",
        IframeResource => "iframe_resource",
        HtmlResource => "html_resource",
        ClickThrough => "click_through",
        AdParameters => "ad_parameters",
    }
}

/// One overlay unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonLinearAd {
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expanded_height: Option<u32>,
    scalable: bool,
    maintain_aspect_ratio: bool,
    #[serde(
        serialize_with = "serial::hhmmss_opt",
        skip_serializing_if = "Option::is_none"
    )]
    min_suggested_duration: Option<Duration>,
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
    click_through: Option<UriWithId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_parameters: Option<AdParameters>,
}

impl NonLinearAd {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width when expanded, if the unit expands.
    pub fn expanded_width(&self) -> Option<u32> {
        self.expanded_width
    }

    /// Height when expanded, if the unit expands.
    pub fn expanded_height(&self) -> Option<u32> {
        self.expanded_height
    }

    /// Defaults to `false`.
    pub fn scalable(&self) -> bool {
        self.scalable
    }

    /// Defaults to `false`.
    pub fn maintain_aspect_ratio(&self) -> bool {
        self.maintain_aspect_ratio
    }

    /// Suggested minimum display time.
    pub fn min_suggested_duration(&self) -> Option<Duration> {
        self.min_suggested_duration
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

    pub fn click_through(&self) -> Option<&UriWithId> {
        self.click_through.as_ref()
    }

    pub fn ad_parameters(&self) -> Option<&AdParameters> {
        self.ad_parameters.as_ref()
    }
}

impl Entity for NonLinearAd {
    type Field = NonLinearAdField;
    const NAME: &'static str = "NonLinearAd";
    const RULES: FieldRules<NonLinearAdField> = FieldRules {
        required: &[NonLinearAdField::Width, NonLinearAdField::Height],
        converters: &[
            Converter::new(
                Target::Text,
                &[
                    NonLinearAdField::IframeResource,
                    NonLinearAdField::HtmlResource,
                    NonLinearAdField::Id,
                ],
            ),
            Converter::new(
                Target::U32,
                &[
                    NonLinearAdField::Width,
                    NonLinearAdField::Height,
                    NonLinearAdField::ExpandedWidth,
                    NonLinearAdField::ExpandedHeight,
                ],
            ),
            Converter::new(Target::Duration, &[NonLinearAdField::MinSuggestedDuration]),
            Converter::new(
                Target::Flag,
                &[NonLinearAdField::Scalable, NonLinearAdField::MaintainAspectRatio],
            ),
            Converter::new(Target::token::<ApiFramework>(), &[NonLinearAdField::ApiFramework]),
        ],
        nested: &[
            Nested::one::<StaticResource>(NonLinearAdField::StaticResource),
            Nested::one::<UriWithId>(NonLinearAdField::ClickThrough),
            Nested::one::<AdParameters>(NonLinearAdField::AdParameters),
        ],
        exclusions: &[ExclusionGroup::at_most(
            "resource",
            &[
                NonLinearAdField::IframeResource,
                NonLinearAdField::HtmlResource,
                NonLinearAdField::StaticResource,
            ],
            3,
        )],
        bounds: &[
            Bound::above(NonLinearAdField::Width, 0),
            Bound::above(NonLinearAdField::Height, 0),
            Bound::above(NonLinearAdField::ExpandedWidth, 0),
            Bound::above(NonLinearAdField::ExpandedHeight, 0),
            Bound::at_least(NonLinearAdField::MinSuggestedDuration, 0),
        ],
        defaults: &[
            (NonLinearAdField::Scalable, false),
            (NonLinearAdField::MaintainAspectRatio, false),
        ],
    };

    fn assemble(fields: &mut Fields<NonLinearAdField>) -> Result<Self, Violation> {
        Ok(Self {
            width: fields.require_integer(NonLinearAdField::Width)?,
            height: fields.require_integer(NonLinearAdField::Height)?,
            expanded_width: fields.integer(NonLinearAdField::ExpandedWidth)?,
            expanded_height: fields.integer(NonLinearAdField::ExpandedHeight)?,
            scalable: fields.require_flag(NonLinearAdField::Scalable)?,
            maintain_aspect_ratio: fields.require_flag(NonLinearAdField::MaintainAspectRatio)?,
            min_suggested_duration: fields.duration(NonLinearAdField::MinSuggestedDuration)?,
            api_framework: fields.token(NonLinearAdField::ApiFramework)?,
            id: fields.text(NonLinearAdField::Id)?,
            static_resource: fields.child(NonLinearAdField::StaticResource)?,
            iframe_resource: fields.text(NonLinearAdField::IframeResource)?,
            html_resource: fields.text(NonLinearAdField::HtmlResource)?,
            click_through: fields.child(NonLinearAdField::ClickThrough)?,
            ad_parameters: fields.child(NonLinearAdField::AdParameters)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("width", self.width.to_string())
            .with("height", self.height.to_string())
            .with_opt("expanded_width", serial::number(self.expanded_width))
            .with_opt("expanded_height", serial::number(self.expanded_height))
            .with("scalable", vast_core::format_flag(self.scalable))
            .with("maintain_aspect_ratio", vast_core::format_flag(self.maintain_aspect_ratio))
            .with_opt(
                "min_suggested_duration",
                self.min_suggested_duration.map(serial::duration),
            )
            .with_opt("api_framework", self.api_framework.map(|a| a.to_string()))
            .with_opt("id", self.id.clone())
            .with_opt("static_resource", serial::child(self.static_resource.as_ref()))
            .with_opt("iframe_resource", self.iframe_resource.clone())
            .with_opt("html_resource", self.html_resource.clone())
            .with_opt("click_through", serial::child(self.click_through.as_ref()))
            .with_opt("ad_parameters", serial::child(self.ad_parameters.as_ref()))
    }
}

field_keys! {
    /// Raw keys of a [`NonLinearCreative`].
    pub enum NonLinearCreativeField {
        NonLinearAds => "non_linear_ads",
        TrackingEvents => "tracking_events",
    }
}

/// Container for one or more overlay units and their shared tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonLinearCreative {
    non_linear_ads: Vec<NonLinearAd>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tracking_events: Vec<TrackingEvent>,
}

impl NonLinearCreative {
    /// Never empty.
    pub fn non_linear_ads(&self) -> &[NonLinearAd] {
        &self.non_linear_ads
    }

    pub fn tracking_events(&self) -> &[TrackingEvent] {
        &self.tracking_events
    }
}

impl Entity for NonLinearCreative {
    type Field = NonLinearCreativeField;
    const NAME: &'static str = "NonLinearCreative";
    const RULES: FieldRules<NonLinearCreativeField> = FieldRules {
        required: &[NonLinearCreativeField::NonLinearAds],
        nested: &[
            Nested::many::<NonLinearAd>(NonLinearCreativeField::NonLinearAds),
            Nested::many::<TrackingEvent>(NonLinearCreativeField::TrackingEvents),
        ],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<NonLinearCreativeField>) -> Result<Self, Violation> {
        Ok(Self {
            non_linear_ads: fields.require_children(NonLinearCreativeField::NonLinearAds)?,
            tracking_events: fields.children(NonLinearCreativeField::TrackingEvents)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with_opt("non_linear_ads", serial::list(&self.non_linear_ads))
            .with_opt("tracking_events", serial::list(&self.tracking_events))
    }
}
