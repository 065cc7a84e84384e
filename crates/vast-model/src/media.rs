//! # Linear Media Entities
//!
//! The leaves of a linear creative: media files, tracking events, click
//! URIs and ad parameters.
//!
//! ## Delivery Rules
//!
//! A [`MediaFile`]'s bitrate fields depend on its delivery mode:
//!
//! - `progressive` needs `bitrate`, strictly positive.
//! - `streaming` needs `min_bitrate` and `max_bitrate` with `min <= max`.
//! - Interactive containers (JavaScript, Flash) skip both branches.

use serde::Serialize;
use vast_core::primitives::{greater_than, ordered_pair};
use vast_core::{
    field_keys, Bound, Converter, Entity, FieldRules, Fields, RawMap, SemanticValidator, Target,
    Violation, ViolationKind,
};

use crate::enums::{ApiFramework, Delivery, MimeType, TrackingEventType};
use crate::serial;

// ─── Tracking Event ──────────────────────────────────────────────────

field_keys! {
    /// Raw keys of a [`TrackingEvent`].
    pub enum TrackingEventField {
        Uri => "uri",
        Event => "event",
    }
}

/// A URI the player requests when a given event occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingEvent {
    uri: String,
    event: TrackingEventType,
}

impl TrackingEvent {
    /// Tracking URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The event that triggers the request.
    pub fn event(&self) -> TrackingEventType {
        self.event
    }
}

impl Entity for TrackingEvent {
    type Field = TrackingEventField;
    const NAME: &'static str = "TrackingEvent";
    const RULES: FieldRules<TrackingEventField> = FieldRules {
        required: &[TrackingEventField::Uri, TrackingEventField::Event],
        converters: &[
            Converter::new(Target::Text, &[TrackingEventField::Uri]),
            Converter::new(Target::token::<TrackingEventType>(), &[TrackingEventField::Event]),
        ],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<TrackingEventField>) -> Result<Self, Violation> {
        Ok(Self {
            uri: fields.require_text(TrackingEventField::Uri)?,
            event: fields.require_token(TrackingEventField::Event)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("uri", self.uri.as_str())
            .with("event", self.event.to_string())
    }
}

// ─── Media File ──────────────────────────────────────────────────────

field_keys! {
    /// Raw keys of a [`MediaFile`].
    pub enum MediaFileField {
        Asset => "asset",
        Delivery => "delivery",
        MimeType => "mime_type",
        Width => "width",
        Height => "height",
        Codec => "codec",
        Id => "id",
        Bitrate => "bitrate",
        MinBitrate => "min_bitrate",
        MaxBitrate => "max_bitrate",
        Scalable => "scalable",
        MaintainAspectRatio => "maintain_aspect_ratio",
        ApiFramework => "api_framework",
    }
}

/// One encoding of a linear creative's video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFile {
    asset: String,
    delivery: Delivery,
    mime_type: MimeType,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    codec: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_bitrate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scalable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maintain_aspect_ratio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_framework: Option<ApiFramework>,
}

impl MediaFile {
    /// URI of the media asset.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    pub fn mime_type(&self) -> MimeType {
        self.mime_type
    }

    /// Native width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Codec per RFC 4281.
    pub fn codec(&self) -> Option<&str> {
        self.codec.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Average bitrate in Kbps, for progressive delivery.
    pub fn bitrate(&self) -> Option<u32> {
        self.bitrate
    }

    /// Lower end of the streaming bitrate range.
    pub fn min_bitrate(&self) -> Option<u32> {
        self.min_bitrate
    }

    /// Upper end of the streaming bitrate range.
    pub fn max_bitrate(&self) -> Option<u32> {
        self.max_bitrate
    }

    pub fn scalable(&self) -> Option<bool> {
        self.scalable
    }

    pub fn maintain_aspect_ratio(&self) -> Option<bool> {
        self.maintain_aspect_ratio
    }

    pub fn api_framework(&self) -> Option<ApiFramework> {
        self.api_framework
    }
}

/// Bitrate requirements that depend on the delivery mode.
fn validate_delivery_bitrates(media: &MediaFile) -> Vec<Violation> {
    let entity = MediaFile::NAME;
    if media.mime_type.is_interactive() {
        return Vec::new();
    }

    match media.delivery {
        Delivery::Progressive => match media.bitrate {
            None => vec![Violation::semantic(
                entity,
                "bitrate",
                "'bitrate' is required for progressive delivery",
            )],
            Some(bitrate) => greater_than(0)(&bitrate, "bitrate")
                .err()
                .map(|r| r.into_violation(ViolationKind::SemanticValidationFailure, entity))
                .into_iter()
                .collect(),
        },
        Delivery::Streaming => match (media.min_bitrate, media.max_bitrate) {
            (Some(min), Some(max)) => ordered_pair()(&(min, max), "min_bitrate")
                .err()
                .map(|r| {
                    Violation::new(
                        ViolationKind::SemanticValidationFailure,
                        entity,
                        ["min_bitrate", "max_bitrate"],
                        r.reason,
                    )
                })
                .into_iter()
                .collect(),
            (min, max) => [("min_bitrate", min), ("max_bitrate", max)]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(field, _)| {
                    Violation::semantic(
                        entity,
                        field,
                        format!("'{field}' is required for streaming delivery"),
                    )
                })
                .collect(),
        },
    }
}

impl Entity for MediaFile {
    type Field = MediaFileField;
    const NAME: &'static str = "MediaFile";
    const RULES: FieldRules<MediaFileField> = FieldRules {
        required: &[
            MediaFileField::Asset,
            MediaFileField::Delivery,
            MediaFileField::MimeType,
            MediaFileField::Width,
            MediaFileField::Height,
        ],
        converters: &[
            Converter::new(
                Target::Text,
                &[MediaFileField::Asset, MediaFileField::Codec, MediaFileField::Id],
            ),
            Converter::new(
                Target::U32,
                &[
                    MediaFileField::Width,
                    MediaFileField::Height,
                    MediaFileField::Bitrate,
                    MediaFileField::MinBitrate,
                    MediaFileField::MaxBitrate,
                ],
            ),
            Converter::new(
                Target::Flag,
                &[MediaFileField::Scalable, MediaFileField::MaintainAspectRatio],
            ),
            Converter::new(Target::token::<MimeType>(), &[MediaFileField::MimeType]),
            Converter::new(Target::token::<ApiFramework>(), &[MediaFileField::ApiFramework]),
            Converter::new(Target::token::<Delivery>(), &[MediaFileField::Delivery]),
        ],
        bounds: &[
            Bound::above(MediaFileField::Width, 0),
            Bound::above(MediaFileField::Height, 0),
            Bound::at_least(MediaFileField::Bitrate, 0),
            Bound::at_least(MediaFileField::MinBitrate, 0),
            Bound::at_least(MediaFileField::MaxBitrate, 0),
        ],
        ..FieldRules::new()
    };
    const VALIDATORS: &'static [SemanticValidator<Self>] = &[validate_delivery_bitrates];

    fn assemble(fields: &mut Fields<MediaFileField>) -> Result<Self, Violation> {
        Ok(Self {
            asset: fields.require_text(MediaFileField::Asset)?,
            delivery: fields.require_token(MediaFileField::Delivery)?,
            mime_type: fields.require_token(MediaFileField::MimeType)?,
            width: fields.require_integer(MediaFileField::Width)?,
            height: fields.require_integer(MediaFileField::Height)?,
            codec: fields.text(MediaFileField::Codec)?,
            id: fields.text(MediaFileField::Id)?,
            bitrate: fields.integer(MediaFileField::Bitrate)?,
            min_bitrate: fields.integer(MediaFileField::MinBitrate)?,
            max_bitrate: fields.integer(MediaFileField::MaxBitrate)?,
            scalable: fields.flag(MediaFileField::Scalable)?,
            maintain_aspect_ratio: fields.flag(MediaFileField::MaintainAspectRatio)?,
            api_framework: fields.token(MediaFileField::ApiFramework)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("asset", self.asset.as_str())
            .with("delivery", self.delivery.to_string())
            .with("mime_type", self.mime_type.to_string())
            .with("width", self.width.to_string())
            .with("height", self.height.to_string())
            .with_opt("codec", self.codec.clone())
            .with_opt("id", self.id.clone())
            .with_opt("bitrate", serial::number(self.bitrate))
            .with_opt("min_bitrate", serial::number(self.min_bitrate))
            .with_opt("max_bitrate", serial::number(self.max_bitrate))
            .with_opt("scalable", serial::flag(self.scalable))
            .with_opt("maintain_aspect_ratio", serial::flag(self.maintain_aspect_ratio))
            .with_opt("api_framework", self.api_framework.map(|a| a.to_string()))
    }
}

// ─── Video Clicks ────────────────────────────────────────────────────

field_keys! {
    /// Raw keys of [`VideoClicks`].
    pub enum VideoClicksField {
        ClickThrough => "click_through",
        ClickTracking => "click_tracking",
        CustomClick => "custom_click",
    }
}

/// URIs used when the viewer clicks the video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoClicks {
    #[serde(skip_serializing_if = "Option::is_none")]
    click_through: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    click_tracking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_click: Option<String>,
}

impl VideoClicks {
    /// Landing page opened on click.
    pub fn click_through(&self) -> Option<&str> {
        self.click_through.as_deref()
    }

    pub fn click_tracking(&self) -> Option<&str> {
        self.click_tracking.as_deref()
    }

    pub fn custom_click(&self) -> Option<&str> {
        self.custom_click.as_deref()
    }
}

impl Entity for VideoClicks {
    type Field = VideoClicksField;
    const NAME: &'static str = "VideoClicks";
    const RULES: FieldRules<VideoClicksField> = FieldRules {
        converters: &[Converter::new(
            Target::Text,
            &[
                VideoClicksField::ClickThrough,
                VideoClicksField::ClickTracking,
                VideoClicksField::CustomClick,
            ],
        )],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<VideoClicksField>) -> Result<Self, Violation> {
        Ok(Self {
            click_through: fields.text(VideoClicksField::ClickThrough)?,
            click_tracking: fields.text(VideoClicksField::ClickTracking)?,
            custom_click: fields.text(VideoClicksField::CustomClick)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with_opt("click_through", self.click_through.clone())
            .with_opt("click_tracking", self.click_tracking.clone())
            .with_opt("custom_click", self.custom_click.clone())
    }
}

// ─── Ad Parameters ───────────────────────────────────────────────────

field_keys! {
    /// Raw keys of [`AdParameters`].
    pub enum AdParametersField {
        Data => "data",
        XmlEncoded => "xml_encoded",
    }
}

/// Opaque data handed to the creative on initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdParameters {
    data: String,
    xml_encoded: bool,
}

impl AdParameters {
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Whether `data` is XML-encoded. Defaults to `false`.
    pub fn xml_encoded(&self) -> bool {
        self.xml_encoded
    }
}

impl Entity for AdParameters {
    type Field = AdParametersField;
    const NAME: &'static str = "AdParameters";
    const RULES: FieldRules<AdParametersField> = FieldRules {
        required: &[AdParametersField::Data],
        converters: &[
            Converter::new(Target::Text, &[AdParametersField::Data]),
            Converter::new(Target::Flag, &[AdParametersField::XmlEncoded]),
        ],
        defaults: &[(AdParametersField::XmlEncoded, false)],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<AdParametersField>) -> Result<Self, Violation> {
        Ok(Self {
            data: fields.require_text(AdParametersField::Data)?,
            xml_encoded: fields.require_flag(AdParametersField::XmlEncoded)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("data", self.data.as_str())
            .with("xml_encoded", vast_core::format_flag(self.xml_encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progressive_mp4() -> RawMap {
        RawMap::new()
            .with("asset", "https://cdn.example.com/ad.mp4")
            .with("delivery", "progressive")
            .with("mime_type", "video/mp4")
            .with("width", "720")
            .with("height", "420")
    }

    fn streaming_3gpp(min: &str, max: &str) -> RawMap {
        RawMap::new()
            .with("asset", "rtsp://cdn.example.com/ad.3gp")
            .with("delivery", "streaming")
            .with("mime_type", "video/3gpp")
            .with("width", "176")
            .with("height", "144")
            .with("min_bitrate", min)
            .with("max_bitrate", max)
    }

    #[test]
    fn test_progressive_with_bitrate() {
        let media = MediaFile::from_raw(&progressive_mp4().with("bitrate", "300")).unwrap();
        assert_eq!(media.delivery(), Delivery::Progressive);
        assert_eq!(media.bitrate(), Some(300));
        assert_eq!(media.width(), 720);
        assert_eq!(media.codec(), None);
    }

    #[test]
    fn test_progressive_without_bitrate_fails() {
        let err = MediaFile::from_raw(&progressive_mp4()).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        let v = &err.violations()[0];
        assert_eq!(v.kind, ViolationKind::SemanticValidationFailure);
        assert!(v.names_field("bitrate"));
    }

    #[test]
    fn test_progressive_zero_bitrate_fails() {
        let err = MediaFile::from_raw(&progressive_mp4().with("bitrate", "0")).unwrap_err();
        assert!(err.violations()[0].message.contains("greater than 0"));
    }

    #[test]
    fn test_streaming_ordered_range() {
        let media = MediaFile::from_raw(&streaming_3gpp("51", "900")).unwrap();
        assert_eq!(media.min_bitrate(), Some(51));
        assert_eq!(media.max_bitrate(), Some(900));
    }

    #[test]
    fn test_streaming_inverted_range_fails() {
        let err = MediaFile::from_raw(&streaming_3gpp("900", "51")).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        let v = &err.violations()[0];
        assert!(v.names_field("min_bitrate"));
        assert!(v.names_field("max_bitrate"));
        assert!(v.message.contains("greater than upper value"));
    }

    #[test]
    fn test_streaming_missing_both_bounds_reports_both() {
        let mut raw = streaming_3gpp("1", "2");
        raw.remove("min_bitrate");
        raw.remove("max_bitrate");
        let err = MediaFile::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 2);
    }

    #[test]
    fn test_interactive_skips_bitrate_rules() {
        let raw = RawMap::new()
            .with("asset", "https://cdn.example.com/vpaid.js")
            .with("delivery", "progressive")
            .with("mime_type", "application/javascript")
            .with("api_framework", "VPAID")
            .with("width", "176")
            .with("height", "144");
        let media = MediaFile::from_raw(&raw).unwrap();
        assert_eq!(media.api_framework(), Some(ApiFramework::Vpaid));
        assert!(media.mime_type().is_interactive());
    }

    #[test]
    fn test_non_positive_dimensions_fail() {
        let raw = progressive_mp4()
            .with("bitrate", "300")
            .with("width", "0")
            .with("height", "-4");
        let err = MediaFile::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 2);
        assert!(err.violations().iter().any(|v| v.names_field("width")));
        assert!(err.violations().iter().any(|v| v.names_field("height")));
    }

    #[test]
    fn test_zero_width_and_missing_bitrate_both_reported() {
        let raw = progressive_mp4().with("width", "0").with("height", "360");
        let err = MediaFile::from_raw(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.count(ViolationKind::SemanticValidationFailure), 2);
        assert!(err.violations().iter().any(|v| v.names_field("width")));
        assert!(err
            .violations()
            .iter()
            .any(|v| v.names_field("bitrate") && v.message.contains("required for progressive")));
    }

    #[test]
    fn test_every_oversized_dimension_reported() {
        let raw = progressive_mp4()
            .with("width", "5000000000")
            .with("height", "5000000000")
            .with("bitrate", "300");
        let err = MediaFile::from_raw(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert_eq!(err.count(ViolationKind::ConversionFailure), 2);
        assert!(err.violations().iter().any(|v| v.names_field("width")));
        assert!(err.violations().iter().any(|v| v.names_field("height")));
    }

    #[test]
    fn test_unknown_delivery_is_conversion_failure() {
        let raw = progressive_mp4().with("delivery", "Streaming");
        let err = MediaFile::from_raw(&raw).unwrap_err();
        assert_eq!(err.count(ViolationKind::ConversionFailure), 1);
    }

    #[test]
    fn test_media_file_missing_everything() {
        let err = MediaFile::from_raw(&RawMap::new()).unwrap_err();
        assert_eq!(err.count(ViolationKind::MissingRequiredField), 5);
    }

    #[test]
    fn test_tracking_event() {
        let raw = RawMap::new()
            .with("uri", "https://t.example.com/start")
            .with("event", "start");
        let event = TrackingEvent::from_raw(&raw).unwrap();
        assert_eq!(event.event(), TrackingEventType::Start);
        assert_eq!(TrackingEvent::from_raw(&event.to_raw()).unwrap(), event);
    }

    #[test]
    fn test_ad_parameters_default() {
        let params = AdParameters::from_raw(&RawMap::new().with("data", "k=v")).unwrap();
        assert!(!params.xml_encoded());
        let encoded =
            AdParameters::from_raw(&RawMap::new().with("data", "<x/>").with("xml_encoded", "true"))
                .unwrap();
        assert!(encoded.xml_encoded());
    }

    #[test]
    fn test_video_clicks_all_optional() {
        let clicks = VideoClicks::from_raw(&RawMap::new()).unwrap();
        assert_eq!(clicks, VideoClicks::default());
    }
}
