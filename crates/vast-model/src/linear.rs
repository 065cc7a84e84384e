//! # Linear Creative
//!
//! A linear ad interrupts the content and plays in its place, typically
//! as a pre-roll. It has a duration and one or more media files.

use std::time::Duration;

use serde::Serialize;
use vast_core::{
    field_keys, Bound, Converter, Entity, FieldRules, Fields, Nested, RawMap, Target, Violation,
};

use crate::media::{AdParameters, MediaFile, TrackingEvent, VideoClicks};
use crate::serial;

field_keys! {
    /// Raw keys of a [`LinearCreative`].
    pub enum LinearCreativeField {
        Duration => "duration",
        MediaFiles => "media_files",
        TrackingEvents => "tracking_events",
        VideoClicks => "video_clicks",
        AdParameters => "ad_parameters",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinearCreative {
    #[serde(serialize_with = "serial::hhmmss")]
    duration: Duration,
    media_files: Vec<MediaFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tracking_events: Vec<TrackingEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_clicks: Option<VideoClicks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ad_parameters: Option<AdParameters>,
}

impl LinearCreative {
    /// Playback duration, whole seconds. Always positive.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Media files in document order. Never empty.
    pub fn media_files(&self) -> &[MediaFile] {
        &self.media_files
    }

    pub fn tracking_events(&self) -> &[TrackingEvent] {
        &self.tracking_events
    }

    pub fn video_clicks(&self) -> Option<&VideoClicks> {
        self.video_clicks.as_ref()
    }

    pub fn ad_parameters(&self) -> Option<&AdParameters> {
        self.ad_parameters.as_ref()
    }
}

impl Entity for LinearCreative {
    type Field = LinearCreativeField;
    const NAME: &'static str = "LinearCreative";
    const RULES: FieldRules<LinearCreativeField> = FieldRules {
        required: &[LinearCreativeField::Duration, LinearCreativeField::MediaFiles],
        converters: &[Converter::new(Target::Duration, &[LinearCreativeField::Duration])],
        nested: &[
            Nested::many::<MediaFile>(LinearCreativeField::MediaFiles),
            Nested::many::<TrackingEvent>(LinearCreativeField::TrackingEvents),
            Nested::one::<VideoClicks>(LinearCreativeField::VideoClicks),
            Nested::one::<AdParameters>(LinearCreativeField::AdParameters),
        ],
        bounds: &[Bound::above(LinearCreativeField::Duration, 0).present()],
        ..FieldRules::new()
    };

    fn assemble(fields: &mut Fields<LinearCreativeField>) -> Result<Self, Violation> {
        Ok(Self {
            duration: fields.require_duration(LinearCreativeField::Duration)?,
            media_files: fields.require_children(LinearCreativeField::MediaFiles)?,
            tracking_events: fields.children(LinearCreativeField::TrackingEvents)?,
            video_clicks: fields.child(LinearCreativeField::VideoClicks)?,
            ad_parameters: fields.child(LinearCreativeField::AdParameters)?,
        })
    }

    fn to_raw(&self) -> RawMap {
        RawMap::new()
            .with("duration", serial::duration(self.duration))
            .with_opt("media_files", serial::list(&self.media_files))
            .with_opt("tracking_events", serial::list(&self.tracking_events))
            .with_opt("video_clicks", serial::child(self.video_clicks.as_ref()))
            .with_opt("ad_parameters", serial::child(self.ad_parameters.as_ref()))
    }
}
