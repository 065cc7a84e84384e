//! # VAST 2.0 Assembler
//!
//! Maps the element-shaped raw tree (XML names, `@attr`, `#text`) onto
//! the field-shaped raw tree that `vast-model` entities accept. The
//! mapping is purely structural: values are copied, renamed, or wrapped,
//! never interpreted. Anything of an unexpected shape is copied through
//! unchanged so that entity construction reports it with its full path.
//!
//! Container elements (`Creatives`, `MediaFiles`, `TrackingEvents`) are
//! flattened: the repeated child becomes a list under the field, and a
//! single occurrence becomes a one-element list.

use vast_core::{RawMap, RawValue};

use crate::error::DocumentError;

/// Builds one field map from one element map.
struct Mapper<'a> {
    element: &'a RawMap,
    fields: RawMap,
}

type MapFn = fn(&RawMap) -> RawMap;

impl<'a> Mapper<'a> {
    fn new(element: &'a RawMap) -> Self {
        Self {
            element,
            fields: RawMap::new(),
        }
    }

    /// Copy attribute `@name` to `field`.
    fn attr(mut self, name: &str, field: &str) -> Self {
        if let Some(value) = self.element.get(&format!("@{name}")) {
            self.fields.insert(field, value.clone());
        }
        self
    }

    /// Copy the element's own text content to `field`.
    fn body(mut self, field: &str) -> Self {
        if let Some(value) = self.element.get("#text") {
            self.fields.insert(field, value.clone());
        }
        self
    }

    /// Copy the text of child element `name` to `field`, ignoring any
    /// attributes it carries.
    fn text(mut self, name: &str, field: &str) -> Self {
        if let Some(value) = self.element.get(name) {
            let text = match value {
                RawValue::Map(m) => m.get("#text").cloned(),
                other => Some(other.clone()),
            };
            if let Some(text) = text {
                self.fields.insert(field, text);
            }
        }
        self
    }

    /// Map a singular child element.
    fn child(mut self, name: &str, field: &str, map: MapFn) -> Self {
        if let Some(value) = self.element.get(name) {
            self.fields.insert(field, map_node(value, map));
        }
        self
    }

    /// Map a repeated child element into a list.
    fn repeated(mut self, name: &str, field: &str, map: MapFn) -> Self {
        if let Some(value) = self.element.get(name) {
            self.fields.insert(field, map_list(value, map));
        }
        self
    }

    /// Map the `item` children of container element `container` into a
    /// list.
    fn contained(mut self, container: &str, item: &str, field: &str, map: MapFn) -> Self {
        match self.element.get(container) {
            None => {}
            Some(RawValue::Map(inner)) => {
                if let Some(value) = inner.get(item) {
                    self.fields.insert(field, map_list(value, map));
                }
            }
            Some(other) => self.fields.insert(field, other.clone()),
        }
        self
    }

    /// Map a resource-like child whose text content becomes `text_field`.
    /// A bare text element is wrapped as `{text_field: text}`.
    fn wrapped(mut self, name: &str, field: &str, text_field: &str, map: MapFn) -> Self {
        if let Some(value) = self.element.get(name) {
            let node = match value {
                RawValue::Text(text) => RawValue::Map(RawMap::new().with(text_field, text.as_str())),
                other => map_node(other, map),
            };
            self.fields.insert(field, node);
        }
        self
    }

    fn finish(self) -> RawMap {
        self.fields
    }
}

fn map_node(value: &RawValue, map: MapFn) -> RawValue {
    match value {
        RawValue::Map(element) => RawValue::Map(map(element)),
        other => other.clone(),
    }
}

fn map_list(value: &RawValue, map: MapFn) -> RawValue {
    match value {
        RawValue::List(items) => RawValue::List(items.iter().map(|item| map_node(item, map)).collect()),
        RawValue::Map(element) => RawValue::List(vec![RawValue::Map(map(element))]),
        other => other.clone(),
    }
}

// ─── Element Mappings ────────────────────────────────────────────────

/// Assemble the field tree for a `VAST` element.
pub fn assemble(vast: &RawMap) -> Result<RawMap, DocumentError> {
    if !vast.keys().any(|k| !k.starts_with('@') && k != "#text") {
        return Err(DocumentError::EmptyRoot);
    }
    Ok(Mapper::new(vast).attr("version", "version").child("Ad", "ad", ad).finish())
}

fn ad(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .attr("id", "id")
        .child("InLine", "inline", inline)
        .child("Wrapper", "wrapper", wrapper)
        .finish()
}

fn inline(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .text("AdSystem", "ad_system")
        .text("AdTitle", "ad_title")
        .text("Description", "description")
        .text("Impression", "impression")
        .text("Error", "error")
        .contained("Creatives", "Creative", "creatives", creative)
        .finish()
}

fn wrapper(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .text("AdSystem", "ad_system")
        .text("VASTAdTagURI", "vast_ad_tag_uri")
        .text("AdTitle", "ad_title")
        .text("Impression", "impression")
        .text("Error", "error")
        .contained("Creatives", "Creative", "creatives", creative)
        .finish()
}

fn creative(element: &RawMap) -> RawMap {
    let mut mapper = Mapper::new(element)
        .attr("id", "id")
        .attr("sequence", "sequence")
        .attr("AdID", "ad_id")
        .attr("apiFramework", "api_framework")
        .child("Linear", "linear", linear)
        .child("NonLinearAds", "non_linear", non_linear_ads)
        .child("CompanionAds", "companion", companion_ads);
    if !mapper.fields.is_present("ad_id") {
        mapper = mapper.attr("adId", "ad_id");
    }
    mapper.finish()
}

fn linear(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .text("Duration", "duration")
        .contained("MediaFiles", "MediaFile", "media_files", media_file)
        .contained("TrackingEvents", "Tracking", "tracking_events", tracking)
        .child("VideoClicks", "video_clicks", video_clicks)
        .wrapped("AdParameters", "ad_parameters", "data", ad_parameters)
        .finish()
}

fn media_file(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .body("asset")
        .attr("id", "id")
        .attr("delivery", "delivery")
        .attr("type", "mime_type")
        .attr("width", "width")
        .attr("height", "height")
        .attr("codec", "codec")
        .attr("bitrate", "bitrate")
        .attr("minBitrate", "min_bitrate")
        .attr("maxBitrate", "max_bitrate")
        .attr("scalable", "scalable")
        .attr("maintainAspectRatio", "maintain_aspect_ratio")
        .attr("apiFramework", "api_framework")
        .finish()
}

fn tracking(element: &RawMap) -> RawMap {
    Mapper::new(element).body("uri").attr("event", "event").finish()
}

fn video_clicks(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .text("ClickThrough", "click_through")
        .text("ClickTracking", "click_tracking")
        .text("CustomClick", "custom_click")
        .finish()
}

fn ad_parameters(element: &RawMap) -> RawMap {
    Mapper::new(element).body("data").attr("xmlEncoded", "xml_encoded").finish()
}

fn static_resource(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .body("resource")
        .attr("creativeType", "creative_type")
        .finish()
}

fn uri_with_id(element: &RawMap) -> RawMap {
    Mapper::new(element).body("resource").attr("id", "id").finish()
}

fn non_linear_ads(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .repeated("NonLinear", "non_linear_ads", non_linear)
        .contained("TrackingEvents", "Tracking", "tracking_events", tracking)
        .finish()
}

fn non_linear(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .attr("id", "id")
        .attr("width", "width")
        .attr("height", "height")
        .attr("expandedWidth", "expanded_width")
        .attr("expandedHeight", "expanded_height")
        .attr("scalable", "scalable")
        .attr("maintainAspectRatio", "maintain_aspect_ratio")
        .attr("minSuggestedDuration", "min_suggested_duration")
        .attr("apiFramework", "api_framework")
        .wrapped("StaticResource", "static_resource", "resource", static_resource)
        .text("IFrameResource", "iframe_resource")
        .text("HTMLResource", "html_resource")
        .wrapped("NonLinearClickThrough", "click_through", "resource", uri_with_id)
        .wrapped("AdParameters", "ad_parameters", "data", ad_parameters)
        .finish()
}

fn companion_ads(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .repeated("Companion", "companion_ads", companion)
        .finish()
}

fn companion(element: &RawMap) -> RawMap {
    Mapper::new(element)
        .attr("id", "id")
        .attr("width", "width")
        .attr("height", "height")
        .attr("expandedWidth", "expanded_width")
        .attr("expandedHeight", "expanded_height")
        .attr("apiFramework", "api_framework")
        .wrapped("StaticResource", "static_resource", "resource", static_resource)
        .text("IFrameResource", "iframe_resource")
        .text("HTMLResource", "html_resource")
        .text("CompanionClickThrough", "click_through")
        .text("AltText", "alt_text")
        .wrapped("AdParameters", "ad_parameters", "data", ad_parameters)
        .contained("TrackingEvents", "Tracking", "tracking_events", tracking)
        .finish()
}
