//! # Closed Value Sets
//!
//! The fixed vocabularies of a VAST 2.0 document. Raw tokens are matched
//! exactly and case-sensitively; `Streaming` is not `streaming`.

use vast_core::vocabulary;

vocabulary! {
    /// How a media file reaches the player.
    pub enum Delivery: "delivery mode" {
        /// Streaming protocols. Requires a bitrate range.
        Streaming => "streaming",
        /// Progressive download (such as HTTP). Requires a single bitrate.
        Progressive => "progressive",
    }
}

vocabulary! {
    /// MIME type of a media file container.
    pub enum MimeType: "MIME type" {
        Mp4 => "video/mp4",
        JavaScript => "application/javascript",
        Flash => "application/x-shockwave-flash",
        Webm => "video/webm",
        ThreeGpp => "video/3gpp",
        Mpeg => "application/x-mpegURL",
    }
}

impl MimeType {
    /// Script and Flash containers carry interactive units rather than
    /// encoded video, so they declare no bitrate.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::JavaScript | Self::Flash)
    }
}

vocabulary! {
    /// API required to communicate with an interactive creative.
    pub enum ApiFramework: "API framework" {
        /// Video Player-Ad Interface Definition.
        Vpaid => "VPAID",
    }
}

vocabulary! {
    /// Player events a tracking URI can subscribe to.
    pub enum TrackingEventType: "tracking event type" {
        CreativeView => "creativeView",
        Start => "start",
        FirstQuartile => "firstQuartile",
        Midpoint => "midpoint",
        ThirdQuartile => "thirdQuartile",
        Complete => "complete",
        Mute => "mute",
        Unmute => "unmute",
        Pause => "pause",
        Rewind => "rewind",
        Resume => "resume",
        Fullscreen => "fullscreen",
        Expand => "expand",
        Collapse => "collapse",
        AcceptInvitation => "acceptInvitation",
        Close => "close",
    }
}
