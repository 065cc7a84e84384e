//! End-to-end parsing of VAST 2.0 documents through every front end.

use std::time::Duration;

use vast_core::{Entity, ViolationKind};
use vast_document::{parse_document, AssemblerConfig, DocumentError, Format};
use vast_model::{ApiFramework, CreativeKind, Delivery, MimeType, TrackingEventType, Vast};

const WRAPPER: &str = include_str!("fixtures/wrapper.xml");
const INLINE: &str = include_str!("fixtures/inline.xml");
const INLINE_YAML: &str = include_str!("fixtures/inline.yaml");
const MANY_MEDIA_FILES: &str = include_str!("fixtures/many_media_files.xml");
const NON_LINEAR_AND_COMPANIONS: &str = include_str!("fixtures/non_linear_and_companions.xml");

fn parse(xml: &str) -> Vast {
    parse_document(xml, Format::Xml, &AssemblerConfig::default()).unwrap()
}

fn parse_err(xml: &str) -> DocumentError {
    parse_document(xml, Format::Xml, &AssemblerConfig::default()).unwrap_err()
}

// =========================================================================
// Wrapper and inline ads
// =========================================================================

#[test]
fn test_wrapper_document() {
    let vast = parse(WRAPPER);
    assert_eq!(vast.version(), "2.0");
    assert_eq!(vast.ad().id(), "70470");

    let wrapper = vast.ad().wrapper().unwrap();
    assert_eq!(wrapper.ad_system(), "MagU");
    assert_eq!(wrapper.vast_ad_tag_uri(), "//vast.dv.com/v3/vast?_vast");
    assert_eq!(wrapper.impression(), Some("//magu.d.com/vidimp"));
    assert_eq!(wrapper.error(), Some("//magu.d.com/viderr?err=[ERRORCODE]"));
    assert!(wrapper.creatives().is_empty());
    assert!(vast.ad().inline().is_none());
}

#[test]
fn test_simple_inline_document() {
    let vast = parse(INLINE);
    let inline = vast.ad().inline().unwrap();
    assert_eq!(vast.ad().id(), "509080ATOU");
    assert_eq!(inline.ad_system(), "MagU");
    assert_eq!(
        inline.ad_title(),
        "Centers for Disease Control and Prevention: Who Needs a Flu Vaccine"
    );
    assert_eq!(inline.impression(), "https://mag.dom.com/admy?ad_id=509080ATOU");
    assert_eq!(inline.creatives().len(), 1);

    let linear = inline.creatives()[0].linear().unwrap();
    assert_eq!(linear.duration(), Duration::from_secs(15));
    let media = &linear.media_files()[0];
    assert_eq!(media.delivery(), Delivery::Progressive);
    assert_eq!(media.mime_type(), MimeType::Mp4);
    assert_eq!((media.width(), media.height()), (720, 420));
    assert_eq!(media.bitrate(), Some(300));
    assert_eq!(
        media.asset(),
        "https://www.cdc.gov/flu/video/who-needs-flu-vaccine-15_720px.mp4"
    );
}

#[test]
fn test_documents_round_trip_through_raw() {
    for xml in [WRAPPER, INLINE, MANY_MEDIA_FILES, NON_LINEAR_AND_COMPANIONS] {
        let vast = parse(xml);
        assert_eq!(Vast::from_raw(&vast.to_raw()), Ok(vast));
    }
}

#[test]
fn test_yaml_and_xml_agree() {
    let from_xml = parse(INLINE);
    let from_yaml = parse_document(INLINE_YAML, Format::Yaml, &AssemblerConfig::default()).unwrap();
    assert_eq!(from_xml, from_yaml);
}

#[test]
fn test_json_document() {
    let json = serde_json::json!({
        "VAST": {
            "@version": "2.0",
            "Ad": {
                "@id": "70470",
                "Wrapper": {
                    "AdSystem": "MagU",
                    "VASTAdTagURI": "//vast.dv.com/v3/vast?_vast",
                    "Impression": "//magu.d.com/vidimp",
                    "Error": "//magu.d.com/viderr?err=[ERRORCODE]"
                }
            }
        }
    });
    let vast = parse_document(&json.to_string(), Format::Json, &AssemblerConfig::default()).unwrap();
    assert_eq!(vast, parse(WRAPPER));
}

// =========================================================================
// Linear creative details
// =========================================================================

#[test]
fn test_many_media_files() {
    let vast = parse(MANY_MEDIA_FILES);
    let linear = vast.ad().inline().unwrap().creatives()[0].linear().unwrap();
    let files = linear.media_files();
    assert_eq!(files.len(), 7);

    let mimes: Vec<MimeType> = files.iter().map(|f| f.mime_type()).collect();
    assert_eq!(
        mimes,
        vec![
            MimeType::Flash,
            MimeType::JavaScript,
            MimeType::ThreeGpp,
            MimeType::ThreeGpp,
            MimeType::Mp4,
            MimeType::Webm,
            MimeType::Mpeg,
        ]
    );

    assert_eq!(files[0].api_framework(), Some(ApiFramework::Vpaid));
    assert_eq!(files[0].bitrate(), None);

    let stream = &files[2];
    assert_eq!(stream.delivery(), Delivery::Streaming);
    assert_eq!((stream.min_bitrate(), stream.max_bitrate()), (Some(51), Some(900)));
    assert_eq!(stream.scalable(), Some(false));
    assert_eq!(stream.maintain_aspect_ratio(), Some(false));

    let bitrates: Vec<Option<u32>> = files[3..6].iter().map(|f| f.bitrate()).collect();
    assert_eq!(bitrates, vec![Some(177), Some(409), Some(2452)]);
    assert_eq!((files[5].width(), files[5].height()), (1280, 720));
}

#[test]
fn test_tracking_events_in_document_order() {
    let vast = parse(MANY_MEDIA_FILES);
    let linear = vast.ad().inline().unwrap().creatives()[0].linear().unwrap();
    let events = linear.tracking_events();
    assert_eq!(events.len(), 14);
    assert_eq!(events[0].event(), TrackingEventType::CreativeView);
    assert_eq!(events[13].event(), TrackingEventType::Close);
    for event in events {
        assert_eq!(
            event.uri(),
            format!("https://mag.dom.com/vidtrk?evt={}", event.event())
        );
    }
}

#[test]
fn test_creative_attributes() {
    let vast = parse(MANY_MEDIA_FILES);
    let creative = &vast.ad().inline().unwrap().creatives()[0];
    assert_eq!(creative.id(), Some("81997481"));
    assert_eq!(creative.sequence(), Some(1));
    assert_eq!(creative.ad_id(), Some("MagU"));
    assert_eq!(creative.api_framework(), Some(ApiFramework::Vpaid));
    assert!(matches!(creative.kind(), CreativeKind::Linear(_)));
}

#[test]
fn test_video_clicks_and_ad_parameters() {
    let vast = parse(MANY_MEDIA_FILES);
    let linear = vast.ad().inline().unwrap().creatives()[0].linear().unwrap();
    let clicks = linear.video_clicks().unwrap();
    assert_eq!(clicks.click_through(), Some("https://mag.dom.com/click_through"));
    assert_eq!(clicks.click_tracking(), Some("https://mag.dom.com/click_tracking"));
    assert_eq!(clicks.custom_click(), Some("https://mag.dom.com/custom_click"));

    let params = linear.ad_parameters().unwrap();
    assert_eq!(params.data(), "{data : funky data goes here}");
    assert!(!params.xml_encoded());
}

// =========================================================================
// Non-linear and companion creatives
// =========================================================================

#[test]
fn test_non_linear_ads() {
    let vast = parse(NON_LINEAR_AND_COMPANIONS);
    let creatives = vast.ad().inline().unwrap().creatives();
    assert_eq!(creatives.len(), 2);
    let non_linear = creatives[0].non_linear().unwrap();
    let ads = non_linear.non_linear_ads();
    assert_eq!(ads.len(), 2);

    let first = &ads[0];
    assert_eq!(first.id(), Some("non_linear_1"));
    assert_eq!((first.width(), first.height()), (100, 200));
    assert_eq!((first.expanded_width(), first.expanded_height()), (Some(500), Some(1000)));
    assert!(first.scalable());
    assert!(first.maintain_aspect_ratio());
    assert_eq!(first.min_suggested_duration(), Some(Duration::from_secs(30)));
    assert_eq!(first.api_framework(), Some(ApiFramework::Vpaid));
    let image = first.static_resource().unwrap();
    assert_eq!(image.resource(), "https://some.static.resource.png");
    assert_eq!(image.creative_type(), "image/png");
    assert_eq!(first.iframe_resource(), Some("https://some.iframe.resource"));
    let click = first.click_through().unwrap();
    assert_eq!(click.resource(), "https://mag.dom.com/non/linear/click/through");
    assert_eq!(click.id(), Some("for_fun"));

    let second = &ads[1];
    assert_eq!(second.id(), Some("non_linear_2"));
    assert_eq!(second.html_resource(), Some("https://some.html.resource.html"));
    assert!(!second.scalable());
    assert_eq!(
        second.ad_parameters().map(|p| p.data()),
        Some("{data : funky data goes here}")
    );

    assert_eq!(non_linear.tracking_events().len(), 1);
    assert_eq!(non_linear.tracking_events()[0].event(), TrackingEventType::CreativeView);
}

#[test]
fn test_companion_ads() {
    let vast = parse(NON_LINEAR_AND_COMPANIONS);
    let companion = vast.ad().inline().unwrap().creatives()[1].companion().unwrap();
    let ads = companion.companion_ads();
    assert_eq!(ads.len(), 2);

    let first = &ads[0];
    assert_eq!(first.id(), Some("companion_ad_1"));
    assert_eq!((first.width(), first.height()), (100, 200));
    assert!(first.static_resource().is_some());
    assert_eq!(first.iframe_resource(), Some("https://some.iframe.resource"));
    assert_eq!(first.click_through(), Some("https://mag.dom.com/companion/click/through"));
    assert_eq!(first.alt_text(), Some("Alternative text"));
    assert_eq!(first.tracking_events().len(), 1);

    let second = &ads[1];
    assert_eq!(second.id(), Some("companion_ad_2"));
    assert_eq!((second.width(), second.height()), (300, 700));
    assert_eq!(second.html_resource(), Some("https://some.html.resource.html"));
    assert!(second.ad_parameters().is_some());
}

// =========================================================================
// Failures
// =========================================================================

#[test]
fn test_document_level_failures() {
    assert!(matches!(
        parse_err(r#"<NotVast version="2.0"><Ad id="1"><Wrapper/></Ad></NotVast>"#),
        DocumentError::NoVastRoot { found } if found == vec!["NotVast".to_string()]
    ));
    assert!(matches!(parse_err("<VAST></VAST>"), DocumentError::EmptyRoot));
    assert!(matches!(
        parse_err(r#"<VAST version=" "><Ad id="1"/></VAST>"#),
        DocumentError::MissingVersion
    ));
    let err = parse_err(&WRAPPER.replace(r#"version="2.0">"#, r#"version="3.0">"#));
    assert!(matches!(&err, DocumentError::UnsupportedVersion { version, .. } if version == "3.0"));
    assert!(err.to_string().contains("supported: 2.0"));
    assert!(matches!(
        parse_err("<VAST version=\"2.0\"><Ad>"),
        DocumentError::Malformed { format: Format::Xml, .. }
    ));
}

#[test]
fn test_nested_violations_carry_paths() {
    let broken = MANY_MEDIA_FILES
        .replace(r#"width="640""#, r#"width="wide""#)
        .replace(r#"event="pause""#, r#"event="paused""#);
    let err = parse_err(&broken);
    let validation = err.validation().unwrap();
    assert_eq!(validation.violations().len(), 2);
    assert_eq!(validation.count(ViolationKind::ConversionFailure), 2);

    let paths: Vec<String> = validation.violations().iter().map(|v| v.path.to_string()).collect();
    assert!(paths.contains(&"ad.inline.creatives[0].linear.media_files[4]".to_string()));
    assert!(paths.contains(&"ad.inline.creatives[0].linear.tracking_events[8]".to_string()));
}

#[test]
fn test_streaming_without_bitrates() {
    let broken = MANY_MEDIA_FILES.replace(r#"minBitrate="51" maxBitrate="900""#, "");
    let err = parse_err(&broken);
    let validation = err.validation().unwrap();
    assert_eq!(validation.count(ViolationKind::SemanticValidationFailure), 2);
    assert!(validation
        .violations()
        .iter()
        .all(|v| v.path.to_string() == "ad.inline.creatives[0].linear.media_files[2]"));
}

#[test]
fn test_creative_with_two_kinds_rejected() {
    let both = NON_LINEAR_AND_COMPANIONS
        .replace("</NonLinearAds>\n        </Creative>\n        <Creative sequence=\"2\">", "</NonLinearAds>");
    let err = parse_err(&both);
    let validation = err.validation().unwrap();
    assert_eq!(validation.violations().len(), 1);
    assert_eq!(
        validation.count(ViolationKind::ExclusionGroupViolation),
        1,
        "{validation}"
    );
}
