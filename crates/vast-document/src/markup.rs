//! # XML Front End
//!
//! Reads XML into the generic raw tree with `quick-xml`:
//!
//! - attributes become `@name` keys;
//! - an element with neither attributes nor children becomes its text;
//! - otherwise non-blank text is kept under `#text`;
//! - repeated sibling elements collapse into a list in document order;
//! - empty elements below the root are dropped;
//! - CDATA is text; comments, processing instructions and the
//!   declaration are ignored.
//!
//! The returned map has exactly one key: the root element's name.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use vast_core::{RawMap, RawValue};

use crate::config::AssemblerConfig;
use crate::error::DocumentError;
use crate::format::Format;

/// An element whose end tag has not been read yet.
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, RawValue)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: usize) -> Result<Self, DocumentError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| malformed(position, e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| malformed(position, e))?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Collapse the element into its raw node. `None` for an empty element.
    fn close(self, trim: bool) -> (String, Option<RawValue>) {
        let text = if trim { self.text.trim() } else { self.text.as_str() };
        let has_text = !self.text.trim().is_empty();

        if self.attributes.is_empty() && self.children.is_empty() {
            let node = has_text.then(|| RawValue::Text(text.to_string()));
            return (self.name, node);
        }

        let mut map = RawMap::new();
        for (key, value) in self.attributes {
            map.insert(&format!("@{key}"), value);
        }
        for (name, node) in self.children {
            merge(&mut map, &name, node);
        }
        if has_text {
            map.insert("#text", text);
        }
        (self.name, Some(RawValue::Map(map)))
    }
}

/// Add `node` under `name`, turning repeats into a list.
fn merge(map: &mut RawMap, name: &str, node: RawValue) {
    let merged = match map.remove(name) {
        None => node,
        Some(RawValue::List(mut items)) => {
            items.push(node);
            RawValue::List(items)
        }
        Some(existing) => RawValue::List(vec![existing, node]),
    };
    map.insert(name, merged);
}

fn malformed(position: usize, reason: impl std::fmt::Display) -> DocumentError {
    DocumentError::malformed(Format::Xml, format!("at byte {position}: {reason}"))
}

/// Parse an XML document into a raw tree keyed by the root element name.
pub fn parse_xml(input: &str, config: &AssemblerConfig) -> Result<RawMap, DocumentError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, RawValue)> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader.read_event().map_err(|e| malformed(position, e))?;
        let closed = match event {
            Event::Start(start) => {
                if stack.len() >= config.max_depth {
                    return Err(DocumentError::DepthExceeded {
                        max_depth: config.max_depth,
                    });
                }
                stack.push(Frame::open(&start, position)?);
                None
            }
            Event::Empty(start) => {
                if stack.len() >= config.max_depth {
                    return Err(DocumentError::DepthExceeded {
                        max_depth: config.max_depth,
                    });
                }
                Some(Frame::open(&start, position)?.close(config.trim_text))
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| malformed(position, "closing tag without an open element"))?;
                Some(frame.close(config.trim_text))
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(position, e))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed(position, "text outside the root element")),
                }
                None
            }
            Event::CData(data) => {
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&String::from_utf8_lossy(&data)),
                    None => return Err(malformed(position, "CDATA outside the root element")),
                }
                None
            }
            Event::Eof => break,
            _ => None,
        };

        let Some((name, node)) = closed else {
            continue;
        };
        match stack.last_mut() {
            Some(parent) => {
                if let Some(node) = node {
                    parent.children.push((name, node));
                }
            }
            None if root.is_some() => {
                return Err(malformed(position, format!("second root element <{name}>")));
            }
            // An empty root is kept as empty text so the caller can tell
            // "no children" from "no root".
            None => root = Some((name, node.unwrap_or_else(|| RawValue::Text(String::new())))),
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            reader.buffer_position(),
            format!("unclosed element <{}>", open.name),
        ));
    }
    let (name, node) = root.ok_or_else(|| malformed(0, "document has no root element"))?;
    tracing::trace!(root = %name, "parsed XML tree");
    Ok(RawMap::new().with(&name, node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> RawMap {
        parse_xml(xml, &AssemblerConfig::default()).unwrap()
    }

    #[test]
    fn test_attributes_text_and_repeats() {
        let tree = parse(
            r#"<?xml version="1.0"?>
            <VAST version="2.0">
              <Ad id="1">
                <Impression> https://imp </Impression>
                <Tracking event="start">https://a</Tracking>
                <Tracking event="pause">https://b</Tracking>
              </Ad>
            </VAST>"#,
        );
        let vast = tree.get("VAST").and_then(|v| v.as_map()).unwrap();
        assert_eq!(vast.text("@version"), Some("2.0"));
        let ad = vast.get("Ad").and_then(|v| v.as_map()).unwrap();
        assert_eq!(ad.text("@id"), Some("1"));
        assert_eq!(ad.text("Impression"), Some("https://imp"));
        let tracking = ad.get("Tracking").and_then(|v| v.as_list()).unwrap();
        assert_eq!(tracking.len(), 2);
        let second = tracking[1].as_map().unwrap();
        assert_eq!(second.text("@event"), Some("pause"));
        assert_eq!(second.text("#text"), Some("https://b"));
    }

    #[test]
    fn test_cdata_and_entities() {
        let tree = parse("<Root><A><![CDATA[a<b]]></A><B>x &amp; y</B></Root>");
        let root = tree.get("Root").and_then(|v| v.as_map()).unwrap();
        assert_eq!(root.text("A"), Some("a<b"));
        assert_eq!(root.text("B"), Some("x & y"));
    }

    #[test]
    fn test_empty_elements_dropped() {
        let tree = parse("<Root><A/><B></B><C>c</C></Root>");
        let root = tree.get("Root").and_then(|v| v.as_map()).unwrap();
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["C"]);
    }

    #[test]
    fn test_empty_root_is_empty_text() {
        let tree = parse(r#"<VAST></VAST>"#);
        assert_eq!(tree.text("VAST"), Some(""));
    }

    #[test]
    fn test_untrimmed_text() {
        let config = AssemblerConfig {
            trim_text: false,
            ..AssemblerConfig::default()
        };
        let tree = parse_xml("<Root><A> a </A></Root>", &config).unwrap();
        let root = tree.get("Root").and_then(|v| v.as_map()).unwrap();
        assert_eq!(root.text("A"), Some(" a "));
    }

    #[test]
    fn test_malformed_markup() {
        let config = AssemblerConfig::default();
        for xml in ["<Root><A></Root>", "<Root>", "", "<A/><B/>", "<Root a=1/>"] {
            let err = parse_xml(xml, &config).unwrap_err();
            assert!(
                matches!(err, DocumentError::Malformed { format: Format::Xml, .. }),
                "{xml:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_depth_limit() {
        let config = AssemblerConfig {
            max_depth: 3,
            ..AssemblerConfig::default()
        };
        assert!(parse_xml("<a><b><c>x</c></b></a>", &config).is_ok());
        let err = parse_xml("<a><b><c><d>x</d></c></b></a>", &config).unwrap_err();
        assert!(matches!(err, DocumentError::DepthExceeded { max_depth: 3 }));
    }
}
