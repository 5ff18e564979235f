//! Event model for one XML part of a package.
//!
//! Elements and character data are decoded so the placeholder renderer can
//! walk them. Everything else (declaration, comments, processing
//! instructions, CDATA, doctype) is carried as opaque markup and written back
//! byte for byte.

use anyhow::Context;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Clone, Debug, PartialEq)]
pub enum XmlEvent {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Empty {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Unescaped character data.
    Text {
        text: String,
    },
    /// Markup passed through untouched.
    Raw {
        markup: String,
    },
}

#[derive(Clone, Debug)]
pub struct XmlPart {
    pub name: String,
    pub events: Vec<XmlEvent>,
}

impl XmlEvent {
    pub fn start(name: &str) -> Self {
        Self::Start {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn end(name: &str) -> Self {
        Self::End {
            name: name.to_string(),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::Empty {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    fn raw(open: &str, body: impl AsRef<[u8]>, close: &str) -> Self {
        Self::Raw {
            markup: format!("{open}{}{close}", lossy(body)),
        }
    }

    fn write_into(&self, out: &mut String) {
        match self {
            Self::Start { name, attrs } => write_tag(out, name, attrs, ">"),
            Self::Empty { name, attrs } => write_tag(out, name, attrs, "/>"),
            Self::End { name } => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            Self::Text { text } => escape_into(out, text),
            Self::Raw { markup } => out.push_str(markup),
        }
    }
}

pub fn parse_xml_part(name: &str, xml_bytes: &[u8]) -> anyhow::Result<XmlPart> {
    let mut reader = Reader::from_reader(xml_bytes);
    reader.config_mut().trim_text(false);

    let mut events = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let ev = reader
            .read_event_into(&mut buf)
            .with_context(|| format!("parse xml: {name}"))?;
        let event = match ev {
            Event::Eof => break,
            Event::Start(s) => XmlEvent::Start {
                name: lossy(s.name()),
                attrs: raw_attrs(&s).with_context(|| format!("parse xml attributes: {name}"))?,
            },
            Event::Empty(s) => XmlEvent::Empty {
                name: lossy(s.name()),
                attrs: raw_attrs(&s).with_context(|| format!("parse xml attributes: {name}"))?,
            },
            Event::End(e) => XmlEvent::End {
                name: lossy(e.name()),
            },
            Event::Text(t) => XmlEvent::Text {
                text: t
                    .unescape()
                    .with_context(|| format!("unescape text: {name}"))?
                    .into_owned(),
            },
            // Declarations keep their original attribute text.
            Event::Decl(d) => XmlEvent::raw("<?", &*d, "?>"),
            Event::PI(p) => XmlEvent::raw("<?", &*p, "?>"),
            Event::CData(t) => XmlEvent::raw("<![CDATA[", t.into_inner(), "]]>"),
            Event::Comment(t) => XmlEvent::raw("<!--", t.into_inner(), "-->"),
            Event::DocType(t) => XmlEvent::raw("<!DOCTYPE", t.into_inner(), ">"),
        };
        events.push(event);
    }

    Ok(XmlPart {
        name: name.to_string(),
        events,
    })
}

/// Attribute values stay escaped as read, so entity references such as
/// `&#xD;` survive a round trip.
fn raw_attrs(s: &BytesStart<'_>) -> anyhow::Result<Vec<(String, String)>> {
    s.attributes()
        .map(|a| -> anyhow::Result<(String, String)> {
            let a = a?;
            Ok((lossy(a.key), lossy(&*a.value)))
        })
        .collect()
}

fn lossy(bytes: impl AsRef<[u8]>) -> String {
    String::from_utf8_lossy(bytes.as_ref()).into_owned()
}

fn write_tag(out: &mut String, name: &str, attrs: &[(String, String)], close: &str) {
    out.push('<');
    out.push_str(name);
    for (k, v) in attrs {
        out.push(' ');
        out.push_str(k);
        out.push_str("=\"");
        out.push_str(v);
        out.push('"');
    }
    out.push_str(close);
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

pub fn write_events(events: &[XmlEvent]) -> Vec<u8> {
    let mut out = String::new();
    for ev in events {
        ev.write_into(&mut out);
    }
    out.into_bytes()
}

pub fn find_attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_entity_refs_survive() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?><root xmlns:o="urn:test" o:gfxdata="A&#xD;&#xA;B"/>"#;
        let part = parse_xml_part("test.xml", xml).expect("parse xml");
        let s = String::from_utf8(write_events(&part.events)).expect("utf8");
        assert_eq!(s.as_bytes(), xml);
    }

    #[test]
    fn text_is_unescaped_on_read_and_escaped_on_write() {
        let xml = br#"<w:t xml:space="preserve">Smith &amp; Co &lt;3</w:t>"#;
        let part = parse_xml_part("document.xml", xml).expect("parse xml");
        assert_eq!(part.events[1], XmlEvent::text("Smith & Co <3"));
        let XmlEvent::Start { attrs, .. } = &part.events[0] else {
            panic!("expected start, got {:?}", part.events[0]);
        };
        assert_eq!(find_attr(attrs, "xml:space"), Some("preserve"));
        assert_eq!(write_events(&part.events), xml.to_vec());
    }

    #[test]
    fn comments_and_cdata_pass_through() {
        let xml = b"<a><!-- note --><![CDATA[x < y]]><?mso-application progid=\"Word.Document\"?></a>";
        let part = parse_xml_part("p.xml", xml).expect("parse");
        assert_eq!(part.events.len(), 5);
        assert_eq!(write_events(&part.events), xml.to_vec());
    }

    #[test]
    fn malformed_xml_names_the_part() {
        let err = parse_xml_part("word/document.xml", b"<a><b></a>").expect_err("mismatch");
        assert!(format!("{err:#}").contains("word/document.xml"));
    }
}
