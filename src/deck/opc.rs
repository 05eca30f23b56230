//! Relationship and content-type parts of an OPC package.

use super::package::{PackageError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::escape::{escape, unescape};
use quick_xml::Reader;
use std::fmt::Write as FmtWrite;

/// Relationship type URIs.
pub mod reltype {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

/// Content type strings.
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const JPEG: &str = "image/jpeg";
    pub const PNG: &str = "image/png";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

// ── Attribute helpers ────────────────────────────────────────────────────

/// Unescaped value of the attribute whose qualified name is `key`.
pub(crate) fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| decode_value(&a.value))
}

/// Value of a prefixed `…:id` attribute (the `r:id` of `sldId`, `sldMasterId`,
/// `sldLayoutId`), whatever prefix the producer bound the namespace to.
pub(crate) fn rel_id_attr(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
        .and_then(|a| decode_value(&a.value))
}

fn decode_value(raw: &[u8]) -> Option<String> {
    let s = std::str::from_utf8(raw).ok()?;
    Some(unescape(s).map_or_else(|_| s.to_string(), |c| c.into_owned()))
}

pub(crate) fn xml_error(part: &str, e: impl std::fmt::Display) -> PackageError {
    PackageError::Xml {
        part: part.to_string(),
        detail: e.to_string(),
    }
}

// ── Relationships ────────────────────────────────────────────────────────

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub reltype: String,
    pub target: String,
    pub external: bool,
}

/// Contents of a `.rels` part, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part. `part` is only used in error messages.
    pub fn parse(xml: &[u8], part: &str) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut rels = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let (Some(id), Some(reltype), Some(target)) =
                        (attr(&e, b"Id"), attr(&e, b"Type"), attr(&e, b"Target"))
                    else {
                        return Err(xml_error(part, "Relationship without Id/Type/Target"));
                    };
                    let external = attr(&e, b"TargetMode").as_deref() == Some("External");
                    rels.push(Relationship {
                        id,
                        reltype,
                        target,
                        external,
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(part, e)),
                _ => {}
            }
        }

        Ok(Self { rels })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Internal relationships of the given type.
    pub fn of_type<'a>(&'a self, reltype: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.rels
            .iter()
            .filter(move |r| r.reltype == reltype && !r.external)
    }

    /// Next `rIdN` above every numeric id already present.
    pub fn next_id(&self) -> String {
        let max = self
            .rels
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Append an internal relationship and return its id.
    pub fn add(&mut self, reltype: &str, target: impl Into<String>) -> String {
        let id = self.next_id();
        self.rels.push(Relationship {
            id: id.clone(),
            reltype: reltype.to_string(),
            target: target.into(),
            external: false,
        });
        id
    }

    pub fn remove(&mut self, id: &str) -> Option<Relationship> {
        let pos = self.rels.iter().position(|r| r.id == id)?;
        Some(self.rels.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);
        xml.push_str(XML_DECL);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.rels {
            let _ = write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape(rel.id.as_str()),
                escape(rel.reltype.as_str()),
                escape(rel.target.as_str()),
                if rel.external {
                    r#" TargetMode="External""#
                } else {
                    ""
                }
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

// ── Content types ────────────────────────────────────────────────────────

/// Contents of `[Content_Types].xml`.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(xml: &[u8]) -> Result<Self> {
        let part = super::package::CONTENT_TYPES_PART;
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut types = Self::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) =
                            (attr(&e, b"Extension"), attr(&e, b"ContentType"))
                        {
                            types.defaults.push((ext.to_ascii_lowercase(), ct));
                        }
                    }
                    b"Override" => {
                        if let (Some(name), Some(ct)) =
                            (attr(&e, b"PartName"), attr(&e, b"ContentType"))
                        {
                            types.overrides.push((name, ct));
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(xml_error(part, e)),
                _ => {}
            }
        }

        Ok(types)
    }

    /// Register a default for `ext` unless one already exists.
    pub fn ensure_default(&mut self, ext: &str, content_type: &str) {
        let ext = ext.to_ascii_lowercase();
        if !self.defaults.iter().any(|(e, _)| *e == ext) {
            self.defaults.push((ext, content_type.to_string()));
        }
    }

    /// Set the override for `part` (package part name, with or without the
    /// leading slash).
    pub fn set_override(&mut self, part: &str, content_type: &str) {
        let name = absolute(part);
        self.overrides.retain(|(p, _)| *p != name);
        self.overrides.push((name, content_type.to_string()));
    }

    pub fn remove_override(&mut self, part: &str) {
        let name = absolute(part);
        self.overrides.retain(|(p, _)| *p != name);
    }

    /// Content type that applies to `part`.
    pub fn content_type_of(&self, part: &str) -> Option<&str> {
        let name = absolute(part);
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| *p == name) {
            return Some(ct);
        }
        let ext = part.rsplit_once('.')?.1.to_ascii_lowercase();
        self.defaults
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, ct)| ct.as_str())
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.overrides.len() * 160);
        xml.push_str(XML_DECL);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, ct) in &self.defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape(ext.as_str()),
                escape(ct.as_str())
            );
        }
        for (name, ct) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(name.as_str()),
                escape(ct.as_str())
            );
        }
        xml.push_str("</Types>");
        xml
    }
}

fn absolute(part: &str) -> String {
    format!("/{}", part.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn parses_relationships() {
        let rels = Relationships::parse(RELS.as_bytes(), "test.rels").unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.get("rId1").unwrap().target, "slideMasters/slideMaster1.xml");
        let link = rels.get("rId9").unwrap();
        assert!(link.external);
        assert_eq!(link.target, "https://example.com/?a=1&b=2");
        assert_eq!(rels.of_type(reltype::SLIDE).count(), 1);
    }

    #[test]
    fn next_id_is_above_max() {
        let mut rels = Relationships::parse(RELS.as_bytes(), "test.rels").unwrap();
        assert_eq!(rels.next_id(), "rId10");
        let id = rels.add(reltype::IMAGE, "../media/image1.jpg");
        assert_eq!(id, "rId10");
        assert!(rels.remove("rId2").is_some());
        assert_eq!(rels.of_type(reltype::SLIDE).count(), 0);
    }

    #[test]
    fn relationships_serialise_and_reparse() {
        let mut rels = Relationships::new();
        rels.add(reltype::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        rels.add(reltype::IMAGE, "../media/image1.jpg");
        let xml = rels.to_xml();
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains(r#"Id="rId2""#));

        let back = Relationships::parse(xml.as_bytes(), "x").unwrap();
        assert_eq!(back.get("rId2").unwrap().target, "../media/image1.jpg");
    }

    #[test]
    fn content_type_lookup_prefers_override() {
        let mut ct = ContentTypes::new();
        ct.ensure_default("xml", content_type::XML);
        ct.ensure_default("JPG", content_type::JPEG);
        ct.set_override("ppt/slides/slide1.xml", content_type::SLIDE);

        assert_eq!(
            ct.content_type_of("/ppt/slides/slide1.xml"),
            Some(content_type::SLIDE)
        );
        assert_eq!(ct.content_type_of("ppt/other.xml"), Some(content_type::XML));
        assert_eq!(ct.content_type_of("ppt/media/image1.jpg"), Some(content_type::JPEG));

        ct.remove_override("/ppt/slides/slide1.xml");
        assert_eq!(ct.content_type_of("ppt/slides/slide1.xml"), Some(content_type::XML));
    }

    #[test]
    fn content_types_reparse() {
        let mut ct = ContentTypes::new();
        ct.ensure_default("rels", content_type::RELATIONSHIPS);
        ct.set_override("/ppt/presentation.xml", content_type::PRESENTATION);
        let back = ContentTypes::parse(ct.to_xml().as_bytes()).unwrap();
        assert_eq!(
            back.content_type_of("ppt/presentation.xml"),
            Some(content_type::PRESENTATION)
        );
        assert_eq!(
            back.content_type_of("_rels/.rels"),
            Some(content_type::RELATIONSHIPS)
        );
    }
}
