//! Generated slide model and its PresentationML serialisation.

use super::placement::Placement;
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;

/// Placeholder types whose slide copies carry a text frame. Other kinds
/// (pictures, charts, tables, media) are filled by content, not text.
const TEXT_FRAME_KINDS: &[&str] = &["title", "ctrTitle", "subTitle", "body", "obj"];

/// Placeholder types that belong to the master's header/footer set and are
/// never copied onto a slide.
pub const FOOTER_KINDS: &[&str] = &["dt", "ftr", "sldNum"];

/// A placeholder shape as declared by a layout and copied onto a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub id: u32,
    pub name: String,
    /// Value of `<p:ph type>`; `obj` when the attribute is absent.
    pub kind: String,
    pub idx: Option<u32>,
    pub text: String,
    pub has_text_frame: bool,
}

impl Placeholder {
    pub fn new(id: u32, name: impl Into<String>, kind: impl Into<String>, idx: Option<u32>) -> Self {
        let kind = kind.into();
        let has_text_frame = TEXT_FRAME_KINDS.contains(&kind.as_str());
        Self {
            id,
            name: name.into(),
            kind,
            idx,
            text: String::new(),
            has_text_frame,
        }
    }

    pub fn is_footer(&self) -> bool {
        FOOTER_KINDS.contains(&self.kind.as_str())
    }

    /// A text frame with nothing but whitespace in it.
    pub fn is_empty_text_frame(&self) -> bool {
        self.has_text_frame && self.text.trim().is_empty()
    }

    fn write_xml(&self, xml: &mut String) {
        let _ = write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph"#,
            self.id,
            escape(self.name.as_str())
        );
        if self.kind != "obj" {
            let _ = write!(xml, r#" type="{}""#, escape(self.kind.as_str()));
        }
        if let Some(idx) = self.idx {
            let _ = write!(xml, r#" idx="{}""#, idx);
        }
        xml.push_str("/></p:nvPr></p:nvSpPr><p:spPr/>");
        if self.has_text_frame {
            xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
            if self.text.is_empty() {
                xml.push_str("<a:p/>");
            } else {
                let _ = write!(
                    xml,
                    "<a:p><a:r><a:t>{}</a:t></a:r></a:p>",
                    escape(self.text.as_str())
                );
            }
            xml.push_str("</p:txBody>");
        }
        xml.push_str("</p:sp>");
    }
}

/// A picture shape referencing an image part through the slide's rels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub id: u32,
    pub name: String,
    pub descr: String,
    pub rel_id: String,
    pub placement: Placement,
}

impl Picture {
    fn write_xml(&self, xml: &mut String) {
        let p = &self.placement;
        let _ = write!(
            xml,
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="{}" descr="{}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            self.id,
            escape(self.name.as_str()),
            escape(self.descr.as_str())
        );
        let _ = write!(
            xml,
            r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            escape(self.rel_id.as_str())
        );
        let _ = write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            p.left, p.top, p.width, p.height
        );
    }
}

/// One slide: layout placeholders plus at most one picture.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub placeholders: Vec<Placeholder>,
    pub picture: Option<Picture>,
}

impl Slide {
    /// New slide carrying copies of the layout's placeholders, footers
    /// excluded. Shape ids are renumbered from 2 (1 is the shape tree).
    pub fn from_layout(layout_placeholders: &[Placeholder]) -> Self {
        let placeholders = layout_placeholders
            .iter()
            .filter(|ph| !ph.is_footer())
            .enumerate()
            .map(|(i, ph)| Placeholder {
                id: i as u32 + 2,
                text: String::new(),
                ..ph.clone()
            })
            .collect();
        Self {
            placeholders,
            picture: None,
        }
    }

    /// Next unused shape id.
    pub fn next_shape_id(&self) -> u32 {
        self.placeholders
            .iter()
            .map(|ph| ph.id)
            .chain(self.picture.iter().map(|p| p.id))
            .max()
            .unwrap_or(1)
            + 1
    }

    pub fn set_picture(&mut self, rel_id: impl Into<String>, descr: impl Into<String>, placement: Placement) {
        let id = self.next_shape_id();
        self.picture = Some(Picture {
            id,
            name: format!("Picture {}", id - 1),
            descr: descr.into(),
            rel_id: rel_id.into(),
            placement,
        });
    }

    /// Drop every placeholder whose text frame is empty; returns how many
    /// were removed.
    pub fn remove_empty_placeholders(&mut self) -> usize {
        let before = self.placeholders.len();
        self.placeholders.retain(|ph| !ph.is_empty_text_frame());
        before - self.placeholders.len()
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024 + self.placeholders.len() * 256);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

        for ph in &self.placeholders {
            ph.write_xml(&mut xml);
        }
        if let Some(ref pic) = self.picture {
            pic.write_xml(&mut xml);
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        xml
    }
}
