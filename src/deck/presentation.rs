//! Reading and rewriting the presentation, master and layout parts.
//!
//! Template parts are never re-serialised from a model: the deck builder
//! only needs a handful of facts from them, and the one edit it makes to
//! `presentation.xml` (replacing the slide list) is spliced into the
//! original bytes so everything else the template carries stays intact.

use super::opc::{attr, rel_id_attr, xml_error};
use super::package::{PackageError, Result};
use super::placement::SlideSize;
use super::slide::Placeholder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Write as FmtWrite;

const RELATIONSHIPS_NS: &[u8] =
    b"http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Facts read from `presentation.xml`.
#[derive(Debug, Clone, Default)]
pub struct PresentationInfo {
    pub slide_size: Option<SlideSize>,
    /// `r:id`s of `<p:sldMasterId>` entries, in order.
    pub master_rel_ids: Vec<String>,
    /// `r:id`s of `<p:sldId>` entries, in order.
    pub slide_rel_ids: Vec<String>,
}

pub fn parse_presentation(xml: &[u8], part: &str) -> Result<PresentationInfo> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut info = PresentationInfo::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"sldMasterId" => info.master_rel_ids.extend(rel_id_attr(&e)),
                b"sldId" => info.slide_rel_ids.extend(rel_id_attr(&e)),
                b"sldSz" => {
                    let cx = attr(&e, b"cx").and_then(|v| v.parse::<i64>().ok());
                    let cy = attr(&e, b"cy").and_then(|v| v.parse::<i64>().ok());
                    if let (Some(width), Some(height)) = (cx, cy) {
                        info.slide_size = Some(SlideSize { width, height });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// `r:id`s of the layouts listed by a slide master, in order.
pub fn parse_master_layouts(xml: &[u8], part: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"sldLayoutId" =>
            {
                ids.extend(rel_id_attr(&e));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

/// Facts read from a slide layout.
#[derive(Debug, Clone, Default)]
pub struct LayoutInfo {
    /// `type` attribute of `<p:sldLayout>` (`obj`, `blank`, `title`, …).
    pub kind: Option<String>,
    /// `name` attribute of `<p:cSld>`.
    pub name: Option<String>,
    pub placeholders: Vec<Placeholder>,
}

#[derive(Default)]
struct ShapeScan {
    id: Option<u32>,
    name: Option<String>,
    ph: Option<(String, Option<u32>)>,
}

impl ShapeScan {
    fn visit(&mut self, e: &BytesStart<'_>) {
        match e.local_name().as_ref() {
            b"cNvPr" if self.id.is_none() => {
                self.id = attr(e, b"id").and_then(|v| v.parse().ok());
                self.name = attr(e, b"name");
            }
            b"ph" => {
                let kind = attr(e, b"type").unwrap_or_else(|| "obj".to_string());
                let idx = attr(e, b"idx").and_then(|v| v.parse().ok());
                self.ph = Some((kind, idx));
            }
            _ => {}
        }
    }

    fn finish(self) -> Option<Placeholder> {
        let (kind, idx) = self.ph?;
        let id = self.id.unwrap_or(0);
        let name = self.name.unwrap_or_else(|| format!("Placeholder {id}"));
        Some(Placeholder::new(id, name, kind, idx))
    }
}

/// Read a layout's type, name and placeholder shapes.
pub fn parse_layout(xml: &[u8], part: &str) -> Result<LayoutInfo> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut info = LayoutInfo::default();
    let mut shape: Option<ShapeScan> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sldLayout" => info.kind = attr(&e, b"type"),
                b"cSld" => info.name = attr(&e, b"name"),
                b"sp" => shape = Some(ShapeScan::default()),
                _ => {
                    if let Some(ref mut s) = shape {
                        s.visit(&e);
                    }
                }
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"cSld" => info.name = attr(&e, b"name"),
                _ => {
                    if let Some(ref mut s) = shape {
                        s.visit(&e);
                    }
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sp" => {
                if let Some(ph) = shape.take().and_then(ShapeScan::finish) {
                    info.placeholders.push(ph);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}

/// One `<p:sldId>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideEntry {
    pub id: u32,
    pub rel_id: String,
}

/// Replace the slide list of `presentation.xml` with `slides`.
///
/// Custom shows and slide sections refer to slides by id and are dropped
/// along with the old list. A section list lives in its own `<p:ext>`; that
/// extension goes with it, and so does an `<p:extLst>` left with no
/// extensions. An empty `slides` removes the list entirely.
pub fn rewrite_slide_list(xml: &[u8], part: &str, slides: &[SlideEntry]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);

    let mut root_seen = false;
    let mut p_prefix: Option<String> = None;
    let mut r_prefix: Option<String> = None;
    let mut stack: Vec<Frame> = Vec::new();
    let mut list_span: Option<(usize, usize)> = None;
    let mut insert_at: Option<usize> = None;
    let mut drops: Vec<(usize, usize)> = Vec::new();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| xml_error(part, e))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if !root_seen {
                    root_seen = true;
                    p_prefix = e
                        .name()
                        .prefix()
                        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
                    r_prefix = relationships_prefix(e);
                }
                let local = e.local_name().as_ref().to_vec();
                if stack.len() == 1
                    && insert_at.is_none()
                    && matches!(local.as_slice(), b"sldSz" | b"notesSz")
                {
                    insert_at = Some(before);
                }
                if let Some(parent) = stack.last_mut() {
                    parent.children += 1;
                }

                let frame = Frame::new(local, before);
                if matches!(event, Event::Empty(_)) {
                    close_frame(frame, after, &mut stack, &mut list_span, &mut drops);
                } else {
                    stack.push(frame);
                }
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    close_frame(frame, after, &mut stack, &mut list_span, &mut drops);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(xml_error(part, "document has no root element"));
    }

    let replacement = if slides.is_empty() {
        String::new()
    } else {
        let r = r_prefix.ok_or_else(|| {
            PackageError::Invalid(format!("'{part}' does not declare the relationships namespace"))
        })?;
        slide_list_xml(p_prefix.as_deref(), &r, slides)
    };

    let mut edits: Vec<(usize, usize, String)> = drops
        .into_iter()
        .map(|(s, e)| (s, e, String::new()))
        .collect();
    match (list_span, insert_at) {
        (Some((s, e)), _) => edits.push((s, e, replacement)),
        (None, Some(at)) => edits.push((at, at, replacement)),
        (None, None) if slides.is_empty() => {}
        (None, None) => {
            return Err(PackageError::Invalid(format!(
                "'{part}' has no slide size element to anchor the slide list"
            )))
        }
    }
    Ok(splice(xml, edits))
}

/// Remove the `<p:custShow>` choice from `<p:showPr>` in `presProps.xml`.
///
/// Returns `None` when there is nothing to remove. Without it the show
/// settings fall back to all slides.
pub fn drop_custom_show_reference(xml: &[u8], part: &str) -> Result<Option<Vec<u8>>> {
    let mut reader = Reader::from_reader(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut open: Option<(usize, usize)> = None;
    let mut edits: Vec<(usize, usize, String)> = Vec::new();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| xml_error(part, e))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let local = e.local_name().as_ref().to_vec();
                let in_show = stack.last().is_some_and(|p| p.as_slice() == b"showPr");
                let is_empty = matches!(event, Event::Empty(_));
                if open.is_none() && in_show && local.as_slice() == b"custShow" {
                    if is_empty {
                        edits.push((before, after, String::new()));
                    } else {
                        open = Some((before, stack.len()));
                    }
                }
                if !is_empty {
                    stack.push(local);
                }
            }
            Event::End(_) => {
                stack.pop();
                if let Some((start, depth)) = open {
                    if stack.len() == depth {
                        edits.push((start, after, String::new()));
                        open = None;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if edits.is_empty() {
        return Ok(None);
    }
    Ok(Some(splice(xml, edits)))
}

/// An element still open while scanning, with how many of its children
/// were cut out.
struct Frame {
    local: Vec<u8>,
    start: usize,
    children: usize,
    dropped: usize,
}

impl Frame {
    fn new(local: Vec<u8>, start: usize) -> Self {
        Self {
            local,
            start,
            children: 0,
            dropped: 0,
        }
    }
}

fn close_frame(
    frame: Frame,
    end: usize,
    stack: &mut [Frame],
    list_span: &mut Option<(usize, usize)>,
    drops: &mut Vec<(usize, usize)>,
) {
    let dropped = match frame.local.as_slice() {
        b"sldIdLst" if stack.len() == 1 => {
            *list_span = Some((frame.start, end));
            false
        }
        b"custShowLst" | b"sectionLst" => true,
        // An extension holds exactly one element; an extension list at least one.
        b"ext" | b"extLst" => frame.children > 0 && frame.dropped == frame.children,
        _ => false,
    };
    if dropped {
        drops.push((frame.start, end));
        if let Some(parent) = stack.last_mut() {
            parent.dropped += 1;
        }
    }
}

/// Apply byte-range replacements. Ranges nested in an earlier one are
/// already covered by it and skipped.
fn splice(xml: &[u8], mut edits: Vec<(usize, usize, String)>) -> Vec<u8> {
    edits.sort_by_key(|(s, _, _)| *s);

    let extra: usize = edits.iter().map(|(_, _, t)| t.len()).sum();
    let mut out = Vec::with_capacity(xml.len() + extra);
    let mut cursor = 0;
    for (start, end, text) in edits {
        if start < cursor {
            continue;
        }
        out.extend_from_slice(&xml[cursor..start]);
        out.extend_from_slice(text.as_bytes());
        cursor = end;
    }
    out.extend_from_slice(&xml[cursor..]);
    out
}

fn relationships_prefix(root: &BytesStart<'_>) -> Option<String> {
    root.attributes().flatten().find_map(|a| {
        let key = a.key.as_ref();
        let prefix = key.strip_prefix(b"xmlns:")?;
        (a.value.as_ref() == RELATIONSHIPS_NS).then(|| String::from_utf8_lossy(prefix).into_owned())
    })
}

fn slide_list_xml(p: Option<&str>, r: &str, slides: &[SlideEntry]) -> String {
    let p = p.map(|p| format!("{p}:")).unwrap_or_default();
    let mut xml = String::with_capacity(32 + slides.len() * 48);
    let _ = write!(xml, "<{p}sldIdLst>");
    for slide in slides {
        let _ = write!(
            xml,
            r#"<{p}sldId id="{}" {r}:id="{}"/>"#,
            slide.id, slide.rel_id
        );
    }
    let _ = write!(xml, "</{p}sldIdLst>");
    xml
}
