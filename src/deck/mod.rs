//! Deck builder: turn a directory of page images into a `.pptx` file.
//!
//! ## Data Flow
//!
//! ```text
//! template.pptx ─┐
//!  (or blank)    ├──▶ Deck ──▶ one slide per *.jpg ──▶ output.pptx
//! images dir ────┘            (sorted by file name)      (atomic rename)
//! ```
//!
//! A [`Deck`] owns the whole package in memory. Opening a template drops
//! its existing slides and picks the layout new slides are based on; each
//! [`Deck::add_picture_slide`] call then adds a slide part, its image part
//! and the relationships between them. [`Deck::save`] writes the updated
//! slide list back into `presentation.xml` and serialises the package.

pub mod blank;
pub mod opc;
pub mod package;
pub mod placement;
pub mod presentation;
pub mod slide;

use crate::error::Pdf2PptxError;
use crate::progress::ProgressCallback;
use opc::{content_type, reltype, ContentTypes, Relationships};
use package::{rels_part_name, relative_ref, resolve_target, Package, PackageError, CONTENT_TYPES_PART};
use placement::{fit_picture, Margins, Placement, SlideSize};
use presentation::{
    drop_custom_show_reference, parse_layout, parse_master_layouts, parse_presentation,
    rewrite_slide_list, SlideEntry,
};
use serde::Serialize;
use slide::{Placeholder, Slide};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// First id PowerPoint hands out in `<p:sldIdLst>`.
const FIRST_SLIDE_ID: u32 = 256;

/// What [`build_deck`] produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeckSummary {
    pub slide_count: usize,
    pub slide_size: SlideSize,
    pub layout_name: Option<String>,
    pub placements: Vec<Placement>,
}

/// The layout every generated slide is based on.
#[derive(Debug, Clone)]
struct ChosenLayout {
    part: String,
    name: Option<String>,
    placeholders: Vec<Placeholder>,
}

/// A presentation package being assembled.
#[derive(Debug)]
pub struct Deck {
    package: Package,
    content_types: ContentTypes,
    presentation_part: String,
    presentation_rels: Relationships,
    slide_size: SlideSize,
    margins: Margins,
    layout: ChosenLayout,
    slides: Vec<SlideEntry>,
}

impl Deck {
    /// An empty 4:3 deck with a placeholder-free layout and no margins.
    pub fn blank() -> Result<Self, Pdf2PptxError> {
        Self::from_package(blank::blank_package(), Margins::NONE)
            .map_err(|e| Pdf2PptxError::DeckAssemblyFailed(e.to_string()))
    }

    /// Open a template deck. Its slides are discarded; its masters, layouts
    /// and theme are kept, and pictures get half-inch margins.
    pub fn open_template(path: &Path) -> Result<Self, Pdf2PptxError> {
        let invalid = |detail: String| Pdf2PptxError::InvalidTemplate {
            path: path.to_path_buf(),
            detail,
        };

        let file = File::open(path).map_err(|e| invalid(e.to_string()))?;
        let package = Package::read(BufReader::new(file)).map_err(|e| invalid(e.to_string()))?;
        let deck = Self::from_package(package, Margins::TEMPLATE).map_err(|e| invalid(e.to_string()))?;

        info!(
            "Using template {} (layout: {})",
            path.display(),
            deck.layout_name().unwrap_or("unnamed")
        );
        Ok(deck)
    }

    /// Build on an already loaded package.
    pub fn from_package(package: Package, margins: Margins) -> package::Result<Self> {
        let content_types = ContentTypes::parse(package.require(CONTENT_TYPES_PART)?)?;

        let root_rels = Relationships::parse(package.require("_rels/.rels")?, "_rels/.rels")?;
        let presentation_part = root_rels
            .of_type(reltype::OFFICE_DOCUMENT)
            .next()
            .map(|rel| resolve_target("", &rel.target))
            .ok_or_else(|| PackageError::Invalid("package has no main document".to_string()))?;

        let pres_rels_part = rels_part_name(&presentation_part);
        let presentation_rels = Relationships::parse(package.require(&pres_rels_part)?, &pres_rels_part)?;
        let info = parse_presentation(package.require(&presentation_part)?, &presentation_part)?;

        let layout = choose_layout(&package, &presentation_part, &presentation_rels, &info.master_rel_ids)?;
        debug!(
            "Slide layout {} ({} placeholders)",
            layout.part,
            layout.placeholders.len()
        );

        let mut deck = Self {
            slide_size: info.slide_size.unwrap_or_default(),
            package,
            content_types,
            presentation_part,
            presentation_rels,
            margins,
            layout,
            slides: Vec::new(),
        };
        deck.remove_existing_slides()?;
        Ok(deck)
    }

    pub fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn layout_name(&self) -> Option<&str> {
        self.layout.name.as_deref()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Drop every slide the package already has, with its notes slide.
    fn remove_existing_slides(&mut self) -> package::Result<()> {
        let existing: Vec<(String, String)> = self
            .presentation_rels
            .of_type(reltype::SLIDE)
            .map(|rel| (rel.id.clone(), resolve_target(&self.presentation_part, &rel.target)))
            .collect();

        for (rel_id, slide_part) in existing {
            let slide_rels_part = rels_part_name(&slide_part);
            if let Some(xml) = self.package.part(&slide_rels_part) {
                let rels = Relationships::parse(xml, &slide_rels_part)?;
                for notes in rels.of_type(reltype::NOTES_SLIDE) {
                    let notes_part = resolve_target(&slide_part, &notes.target);
                    self.remove_part_with_rels(&notes_part);
                }
            }
            self.remove_part_with_rels(&slide_part);
            self.presentation_rels.remove(&rel_id);
            debug!("Removed template slide {}", slide_part);
        }
        Ok(())
    }

    fn remove_part_with_rels(&mut self, part: &str) {
        self.package.remove_part(part);
        self.package.remove_part(&rels_part_name(part));
        self.content_types.remove_override(part);
    }

    /// Append a slide holding the image at `image_path`, fitted to the
    /// slide. Returns where the picture was placed.
    pub fn add_picture_slide(&mut self, image_path: &Path) -> Result<Placement, Pdf2PptxError> {
        let decode_err = |detail: String| Pdf2PptxError::ImageDecodeFailed {
            path: image_path.to_path_buf(),
            detail,
        };

        let (px_width, px_height) =
            image::image_dimensions(image_path).map_err(|e| decode_err(e.to_string()))?;
        let data = std::fs::read(image_path).map_err(|e| decode_err(e.to_string()))?;

        let placement = fit_picture(self.slide_size, self.margins, px_width, px_height);

        let ext = image_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "jpg".to_string());
        let media_ct = if ext == "png" { content_type::PNG } else { content_type::JPEG };
        let media_part = self.package.next_free_name("ppt/media/image", &format!(".{ext}"));
        let slide_part = self.package.next_free_name("ppt/slides/slide", ".xml");

        let mut slide_rels = Relationships::new();
        slide_rels.add(reltype::SLIDE_LAYOUT, relative_ref(&slide_part, &self.layout.part));
        let image_rel = slide_rels.add(reltype::IMAGE, relative_ref(&slide_part, &media_part));

        let descr = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut slide = Slide::from_layout(&self.layout.placeholders);
        slide.set_picture(image_rel, descr, placement);
        let removed = slide.remove_empty_placeholders();
        if removed > 0 {
            debug!("Removed {} empty placeholders from {}", removed, slide_part);
        }

        self.package.set_part(media_part.as_str(), data);
        self.package.set_part(slide_part.as_str(), slide.to_xml());
        self.package.set_part(rels_part_name(&slide_part), slide_rels.to_xml());
        self.content_types.ensure_default(&ext, media_ct);
        self.content_types.set_override(&slide_part, content_type::SLIDE);

        let rel_id = self
            .presentation_rels
            .add(reltype::SLIDE, relative_ref(&self.presentation_part, &slide_part));
        let id = FIRST_SLIDE_ID + self.slides.len() as u32;
        self.slides.push(SlideEntry { id, rel_id });

        Ok(placement)
    }

    /// Write the slide list, relationships and content types back into
    /// the package.
    fn finalize(&mut self) -> package::Result<()> {
        let pres_xml = rewrite_slide_list(
            self.package.require(&self.presentation_part)?,
            &self.presentation_part,
            &self.slides,
        )?;
        self.package.set_part(self.presentation_part.as_str(), pres_xml);

        // Custom shows went with the slide list; the show settings must not
        // point at one.
        let props_part = self
            .presentation_rels
            .of_type(reltype::PRES_PROPS)
            .next()
            .map(|rel| resolve_target(&self.presentation_part, &rel.target));
        if let Some(props_part) = props_part {
            if let Some(xml) = self.package.part(&props_part) {
                if let Some(props_xml) = drop_custom_show_reference(xml, &props_part)? {
                    self.package.set_part(props_part.as_str(), props_xml);
                }
            }
        }
        self.package.set_part(
            rels_part_name(&self.presentation_part),
            self.presentation_rels.to_xml(),
        );
        self.package.set_part(CONTENT_TYPES_PART, self.content_types.to_xml());
        Ok(())
    }

    /// Serialise the deck into `writer`.
    pub fn write_to<W: Write + std::io::Seek>(&mut self, writer: W) -> package::Result<W> {
        self.finalize()?;
        self.package.write(writer)
    }

    /// Save the deck to `path`.
    ///
    /// The package is written to a temporary file next to `path` and renamed
    /// into place, so a failed save never leaves a partial deck behind.
    pub fn save(&mut self, path: &Path) -> Result<(), Pdf2PptxError> {
        let write_err = |detail: String| Pdf2PptxError::OutputWriteFailed {
            path: path.to_path_buf(),
            detail,
        };

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| write_err(e.to_string()))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".pdf2pptx-")
            .suffix(".pptx.tmp")
            .tempfile_in(&parent)
            .map_err(|e| write_err(e.to_string()))?;

        let writer = self
            .write_to(BufWriter::new(tmp.as_file_mut()))
            .map_err(|e| write_err(e.to_string()))?;
        writer
            .into_inner()
            .map_err(|e| write_err(e.to_string()))?
            .sync_all()
            .map_err(|e| write_err(e.to_string()))?;

        tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
        Ok(())
    }
}

/// Pick the layout of the first master: its first `obj` layout, otherwise
/// the second layout, otherwise the first.
fn choose_layout(
    package: &Package,
    presentation_part: &str,
    presentation_rels: &Relationships,
    master_rel_ids: &[String],
) -> package::Result<ChosenLayout> {
    let master_rel = master_rel_ids
        .iter()
        .find_map(|id| presentation_rels.get(id))
        .or_else(|| presentation_rels.of_type(reltype::SLIDE_MASTER).next())
        .ok_or_else(|| PackageError::Invalid("presentation has no slide master".to_string()))?;
    let master_part = resolve_target(presentation_part, &master_rel.target);

    let master_rels_part = rels_part_name(&master_part);
    let master_rels = Relationships::parse(package.require(&master_rels_part)?, &master_rels_part)?;
    let layout_ids = parse_master_layouts(package.require(&master_part)?, &master_part)?;

    let mut layouts = Vec::with_capacity(layout_ids.len());
    for id in &layout_ids {
        let Some(rel) = master_rels.get(id) else {
            continue;
        };
        let part = resolve_target(&master_part, &rel.target);
        let info = parse_layout(package.require(&part)?, &part)?;
        layouts.push((part, info));
    }

    let index = layouts
        .iter()
        .position(|(_, info)| info.kind.as_deref() == Some("obj"))
        .or_else(|| match layouts.len() {
            0 => None,
            1 => Some(0),
            _ => Some(1),
        })
        .ok_or_else(|| PackageError::Invalid(format!("slide master '{master_part}' has no layouts")))?;

    let (part, info) = layouts.swap_remove(index);
    Ok(ChosenLayout {
        part,
        name: info.name,
        placeholders: info.placeholders,
    })
}

/// Page images in `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Pdf2PptxError> {
    let pattern = format!(
        "{}/*.jpg",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let entries = glob::glob(&pattern)
        .map_err(|e| Pdf2PptxError::InvalidConfig(format!("bad image pattern '{pattern}': {e}")))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Pdf2PptxError::ImageDecodeFailed {
            path: e.path().to_path_buf(),
            detail: e.error().to_string(),
        })?;
        images.push(path);
    }
    images.sort();
    Ok(images)
}

/// Add one slide per `*.jpg` in `images_dir` to `deck` and save it to
/// `output`.
pub fn build_deck(
    mut deck: Deck,
    images_dir: &Path,
    output: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<DeckSummary, Pdf2PptxError> {
    info!(
        "Converting images to {}, temporary image directory: {}",
        output.display(),
        images_dir.display()
    );

    let images = list_images(images_dir)?;
    let total = images.len();
    let mut placements = Vec::with_capacity(total);

    for (i, image) in images.iter().enumerate() {
        debug!("Converting {}", image.display());
        placements.push(deck.add_picture_slide(image)?);
        if let Some(cb) = progress {
            cb.on_slide_added(i + 1, total);
        }
    }

    deck.save(output)?;
    info!("Wrote {} slides to {}", deck.slide_count(), output.display());

    Ok(DeckSummary {
        slide_count: deck.slide_count(),
        slide_size: deck.slide_size(),
        layout_name: deck.layout_name().map(str::to_string),
        placements,
    })
}
