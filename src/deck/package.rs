//! OPC package: the zip container behind a `.pptx` file.
//!
//! A package is held fully in memory as a map from part name (zip member
//! name, no leading slash) to bytes. Part names are compared
//! case-sensitively; PresentationML producers write them consistently.

use std::collections::BTreeMap;
use std::io::{Read, Seek, Write};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Name of the content-types part at the package root.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Errors raised while reading or writing a package.
///
/// Callers map these onto [`crate::error::Pdf2PptxError`] depending on
/// whether the package was an input template or the output deck.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed XML in '{part}': {detail}")]
    Xml { part: String, detail: String },

    #[error("required part '{0}' is missing")]
    MissingPart(String),

    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PackageError>;

/// In-memory OPC package.
#[derive(Debug, Default, Clone)]
pub struct Package {
    parts: BTreeMap<String, Vec<u8>>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every member of a zip archive.
    pub fn read<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches('/').to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.insert(name, data);
        }

        Ok(Self { parts })
    }

    /// Write the package as a zip archive.
    ///
    /// The content-types part goes first, as OPC consumers expect. JPEG and
    /// PNG media are stored uncompressed; everything else is deflated.
    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);

        let ordered = self
            .parts
            .get_key_value(CONTENT_TYPES_PART)
            .into_iter()
            .chain(self.parts.iter().filter(|(k, _)| *k != CONTENT_TYPES_PART));

        for (name, data) in ordered {
            let method = if is_precompressed(name) {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            zip.start_file(name.as_str(), SimpleFileOptions::default().compression_method(method))?;
            zip.write_all(data)?;
        }

        Ok(zip.finish()?)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Like [`Package::part`] but a missing part is an error.
    pub fn require(&self, name: &str) -> Result<&[u8]> {
        self.part(name)
            .ok_or_else(|| PackageError::MissingPart(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn set_part(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.parts.insert(name.into(), data.into());
    }

    pub fn remove_part(&mut self, name: &str) -> Option<Vec<u8>> {
        self.parts.remove(name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// First unused part name of the form `{stem}{n}{ext}`, counting from 1.
    pub fn next_free_name(&self, stem: &str, ext: &str) -> String {
        let mut n = 1usize;
        loop {
            let name = format!("{stem}{n}{ext}");
            if !self.contains(&name) {
                return name;
            }
            n += 1;
        }
    }
}

fn is_precompressed(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png")
}

/// Relationships part that belongs to `part` (`""` for the package root).
///
/// `ppt/slides/slide1.xml` → `ppt/slides/_rels/slide1.xml.rels`
pub fn rels_part_name(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

/// Resolve a relationship `target` relative to the part that owns it.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/'));
    }
    let base = source_part.rsplit_once('/').map_or("", |(dir, _)| dir);
    normalize(base.split('/').chain(target.split('/')))
}

/// Relative reference from `source_part` to `target_part`.
///
/// `("ppt/slides/slide1.xml", "ppt/media/image1.jpg")` → `../media/image1.jpg`
pub fn relative_ref(source_part: &str, target_part: &str) -> String {
    let base: Vec<&str> = source_part
        .rsplit_once('/')
        .map_or(Vec::new(), |(dir, _)| dir.split('/').collect());
    let target: Vec<&str> = target_part.split('/').collect();

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = vec![".."; base.len() - common];
    segments.extend_from_slice(&target[common..]);
    segments.join("/")
}

fn normalize<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut out: Vec<&str> = Vec::new();
    for seg in segments {
        match seg {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rels_part_names() {
        assert_eq!(
            rels_part_name("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(
            rels_part_name("ppt/presentation.xml"),
            "ppt/_rels/presentation.xml.rels"
        );
        assert_eq!(rels_part_name(""), "_rels/.rels");
    }

    #[test]
    fn resolves_relative_and_absolute_targets() {
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../slideLayouts/slideLayout2.xml"),
            "ppt/slideLayouts/slideLayout2.xml"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide3.xml"),
            "ppt/slides/slide3.xml"
        );
        assert_eq!(
            resolve_target("", "ppt/presentation.xml"),
            "ppt/presentation.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn relative_refs() {
        assert_eq!(
            relative_ref("ppt/slides/slide1.xml", "ppt/media/image1.jpg"),
            "../media/image1.jpg"
        );
        assert_eq!(
            relative_ref("ppt/presentation.xml", "ppt/slides/slide2.xml"),
            "slides/slide2.xml"
        );
        assert_eq!(
            relative_ref("", "ppt/presentation.xml"),
            "ppt/presentation.xml"
        );
    }

    #[test]
    fn next_free_name_skips_taken() {
        let mut pkg = Package::new();
        pkg.set_part("ppt/slides/slide1.xml", b"<a/>".to_vec());
        pkg.set_part("ppt/slides/slide2.xml", b"<b/>".to_vec());
        assert_eq!(
            pkg.next_free_name("ppt/slides/slide", ".xml"),
            "ppt/slides/slide3.xml"
        );
    }

    #[test]
    fn zip_round_trip_keeps_parts_and_orders_content_types_first() {
        let mut pkg = Package::new();
        pkg.set_part("ppt/presentation.xml", b"<p/>".to_vec());
        pkg.set_part(CONTENT_TYPES_PART, b"<Types/>".to_vec());
        pkg.set_part("ppt/media/image1.jpg", vec![0xFF, 0xD8, 0xFF]);

        let bytes = pkg.write(Cursor::new(Vec::new())).unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), CONTENT_TYPES_PART);

        let back = Package::read(Cursor::new(bytes)).unwrap();
        assert_eq!(back.part("ppt/presentation.xml"), Some(&b"<p/>"[..]));
        assert_eq!(back.part("ppt/media/image1.jpg"), Some(&[0xFF, 0xD8, 0xFF][..]));
        assert!(back.require("ppt/missing.xml").is_err());
    }

    #[test]
    fn garbage_is_not_a_package() {
        assert!(Package::read(Cursor::new(b"not a zip".to_vec())).is_err());
    }
}
