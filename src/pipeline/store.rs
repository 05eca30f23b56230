//! Image store: persist rendered pages as JPEG files in a scoped directory.
//!
//! Files are named `page_<n>.jpg` with `n` 1-based and zero-padded to the
//! digit count of the page total, so a plain lexicographic directory listing
//! returns them in document order. The directory is owned by an
//! [`ImageStore`]; dropping the store deletes it recursively, including when
//! the conversion bails out early with `?`.

use crate::error::Pdf2PptxError;
use crate::pipeline::render::PageImage;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Number of decimal digits needed to print `total`.
///
/// Zero pages need no padding; this never takes a logarithm of zero.
pub fn digit_width(total: usize) -> usize {
    total.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// File name for 1-based page `index` out of `total`.
pub fn page_file_name(index: usize, total: usize) -> String {
    format!("page_{:0width$}.jpg", index, width = digit_width(total))
}

/// Scoped working directory for page images.
#[derive(Debug)]
pub struct ImageStore {
    dir: TempDir,
}

impl ImageStore {
    /// Create a fresh, uniquely named directory under the system temp dir.
    pub fn new() -> Result<Self, Pdf2PptxError> {
        let dir = tempfile::Builder::new()
            .prefix("pdf2pptx-")
            .tempdir()
            .map_err(|source| Pdf2PptxError::TempDirFailed { source })?;
        debug!("Created temporary images directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write every page into the store. See [`save_images`].
    pub fn save_pages(
        &self,
        pages: &[PageImage],
        jpeg_quality: u8,
    ) -> Result<Vec<PathBuf>, Pdf2PptxError> {
        save_images(pages, self.path(), jpeg_quality)
    }

    /// Delete the directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> Result<(), Pdf2PptxError> {
        self.dir
            .close()
            .map_err(|source| Pdf2PptxError::TempDirFailed { source })
    }
}

/// Write `pages` as JPEG files into `dir`, returning the written paths in
/// page order. An empty slice writes nothing.
pub fn save_images(
    pages: &[PageImage],
    dir: &Path,
    jpeg_quality: u8,
) -> Result<Vec<PathBuf>, Pdf2PptxError> {
    let total = pages.len();
    let mut written = Vec::with_capacity(total);

    for (i, page) in pages.iter().enumerate() {
        let file_path = dir.join(page_file_name(i + 1, total));
        debug!("Saving temporary image file: {}", file_path.display());
        write_jpeg(page, &file_path, jpeg_quality)?;
        written.push(file_path);
    }

    Ok(written)
}

fn write_jpeg(page: &PageImage, path: &Path, quality: u8) -> Result<(), Pdf2PptxError> {
    let write_err = |detail: String| Pdf2PptxError::ImageWriteFailed {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    page.image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
        .map_err(|e| write_err(e.to_string()))?;
    writer.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}
