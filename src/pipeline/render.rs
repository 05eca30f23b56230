//! PDF rasterisation: render every page to an RGB image via pdfium.
//!
//! PDF user space is 72 units per inch, so a page rendered at `dpi` is
//! scaled by `dpi / 72`. Pages are rendered in document order and the call
//! fails as a whole: either every page comes back or none does.

use crate::config::ConversionConfig;
use crate::error::Pdf2PptxError;
use crate::progress::ProgressCallback;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// One rasterised page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Rendered pixels. JPEG has no alpha channel, so pages are kept as RGB.
    pub image: RgbImage,
}

impl PageImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Bind to a pdfium library.
///
/// Search order:
/// 1. `PDFIUM_LIB_PATH` (a file, or a directory holding the platform library)
/// 2. The directory of the running executable
/// 3. The current working directory
/// 4. The system library path
pub fn bind_pdfium() -> Result<Pdfium, Pdf2PptxError> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
        let p = PathBuf::from(p);
        if p.is_dir() {
            candidates.push(Pdfium::pdfium_platform_library_name_at_path(&p));
        } else {
            candidates.push(p);
        }
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(Pdfium::pdfium_platform_library_name_at_path(&dir));
    }
    candidates.push(Pdfium::pdfium_platform_library_name_at_path("./"));

    for candidate in candidates.iter().filter(|p| p.exists()) {
        match Pdfium::bind_to_library(candidate) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => debug!("Could not bind pdfium at {}: {:?}", candidate.display(), e),
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| Pdf2PptxError::PdfiumBindingFailed(format!("{:?}", e)))
}

/// Rasterise every page of a PDF.
///
/// # Returns
/// One [`PageImage`] per page, in page order. A document without pages
/// yields an empty vector.
pub fn render_pages(
    pdfium: &Pdfium,
    pdf_path: &Path,
    config: &ConversionConfig,
) -> Result<Vec<PageImage>, Pdf2PptxError> {
    let password = config.password.as_deref();
    info!(
        "Converting {} into images, dpi={}",
        pdf_path.display(),
        config.dpi
    );

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| classify_load_error(pdf_path, password, e))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_pages);
    }

    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(scale_for_dpi(config.dpi))
        .render_form_data(true);

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2PptxError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image().to_rgb8();
        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );

        notify_rendered(config.progress_callback.as_ref(), page_num, total_pages);
        results.push(PageImage { page_num, image });
    }

    Ok(results)
}

/// Scale factor that maps PDF points to pixels at `dpi`.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

fn notify_rendered(cb: Option<&ProgressCallback>, page_num: usize, total: usize) {
    if let Some(cb) = cb {
        cb.on_page_rendered(page_num, total);
    }
}

fn classify_load_error(pdf_path: &Path, password: Option<&str>, e: PdfiumError) -> Pdf2PptxError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            Pdf2PptxError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            Pdf2PptxError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        Pdf2PptxError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_dpi_over_72() {
        assert_eq!(scale_for_dpi(72), 1.0);
        assert_eq!(scale_for_dpi(144), 2.0);
        assert!((scale_for_dpi(600) - 8.333_333).abs() < 1e-4);
    }

    #[test]
    fn page_image_reports_dimensions() {
        let page = PageImage {
            page_num: 1,
            image: RgbImage::new(40, 30),
        };
        assert_eq!((page.width(), page.height()), (40, 30));
    }
}
