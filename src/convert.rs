//! Conversion entry point: PDF in, PPTX out.

use crate::config::ConversionConfig;
use crate::deck::{build_deck, Deck};
use crate::error::Pdf2PptxError;
use crate::output::ConversionStats;
use crate::pipeline::{input, render, store::ImageStore};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file into a slide deck with one picture slide per page.
///
/// # Arguments
/// * `input_path`: PDF to convert
/// * `output_path`: `.pptx` file to write (parent directories are created)
/// * `config`: DPI, JPEG quality, password, template, progress callback
///
/// # Errors
/// Every failure aborts the run. The temporary image directory is removed
/// either way, and `output_path` is only created once the whole deck has
/// been written.
pub fn convert(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Pdf2PptxError> {
    let total_start = Instant::now();
    let output_path = output_path.as_ref();
    info!("Starting conversion: {}", input_path.as_ref().display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_input(input_path.as_ref())?;

    // ── Step 2: Open the deck ────────────────────────────────────────────
    // Before rendering, so an unusable template fails fast.
    let deck = match config.template.as_deref() {
        Some(template) => Deck::open_template(template)?,
        None => Deck::blank()?,
    };

    // ── Step 3: Scoped image directory ───────────────────────────────────
    let store = ImageStore::new()?;

    // ── Step 4: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let pdfium = render::bind_pdfium()?;
    let pages = render::render_pages(&pdfium, &pdf_path, config)?;
    let page_count = pages.len();

    // ── Step 5: Store as JPEG ────────────────────────────────────────────
    let written = store.save_pages(&pages, config.jpeg_quality)?;
    drop(pages);
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        written.len(),
        render_duration_ms
    );

    // ── Step 6: Build the deck ───────────────────────────────────────────
    let deck_start = Instant::now();
    let summary = build_deck(
        deck,
        store.path(),
        output_path,
        config.progress_callback.as_ref(),
    )?;
    let deck_duration_ms = deck_start.elapsed().as_millis() as u64;

    // ── Step 7: Clean up ─────────────────────────────────────────────────
    debug!("Removing temporary images directory: {}", store.path().display());
    store.close()?;

    let stats = ConversionStats {
        output: output_path.to_path_buf(),
        page_count,
        slide_count: summary.slide_count,
        dpi: config.dpi,
        template_used: config.template.is_some(),
        layout_name: summary.layout_name,
        slide_size: summary.slide_size,
        placements: summary.placements,
        render_duration_ms,
        deck_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} slides, {}ms total",
        stats.slide_count, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(stats.slide_count);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_input_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pptx");
        let err = convert(
            dir.path().join("missing.pdf"),
            &out,
            &ConversionConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Pdf2PptxError::FileNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::Render);
        assert!(!out.exists());
    }

    #[test]
    fn non_pdf_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake.pdf");
        std::fs::write(&fake, b"hello world").unwrap();
        let out = dir.path().join("out.pptx");

        let err = convert(&fake, &out, &ConversionConfig::default()).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::NotAPdf { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn bad_template_fails_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("doc.pdf");
        std::fs::write(&pdf, b"%PDF-1.4\n%%EOF\n").unwrap();
        let out = dir.path().join("out.pptx");
        let config = ConversionConfig::builder()
            .template(dir.path().join("no-such-template.pptx"))
            .build()
            .unwrap();

        // pdfium is never bound, so this holds with or without the library.
        let err = convert(&pdf, &out, &config).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::InvalidTemplate { .. }));
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!out.exists());
    }
}
