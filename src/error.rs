//! Error types for the pdf2pptx library.
//!
//! Every failure is fatal: the converter is a single pass and nothing is
//! retried. [`Pdf2PptxError`] carries the detail, and [`ErrorKind`] groups
//! the variants into the three classes callers usually branch on:
//!
//! * [`ErrorKind::Render`]: the PDF (or a rendered page image) could not be
//!   read, parsed or rasterised.
//! * [`ErrorKind::Write`]: something could not be written to disk.
//! * [`ErrorKind::Config`]: the configuration or the template deck is
//!   unusable.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// A stored page image could not be decoded to read its pixel size.
    #[error("Cannot read image dimensions of '{path}': {detail}")]
    ImageDecodeFailed { path: PathBuf, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Searched PDFIUM_LIB_PATH, the executable's directory, the working directory\n\
and the system library path. Download a build from\n\
https://github.com/bblanchon/pdfium-binaries and set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium to use it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The scoped working directory for page images could not be created.
    #[error("Failed to create temporary image directory: {source}")]
    TempDirFailed {
        #[source]
        source: std::io::Error,
    },

    /// A page image could not be written into the working directory.
    #[error("Failed to write page image '{path}': {detail}")]
    ImageWriteFailed { path: PathBuf, detail: String },

    /// Could not create or write the output deck.
    #[error("Failed to write output deck '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    /// The built-in blank deck could not be assembled.
    #[error("Failed to assemble the blank deck: {0}")]
    DeckAssemblyFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The template deck is missing, unreadable, or not a usable .pptx.
    #[error("Template deck '{path}' is not usable: {detail}")]
    InvalidTemplate { path: PathBuf, detail: String },
}

/// Coarse classification of a [`Pdf2PptxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// PDF unreadable/malformed, or a page image unreadable.
    Render,
    /// Destination or working directory unwritable, disk exhausted.
    Write,
    /// Bad configuration value or unusable template.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Render => "RenderError",
            ErrorKind::Write => "WriteError",
            ErrorKind::Config => "ConfigError",
        })
    }
}

impl Pdf2PptxError {
    /// The class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Pdf2PptxError::FileNotFound { .. }
            | Pdf2PptxError::PermissionDenied { .. }
            | Pdf2PptxError::NotAPdf { .. }
            | Pdf2PptxError::CorruptPdf { .. }
            | Pdf2PptxError::PasswordRequired { .. }
            | Pdf2PptxError::WrongPassword { .. }
            | Pdf2PptxError::RasterisationFailed { .. }
            | Pdf2PptxError::ImageDecodeFailed { .. }
            | Pdf2PptxError::PdfiumBindingFailed(_) => ErrorKind::Render,

            Pdf2PptxError::TempDirFailed { .. }
            | Pdf2PptxError::ImageWriteFailed { .. }
            | Pdf2PptxError::OutputWriteFailed { .. }
            | Pdf2PptxError::DeckAssemblyFailed(_) => ErrorKind::Write,

            Pdf2PptxError::InvalidConfig(_) | Pdf2PptxError::InvalidTemplate { .. } => {
                ErrorKind::Config
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_a_pdf_display() {
        let e = Pdf2PptxError::NotAPdf {
            path: PathBuf::from("/tmp/readme.txt"),
            magic: *b"# Re",
        };
        let msg = e.to_string();
        assert!(msg.contains("readme.txt"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Render);
    }

    #[test]
    fn rasterisation_display() {
        let e = Pdf2PptxError::RasterisationFailed {
            page: 3,
            detail: "bitmap allocation".into(),
        };
        assert!(e.to_string().contains("page 3"));
        assert_eq!(e.kind(), ErrorKind::Render);
    }

    #[test]
    fn write_errors_are_write_kind() {
        let e = Pdf2PptxError::OutputWriteFailed {
            path: PathBuf::from("/readonly/out.pptx"),
            detail: "Permission denied".into(),
        };
        assert_eq!(e.kind(), ErrorKind::Write);
        assert!(e.to_string().contains("out.pptx"));

        let e = Pdf2PptxError::TempDirFailed {
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(e.kind(), ErrorKind::Write);

        let e = Pdf2PptxError::DeckAssemblyFailed("required part 'ppt/presentation.xml' is missing".into());
        assert_eq!(e.kind(), ErrorKind::Write);
    }

    #[test]
    fn config_errors_are_config_kind() {
        assert_eq!(
            Pdf2PptxError::InvalidConfig("DPI must be ≥ 1".into()).kind(),
            ErrorKind::Config
        );
        let e = Pdf2PptxError::InvalidTemplate {
            path: PathBuf::from("corp.pptx"),
            detail: "no slide layouts".into(),
        };
        assert_eq!(e.kind(), ErrorKind::Config);
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ErrorKind::Render.to_string(), "RenderError");
        assert_eq!(ErrorKind::Write.to_string(), "WriteError");
        assert_eq!(ErrorKind::Config.to_string(), "ConfigError");
    }
}
