//! Configuration types for PDF-to-PPTX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The config is passed explicitly into
//! every stage; nothing in the pipeline reads process-wide settings.

use crate::error::Pdf2PptxError;
use crate::progress::{ConversionProgressCallback, ProgressCallback};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default rasterisation resolution.
pub const DEFAULT_DPI: u32 = 600;

/// Default JPEG quality for stored page images.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Configuration for a PDF-to-PPTX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2pptx::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(300)
///     .template("corporate.pptx")
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising each PDF page. Default: 600.
    ///
    /// Slides are usually projected or zoomed, so the default favours
    /// sharpness over file size. A letter page at 600 DPI is 5100 × 6600 px.
    pub dpi: u32,

    /// JPEG quality (1–100) for the page images embedded in the deck. Default: 75.
    pub jpeg_quality: u8,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Template deck. When set, slides reuse its "Title and Content" layout
    /// and theme and keep a 0.5 in margin at the top and bottom. When unset,
    /// slides are blank and the picture uses the full slide height.
    pub template: Option<PathBuf>,

    /// Optional progress callback, notified as pages are rendered and
    /// slides are added.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            password: None,
            template: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("template", &self.template)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ConversionProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(Pdf2PptxError::InvalidConfig(
                "DPI must be a positive integer, got 0".into(),
            ));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 600);
        assert_eq!(c.jpeg_quality, 75);
        assert!(c.template.is_none());
        assert!(c.password.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .dpi(150)
            .jpeg_quality(90)
            .password("hunter2")
            .template("deck.pptx")
            .build()
            .unwrap();
        assert_eq!(c.dpi, 150);
        assert_eq!(c.jpeg_quality, 90);
        assert_eq!(c.password.as_deref(), Some("hunter2"));
        assert_eq!(c.template, Some(PathBuf::from("deck.pptx")));
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let err = ConversionConfig::builder().dpi(0).build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn jpeg_quality_out_of_range_is_rejected() {
        assert!(ConversionConfig::builder().jpeg_quality(0).build().is_err());
        assert!(ConversionConfig::builder().jpeg_quality(101).build().is_err());
        assert!(ConversionConfig::builder().jpeg_quality(100).build().is_ok());
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("s3cret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("s3cret"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
    }
}
