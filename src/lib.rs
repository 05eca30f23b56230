//! # pdf2pptx
//!
//! Convert PDF documents into PowerPoint decks, one picture slide per page.
//!
//! Every page is rasterised with pdfium at a configurable DPI, stored as a
//! JPEG in a scoped temporary directory, and placed on its own slide,
//! centred at full height. An optional template deck supplies the slide
//! size, master, theme and layout; pictures then keep half-inch margins at
//! top and bottom and the layout's empty placeholders are removed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   check the file exists and starts with %PDF
//!  ├─ 2. Render  rasterise pages via pdfium (dpi / 72 scale)
//!  ├─ 3. Store   page_01.jpg … page_NN.jpg in a temp dir
//!  ├─ 4. Deck    blank or template deck, one slide per image
//!  └─ 5. Output  atomic write of the .pptx + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder().dpi(300).build()?;
//!     let stats = convert("slides.pdf", "slides.pptx", &config)?;
//!     println!("{} slides written", stats.slide_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + tracing-subscriber + indicatif + serde_json) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## pdfium
//!
//! pdfium is loaded at run time. Point `PDFIUM_LIB_PATH` at the library (or
//! its directory), or place it next to the executable or in the working
//! directory; otherwise the system library path is searched.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod deck;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_DPI, DEFAULT_JPEG_QUALITY};
pub use convert::convert;
pub use deck::placement::{fit_picture, Margins, Placement, SlideSize};
pub use deck::{build_deck, Deck, DeckSummary};
pub use error::{ErrorKind, Pdf2PptxError};
pub use output::ConversionStats;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
