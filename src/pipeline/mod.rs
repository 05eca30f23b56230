//! Pipeline stages that turn a PDF into page images on disk.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ store ──▶ (crate::deck)
//! (%PDF)    (pdfium)   (JPEG)
//! ```
//!
//! 1. [`input`]: check the path exists, is readable, and looks like a PDF
//! 2. [`render`]: rasterise every page at the configured DPI
//! 3. [`store`]: write `page_NN.jpg` files into a scoped temp directory

pub mod input;
pub mod render;
pub mod store;
