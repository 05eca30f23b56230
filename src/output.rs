//! Result types returned by a conversion.

use crate::deck::placement::{Placement, SlideSize};
use serde::Serialize;
use std::path::PathBuf;

/// Summary of one PDF → PPTX run.
///
/// Serialisable so the CLI can print it with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionStats {
    /// Deck that was written.
    pub output: PathBuf,
    /// Pages in the source PDF.
    pub page_count: usize,
    /// Slides in the written deck; always equals `page_count`.
    pub slide_count: usize,
    pub dpi: u32,
    pub template_used: bool,
    pub layout_name: Option<String>,
    pub slide_size: SlideSize,
    /// Picture geometry per slide, in slide order.
    pub placements: Vec<Placement>,
    pub render_duration_ms: u64,
    pub deck_duration_ms: u64,
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialise_to_json() {
        let stats = ConversionStats {
            output: PathBuf::from("out.pptx"),
            page_count: 1,
            slide_count: 1,
            dpi: 600,
            template_used: false,
            layout_name: Some("Blank".into()),
            slide_size: SlideSize::SCREEN_4X3,
            placements: vec![Placement {
                left: 1,
                top: 0,
                width: 2,
                height: 3,
            }],
            render_duration_ms: 5,
            deck_duration_ms: 6,
            total_duration_ms: 11,
        };

        let json: serde_json::Value = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["slide_count"], 1);
        assert_eq!(json["slide_size"]["width"], 9_144_000);
        assert_eq!(json["placements"][0]["height"], 3);
        assert_eq!(json["output"], "out.pptx");
    }
}
