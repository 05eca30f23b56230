//! Picture geometry in EMU (English Metric Units, 914 400 per inch).

use serde::Serialize;

pub const EMU_PER_INCH: i64 = 914_400;

/// Top and bottom margin applied when building on a template: half an inch.
pub const TEMPLATE_MARGIN_EMU: i64 = EMU_PER_INCH / 2;

/// Slide dimensions of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlideSize {
    pub width: i64,
    pub height: i64,
}

impl SlideSize {
    /// 10 in × 7.5 in, the size of a blank deck.
    pub const SCREEN_4X3: SlideSize = SlideSize {
        width: 9_144_000,
        height: 6_858_000,
    };
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::SCREEN_4X3
    }
}

/// Vertical margins kept free around the picture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: i64,
    pub bottom: i64,
}

impl Margins {
    pub const NONE: Margins = Margins { top: 0, bottom: 0 };

    pub const TEMPLATE: Margins = Margins {
        top: TEMPLATE_MARGIN_EMU,
        bottom: TEMPLATE_MARGIN_EMU,
    };
}

/// Where a picture sits on its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

/// Fit a `px_width × px_height` image on a slide.
///
/// The picture takes the full available height; its width follows the
/// image aspect ratio, truncated to whole EMU and clamped to the slide
/// width, and it is centred horizontally. When the width is clamped the
/// height is left as is, so very wide pages are stretched vertically.
pub fn fit_picture(slide: SlideSize, margins: Margins, px_width: u32, px_height: u32) -> Placement {
    let available = (slide.height - margins.top - margins.bottom).max(0);

    let natural = if px_height == 0 {
        slide.width
    } else {
        let w = i128::from(available) * i128::from(px_width) / i128::from(px_height);
        i64::try_from(w).unwrap_or(i64::MAX)
    };
    let width = natural.min(slide.width);

    Placement {
        left: (slide.width - width) / 2,
        top: margins.top,
        width,
        height: available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLIDE: SlideSize = SlideSize::SCREEN_4X3;

    #[test]
    fn portrait_page_is_full_height_and_centred() {
        // US Letter at 600 dpi.
        let p = fit_picture(SLIDE, Margins::NONE, 5100, 6600);
        assert_eq!(p.height, SLIDE.height);
        assert_eq!(p.top, 0);
        assert_eq!(p.width, 6_858_000 * 5100 / 6600);
        assert_eq!(p.left, (SLIDE.width - p.width) / 2);
    }

    #[test]
    fn wide_image_is_clamped_to_slide_width() {
        let p = fit_picture(SLIDE, Margins::NONE, 4000, 1000);
        assert_eq!(p.width, SLIDE.width);
        assert_eq!(p.left, 0);
        assert_eq!(p.height, SLIDE.height);
    }

    #[test]
    fn tall_image_uses_available_height() {
        let p = fit_picture(SLIDE, Margins::TEMPLATE, 100, 10_000);
        assert_eq!(p.height, SLIDE.height - 2 * TEMPLATE_MARGIN_EMU);
        assert_eq!(p.top, TEMPLATE_MARGIN_EMU);
        assert!(p.width <= SLIDE.width);
    }

    #[test]
    fn template_margins_are_half_an_inch() {
        assert_eq!(TEMPLATE_MARGIN_EMU, 457_200);
        let p = fit_picture(SLIDE, Margins::TEMPLATE, 3, 4);
        assert_eq!(p.top + p.height + TEMPLATE_MARGIN_EMU, SLIDE.height);
    }

    #[test]
    fn width_is_truncated_not_rounded() {
        let slide = SlideSize { width: 1000, height: 10 };
        let p = fit_picture(slide, Margins::NONE, 2, 3);
        assert_eq!(p.width, 6); // 6.67 → 6
        assert_eq!(p.left, 497);
    }

    #[test]
    fn degenerate_sizes_do_not_panic() {
        let p = fit_picture(SLIDE, Margins::NONE, 10, 0);
        assert_eq!(p.width, SLIDE.width);

        let tiny = SlideSize { width: 100, height: 100 };
        let p = fit_picture(tiny, Margins::TEMPLATE, 10, 10);
        assert_eq!(p.height, 0);
        assert_eq!(p.width, 0);
    }
}
