//! Whole-message rasterization.

use crate::{font::GlyphSet, raster::Raster};

/// Size of a rasterized message in pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TextExtent {
    pub width: usize,
    pub height: usize,
    pub lines: usize,
}

/// Measures `text` without drawing it.
///
/// Characters without a glyph (and no fallback) take no space. Both
/// dimensions are at least 1.
pub fn measure(text: &str, glyphs: &GlyphSet) -> TextExtent {
    let metrics = glyphs.metrics();

    let mut lines = 1usize;
    let mut max_width = 0usize;
    // Pen position after the last glyph, including its trailing spacing.
    let mut line_advance = 0usize;

    for c in text.chars() {
        if c == '\n' {
            max_width = max_width.max(line_advance.saturating_sub(metrics.char_spacing));
            line_advance = 0;
            lines += 1;
            continue;
        }

        if let Some(glyph) = glyphs.glyph(c).glyph() {
            line_advance += glyph.width() + metrics.char_spacing;
        }
    }
    max_width = max_width.max(line_advance.saturating_sub(metrics.char_spacing));

    let height = lines * metrics.glyph_height + (lines - 1) * metrics.line_spacing;

    TextExtent {
        width: max_width.max(1),
        height: height.max(1),
        lines,
    }
}

/// Draws `text` into a new raster sized to fit it exactly.
///
/// Each `\n` starts a new line `glyph_height + line_spacing` rows lower.
/// Glyphs are OR-composited, so overlapping glyphs never erase each other.
pub fn rasterize(text: &str, glyphs: &GlyphSet) -> Raster {
    let metrics = glyphs.metrics();
    let extent = measure(text, glyphs);
    let mut raster = Raster::new(extent.width, extent.height);

    let mut x = 0usize;
    let mut y = 0usize;

    for c in text.chars() {
        if c == '\n' {
            x = 0;
            y += metrics.glyph_height + metrics.line_spacing;
            continue;
        }

        let Some(glyph) = glyphs.glyph(c).glyph() else {
            continue;
        };

        raster.draw_glyph(glyph, x as isize, y as isize);
        x += glyph.width() + metrics.char_spacing;
    }

    raster
}
