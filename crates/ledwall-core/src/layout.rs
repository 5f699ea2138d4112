//! Greedy word-wrap layout for progressive reveal.
//!
//! Every placed token advances the pen by `width + char_spacing`. A word is
//! a run of visible characters plus the spaces right after it; it stays on
//! the current line if it fits, else it opens the next line. A word wider
//! than the whole line gets a line of its own.

use alloc::{vec, vec::Vec};

use crate::{
    font::{FontMetrics, Glyph, GlyphSet},
    raster::Raster,
    sink::Resolution,
};

/// One input character with its resolved glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'a> {
    pub character: char,
    /// `None` for line breaks and for characters the set cannot draw.
    pub glyph: Option<&'a Glyph>,
    /// Cell width; unmapped characters keep the nominal glyph width.
    pub width: usize,
    pub is_newline: bool,
    pub is_space: bool,
}

/// Splits `text` into one token per character.
pub fn tokenize<'a>(text: &str, glyphs: &'a GlyphSet) -> Vec<Token<'a>> {
    let nominal_width = glyphs.metrics().glyph_width;

    text.chars()
        .map(|character| {
            if character == '\n' {
                return Token {
                    character,
                    glyph: None,
                    width: 0,
                    is_newline: true,
                    is_space: false,
                };
            }

            let glyph = glyphs.glyph(character).glyph();
            Token {
                character,
                glyph,
                width: glyph.map_or(nominal_width, Glyph::width),
                is_newline: false,
                is_space: character == ' ',
            }
        })
        .collect()
}

/// Where a token sits on screen.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    /// `false` for line breaks and dropped leading spaces, which have a
    /// caret position but are never drawn.
    pub drawn: bool,
}

/// One visual line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LineLayout {
    pub y_top: usize,
    /// Indices into the token stream, in order.
    pub token_indices: Vec<usize>,
    /// Pixel width without trailing spacing.
    pub width: usize,
}

impl LineLayout {
    fn new(y_top: usize) -> Self {
        Self {
            y_top,
            token_indices: Vec::new(),
            width: 0,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Layout {
    lines: Vec<LineLayout>,
    placements: Vec<Placement>,
    height: usize,
}

impl Layout {
    pub fn lines(&self) -> &[LineLayout] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn token_count(&self) -> usize {
        self.placements.len()
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.placements.get(index).copied()
    }

    /// Draws the first `visible` tokens into a `resolution`-sized window.
    pub fn draw_prefix(&self, tokens: &[Token<'_>], visible: usize, resolution: Resolution) -> Raster {
        let mut window = Raster::new(resolution.cols, resolution.rows);

        for (token, placement) in tokens.iter().zip(&self.placements).take(visible) {
            if !placement.drawn {
                continue;
            }
            if let Some(glyph) = token.glyph {
                window.draw_glyph(glyph, placement.x as isize, placement.y as isize);
            }
        }

        window
    }
}

/// Lays `tokens` out in lines no wider than `max_width` where possible.
pub fn build_layout(tokens: &[Token<'_>], metrics: FontMetrics, max_width: usize) -> Layout {
    let spacing = metrics.char_spacing;
    let line_step = metrics.glyph_height + metrics.line_spacing;

    let mut lines = Vec::new();
    let mut placements = vec![Placement::default(); tokens.len()];
    let mut line = LineLayout::new(0);
    let mut pen = 0usize;

    let close_line = |lines: &mut Vec<LineLayout>, line: &mut LineLayout, pen: &mut usize| {
        let next = LineLayout::new(line.y_top + line_step);
        let mut done = core::mem::replace(line, next);
        done.width = if done.token_indices.is_empty() {
            0
        } else {
            pen.saturating_sub(spacing)
        };
        lines.push(done);
        *pen = 0;
    };

    let mut i = 0usize;
    while i < tokens.len() {
        if tokens[i].is_newline {
            placements[i] = Placement {
                x: pen,
                y: line.y_top,
                drawn: false,
            };
            close_line(&mut lines, &mut line, &mut pen);
            i += 1;
            continue;
        }

        if tokens[i].is_space && line.token_indices.is_empty() {
            placements[i] = Placement {
                x: 0,
                y: line.y_top,
                drawn: false,
            };
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        while end < tokens.len() && !tokens[end].is_newline && !tokens[end].is_space {
            end += 1;
        }
        while end < tokens.len() && tokens[end].is_space {
            end += 1;
        }

        let word = &tokens[start..end];
        let word_width =
            word.iter().map(|token| token.width).sum::<usize>() + spacing * (word.len() - 1);

        if !line.token_indices.is_empty() && pen + word_width > max_width {
            close_line(&mut lines, &mut line, &mut pen);
        }

        for (k, token) in word.iter().enumerate() {
            placements[start + k] = Placement {
                x: pen,
                y: line.y_top,
                drawn: true,
            };
            line.token_indices.push(start + k);
            pen += token.width + spacing;
        }

        i = end;
    }

    if !line.token_indices.is_empty() || lines.is_empty() {
        close_line(&mut lines, &mut line, &mut pen);
    }

    let count = lines.len();
    let height = count * metrics.glyph_height + (count - 1) * metrics.line_spacing;

    Layout {
        lines,
        placements,
        height: height.max(metrics.glyph_height),
    }
}
