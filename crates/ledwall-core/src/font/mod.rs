//! Bitmap glyphs and glyph sets.

pub mod builtin;

use alloc::collections::BTreeMap;

use heapless::Vec as HeaplessVec;

/// Maximum glyph height in rows.
pub const MAX_GLYPH_ROWS: usize = 16;
/// Maximum glyph width in columns (one `u32` per row).
pub const MAX_GLYPH_WIDTH: usize = 32;

/// Glyph set construction errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontError {
    /// Row 0 is wider than [`MAX_GLYPH_WIDTH`].
    GlyphTooWide { character: char, width: usize },
    /// More rows than [`MAX_GLYPH_ROWS`].
    GlyphTooTall { character: char, height: usize },
}

/// One character bitmap.
///
/// Bit `x` of `rows[y]` is the cell at column `x`, row `y` (top to bottom).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Glyph {
    character: char,
    width: u8,
    rows: HeaplessVec<u32, MAX_GLYPH_ROWS>,
}

impl Glyph {
    /// Parses declarative rows, top to bottom, where `#` is on and anything
    /// else is off.
    ///
    /// Width comes from row 0. Shorter rows are padded with off cells and
    /// longer rows are cut at the glyph width.
    pub fn from_rows(character: char, rows: &[&str]) -> Result<Self, FontError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width > MAX_GLYPH_WIDTH {
            return Err(FontError::GlyphTooWide { character, width });
        }

        let mut bits = HeaplessVec::new();
        for row in rows {
            let mut mask = 0u32;
            for (x, cell) in row.chars().take(width).enumerate() {
                if cell == '#' {
                    mask |= 1 << x;
                }
            }

            bits.push(mask).map_err(|_| FontError::GlyphTooTall {
                character,
                height: rows.len(),
            })?;
        }

        Ok(Self {
            character,
            width: width as u8,
            rows: bits,
        })
    }

    /// Builds a glyph from column bytes where bit 0 is the top row.
    ///
    /// This is the layout classic 5x7 LCD font tables use.
    pub fn from_columns(character: char, columns: &[u8], height: usize) -> Result<Self, FontError> {
        if columns.len() > MAX_GLYPH_WIDTH {
            return Err(FontError::GlyphTooWide {
                character,
                width: columns.len(),
            });
        }
        if height > MAX_GLYPH_ROWS || height > 8 {
            return Err(FontError::GlyphTooTall { character, height });
        }

        let mut bits = HeaplessVec::new();
        for y in 0..height {
            let mut mask = 0u32;
            for (x, column) in columns.iter().enumerate() {
                if (column & (1 << y)) != 0 {
                    mask |= 1 << x;
                }
            }
            let _ = bits.push(mask);
        }

        Ok(Self {
            character,
            width: columns.len() as u8,
            rows: bits,
        })
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Reads a cell. Out-of-bounds reads are off.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width() {
            return false;
        }

        self.rows.get(y).is_some_and(|bits| (bits & (1 << x)) != 0)
    }
}

/// Nominal font metrics used for layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FontMetrics {
    /// Nominal glyph width, used for characters without a glyph.
    pub glyph_width: usize,
    /// Nominal glyph height; one text line is this tall.
    pub glyph_height: usize,
    /// Columns between characters.
    pub char_spacing: usize,
    /// Rows between lines.
    pub line_spacing: usize,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            glyph_width: 5,
            glyph_height: 7,
            char_spacing: 1,
            line_spacing: 1,
        }
    }
}

/// Result of a glyph lookup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GlyphLookup<'a> {
    /// The character has its own glyph.
    Found(&'a Glyph),
    /// The character is unmapped and the set's fallback glyph stands in.
    Fallback(&'a Glyph),
    /// The character is unmapped and there is no fallback.
    Missing,
}

impl<'a> GlyphLookup<'a> {
    /// The glyph to draw, if any.
    pub fn glyph(self) -> Option<&'a Glyph> {
        match self {
            Self::Found(glyph) | Self::Fallback(glyph) => Some(glyph),
            Self::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Declarative glyph definition.
#[derive(Clone, Copy, Debug)]
pub struct GlyphDef<'a> {
    pub character: char,
    pub rows: &'a [&'a str],
}

impl<'a> GlyphDef<'a> {
    pub const fn new(character: char, rows: &'a [&'a str]) -> Self {
        Self { character, rows }
    }
}

/// Character to glyph mapping plus metrics and an optional fallback.
#[derive(Clone, Debug, Default)]
pub struct GlyphSet {
    metrics: FontMetrics,
    glyphs: BTreeMap<char, Glyph>,
    fallback: Option<Glyph>,
}

impl GlyphSet {
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            glyphs: BTreeMap::new(),
            fallback: None,
        }
    }

    /// Builds a set from declarative definitions.
    ///
    /// When a character is defined twice the first definition wins.
    pub fn from_definitions(metrics: FontMetrics, defs: &[GlyphDef<'_>]) -> Result<Self, FontError> {
        let mut set = Self::new(metrics);
        for def in defs {
            set.insert(Glyph::from_rows(def.character, def.rows)?);
        }
        Ok(set)
    }

    pub fn with_fallback(mut self, fallback: Glyph) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn set_fallback(&mut self, fallback: Option<Glyph>) {
        self.fallback = fallback;
    }

    /// Adds a glyph unless its character is already mapped.
    ///
    /// Returns `true` when the glyph was added.
    pub fn insert(&mut self, glyph: Glyph) -> bool {
        if self.glyphs.contains_key(&glyph.character) {
            return false;
        }

        self.glyphs.insert(glyph.character, glyph);
        true
    }

    pub fn glyph(&self, c: char) -> GlyphLookup<'_> {
        if let Some(glyph) = self.glyphs.get(&c) {
            return GlyphLookup::Found(glyph);
        }

        match &self.fallback {
            Some(glyph) => GlyphLookup::Fallback(glyph),
            None => GlyphLookup::Missing,
        }
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    pub fn contains(&self, c: char) -> bool {
        self.glyphs.contains_key(&c)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_parse_hash_as_on() {
        let glyph = Glyph::from_rows('T', &["###", ".#.", ".#."]).unwrap();

        assert_eq!(glyph.width(), 3);
        assert_eq!(glyph.height(), 3);
        assert!(glyph.get(0, 0));
        assert!(!glyph.get(0, 1));
        assert!(glyph.get(1, 2));
    }

    #[test]
    fn glyph_reads_outside_bitmap_are_off() {
        let glyph = Glyph::from_rows('I', &["#", "#"]).unwrap();

        assert!(!glyph.get(1, 0));
        assert!(!glyph.get(0, 2));
    }

    #[test]
    fn width_comes_from_first_row() {
        let glyph = Glyph::from_rows('L', &["#.", "####", "#"]).unwrap();

        assert_eq!(glyph.width(), 2);
        assert!(glyph.get(1, 1));
        assert!(!glyph.get(2, 1));
        assert!(!glyph.get(1, 2));
    }

    #[test]
    fn oversized_bitmaps_are_rejected() {
        let wide = "#################################";
        assert_eq!(
            Glyph::from_rows('W', &[wide]),
            Err(FontError::GlyphTooWide {
                character: 'W',
                width: 33
            })
        );

        let tall = ["#"; MAX_GLYPH_ROWS + 1];
        assert_eq!(
            Glyph::from_rows('H', &tall),
            Err(FontError::GlyphTooTall {
                character: 'H',
                height: MAX_GLYPH_ROWS + 1
            })
        );
    }

    #[test]
    fn column_bytes_map_bit_zero_to_top_row() {
        let glyph = Glyph::from_columns('-', &[0x01, 0x40], 7).unwrap();

        assert!(glyph.get(0, 0));
        assert!(glyph.get(1, 6));
        assert!(!glyph.get(1, 0));
    }

    #[test]
    fn lookup_reports_fallback_and_missing() {
        let defs = [GlyphDef::new('A', &["#"])];
        let set = GlyphSet::from_definitions(FontMetrics::default(), &defs).unwrap();

        assert!(matches!(set.glyph('A'), GlyphLookup::Found(_)));
        assert_eq!(set.glyph('B'), GlyphLookup::Missing);

        let set = set.with_fallback(Glyph::from_rows('?', &["#"]).unwrap());
        match set.glyph('B') {
            GlyphLookup::Fallback(glyph) => assert_eq!(glyph.character(), '?'),
            other => panic!("unexpected lookup {other:?}"),
        }
    }

    #[test]
    fn first_definition_wins() {
        let defs = [GlyphDef::new('A', &["#"]), GlyphDef::new('A', &["##"])];
        let set = GlyphSet::from_definitions(FontMetrics::default(), &defs).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.glyph('A').glyph().map(Glyph::width), Some(1));
    }
}
