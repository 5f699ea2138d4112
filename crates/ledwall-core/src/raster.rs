//! Fixed-size boolean pixel grids.

use alloc::{vec, vec::Vec};
use core::fmt;

use crate::font::Glyph;

/// Row-major boolean grid with `(0, 0)` at the top-left.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Raster {
    /// Creates an all-off raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads a cell. Out-of-bounds reads are off.
    #[inline]
    pub fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }

        self.pixel(x as usize, y as usize).unwrap_or(false)
    }

    /// Reads a cell, `None` when out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.cells[y * self.width + x])
    }

    /// Sets a cell.
    ///
    /// Returns `true` when the cell is in bounds, `false` otherwise.
    pub fn set(&mut self, x: isize, y: isize, on: bool) -> bool {
        if x < 0 || y < 0 {
            return false;
        }

        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }

        self.cells[y * self.width + x] = on;
        true
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of cells that are on.
    pub fn count_on(&self) -> usize {
        self.cells.iter().filter(|on| **on).count()
    }

    /// Whether no cell is on.
    pub fn is_blank(&self) -> bool {
        !self.cells.iter().any(|on| *on)
    }

    /// ORs a glyph bitmap into the raster with its top-left at `(x, y)`.
    ///
    /// Cells that are already on stay on; parts outside the raster are clipped.
    pub fn draw_glyph(&mut self, glyph: &Glyph, x: isize, y: isize) {
        for gy in 0..glyph.height() {
            let py = y + gy as isize;
            if py < 0 || py as usize >= self.height {
                continue;
            }

            for gx in 0..glyph.width() {
                if glyph.get(gx, gy) {
                    let _ = self.set(x + gx as isize, py, true);
                }
            }
        }
    }

    /// Turns on every in-bounds cell of a `width x height` rectangle.
    pub fn fill_rect(&mut self, x: isize, y: isize, width: usize, height: usize) {
        for dy in 0..height as isize {
            for dx in 0..width as isize {
                let _ = self.set(x + dx, y + dy, true);
            }
        }
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster {}x{}", self.width, self.height)?;
        fmt::Display::fmt(self, f)
    }
}

/// Renders `#` for on and `.` for off, one line per row.
impl fmt::Display for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for on in row {
                f.write_str(if *on { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_off() {
        let mut raster = Raster::new(3, 2);
        assert!(raster.set(2, 1, true));

        assert!(raster.get(2, 1));
        assert!(!raster.get(-1, 0));
        assert!(!raster.get(3, 0));
        assert!(!raster.get(0, 2));
        assert_eq!(raster.pixel(3, 1), None);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut raster = Raster::new(2, 2);

        assert!(!raster.set(-1, 0, true));
        assert!(!raster.set(2, 0, true));
        assert!(raster.is_blank());
    }

    #[test]
    fn glyph_is_or_composited_and_clipped() {
        let glyph = Glyph::from_rows('x', &["#.", ".#"]).unwrap();
        let mut raster = Raster::new(3, 2);
        // Sits under an off cell of the glyph and must stay lit.
        assert!(raster.set(2, 0, true));

        raster.draw_glyph(&glyph, 1, 0);

        assert_eq!(raster.to_string(), ".##\n..#\n");

        raster.draw_glyph(&glyph, 2, 1);
        assert_eq!(raster.to_string(), ".##\n..#\n");
    }

    #[test]
    fn zero_sized_raster_is_empty() {
        let raster = Raster::new(0, 4);
        assert!(raster.is_empty());
        assert!(raster.is_blank());
        assert!(!raster.get(0, 0));
    }
}
