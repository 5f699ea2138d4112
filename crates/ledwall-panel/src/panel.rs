//! In-memory LED grid.

use alloc::{vec, vec::Vec};

use ledwall_core::{PixelSink, Raster, Resolution};
use log::debug;

use crate::{PanelPalette, PixelState};

/// Row-major grid of LED states with its palette.
///
/// The grid is never smaller than 1x1.
#[derive(Clone, Debug)]
pub struct LedPanel<C> {
    cols: usize,
    rows: usize,
    cells: Vec<PixelState>,
    palette: PanelPalette<C>,
    caret_color: C,
}

impl<C: Copy> LedPanel<C> {
    /// Creates an all-off panel. Until the first caret blit, caret cells
    /// use the on colour.
    pub fn new(cols: usize, rows: usize, palette: PanelPalette<C>) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);

        Self {
            cols,
            rows,
            cells: vec![PixelState::Off; cols * rows],
            palette,
            caret_color: palette.on,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn palette(&self) -> PanelPalette<C> {
        self.palette
    }

    /// Takes effect on every cell immediately.
    pub fn set_palette(&mut self, palette: PanelPalette<C>) {
        self.palette = palette;
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<PixelState> {
        if x >= self.cols || y >= self.rows {
            return None;
        }

        Some(self.cells[y * self.cols + x])
    }

    /// Colour currently shown by the LED at (`x`, `y`).
    pub fn color_at(&self, x: usize, y: usize) -> Option<C> {
        self.pixel(x, y).map(|state| self.color_of(state))
    }

    pub fn color_of(&self, state: PixelState) -> C {
        match state {
            PixelState::Off => self.palette.off,
            PixelState::On => self.palette.on,
            PixelState::Caret => self.caret_color,
        }
    }

    /// Number of LEDs in `state`.
    pub fn count(&self, state: PixelState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Iterates `(x, y, state)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, PixelState)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, state)| (i % cols, i / cols, *state))
    }

    fn fill_from(&mut self, window: &Raster, caret_mask: Option<&Raster>) {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let (xi, yi) = (x as isize, y as isize);
                let state = if caret_mask.is_some_and(|mask| mask.get(xi, yi)) {
                    PixelState::Caret
                } else if window.get(xi, yi) {
                    PixelState::On
                } else {
                    PixelState::Off
                };

                self.cells[y * self.cols + x] = state;
            }
        }
    }
}

impl<C: Copy> PixelSink for LedPanel<C> {
    type Color = C;

    fn resolution(&self) -> Resolution {
        Resolution::new(self.cols, self.rows)
    }

    fn set_resolution(&mut self, cols: usize, rows: usize) {
        let cols = cols.max(1);
        let rows = rows.max(1);
        if cols == self.cols && rows == self.rows {
            return;
        }

        debug!("panel: resize {}x{} -> {}x{}", self.cols, self.rows, cols, rows);
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![PixelState::Off; cols * rows];
    }

    fn clear(&mut self) {
        self.cells.fill(PixelState::Off);
    }

    fn blit(&mut self, window: &Raster) {
        self.fill_from(window, None);
    }

    fn blit_with_caret(&mut self, window: &Raster, caret_mask: Option<&Raster>, caret_color: C) {
        self.caret_color = caret_color;
        self.fill_from(window, caret_mask);
    }
}
