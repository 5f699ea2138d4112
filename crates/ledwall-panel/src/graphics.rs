use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::PixelColor,
    primitives::Rectangle,
};

use crate::LedPanel;

/// Size of one LED cell and the gap between neighbouring cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CellLayout {
    pub cell: Size,
    pub spacing: Size,
}

impl Default for CellLayout {
    fn default() -> Self {
        Self {
            cell: Size::new(1, 1),
            spacing: Size::zero(),
        }
    }
}

impl CellLayout {
    pub const fn new(cell: Size, spacing: Size) -> Self {
        Self { cell, spacing }
    }

    /// Largest cells that fit `cols` x `rows` LEDs into `area`. Cells are at
    /// least 1x1 even when the area is too small.
    pub fn fit(area: Size, cols: usize, rows: usize, spacing: Size) -> Self {
        let axis = |extent: u32, count: usize, gap: u32| {
            let count = count.max(1) as u32;
            let gaps = gap.saturating_mul(count - 1);
            (extent.saturating_sub(gaps) / count).max(1)
        };

        Self {
            cell: Size::new(
                axis(area.width, cols, spacing.width),
                axis(area.height, rows, spacing.height),
            ),
            spacing,
        }
    }

    /// Top-left corner of the cell at (`x`, `y`).
    pub fn origin(&self, x: usize, y: usize) -> Point {
        let step_x = self.cell.width.saturating_add(self.spacing.width);
        let step_y = self.cell.height.saturating_add(self.spacing.height);
        let axis = |index: usize, step: u32| {
            let offset = u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(step);
            i32::try_from(offset).unwrap_or(i32::MAX)
        };
        Point::new(axis(x, step_x), axis(y, step_y))
    }

    /// Pixel extent of a `cols` x `rows` grid.
    pub fn extent(&self, cols: usize, rows: usize) -> Size {
        let axis = |count: usize, cell: u32, gap: u32| {
            let count = u32::try_from(count).unwrap_or(u32::MAX);
            count
                .saturating_mul(cell)
                .saturating_add(count.saturating_sub(1).saturating_mul(gap))
        };

        Size::new(
            axis(cols, self.cell.width, self.spacing.width),
            axis(rows, self.cell.height, self.spacing.height),
        )
    }
}

impl<C: Copy> OriginDimensions for LedPanel<C> {
    /// Size in LEDs.
    fn size(&self) -> Size {
        Size::new(self.cols() as u32, self.rows() as u32)
    }
}

impl<C: PixelColor> LedPanel<C> {
    /// Paints every LED as a filled cell.
    pub fn draw_cells<D>(&self, target: &mut D, layout: CellLayout) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        for (x, y, state) in self.cells() {
            let area = Rectangle::new(layout.origin(x, y), layout.cell);
            target.fill_solid(&area, self.color_of(state))?;
        }

        Ok(())
    }
}
