//! True-colour terminal canvas.

use std::{
    convert::Infallible,
    io::{self, Write},
};

use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Rgb888, RgbColor},
};
use ledwall_panel::{CellLayout, LedPanel};

/// Two columns per pixel keeps LEDs roughly square.
const PIXEL: &str = "\u{2588}\u{2588}";

/// Off-screen pixel buffer repainted over the terminal on every flush.
pub struct TerminalCanvas {
    size: Size,
    pixels: Vec<Rgb888>,
    layout: CellLayout,
}

impl TerminalCanvas {
    pub fn new(layout: CellLayout) -> Self {
        Self {
            size: Size::zero(),
            pixels: Vec::new(),
            layout,
        }
    }

    /// Switches to the alternate screen and hides the cursor.
    pub fn begin(&self, out: &mut impl Write) -> io::Result<()> {
        execute!(out, EnterAlternateScreen, Clear(ClearType::All), cursor::Hide)
    }

    pub fn end(&self, out: &mut impl Write) -> io::Result<()> {
        execute!(out, ResetColor, cursor::Show, LeaveAlternateScreen)
    }

    /// Paints `panel` and writes it to `out`.
    pub fn show(&mut self, panel: &LedPanel<Rgb888>, out: &mut impl Write) -> io::Result<()> {
        let size = self.layout.extent(panel.cols(), panel.rows());
        if size != self.size {
            self.size = size;
            self.pixels = vec![Rgb888::BLACK; (size.width * size.height) as usize];
            queue!(out, Clear(ClearType::All))?;
        }

        let layout = self.layout;
        panel
            .draw_cells(self, layout)
            .unwrap_or_else(|never| match never {});

        self.flush(out)
    }

    fn flush(&self, out: &mut impl Write) -> io::Result<()> {
        let width = self.size.width.max(1) as usize;

        for (y, row) in self.pixels.chunks(width).enumerate() {
            let y = u16::try_from(y).unwrap_or(u16::MAX);
            queue!(out, cursor::MoveTo(0, y))?;

            let mut current = None;
            for &color in row {
                if current != Some(color) {
                    queue!(out, SetForegroundColor(terminal_color(color)))?;
                    current = Some(color);
                }
                queue!(out, Print(PIXEL))?;
            }
            queue!(out, ResetColor)?;
        }

        out.flush()
    }
}

fn terminal_color(color: Rgb888) -> Color {
    Color::Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}

impl OriginDimensions for TerminalCanvas {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for TerminalCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }

            let (x, y) = (point.x as u32, point.y as u32);
            if x >= self.size.width || y >= self.size.height {
                continue;
            }

            self.pixels[(y * self.size.width + x) as usize] = color;
        }

        Ok(())
    }
}
