//! Pixel sink contract and the render commands controllers emit.

use crate::raster::Raster;

/// Display resolution in LED cells.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Resolution {
    pub cols: usize,
    pub rows: usize,
}

impl Resolution {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub const fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// Requested display size. `0` on an axis means "keep the sink's size".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TargetSize {
    pub cols: usize,
    pub rows: usize,
}

impl TargetSize {
    /// Follow the sink's current size on both axes.
    pub const AUTO: Self = Self { cols: 0, rows: 0 };

    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    /// Picks the explicit target, else the sink's current size, else
    /// `fallback`, per axis. The result is never smaller than 1x1.
    pub fn resolve(self, current: Resolution, fallback: Resolution) -> Resolution {
        let pick = |target: usize, current: usize, fallback: usize| {
            if target > 0 {
                target
            } else if current > 0 {
                current
            } else {
                fallback.max(1)
            }
        };

        Resolution {
            cols: pick(self.cols, current.cols, fallback.cols),
            rows: pick(self.rows, current.rows, fallback.rows),
        }
    }
}

/// Output surface for rendered windows.
///
/// Implementations map each window cell to an LED with off, on or caret
/// colour.
pub trait PixelSink {
    type Color: Copy;

    fn resolution(&self) -> Resolution;

    /// Resizes the grid. Calling it with the current size is a no-op.
    fn set_resolution(&mut self, cols: usize, rows: usize);

    /// Sets every LED to the off colour.
    fn clear(&mut self);

    /// Replaces every LED from `window`; cells outside the window are off.
    fn blit(&mut self, window: &Raster);

    /// Like [`PixelSink::blit`], but cells set in `caret_mask` take
    /// `caret_color` whatever the window holds there.
    fn blit_with_caret(&mut self, window: &Raster, caret_mask: Option<&Raster>, caret_color: Self::Color);
}

/// One rendered frame: the visible window and an optional caret overlay.
///
/// The caret mask, when present, has the window's size.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    pub window: Raster,
    pub caret: Option<Raster>,
}

impl Frame {
    pub fn new(window: Raster) -> Self {
        Self {
            window,
            caret: None,
        }
    }

    pub fn with_caret(window: Raster, caret: Raster) -> Self {
        Self {
            window,
            caret: Some(caret),
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.window.width(), self.window.height())
    }
}

/// What a controller wants shown after a tick.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum RenderCommand {
    /// Nothing changed.
    #[default]
    None,
    /// Replace the sink's content.
    Draw(Frame),
    /// Turn every LED off.
    Clear,
}

impl RenderCommand {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::Draw(frame) => Some(frame),
            _ => None,
        }
    }

    /// Applies the command to `sink`, resizing it to the frame first.
    pub fn present<S: PixelSink>(&self, sink: &mut S, caret_color: S::Color) {
        match self {
            Self::None => {}
            Self::Clear => sink.clear(),
            Self::Draw(frame) => {
                let size = frame.resolution();
                sink.set_resolution(size.cols, size.rows);

                match &frame.caret {
                    Some(mask) => sink.blit_with_caret(&frame.window, Some(mask), caret_color),
                    None => sink.blit(&frame.window),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_target_wins_over_sink_size() {
        let size = TargetSize::new(32, 0).resolve(Resolution::new(16, 8), Resolution::new(4, 7));
        assert_eq!(size, Resolution::new(32, 8));
    }

    #[test]
    fn fallback_is_used_for_unsized_sink_and_never_zero() {
        let size = TargetSize::AUTO.resolve(Resolution::default(), Resolution::new(0, 7));
        assert_eq!(size, Resolution::new(1, 7));
    }

    #[derive(Default)]
    struct RecordingSink {
        resolution: Resolution,
        cleared: usize,
        blits: usize,
        caret_blits: usize,
    }

    impl PixelSink for RecordingSink {
        type Color = u8;

        fn resolution(&self) -> Resolution {
            self.resolution
        }

        fn set_resolution(&mut self, cols: usize, rows: usize) {
            self.resolution = Resolution::new(cols, rows);
        }

        fn clear(&mut self) {
            self.cleared += 1;
        }

        fn blit(&mut self, _window: &Raster) {
            self.blits += 1;
        }

        fn blit_with_caret(&mut self, _window: &Raster, _caret_mask: Option<&Raster>, _caret_color: u8) {
            self.caret_blits += 1;
        }
    }

    #[test]
    fn present_resizes_then_dispatches_by_caret() {
        let mut sink = RecordingSink::default();

        RenderCommand::Draw(Frame::new(Raster::new(6, 3))).present(&mut sink, 1);
        assert_eq!(sink.resolution, Resolution::new(6, 3));
        assert_eq!(sink.blits, 1);

        RenderCommand::Draw(Frame::with_caret(Raster::new(6, 3), Raster::new(6, 3)))
            .present(&mut sink, 1);
        assert_eq!(sink.caret_blits, 1);

        RenderCommand::Clear.present(&mut sink, 1);
        RenderCommand::None.present(&mut sink, 1);
        assert_eq!(sink.cleared, 1);
        assert_eq!(sink.blits, 1);
    }
}
