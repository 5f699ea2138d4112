#![cfg_attr(not(test), no_std)]

//! LED panel model: a grid of cells lit from rendered windows.
//!
//! [`LedPanel`] is the reference [`PixelSink`](ledwall_core::PixelSink). With
//! the `embedded-graphics` feature it can paint itself onto any
//! `DrawTarget` as a grid of filled cells.

extern crate alloc;

mod panel;

#[cfg(feature = "embedded-graphics")]
mod graphics;

pub use panel::LedPanel;

#[cfg(feature = "embedded-graphics")]
pub use graphics::CellLayout;

/// What one LED currently shows.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PixelState {
    #[default]
    Off,
    On,
    /// Lit with the colour of the last caret blit.
    Caret,
}

/// Colours for unlit and lit LEDs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PanelPalette<C> {
    pub off: C,
    pub on: C,
}

impl<C> PanelPalette<C> {
    pub const fn new(off: C, on: C) -> Self {
        Self { off, on }
    }
}
