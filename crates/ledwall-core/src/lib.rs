#![cfg_attr(not(test), no_std)]

//! Text engine for a virtual LED display wall.
//!
//! - [`font`]: glyph bitmaps, glyph sets and the built-in 5x7 font
//! - [`raster`]: boolean pixel grids
//! - [`rasterize`]: whole-message rasterization
//! - [`scroll`]: looping scroll/flash window sampling
//! - [`layout`]: word-wrap layout for progressive reveal
//! - [`typewriter`]: character-by-character reveal with caret
//! - [`marquee`]: scrolling/flashing text controller
//! - [`sink`]: pixel sink contract and render commands
//! - [`text_policy`]: text normalisation applied before rendering
//!
//! Controllers are driven by the caller through `tick(dt)` with the elapsed
//! time in seconds and never block.

extern crate alloc;

pub mod font;
pub mod layout;
pub mod marquee;
pub mod raster;
pub mod rasterize;
pub mod scroll;
pub mod sink;
pub mod text_policy;
pub mod typewriter;

pub use font::{FontMetrics, Glyph, GlyphLookup, GlyphSet};
pub use marquee::{MarqueeConfig, MarqueeController};
pub use raster::Raster;
pub use sink::{Frame, PixelSink, RenderCommand, Resolution};
pub use typewriter::{TypewriterConfig, TypewriterController, TypewriterEvent, TypewriterPhase};
