//! Static, scrolling or flashing single message.

use alloc::string::String;

use log::debug;

use crate::{
    font::GlyphSet,
    raster::Raster,
    rasterize::rasterize,
    scroll::{ScrollConfig, ScrollMode, ScrollSampler},
    sink::{Frame, RenderCommand, Resolution, TargetSize},
    text_policy::TextPolicy,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MarqueeConfig {
    pub text_policy: TextPolicy,
    pub target: TargetSize,
    pub scroll: ScrollConfig,
}

/// Rasterizes a message once and samples a window from it every tick.
pub struct MarqueeController<'a> {
    glyphs: &'a GlyphSet,
    policy: TextPolicy,
    target: TargetSize,
    text: String,
    content: Raster,
    sampler: ScrollSampler,
    resolution: Resolution,
    active: bool,
}

impl<'a> MarqueeController<'a> {
    /// Rasterizes `text` for a sink of `sink` resolution and starts animating.
    pub fn new(glyphs: &'a GlyphSet, config: MarqueeConfig, sink: Resolution, text: &str) -> Self {
        let mut controller = Self {
            glyphs,
            policy: config.text_policy,
            target: config.target,
            text: String::from(text),
            content: Raster::default(),
            sampler: ScrollSampler::new(config.scroll),
            resolution: sink,
            active: true,
        };
        let _ = controller.refresh();
        controller
    }

    /// Raw message as last set, before the text policy.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn content(&self) -> &Raster {
        &self.content
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn scroll(&self) -> &ScrollSampler {
        &self.sampler
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_text(&mut self, text: &str) -> RenderCommand {
        self.text = String::from(text);
        self.refresh()
    }

    /// Changes direction and restarts the flash cycle.
    pub fn set_scroll(&mut self, mode: ScrollMode) {
        self.sampler.set_mode(mode);
    }

    pub fn set_flashing(&mut self, flashing: bool) -> RenderCommand {
        self.sampler.set_flashing(flashing);
        RenderCommand::Draw(self.frame())
    }

    pub fn set_flash_hz(&mut self, flash_hz: f32) {
        self.sampler.set_flash_hz(flash_hz);
    }

    pub fn set_scroll_speed(&mut self, speed_px_per_sec: f32) {
        self.sampler.set_speed(speed_px_per_sec);
    }

    pub fn set_loop_gap(&mut self, gap_px: usize) {
        self.sampler.set_gap(gap_px);
    }

    pub fn set_text_policy(&mut self, policy: TextPolicy) -> RenderCommand {
        self.policy = policy;
        self.refresh()
    }

    pub fn set_target(&mut self, target: TargetSize) -> RenderCommand {
        self.target = target;
        self.refresh()
    }

    /// Follows a sink resize. Returns `None` when the size is unchanged.
    pub fn set_resolution(&mut self, cols: usize, rows: usize) -> RenderCommand {
        let resolution = self.resolve_resolution(Resolution::new(cols, rows));
        if resolution == self.resolution {
            return RenderCommand::None;
        }

        self.resolution = resolution;
        RenderCommand::Draw(self.frame())
    }

    /// Re-rasterizes the message and draws it unscrolled.
    pub fn refresh(&mut self) -> RenderCommand {
        let normalized = self.policy.apply(&self.text);
        self.content = rasterize(&normalized, self.glyphs);
        self.resolution = self.resolve_resolution(self.resolution);
        self.sampler.reset_offset();

        debug!(
            "marquee: content={}x{} window={}x{} mode={:?}",
            self.content.width(),
            self.content.height(),
            self.resolution.cols,
            self.resolution.rows,
            self.sampler.mode()
        );

        RenderCommand::Draw(self.frame())
    }

    pub fn start(&mut self) {
        if !self.active {
            debug!("marquee: started");
        }
        self.active = true;
    }

    pub fn stop(&mut self) {
        if self.active {
            debug!("marquee: stopped");
        }
        self.active = false;
    }

    /// Advances scroll and flash by `dt` seconds. Draws only when the
    /// window may have changed.
    pub fn tick(&mut self, dt: f32) -> RenderCommand {
        if !self.active {
            return RenderCommand::None;
        }

        if self.sampler.step(dt, &self.content, self.resolution) {
            RenderCommand::Draw(self.frame())
        } else {
            RenderCommand::None
        }
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.sampler.window(&self.content, self.resolution))
    }

    fn resolve_resolution(&self, current: Resolution) -> Resolution {
        let fallback = Resolution::new(self.content.width(), self.glyphs.metrics().glyph_height);
        self.target.resolve(current, fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::builtin::font_5x7;

    fn scrolling(mode: ScrollMode, speed: f32) -> MarqueeConfig {
        MarqueeConfig {
            scroll: ScrollConfig {
                mode,
                speed_px_per_sec: speed,
                ..ScrollConfig::default()
            },
            ..MarqueeConfig::default()
        }
    }

    #[test]
    fn static_message_is_drawn_from_the_origin() {
        let font = font_5x7();
        let marquee =
            MarqueeController::new(&font, MarqueeConfig::default(), Resolution::new(16, 7), "HI");

        let window = marquee.frame().window;
        assert_eq!(window.width(), 16);
        for y in 0..7 {
            for x in 0..16 {
                assert_eq!(window.get(x, y), marquee.content().get(x, y));
            }
        }
    }

    #[test]
    fn idle_marquee_reports_no_redraw() {
        let font = font_5x7();
        let mut marquee =
            MarqueeController::new(&font, MarqueeConfig::default(), Resolution::new(16, 7), "HI");

        assert!(marquee.tick(1.0).is_none());
    }

    #[test]
    fn left_scroll_shifts_the_window() {
        let font = font_5x7();
        let mut marquee = MarqueeController::new(
            &font,
            scrolling(ScrollMode::Left, 10.0),
            Resolution::new(16, 7),
            "HELLO WORLD",
        );

        let command = marquee.tick(0.5);
        let window = &command.frame().expect("scrolled frame").window;
        for y in 0..7 {
            for x in 0..16 {
                assert_eq!(window.get(x, y), marquee.content().get(x + 5, y));
            }
        }
    }

    #[test]
    fn stopped_marquee_ignores_ticks_until_started() {
        let font = font_5x7();
        let mut marquee = MarqueeController::new(
            &font,
            scrolling(ScrollMode::Left, 10.0),
            Resolution::new(16, 7),
            "HELLO WORLD",
        );

        marquee.stop();
        assert!(marquee.tick(1.0).is_none());
        assert_eq!(marquee.scroll().offset(), 0.0);

        marquee.start();
        assert!(marquee.tick(1.0).frame().is_some());
        assert_eq!(marquee.scroll().offset(), 10.0);
    }

    #[test]
    fn new_text_rewinds_the_scroll() {
        let font = font_5x7();
        let mut marquee = MarqueeController::new(
            &font,
            scrolling(ScrollMode::Left, 10.0),
            Resolution::new(16, 7),
            "HELLO WORLD",
        );

        marquee.tick(1.0);
        assert!(marquee.set_text("GOODBYE WORLD").frame().is_some());
        assert_eq!(marquee.scroll().offset(), 0.0);
    }

    #[test]
    fn flashing_blanks_every_other_phase() {
        let font = font_5x7();
        let mut marquee =
            MarqueeController::new(&font, MarqueeConfig::default(), Resolution::new(16, 7), "HI");
        let _ = marquee.set_flashing(true);

        let command = marquee.tick(0.5);
        assert!(command.frame().is_some_and(|frame| frame.window.is_blank()));

        let command = marquee.tick(0.5);
        assert!(command.frame().is_some_and(|frame| !frame.window.is_blank()));
    }

    #[test]
    fn unsized_sink_takes_the_content_size() {
        let font = font_5x7();
        let marquee =
            MarqueeController::new(&font, MarqueeConfig::default(), Resolution::default(), "HI");

        assert_eq!(marquee.resolution(), Resolution::new(11, 7));
    }

    #[test]
    fn explicit_target_overrides_the_sink() {
        let font = font_5x7();
        let config = MarqueeConfig {
            target: TargetSize::new(32, 0),
            ..MarqueeConfig::default()
        };
        let marquee = MarqueeController::new(&font, config, Resolution::new(16, 8), "HI");

        assert_eq!(marquee.resolution(), Resolution::new(32, 8));
    }

    #[test]
    fn message_is_upper_cased_by_default() {
        let font = font_5x7();
        let lower =
            MarqueeController::new(&font, MarqueeConfig::default(), Resolution::new(16, 7), "hi");
        let upper =
            MarqueeController::new(&font, MarqueeConfig::default(), Resolution::new(16, 7), "HI");

        assert_eq!(lower.content(), upper.content());
        assert_eq!(lower.text(), "hi");
    }
}
