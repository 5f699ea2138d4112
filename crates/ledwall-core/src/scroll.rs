//! Looping scroll and flash sampling of a message raster.
//!
//! The content repeats with a period of `extent + gap` pixels along the
//! scroll axis, so the window wraps seamlessly with an optional blank band
//! between repetitions. Flashing gates the whole window on and off.

use crate::{raster::Raster, sink::Resolution};

/// Scroll direction of the content.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ScrollMode {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl ScrollMode {
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollConfig {
    pub mode: ScrollMode,
    pub speed_px_per_sec: f32,
    /// Blank pixels between the end of the content and its next repetition.
    pub gap_px: usize,
    pub flashing: bool,
    pub flash_hz: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            mode: ScrollMode::None,
            speed_px_per_sec: 20.0,
            gap_px: 0,
            flashing: false,
            flash_hz: 2.0,
        }
    }
}

/// Wrap distance for `extent` pixels of content followed by `gap` blank ones.
#[inline]
pub fn loop_period(extent: usize, gap: usize) -> usize {
    (extent + gap).max(1)
}

/// Wraps `value` into `[0, period)`. Non-positive periods yield 0.
pub fn wrap_offset(value: f32, period: f32) -> f32 {
    if !(period > 0.0) || !value.is_finite() {
        return 0.0;
    }

    let wrapped = value % period;
    let wrapped = if wrapped < 0.0 { wrapped + period } else { wrapped };
    // `-tiny % p + p` can round up to `p` itself.
    if wrapped >= period { 0.0 } else { wrapped }
}

/// Advances a blink `timer` by `dt` seconds at `hz` toggles per second.
///
/// Returns `true` when the state flipped an odd number of times. Rates that
/// are not finite and positive never toggle, and the timer always ends up in
/// `[0, period)`.
pub fn advance_blink(timer: &mut f32, dt: f32, hz: f32) -> bool {
    if !(hz.is_finite() && hz > 0.0) {
        return false;
    }
    let period = 1.0 / hz;
    if !(period > 0.0) {
        return false;
    }

    *timer += dt;
    if !(*timer >= period) {
        if !(*timer >= 0.0) {
            *timer = 0.0;
        }
        return false;
    }

    // Truncation saturates, so huge ratios still terminate.
    let flips = (*timer / period) as u64;
    *timer -= flips as f32 * period;
    if !(*timer >= 0.0 && *timer < period) {
        *timer = 0.0;
    }

    flips % 2 == 1
}

#[inline]
fn positive_mod(value: isize, period: usize) -> usize {
    value.rem_euclid(period.max(1) as isize) as usize
}

/// Samples `content` looped horizontally with the given period.
///
/// Columns wrapped into `[width, period)` are the gap band and read off;
/// rows outside the content read off.
pub fn sample_loop_x(content: &Raster, x: isize, y: isize, period: usize) -> bool {
    if y < 0 || y as usize >= content.height() {
        return false;
    }

    let sx = positive_mod(x, period);
    if sx >= content.width() {
        return false;
    }

    content.get(sx as isize, y)
}

/// Vertical counterpart of [`sample_loop_x`].
pub fn sample_loop_y(content: &Raster, x: isize, y: isize, period: usize) -> bool {
    if x < 0 || x as usize >= content.width() {
        return false;
    }

    let sy = positive_mod(y, period);
    if sy >= content.height() {
        return false;
    }

    content.get(x, sy as isize)
}

/// Scroll offset plus flash phase for one message.
#[derive(Clone, Debug)]
pub struct ScrollSampler {
    config: ScrollConfig,
    offset: f32,
    flash_on: bool,
    flash_timer: f32,
}

impl ScrollSampler {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            offset: 0.0,
            flash_on: true,
            flash_timer: 0.0,
        }
    }

    pub fn config(&self) -> ScrollConfig {
        self.config
    }

    pub fn mode(&self) -> ScrollMode {
        self.config.mode
    }

    /// Sub-pixel offset along the scroll axis, in `[0, period)`.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn flash_on(&self) -> bool {
        self.flash_on
    }

    pub fn set_mode(&mut self, mode: ScrollMode) {
        self.config.mode = mode;
        self.flash_timer = 0.0;
    }

    pub fn set_speed(&mut self, speed_px_per_sec: f32) {
        self.config.speed_px_per_sec = if speed_px_per_sec.is_finite() {
            speed_px_per_sec
        } else {
            0.0
        };
    }

    pub fn set_gap(&mut self, gap_px: usize) {
        self.config.gap_px = gap_px;
    }

    /// Turning flashing off restores the lit phase.
    pub fn set_flashing(&mut self, flashing: bool) {
        self.config.flashing = flashing;
        self.flash_timer = 0.0;
        if !flashing {
            self.flash_on = true;
        }
    }

    pub fn set_flash_hz(&mut self, flash_hz: f32) {
        self.config.flash_hz = flash_hz;
    }

    /// Rewinds the scroll to the content origin.
    pub fn reset_offset(&mut self) {
        self.offset = 0.0;
    }

    fn is_scrolling(&self) -> bool {
        self.config.mode != ScrollMode::None && self.config.speed_px_per_sec != 0.0
    }

    fn is_flashing(&self) -> bool {
        self.config.flashing && self.config.flash_hz > 0.0
    }

    /// Advances flash and scroll state by `dt` seconds.
    ///
    /// Returns `true` when the window may have changed.
    pub fn step(&mut self, dt: f32, content: &Raster, sink: Resolution) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut changed = false;

        if self.is_flashing() {
            if advance_blink(&mut self.flash_timer, dt, self.config.flash_hz) {
                self.flash_on = !self.flash_on;
                changed = true;
            }
        }

        if self.is_scrolling() {
            self.offset += self.config.speed_px_per_sec * dt;

            let (extent, sink_extent) = if self.config.mode.is_horizontal() {
                (content.width(), sink.cols)
            } else {
                (content.height(), sink.rows)
            };

            self.offset = if extent <= sink_extent && self.config.gap_px == 0 {
                0.0
            } else {
                wrap_offset(self.offset, loop_period(extent, self.config.gap_px) as f32)
            };
            changed = true;
        }

        changed
    }

    /// Samples the current window at `sink` resolution.
    pub fn window(&self, content: &Raster, sink: Resolution) -> Raster {
        let mut window = Raster::new(sink.cols, sink.rows);
        if !self.flash_on {
            return window;
        }

        let shift = self.offset as isize;
        let period_w = loop_period(content.width(), self.config.gap_px);
        let period_h = loop_period(content.height(), self.config.gap_px);

        for y in 0..sink.rows as isize {
            for x in 0..sink.cols as isize {
                let on = match self.config.mode {
                    ScrollMode::Left => sample_loop_x(content, x + shift, y, period_w),
                    ScrollMode::Right => sample_loop_x(content, x - shift, y, period_w),
                    ScrollMode::Up => sample_loop_y(content, x, y + shift, period_h),
                    ScrollMode::Down => sample_loop_y(content, x, y - shift, period_h),
                    ScrollMode::None => content.get(x, y),
                };

                if on {
                    let _ = window.set(x, y, true);
                }
            }
        }

        window
    }

    /// Steps by `dt` and returns the freshly sampled window.
    pub fn advance(&mut self, dt: f32, content: &Raster, sink: Resolution) -> Raster {
        self.step(dt, content, sink);
        self.window(content, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One lit column at x = 0 and x = 3 in a 5x2 raster.
    fn content() -> Raster {
        let mut raster = Raster::new(5, 2);
        raster.set(0, 0, true);
        raster.set(0, 1, true);
        raster.set(3, 0, true);
        raster
    }

    fn scrolling(mode: ScrollMode, speed: f32, gap: usize) -> ScrollSampler {
        ScrollSampler::new(ScrollConfig {
            mode,
            speed_px_per_sec: speed,
            gap_px: gap,
            ..ScrollConfig::default()
        })
    }

    #[test]
    fn wrap_offset_is_non_negative_modulo() {
        assert_eq!(wrap_offset(7.5, 5.0), 2.5);
        assert_eq!(wrap_offset(-1.0, 5.0), 4.0);
        assert_eq!(wrap_offset(5.0, 5.0), 0.0);
        assert_eq!(wrap_offset(3.0, 0.0), 0.0);
        assert_eq!(wrap_offset(f32::NAN, 5.0), 0.0);
    }

    #[test]
    fn loop_sampling_reads_gap_band_as_off() {
        let raster = content();
        let period = loop_period(raster.width(), 2);

        assert!(sample_loop_x(&raster, 0, 0, period));
        assert!(sample_loop_x(&raster, 7, 0, period));
        assert!(sample_loop_x(&raster, -7, 1, period));
        assert!(!sample_loop_x(&raster, 5, 0, period));
        assert!(!sample_loop_x(&raster, 6, 0, period));
        assert!(!sample_loop_x(&raster, 0, 2, period));
    }

    #[test]
    fn vertical_sampling_bounds_columns() {
        let raster = content();
        let period = loop_period(raster.height(), 1);

        assert!(sample_loop_y(&raster, 0, 3, period));
        assert!(!sample_loop_y(&raster, 0, 2, period));
        assert!(!sample_loop_y(&raster, 5, 0, period));
        assert!(!sample_loop_y(&raster, -1, 0, period));
    }

    #[test]
    fn fitting_content_without_gap_never_moves() {
        let raster = content();
        let sink = Resolution::new(8, 2);
        let mut sampler = scrolling(ScrollMode::Left, 13.0, 0);

        let first = sampler.window(&raster, sink);
        for dt in [0.1, 0.37, 1.0, 2.5] {
            assert_eq!(sampler.advance(dt, &raster, sink), first);
            assert_eq!(sampler.offset(), 0.0);
        }
    }

    #[test]
    fn advancing_one_period_restores_the_window() {
        let mut raster = Raster::new(10, 1);
        raster.set(0, 0, true);
        raster.set(4, 0, true);
        let sink = Resolution::new(6, 1);
        let mut sampler = scrolling(ScrollMode::Left, 1.0, 3);

        let before = sampler.advance(2.0, &raster, sink);
        let after = sampler.advance(13.0, &raster, sink);

        assert_eq!(before, after);
        assert_eq!(sampler.offset(), 2.0);
    }

    #[test]
    fn left_and_right_shift_in_opposite_directions() {
        let raster = content();
        let sink = Resolution::new(4, 1);

        let mut left = scrolling(ScrollMode::Left, 1.0, 1);
        assert_eq!(left.advance(1.0, &raster, sink).to_string(), "..#.\n");

        let mut right = scrolling(ScrollMode::Right, 1.0, 1);
        // Period 6: x = 0 reads -1 -> 5 (gap), x = 1 reads 0.
        assert_eq!(right.advance(1.0, &raster, sink).to_string(), ".#..\n");
    }

    #[test]
    fn up_scroll_moves_rows_with_gap() {
        let raster = content();
        let sink = Resolution::new(1, 3);
        let mut up = scrolling(ScrollMode::Up, 1.0, 2);

        // Period 4: rows read 1, 2 (gap), 3 (gap).
        assert_eq!(up.advance(1.0, &raster, sink).to_string(), "#\n.\n.\n");
        // Rows read 2, 3, 0.
        assert_eq!(up.advance(1.0, &raster, sink).to_string(), ".\n.\n#\n");
    }

    #[test]
    fn none_mode_clips_and_pads() {
        let raster = content();
        let mut sampler = scrolling(ScrollMode::None, 50.0, 0);

        let window = sampler.advance(1.0, &raster, Resolution::new(7, 3));
        assert_eq!(window.to_string(), "#..#...\n#......\n.......\n");
        assert_eq!(sampler.offset(), 0.0);
    }

    #[test]
    fn flash_gates_the_whole_window() {
        let raster = content();
        let sink = Resolution::new(5, 2);
        let mut sampler = ScrollSampler::new(ScrollConfig {
            flashing: true,
            flash_hz: 2.0,
            ..ScrollConfig::default()
        });

        assert!(!sampler.step(0.25, &raster, sink));
        assert!(sampler.step(0.25, &raster, sink));
        assert!(sampler.window(&raster, sink).is_blank());

        assert!(sampler.step(0.5, &raster, sink));
        assert_eq!(sampler.window(&raster, sink), raster);
    }

    #[test]
    fn disabling_flash_restores_lit_phase() {
        let raster = content();
        let sink = Resolution::new(5, 2);
        let mut sampler = ScrollSampler::new(ScrollConfig {
            flashing: true,
            flash_hz: 1.0,
            ..ScrollConfig::default()
        });

        sampler.step(1.0, &raster, sink);
        assert!(!sampler.flash_on());

        sampler.set_flashing(false);
        assert!(sampler.flash_on());
        assert!(!sampler.window(&raster, sink).is_blank());
    }

    #[test]
    fn blink_counts_whole_periods_by_parity() {
        let mut timer = 0.0;
        assert!(!advance_blink(&mut timer, 0.25, 2.0));
        assert!(advance_blink(&mut timer, 0.25, 2.0));
        assert_eq!(timer, 0.0);

        // Two periods at once cancel out.
        assert!(!advance_blink(&mut timer, 1.0, 2.0));
        // Three periods leave the state flipped.
        assert!(advance_blink(&mut timer, 1.5, 2.0));
    }

    #[test]
    fn blink_rejects_unusable_rates() {
        let mut timer = 0.0;
        assert!(!advance_blink(&mut timer, 1.0, 0.0));
        assert!(!advance_blink(&mut timer, 1.0, -3.0));
        assert!(!advance_blink(&mut timer, 1.0, f32::NAN));
        assert!(!advance_blink(&mut timer, 1.0, f32::INFINITY));
        assert_eq!(timer, 0.0);
    }

    #[test]
    fn infinite_flash_rate_keeps_the_window_lit() {
        let raster = content();
        let sink = Resolution::new(5, 2);
        let mut sampler = ScrollSampler::new(ScrollConfig {
            flashing: true,
            flash_hz: f32::INFINITY,
            ..ScrollConfig::default()
        });

        assert!(!sampler.step(0.02, &raster, sink));
        assert!(sampler.flash_on());
        assert_eq!(sampler.window(&raster, sink), raster);
    }

    #[test]
    fn huge_flash_rate_steps_in_bounded_time() {
        let raster = content();
        let sink = Resolution::new(5, 2);
        let mut sampler = ScrollSampler::new(ScrollConfig {
            flashing: true,
            flash_hz: 1.0e10,
            ..ScrollConfig::default()
        });

        for _ in 0..10 {
            sampler.step(0.02, &raster, sink);
        }
        assert_eq!(sampler.window(&raster, sink).width(), 5);
    }

    #[test]
    fn down_scroll_moves_rows_the_other_way() {
        let raster = content();
        let sink = Resolution::new(1, 3);
        let mut down = scrolling(ScrollMode::Down, 1.0, 2);

        // Period 4: rows read -1 -> 3 (gap), 0, 1.
        assert_eq!(down.advance(1.0, &raster, sink).to_string(), ".\n#\n#\n");
        // Rows read 2 (gap), 3 (gap), 0.
        assert_eq!(down.advance(1.0, &raster, sink).to_string(), ".\n.\n#\n");
    }

    #[test]
    fn zero_resolution_produces_empty_window() {
        let raster = content();
        let mut sampler = scrolling(ScrollMode::Left, 5.0, 2);

        let window = sampler.advance(0.5, &raster, Resolution::new(0, 0));
        assert!(window.is_empty());
    }
}
