//! Progressive character reveal with punctuation pauses and a blinking caret.
//!
//! The controller is tick driven: the host calls [`TypewriterController::tick`]
//! with the elapsed time and presents the returned [`RenderCommand`].
//! Punctuation pauses and the completion delay are stored as remaining time,
//! so nothing ever blocks.

use alloc::{string::String, vec::Vec};

use heapless::Deque;
use log::debug;

use crate::{
    font::{Glyph, GlyphSet},
    layout::{Layout, Token, build_layout, tokenize},
    raster::Raster,
    scroll::advance_blink,
    sink::{Frame, RenderCommand, Resolution, TargetSize},
    text_policy::TextPolicy,
};

/// Slack used when comparing simulated time budgets.
pub const TIME_EPSILON: f32 = 1e-5;
pub const MIN_CHARS_PER_SECOND: f32 = 0.01;
const EVENT_QUEUE_LEN: usize = 64;
const MAX_CARET_ROWS: usize = 3;

/// What happens once every character is shown.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompletionMode {
    /// Keep the full text on screen.
    #[default]
    Stop,
    /// Wait `complete_delay_secs`, then turn the display off.
    ClearThenStop,
    /// Wait `complete_delay_secs`, then type the text again.
    RestartFromBeginning,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypewriterConfig {
    pub text_policy: TextPolicy,
    pub target: TargetSize,
    pub chars_per_second: f32,
    /// Pause after `.`, `!` and `?`.
    pub punctuation_pause_secs: f32,
    /// Pause after `,`, `;` and `:`.
    pub light_punctuation_pause_secs: f32,
    pub auto_start: bool,
    pub show_caret: bool,
    pub caret_blink_hz: f32,
    pub caret_thickness_rows: usize,
    pub caret_inset_rows: usize,
    pub on_complete: CompletionMode,
    pub complete_delay_secs: f32,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            text_policy: TextPolicy {
                upper_case: true,
                trim_end: true,
                fold_accents: false,
            },
            target: TargetSize::AUTO,
            chars_per_second: 30.0,
            punctuation_pause_secs: 0.15,
            light_punctuation_pause_secs: 0.07,
            auto_start: true,
            show_caret: true,
            caret_blink_hz: 2.0,
            caret_thickness_rows: 1,
            caret_inset_rows: 0,
            on_complete: CompletionMode::Stop,
            complete_delay_secs: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TypewriterPhase {
    /// Prepared or stopped; ticks do nothing.
    #[default]
    Idle,
    Typing,
    /// Everything is shown and the completion delay is running.
    Finished,
    /// Everything is shown and playback is over.
    Stopped,
    /// The display was cleared after completion.
    Cleared,
}

impl TypewriterPhase {
    /// `true` once every character has been revealed.
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished | Self::Stopped | Self::Cleared)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TypewriterEvent {
    CharPrinted { character: char, index: usize },
    /// Playback is over: text kept on screen or display cleared.
    Finished,
    /// Typing started again after the completion delay.
    Restarted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Pause {
    None,
    Full,
    Light,
}

fn pause_after(character: char) -> Pause {
    match character {
        '.' | '!' | '?' => Pause::Full,
        ',' | ';' | ':' => Pause::Light,
        _ => Pause::None,
    }
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.max(0.0) } else { 0.0 }
}

pub struct TypewriterController<'a> {
    glyphs: &'a GlyphSet,
    config: TypewriterConfig,
    text: String,
    tokens: Vec<Token<'a>>,
    layout: Layout,
    resolution: Resolution,
    phase: TypewriterPhase,
    visible: usize,
    /// Fraction of the next character already earned.
    accumulator: f32,
    pause_remaining: f32,
    complete_remaining: f32,
    caret_on: bool,
    caret_timer: f32,
    events: Deque<TypewriterEvent, EVENT_QUEUE_LEN>,
}

impl<'a> TypewriterController<'a> {
    /// Prepares `text` for a sink of `sink` resolution and starts typing if
    /// `config.auto_start` is set.
    pub fn new(glyphs: &'a GlyphSet, config: TypewriterConfig, sink: Resolution, text: &str) -> Self {
        let mut controller = Self {
            glyphs,
            config,
            text: String::new(),
            tokens: Vec::new(),
            layout: Layout::default(),
            resolution: Resolution::default(),
            phase: TypewriterPhase::Idle,
            visible: 0,
            accumulator: 0.0,
            pause_remaining: 0.0,
            complete_remaining: 0.0,
            caret_on: true,
            caret_timer: 0.0,
            events: Deque::new(),
        };
        controller.resolution = controller.resolve_resolution(sink);
        controller.set_text(text, config.auto_start);
        controller
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn is_typing(&self) -> bool {
        self.phase == TypewriterPhase::Typing
    }

    /// Replaces the message and rebuilds the layout.
    ///
    /// Returns the first frame: empty, since nothing is revealed yet.
    pub fn set_text(&mut self, text: &str, start_immediately: bool) -> RenderCommand {
        self.text = self.config.text_policy.apply(text);
        self.prepare();
        if start_immediately {
            self.start_typing();
        }
        RenderCommand::Draw(self.frame())
    }

    /// Re-tokenizes the current text and rewinds to an empty display.
    pub fn prepare(&mut self) {
        self.phase = TypewriterPhase::Idle;
        self.tokens = tokenize(&self.text, self.glyphs);
        self.relayout();
        self.reset_playback();

        debug!(
            "typewriter: prepared tokens={} lines={} size={}x{}",
            self.tokens.len(),
            self.layout.lines().len(),
            self.resolution.cols,
            self.resolution.rows
        );
    }

    /// Restarts the reveal from the first character.
    pub fn start_typing(&mut self) {
        self.reset_playback();
        self.phase = TypewriterPhase::Typing;
        debug!("typewriter: typing started tokens={}", self.tokens.len());
    }

    /// Freezes the reveal where it is and cancels any pending completion.
    pub fn stop_typing(&mut self) {
        if matches!(self.phase, TypewriterPhase::Typing | TypewriterPhase::Finished) {
            debug!("typewriter: stopped at {}/{}", self.visible, self.tokens.len());
            self.phase = TypewriterPhase::Idle;
        }
    }

    /// Reveals everything at once and runs the completion handling.
    ///
    /// Once the text has finished this only repeats the final output.
    pub fn skip_to_end(&mut self) -> RenderCommand {
        match self.phase {
            TypewriterPhase::Cleared => return RenderCommand::Clear,
            TypewriterPhase::Finished | TypewriterPhase::Stopped => {
                return RenderCommand::Draw(self.frame());
            }
            TypewriterPhase::Idle | TypewriterPhase::Typing => {}
        }

        self.finish()
    }

    pub fn set_speed(&mut self, chars_per_second: f32) {
        self.config.chars_per_second = if chars_per_second.is_finite() {
            chars_per_second.max(MIN_CHARS_PER_SECOND)
        } else {
            MIN_CHARS_PER_SECOND
        };
    }

    pub fn set_on_complete(&mut self, mode: CompletionMode, delay_secs: f32) {
        self.config.on_complete = mode;
        self.config.complete_delay_secs = sanitize_dt(delay_secs);
    }

    /// Relays out the text for a new sink size, keeping the reveal position.
    pub fn set_resolution(&mut self, cols: usize, rows: usize) -> RenderCommand {
        let resolution = self.resolve_resolution(Resolution::new(cols, rows));
        if resolution == self.resolution {
            return RenderCommand::None;
        }

        self.resolution = resolution;
        self.relayout();
        debug!("typewriter: resized to {}x{}", resolution.cols, resolution.rows);
        RenderCommand::Draw(self.frame())
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TypewriterEvent> + '_ {
        core::iter::from_fn(move || self.events.pop_front())
    }

    pub fn pop_event(&mut self) -> Option<TypewriterEvent> {
        self.events.pop_front()
    }

    /// Advances the controller by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> RenderCommand {
        let dt = sanitize_dt(dt);

        match self.phase {
            TypewriterPhase::Typing => self.tick_typing(dt),
            TypewriterPhase::Finished => self.tick_completion(dt),
            TypewriterPhase::Idle | TypewriterPhase::Stopped | TypewriterPhase::Cleared => {
                RenderCommand::None
            }
        }
    }

    /// The current window plus the caret mask when the caret is lit.
    pub fn frame(&self) -> Frame {
        let window = self
            .layout
            .draw_prefix(&self.tokens, self.visible, self.resolution);

        match self.caret_mask() {
            Some(caret) => Frame::with_caret(window, caret),
            None => Frame::new(window),
        }
    }

    fn tick_typing(&mut self, dt: f32) -> RenderCommand {
        let total = self.tokens.len();
        let visible_before = self.visible;
        let caret_before = self.caret_on;
        let cps = self.config.chars_per_second.max(MIN_CHARS_PER_SECOND);

        let mut budget = dt;
        loop {
            if self.pause_remaining > 0.0 {
                if budget + TIME_EPSILON < self.pause_remaining {
                    self.pause_remaining -= budget;
                    break;
                }
                budget = (budget - self.pause_remaining).max(0.0);
                self.pause_remaining = 0.0;
                continue;
            }

            if self.visible >= total {
                break;
            }

            let needed = (1.0 - self.accumulator) / cps;
            if budget + TIME_EPSILON < needed {
                self.accumulator += budget * cps;
                break;
            }

            budget = (budget - needed).max(0.0);
            self.accumulator = 0.0;
            self.reveal_next();
        }

        if self.visible >= total && self.pause_remaining <= 0.0 {
            return self.finish();
        }

        if self.config.show_caret && self.config.caret_blink_hz > 0.0 && self.visible < total {
            if advance_blink(&mut self.caret_timer, dt, self.config.caret_blink_hz) {
                self.caret_on = !self.caret_on;
            }
        }

        if self.visible != visible_before || self.caret_on != caret_before {
            RenderCommand::Draw(self.frame())
        } else {
            RenderCommand::None
        }
    }

    fn tick_completion(&mut self, dt: f32) -> RenderCommand {
        self.complete_remaining -= dt;
        if self.complete_remaining > TIME_EPSILON {
            return RenderCommand::None;
        }
        self.complete_remaining = 0.0;

        match self.config.on_complete {
            CompletionMode::ClearThenStop => {
                self.phase = TypewriterPhase::Cleared;
                self.push_event(TypewriterEvent::Finished);
                debug!("typewriter: cleared after completion");
                RenderCommand::Clear
            }
            CompletionMode::RestartFromBeginning => {
                self.start_typing();
                self.push_event(TypewriterEvent::Restarted);
                RenderCommand::Draw(self.frame())
            }
            CompletionMode::Stop => {
                self.phase = TypewriterPhase::Stopped;
                RenderCommand::None
            }
        }
    }

    fn reveal_next(&mut self) {
        let Some(token) = self.tokens.get(self.visible) else {
            return;
        };
        let character = token.character;
        let index = self.visible;
        self.visible += 1;
        self.push_event(TypewriterEvent::CharPrinted { character, index });

        self.pause_remaining = match pause_after(character) {
            Pause::Full => sanitize_dt(self.config.punctuation_pause_secs),
            Pause::Light => sanitize_dt(self.config.light_punctuation_pause_secs),
            Pause::None => 0.0,
        };
    }

    /// Shows everything without a caret and enters the completion phase.
    fn finish(&mut self) -> RenderCommand {
        self.visible = self.tokens.len();
        self.pause_remaining = 0.0;
        self.accumulator = 0.0;

        match self.config.on_complete {
            CompletionMode::Stop => {
                self.phase = TypewriterPhase::Stopped;
                self.push_event(TypewriterEvent::Finished);
            }
            CompletionMode::ClearThenStop | CompletionMode::RestartFromBeginning => {
                self.phase = TypewriterPhase::Finished;
                self.complete_remaining = sanitize_dt(self.config.complete_delay_secs);
            }
        }

        debug!(
            "typewriter: finished tokens={} mode={:?}",
            self.tokens.len(),
            self.config.on_complete
        );

        RenderCommand::Draw(self.frame())
    }

    fn caret_mask(&self) -> Option<Raster> {
        let total = self.tokens.len();
        if self.phase != TypewriterPhase::Typing
            || !self.config.show_caret
            || !self.caret_on
            || self.visible >= total
        {
            return None;
        }

        let placement = self.layout.placement(self.visible)?;
        let metrics = self.glyphs.metrics();
        let width = self.tokens[self.visible]
            .glyph
            .map_or(metrics.glyph_width, Glyph::width);
        let thickness = self.config.caret_thickness_rows.clamp(1, MAX_CARET_ROWS);
        let baseline =
            placement.y as isize + metrics.glyph_height as isize - 1 - self.config.caret_inset_rows as isize;

        let mut mask = Raster::new(self.resolution.cols, self.resolution.rows);
        for row in 0..thickness as isize {
            mask.fill_rect(placement.x as isize, baseline - row, width, 1);
        }

        Some(mask)
    }

    fn resolve_resolution(&self, current: Resolution) -> Resolution {
        let metrics = self.glyphs.metrics();
        let fallback = Resolution::new(metrics.glyph_width.max(1), metrics.glyph_height);
        self.config.target.resolve(current, fallback)
    }

    fn relayout(&mut self) {
        self.layout = build_layout(&self.tokens, self.glyphs.metrics(), self.resolution.cols);
        self.visible = self.visible.min(self.tokens.len());
    }

    fn reset_playback(&mut self) {
        self.visible = 0;
        self.accumulator = 0.0;
        self.pause_remaining = 0.0;
        self.complete_remaining = 0.0;
        self.caret_on = true;
        self.caret_timer = 0.0;
    }

    fn push_event(&mut self, event: TypewriterEvent) {
        if self.events.is_full() {
            let _ = self.events.pop_front();
        }
        let _ = self.events.push_back(event);
    }
}
