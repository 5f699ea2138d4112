//! Terminal demo for the LED wall engine.
//!
//! `ledwall marquee [--flash] <text>` scrolls a message across the panel;
//! `ledwall typewriter <text>` types it out with a caret. A literal `\n` in
//! the text starts a new line.

use std::{
    io::{self, Write},
    process::ExitCode,
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use embedded_graphics_core::{geometry::Size, pixelcolor::Rgb888};
use ledwall_core::{
    PixelSink, RenderCommand,
    font::builtin::font_5x7,
    marquee::{MarqueeConfig, MarqueeController},
    scroll::{ScrollConfig, ScrollMode},
    typewriter::{TypewriterConfig, TypewriterController, TypewriterEvent, TypewriterPhase},
};
use ledwall_panel::{CellLayout, LedPanel, PanelPalette};
use log::{LevelFilter, debug, error, info};

use terminal::TerminalCanvas;

#[path = "main/terminal.rs"]
mod terminal;

/// ~50 FPS. The loop sleeps if a frame completes early.
const FRAME_TIME: Duration = Duration::from_millis(20);
const MARQUEE_RUN_TIME: Duration = Duration::from_secs(12);
/// Time the finished text stays up before the demo exits.
const TYPEWRITER_LINGER: Duration = Duration::from_millis(1500);

const MARQUEE_COLS: usize = 40;
const MARQUEE_ROWS: usize = 7;
const MARQUEE_SPEED_PX_PER_SEC: f32 = 24.0;
const MARQUEE_GAP_PX: usize = 10;
const MARQUEE_FLASH_HZ: f32 = 2.0;

const TYPEWRITER_COLS: usize = 40;
const TYPEWRITER_ROWS: usize = 23;
const TYPEWRITER_CHARS_PER_SECOND: f32 = 12.0;

const OFF_COLOR: Rgb888 = Rgb888::new(20, 20, 20);
const ON_COLOR: Rgb888 = Rgb888::new(255, 38, 25);
const CARET_COLOR: Rgb888 = Rgb888::new(38, 230, 51);

#[derive(Parser)]
#[command(name = "ledwall")]
#[command(version)]
#[command(about = "Virtual LED wall text demos")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Scrolls a message across the panel
    Marquee {
        /// Blink the whole panel while scrolling
        #[arg(long)]
        flash: bool,
        /// Message words; a literal `\n` starts a new line
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Types a message out with a caret
    Typewriter {
        /// Message words; a literal `\n` starts a new line
        #[arg(required = true)]
        text: Vec<String>,
    },
}

/// Joins the message words and turns escaped `\n` into line breaks.
fn message(words: &[String]) -> String {
    words.join(" ").replace("\\n", "\n")
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mut out = io::stdout().lock();
    let mut canvas = TerminalCanvas::new(CellLayout::new(Size::new(1, 1), Size::zero()));

    let result = canvas.begin(&mut out).and_then(|()| match &cli.command {
        Commands::Marquee { flash, text } => {
            run_marquee(&message(text), *flash, &mut canvas, &mut out)
        }
        Commands::Typewriter { text } => run_typewriter(&message(text), &mut canvas, &mut out),
    });
    let restored = canvas.end(&mut out);

    match result.and(restored) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("terminal output failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn palette() -> PanelPalette<Rgb888> {
    PanelPalette::new(OFF_COLOR, ON_COLOR)
}

fn run_marquee(
    text: &str,
    flashing: bool,
    canvas: &mut TerminalCanvas,
    out: &mut impl Write,
) -> io::Result<()> {
    let font = font_5x7();
    let mut panel = LedPanel::new(MARQUEE_COLS, MARQUEE_ROWS, palette());
    let config = MarqueeConfig {
        scroll: ScrollConfig {
            mode: ScrollMode::Left,
            speed_px_per_sec: MARQUEE_SPEED_PX_PER_SEC,
            gap_px: MARQUEE_GAP_PX,
            flashing,
            flash_hz: MARQUEE_FLASH_HZ,
        },
        ..MarqueeConfig::default()
    };
    let mut marquee = MarqueeController::new(&font, config, panel.resolution(), text);
    info!(
        "marquee: {}x{} content={}px",
        panel.cols(),
        panel.rows(),
        marquee.content().width()
    );

    RenderCommand::Draw(marquee.frame()).present(&mut panel, CARET_COLOR);
    canvas.show(&panel, out)?;

    let started = Instant::now();
    run_frames(&mut panel, canvas, out, |dt| {
        if started.elapsed() >= MARQUEE_RUN_TIME {
            return None;
        }
        Some(marquee.tick(dt))
    })
}

fn run_typewriter(text: &str, canvas: &mut TerminalCanvas, out: &mut impl Write) -> io::Result<()> {
    let font = font_5x7();
    let mut panel = LedPanel::new(TYPEWRITER_COLS, TYPEWRITER_ROWS, palette());
    let config = TypewriterConfig {
        chars_per_second: TYPEWRITER_CHARS_PER_SECOND,
        ..TypewriterConfig::default()
    };
    let mut typewriter = TypewriterController::new(&font, config, panel.resolution(), text);
    info!(
        "typewriter: {}x{} chars={} lines={}",
        panel.cols(),
        panel.rows(),
        typewriter.token_count(),
        typewriter.layout().lines().len()
    );

    RenderCommand::Draw(typewriter.frame()).present(&mut panel, CARET_COLOR);
    canvas.show(&panel, out)?;

    let mut finished_at: Option<Instant> = None;
    run_frames(&mut panel, canvas, out, |dt| {
        if finished_at.is_some_and(|at| at.elapsed() >= TYPEWRITER_LINGER) {
            return None;
        }

        let command = typewriter.tick(dt);
        for event in typewriter.drain_events() {
            match event {
                TypewriterEvent::CharPrinted { character, index } => {
                    debug!("typewriter: printed {character:?} at {index}");
                }
                TypewriterEvent::Finished => info!("typewriter: finished"),
                TypewriterEvent::Restarted => info!("typewriter: restarted"),
            }
        }

        if finished_at.is_none()
            && matches!(typewriter.phase(), TypewriterPhase::Stopped | TypewriterPhase::Cleared)
        {
            finished_at = Some(Instant::now());
        }

        Some(command)
    })
}

/// Runs a fixed-rate frame loop until `step` returns `None`.
fn run_frames(
    panel: &mut LedPanel<Rgb888>,
    canvas: &mut TerminalCanvas,
    out: &mut impl Write,
    mut step: impl FnMut(f32) -> Option<RenderCommand>,
) -> io::Result<()> {
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;

        let Some(command) = step(dt) else {
            return Ok(());
        };

        if !command.is_none() {
            command.present(panel, CARET_COLOR);
            canvas.show(panel, out)?;
        }

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Commands, clap::Error> {
        Cli::try_parse_from(std::iter::once("ledwall").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn marquee_flag_and_words_are_collected() {
        let command = parse(&["marquee", "--flash", "hello", "world"]).unwrap();

        assert_eq!(
            command,
            Commands::Marquee {
                flash: true,
                text: vec!["hello".into(), "world".into()],
            }
        );
    }

    #[test]
    fn escaped_newlines_become_line_breaks() {
        let Commands::Typewriter { text } = parse(&["typewriter", "one\\ntwo", "three"]).unwrap()
        else {
            panic!("expected typewriter");
        };

        assert_eq!(message(&text), "one\ntwo three");
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["marquee"]).is_err());
        assert!(parse(&["clock", "12"]).is_err());
    }
}
