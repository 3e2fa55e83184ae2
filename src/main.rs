// SPDX-License-Identifier: MIT
//
// knight-board — an 8×8 board filled in, one cell per frame, in the terminal.
//
// This binary wires the two crates together:
//
//   kb-term  → raw mode, alternate screen, differential repaint, key parsing
//   kb-board → cursor, grid, board renderer, surfaces, the session loop
//
// Each frame flows through:
//
//   session step → grid mutation → BoardRenderer::paint → FrameBuffer
//   → DiffRenderer → terminal → pause (Ctrl-C / q / Esc stop it)
//
// Layout, relative to the board origin:
//
//   ┌───────────────────────────────┐
//   │ board: 8 cell rows, 9 rules   │  ← 17 rows × 31 columns
//   ├───────────────────────────────┤
//   │ (blank)                       │
//   │ completed: N%                 │  ← progress line
//   │ knight's position (row, col): │  ← prompt line (with --ask)
//   └───────────────────────────────┘

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use kb_board::renderer::RenderOptions;
use kb_board::screen::TermSurface;
use kb_board::session::{Session, SessionConfig, SessionReport};
use kb_board::style::Palette;
use kb_term::terminal::{self, Terminal};

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "knight-board", version, about = "Fill a chessboard, one cell per frame")]
struct Args {
    /// Milliseconds between frames
    #[arg(short, long, default_value_t = 500)]
    pause_ms: u64,

    /// Hide the "completed: N%" line
    #[arg(long)]
    no_progress: bool,

    /// Ask for the knight's starting cell before filling the board
    #[arg(short, long)]
    ask: bool,

    /// Center the board instead of drawing it in the top-left corner
    #[arg(short, long)]
    center: bool,

    /// Where log lines go
    #[arg(long, default_value = "knight-board.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            render: RenderOptions {
                show_progress: !self.no_progress,
                allow_input: self.ask,
                pause: Duration::from_millis(self.pause_ms),
            },
            center: self.center,
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Log to a file; stdout belongs to the board. A logger that cannot be set
/// up is not worth failing over.
fn init_logging(args: &Args) {
    if args.log_level == LevelFilter::Off {
        return;
    }
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(args.log_level, config, file);
    }
}

// ─── Run ────────────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<SessionReport, Box<dyn std::error::Error>> {
    if !terminal::is_tty() {
        return Err("stdin is not a terminal".into());
    }

    let mut term = Terminal::new();
    term.enter()?;

    let mut surface = TermSurface::new(term.size(), Palette::default());
    let outcome = Session::new(&mut surface, args.session_config()).run();

    settle(outcome, term.leave())
}

/// A session error outranks a failed terminal restore, which is only
/// logged then (`Terminal`'s `Drop` tries again).
fn settle(
    outcome: kb_board::Result<SessionReport>,
    restored: io::Result<()>,
) -> Result<SessionReport, Box<dyn std::error::Error>> {
    match (outcome, restored) {
        (Err(e), Err(restore)) => {
            log::error!("terminal restore failed: {restore}");
            Err(e.into())
        }
        (Err(e), Ok(())) => Err(e.into()),
        (Ok(_), Err(restore)) => Err(restore.into()),
        (Ok(report), Ok(())) => Ok(report),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(&args);
    log::info!("knight-board starting: {args:?}");

    match run(&args) {
        Ok(report) => {
            log::info!("done after {} frames", report.frames);
            if let Some(at) = report.marker {
                println!("knight started at {at}");
            }
        }
        Err(e) => {
            log::error!("{e}");
            eprintln!("knight-board: {e}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["knight-board"]).unwrap();
        assert_eq!(args.pause_ms, 500);
        assert_eq!(args.log_level, LevelFilter::Info);
        assert_eq!(args.log_file, PathBuf::from("knight-board.log"));

        let config = args.session_config();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn flags_map_onto_session_config() {
        let args = Args::try_parse_from([
            "knight-board",
            "--pause-ms",
            "20",
            "--no-progress",
            "--ask",
            "--center",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = args.session_config();

        assert!(config.center);
        assert!(!config.render.show_progress);
        assert!(config.render.allow_input);
        assert_eq!(config.render.pause, Duration::from_millis(20));
        assert_eq!(args.log_level, LevelFilter::Debug);
    }

    fn report() -> SessionReport {
        SessionReport {
            frames: 65,
            progress: 100.0,
            marker: None,
        }
    }

    #[test]
    fn session_error_survives_failed_restore() {
        let outcome = Err(kb_board::Error::SurfaceBounds {
            x: 30,
            y: 1,
            width: 1,
            max_x: 30,
            max_y: 24,
        });
        let restored = Err(io::Error::other("tcsetattr failed"));

        let err = settle(outcome, restored).unwrap_err();
        let err = err.downcast::<kb_board::Error>().unwrap();
        assert!(matches!(*err, kb_board::Error::SurfaceBounds { x: 30, .. }));
    }

    #[test]
    fn restore_failure_reported_after_clean_session() {
        let err = settle(Ok(report()), Err(io::Error::other("tcsetattr failed"))).unwrap_err();
        assert_eq!(err.to_string(), "tcsetattr failed");
    }

    #[test]
    fn clean_session_and_restore() {
        let report = settle(Ok(report()), Ok(())).unwrap();
        assert_eq!(report.frames, 65);
    }

    #[test]
    fn rejects_bad_level() {
        assert!(Args::try_parse_from(["knight-board", "--log-level", "loud"]).is_err());
    }
}
