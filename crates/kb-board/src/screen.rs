//! Terminal surface.
//!
//! Writes land in a `FrameBuffer`; `flush` diffs it against what the
//! terminal already shows and sends only the changed cells. Keys come from
//! stdin through the `kb-term` parser. Pauses double as an input poll so a
//! running animation can be stopped with Ctrl-C, `q` or Esc even though raw
//! mode turns off the terminal's own Ctrl-C handling.
//!
//! The surface does not switch terminal modes itself; the caller holds a
//! `kb_term::terminal::Terminal` in raw mode for as long as it paints.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use kb_term::ansi;
use kb_term::diff::DiffRenderer;
use kb_term::input::{Key, Parser};
use kb_term::terminal::{self, Size};

use crate::error::{Error, Result};
use crate::style::{Palette, Style};
use crate::surface::{Canvas, Surface};

/// How long a lone ESC waits for the rest of a sequence.
const ESCAPE_TIMEOUT: Duration = Duration::from_millis(30);

/// Surface backed by the real terminal.
pub struct TermSurface {
    canvas: Canvas,
    renderer: DiffRenderer,
    parser: Parser,
    pending: VecDeque<Key>,
    input_closed: bool,
}

impl TermSurface {
    #[must_use]
    pub fn new(size: Size, palette: Palette) -> Self {
        Self {
            canvas: Canvas::new(size.cols, size.rows, palette),
            renderer: DiffRenderer::new(),
            parser: Parser::new(),
            pending: VecDeque::new(),
            input_closed: false,
        }
    }

    /// Next decoded key, reading stdin as needed.
    fn next_key(&mut self, timeout: Option<Duration>) -> Result<Option<Key>> {
        if let Some(key) = self.pending.pop_front() {
            return Ok(Some(key));
        }
        if self.input_closed {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        let wait = if self.parser.has_pending() {
            Some(timeout.map_or(ESCAPE_TIMEOUT, |t| t.min(ESCAPE_TIMEOUT)))
        } else {
            timeout
        };

        match terminal::read_input(wait) {
            Ok(bytes) if bytes.is_empty() => {
                let keys = self.parser.flush();
                self.pending.extend(keys);
            }
            Ok(bytes) => {
                let keys = self.parser.advance(&bytes);
                self.pending.extend(keys);
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                log::debug!("stdin closed");
                self.input_closed = true;
                let keys = self.parser.flush();
                self.pending.extend(keys);
            }
            Err(err) => return Err(err.into()),
        }

        Ok(self.pending.pop_front())
    }

    /// Show the hardware cursor at the caret while echoing, hide it otherwise.
    fn place_cursor(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        let (x, y) = self.canvas.caret();
        match (u16::try_from(x), u16::try_from(y)) {
            (Ok(x), Ok(y)) if self.canvas.echo() => {
                ansi::cursor_to(&mut lock, x, y)?;
                ansi::cursor_show(&mut lock)?;
            }
            _ => ansi::cursor_hide(&mut lock)?,
        }
        lock.flush()
    }
}

impl Surface for TermSurface {
    fn extents(&self) -> (u16, u16) {
        self.canvas.extents()
    }

    fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> Result<()> {
        self.canvas.put_str(x, y, text, style)
    }

    fn clear(&mut self) -> Result<()> {
        self.canvas.clear();
        self.renderer.force_redraw();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let stats = self.renderer.render(&self.canvas.frame);
        self.renderer.flush()?;
        log::trace!(
            "flush: {} cells changed, {} bytes",
            stats.cells_rendered,
            stats.bytes_written
        );
        self.place_cursor()?;
        Ok(())
    }

    fn set_echo(&mut self, on: bool) {
        self.canvas.set_echo(on);
    }

    fn read_key(&mut self) -> Result<Key> {
        loop {
            if let Some(key) = self.next_key(None)? {
                if self.canvas.echo_key(key) {
                    self.flush()?;
                }
                return Ok(key);
            }
        }
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        let Some(deadline) = Instant::now().checked_add(duration) else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "pause too long").into());
        };
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() && !self.parser.has_pending() {
                return Ok(());
            }
            if self.input_closed {
                std::thread::sleep(left);
                return Ok(());
            }
            match self.next_key(Some(left)) {
                Ok(Some(key)) if key.is_quit() => return Err(Error::Interrupted),
                Ok(_) => {}
                Err(Error::Io(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {}
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> TermSurface {
        TermSurface::new(Size { cols: 40, rows: 20 }, Palette::default())
    }

    #[test]
    fn extents_follow_size() {
        assert_eq!(surface().extents(), (40, 20));
    }

    #[test]
    fn writes_are_bounds_checked() {
        let mut s = surface();
        s.put_str(0, 0, "completed: ", Style::Plain).unwrap();
        assert!(matches!(
            s.put_str(35, 0, "123456", Style::Plain),
            Err(Error::SurfaceBounds { max_x: 40, .. })
        ));
        assert!(s.put_str(0, 20, "x", Style::Plain).is_err());
    }

    #[test]
    fn zero_pause_returns_at_once() {
        let mut s = surface();
        s.input_closed = true;
        s.pause(Duration::ZERO).unwrap();
    }

    #[test]
    fn closed_input_reports_eof() {
        let mut s = surface();
        s.input_closed = true;
        let err = s.read_key().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn queued_keys_come_first() {
        let mut s = surface();
        s.input_closed = true;
        s.pending.push_back(Key::Char('5'));
        assert_eq!(s.read_key().unwrap(), Key::Char('5'));
    }
}
