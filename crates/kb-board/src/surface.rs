//! The drawing surface contract, and the canvas both surfaces share.
//!
//! A [`Surface`] takes positioned, styled text writes, reports its extents,
//! flushes, and reads keys with optional local echo. [`TermSurface`] puts
//! the result on a real terminal; [`MemorySurface`] keeps it in memory for
//! tests and headless runs.
//!
//! [`TermSurface`]: crate::screen::TermSurface
//! [`MemorySurface`]: crate::memory::MemorySurface

use std::time::Duration;

use kb_term::buffer::{FrameBuffer, string_width};
use kb_term::input::Key;

use crate::error::{Error, Result};
use crate::style::{Palette, Style};

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Where the board gets painted.
pub trait Surface {
    /// `(max_x, max_y)`: columns and rows available.
    fn extents(&self) -> (u16, u16);

    /// Write `text` at `(x, y)` in `style`.
    ///
    /// The caret ends up just past the text.
    ///
    /// # Errors
    ///
    /// [`Error::SurfaceBounds`] when any part of the text would fall outside
    /// the surface. Nothing is written in that case.
    fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> Result<()>;

    /// Blank the whole surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be cleared.
    fn clear(&mut self) -> Result<()>;

    /// Make everything written so far visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn flush(&mut self) -> Result<()>;

    /// Turn local echo of typed characters on or off.
    fn set_echo(&mut self, on: bool);

    /// Block until a key arrives. With echo on, printable keys appear at the
    /// caret and Backspace rubs out the last echoed character.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read or has ended.
    fn read_key(&mut self) -> Result<Key>;

    /// Wait `duration` between frames.
    ///
    /// # Errors
    ///
    /// Implementations may end the wait early with [`Error::Interrupted`].
    fn pause(&mut self, duration: Duration) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which vertical border of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl TryFrom<char> for Side {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'L' => Ok(Self::Left),
            'R' => Ok(Self::Right),
            other => Err(Error::InvalidSide(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Frame, palette, caret and echo state shared by both surfaces.
#[derive(Debug)]
pub(crate) struct Canvas {
    pub(crate) frame: FrameBuffer,
    pub(crate) palette: Palette,
    caret: (i32, i32),
    echo: bool,
    /// Widths of the characters echoed since echo was turned on.
    echoed: Vec<u16>,
}

impl Canvas {
    pub(crate) fn new(max_x: u16, max_y: u16, palette: Palette) -> Self {
        Self {
            frame: FrameBuffer::new(max_x, max_y),
            palette,
            caret: (0, 0),
            echo: false,
            echoed: Vec::new(),
        }
    }

    pub(crate) const fn extents(&self) -> (u16, u16) {
        (self.frame.width(), self.frame.height())
    }

    pub(crate) const fn caret(&self) -> (i32, i32) {
        self.caret
    }

    pub(crate) const fn echo(&self) -> bool {
        self.echo
    }

    pub(crate) fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> Result<()> {
        let look = self.palette.resolve(style);
        let written = self.frame.put_str(x, y, text, look.fg, look.bg, look.attrs);
        let Some(width) = written else {
            let (max_x, max_y) = self.extents();
            return Err(Error::SurfaceBounds {
                x,
                y,
                width: string_width(text),
                max_x,
                max_y,
            });
        };
        self.caret = (x + i32::from(width), y);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.frame.clear();
        self.caret = (0, 0);
    }

    pub(crate) fn set_echo(&mut self, on: bool) {
        self.echo = on;
        self.echoed.clear();
    }

    /// Echo `key` if echo is on. Returns whether anything changed on screen.
    ///
    /// A character that does not fit before the right edge is not shown,
    /// but still counts so Backspace stays in step with the typed text.
    pub(crate) fn echo_key(&mut self, key: Key) -> bool {
        if !self.echo {
            return false;
        }
        match key {
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                let (x, y) = self.caret;
                let shown = self.put_str(x, y, ch.encode_utf8(&mut buf), Style::Plain);
                let width = if shown.is_ok() {
                    u16::try_from(self.caret.0 - x).unwrap_or(0)
                } else {
                    0
                };
                self.echoed.push(width);
                shown.is_ok()
            }
            Key::Backspace => match self.echoed.pop() {
                Some(width) if width > 0 => {
                    let (x, y) = self.caret;
                    let start = x - i32::from(width);
                    let blank = " ".repeat(usize::from(width));
                    let erased = self.put_str(start, y, &blank, Style::Plain).is_ok();
                    self.caret = (start, y);
                    erased
                }
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(10, 2, Palette::default())
    }

    #[test]
    fn side_from_char() {
        assert_eq!(Side::try_from('L').unwrap(), Side::Left);
        assert_eq!(Side::try_from('R').unwrap(), Side::Right);
        assert!(matches!(Side::try_from('X'), Err(Error::InvalidSide('X'))));
        assert!(matches!(Side::try_from('l'), Err(Error::InvalidSide('l'))));
    }

    #[test]
    fn put_str_moves_caret() {
        let mut c = canvas();
        c.put_str(2, 1, "abc", Style::Plain).unwrap();
        assert_eq!(c.caret(), (5, 1));
    }

    #[test]
    fn out_of_bounds_reports_geometry() {
        let mut c = canvas();
        let err = c.put_str(8, 0, "abc", Style::Boundary).unwrap_err();
        assert!(matches!(
            err,
            Error::SurfaceBounds { x: 8, y: 0, width: 3, max_x: 10, max_y: 2 }
        ));
        assert_eq!(c.caret(), (0, 0));
    }

    #[test]
    fn echo_off_ignores_keys() {
        let mut c = canvas();
        assert!(!c.echo_key(Key::Char('x')));
        assert_eq!(c.frame.row_text(0).unwrap(), " ".repeat(10));
    }

    #[test]
    fn echo_and_rub_out() {
        let mut c = canvas();
        c.put_str(0, 1, "> ", Style::Plain).unwrap();
        c.set_echo(true);
        assert!(c.echo_key(Key::Char('3')));
        assert!(c.echo_key(Key::Char(',')));
        assert_eq!(c.frame.row_text(1).unwrap().trim_end(), "> 3,");
        assert!(c.echo_key(Key::Backspace));
        assert_eq!(c.frame.row_text(1).unwrap().trim_end(), "> 3");
        assert_eq!(c.caret(), (3, 1));
    }

    #[test]
    fn backspace_never_eats_the_prompt() {
        let mut c = canvas();
        c.put_str(0, 0, "> ", Style::Plain).unwrap();
        c.set_echo(true);
        assert!(!c.echo_key(Key::Backspace));
        assert_eq!(c.frame.row_text(0).unwrap().trim_end(), ">");
        assert_eq!(c.caret(), (2, 0));
    }

    #[test]
    fn echo_past_right_edge_is_hidden_but_tracked() {
        let mut c = canvas();
        c.put_str(0, 0, "123456789", Style::Plain).unwrap();
        c.set_echo(true);
        assert!(c.echo_key(Key::Char('a')));
        assert!(!c.echo_key(Key::Char('b')));
        assert!(!c.echo_key(Key::Backspace));
        assert!(c.echo_key(Key::Backspace));
        assert_eq!(c.frame.row_text(0).unwrap(), "123456789 ");
    }
}
