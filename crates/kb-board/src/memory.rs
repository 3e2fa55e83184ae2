//! In-memory surface.
//!
//! Paints into the same `FrameBuffer` the terminal surface uses, takes keys
//! from a script instead of stdin, and counts flushes and pauses instead of
//! sleeping. Used by the tests and by anything that wants a frame without a
//! terminal.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use kb_term::buffer::FrameBuffer;
use kb_term::cell::Cell;
use kb_term::input::Key;

use crate::error::Result;
use crate::style::{Palette, Style};
use crate::surface::{Canvas, Surface};

/// A surface that never touches the terminal.
///
/// ```
/// use kb_board::memory::MemorySurface;
/// use kb_board::style::Style;
/// use kb_board::surface::Surface;
///
/// let mut surface = MemorySurface::new(40, 20);
/// surface.put_str(1, 0, "---", Style::Boundary).unwrap();
/// assert_eq!(surface.row_text(0).trim_end(), " ---");
/// ```
#[derive(Debug)]
pub struct MemorySurface {
    canvas: Canvas,
    keys: VecDeque<Key>,
    flushes: usize,
    pauses: Vec<Duration>,
}

impl MemorySurface {
    /// Blank `max_x` × `max_y` surface with the classic palette.
    #[must_use]
    pub fn new(max_x: u16, max_y: u16) -> Self {
        Self {
            canvas: Canvas::new(max_x, max_y, Palette::default()),
            keys: VecDeque::new(),
            flushes: 0,
            pauses: Vec::new(),
        }
    }

    // -- Scripted input -----------------------------------------------------

    /// Queue keys for [`read_key`](Surface::read_key).
    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.keys.extend(keys);
    }

    /// Queue `line` as typed characters followed by Enter.
    pub fn type_line(&mut self, line: &str) {
        self.push_keys(line.chars().map(Key::Char));
        self.keys.push_back(Key::Enter);
    }

    /// Keys not read yet.
    #[must_use]
    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    // -- Inspection ---------------------------------------------------------

    #[must_use]
    pub const fn frame(&self) -> &FrameBuffer {
        &self.canvas.frame
    }

    /// Text of row `y`; empty when `y` is off the surface.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.canvas.frame.row_text(y).unwrap_or_default()
    }

    /// Every row, top to bottom, trailing blanks trimmed.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.canvas.frame.height())
            .map(|y| self.row_text(y).trim_end().to_string())
            .collect()
    }

    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        self.canvas.frame.get(x, y).copied()
    }

    /// Whether the cell at `(x, y)` is drawn in `style`.
    #[must_use]
    pub fn has_style(&self, x: u16, y: u16, style: Style) -> bool {
        let look = self.canvas.palette.resolve(style);
        self.canvas.frame.get(x, y).is_some_and(|c| look.matches(c))
    }

    /// Where the next echoed character would go.
    #[must_use]
    pub const fn caret(&self) -> (i32, i32) {
        self.canvas.caret()
    }

    #[must_use]
    pub const fn echo_enabled(&self) -> bool {
        self.canvas.echo()
    }

    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Every pause requested so far, in order.
    #[must_use]
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }
}

impl Surface for MemorySurface {
    fn extents(&self) -> (u16, u16) {
        self.canvas.extents()
    }

    fn put_str(&mut self, x: i32, y: i32, text: &str, style: Style) -> Result<()> {
        self.canvas.put_str(x, y, text, style)
    }

    fn clear(&mut self) -> Result<()> {
        self.canvas.clear();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn set_echo(&mut self, on: bool) {
        self.canvas.set_echo(on);
    }

    fn read_key(&mut self) -> Result<Key> {
        let key = self
            .keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))?;
        self.canvas.echo_key(key);
        Ok(key)
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        self.pauses.push(duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn starts_blank() {
        let surface = MemorySurface::new(5, 2);
        assert_eq!(surface.extents(), (5, 2));
        assert_eq!(surface.lines(), vec!["", ""]);
        assert_eq!(surface.row_text(9), "");
    }

    #[test]
    fn writes_are_styled() {
        let mut surface = MemorySurface::new(10, 1);
        surface.put_str(0, 0, "|", Style::Boundary).unwrap();
        assert!(surface.has_style(0, 0, Style::Boundary));
        assert!(!surface.has_style(0, 0, Style::Visited));
        assert_eq!(surface.cell(0, 0).unwrap().character(), Some('|'));
    }

    #[test]
    fn scripted_keys_in_order_then_eof() {
        let mut surface = MemorySurface::new(10, 1);
        surface.type_line("ab");
        assert_eq!(surface.pending_keys(), 3);
        assert_eq!(surface.read_key().unwrap(), Key::Char('a'));
        assert_eq!(surface.read_key().unwrap(), Key::Char('b'));
        assert_eq!(surface.read_key().unwrap(), Key::Enter);
        let err = surface.read_key().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn echo_follows_caret() {
        let mut surface = MemorySurface::new(10, 1);
        surface.put_str(0, 0, "? ", Style::Plain).unwrap();
        surface.set_echo(true);
        surface.push_keys([Key::Char('7')]);
        surface.read_key().unwrap();
        assert_eq!(surface.lines(), vec!["? 7"]);
        assert_eq!(surface.caret(), (3, 0));
    }

    #[test]
    fn no_echo_when_off() {
        let mut surface = MemorySurface::new(10, 1);
        surface.push_keys([Key::Char('7')]);
        surface.read_key().unwrap();
        assert_eq!(surface.lines(), vec![""]);
    }

    #[test]
    fn flushes_and_pauses_are_counted() {
        let mut surface = MemorySurface::new(1, 1);
        surface.flush().unwrap();
        surface.pause(Duration::from_millis(500)).unwrap();
        surface.pause(Duration::ZERO).unwrap();
        assert_eq!(surface.flush_count(), 1);
        assert_eq!(surface.pauses(), &[Duration::from_millis(500), Duration::ZERO]);
    }

    #[test]
    fn clear_blanks_everything() {
        let mut surface = MemorySurface::new(3, 1);
        surface.put_str(0, 0, "abc", Style::Visited).unwrap();
        surface.clear().unwrap();
        assert_eq!(surface.frame(), &FrameBuffer::new(3, 1));
    }
}
