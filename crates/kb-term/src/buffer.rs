// SPDX-License-Identifier: MIT
//
// FrameBuffer — the cell grid every paint call writes into.
//
// Flat `Vec<Cell>`, row-major (`index = y * width + x`), so a row is one
// contiguous slice. That keeps the diff renderer's row comparison a single
// slice equality check.
//
// Writes take signed coordinates. Callers track positions with relative
// offsets that can walk off the left or top edge; the buffer is the one
// place that decides whether a write lands. A write that does not fit
// entirely is refused as a whole, nothing is half-painted.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

/// A 2D grid of terminal cells.
///
/// ```
/// use kb_term::buffer::FrameBuffer;
/// use kb_term::cell::Attr;
/// use kb_term::color::CellColor;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// let cols = buf.put_str(1, 0, "---", CellColor::YELLOW, CellColor::BLACK, Attr::empty());
/// assert_eq!(cols, Some(3));
/// assert_eq!(buf.row_text(0).unwrap().trim_end(), " ---");
///
/// // Off the right edge: refused.
/// assert_eq!(buf.put_str(79, 0, "ab", CellColor::Default, CellColor::Default, Attr::empty()), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A buffer of empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` outside the buffer.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// One row as a slice.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The characters of one row, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.row(y)
            .map(|cells| cells.iter().filter_map(|c| c.character()).collect())
    }

    // ─── Whole-buffer operations ─────────────────────────────────────────

    /// Reset every cell to [`Cell::EMPTY`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Copy another buffer's cells. Reallocates only if sizes differ.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        } else {
            self.clone_from(other);
        }
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Write one cell. Returns `false` outside the buffer.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Paint `text` left to right starting at `(x, y)`.
    ///
    /// The whole string must fit: `x >= 0`, `0 <= y < height` and
    /// `x + string_width(text) <= width`. Otherwise nothing is written and
    /// `None` is returned. On success returns the number of columns used.
    ///
    /// Wide characters take two columns (owner + continuation cell);
    /// zero-width characters are dropped.
    pub fn put_str(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
    ) -> Option<u16> {
        let width = u16::try_from(string_width(text)).ok()?;
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        if y >= self.height || u32::from(x) + u32::from(width) > u32::from(self.width) {
            return None;
        }

        let mut col = x;
        for ch in text.chars() {
            match char_width(ch) {
                0 => {}
                1 => {
                    self.set(col, y, Cell::styled(ch, fg, bg, attrs));
                    col += 1;
                }
                _ => {
                    self.set(col, y, Cell::styled(ch, fg, bg, attrs));
                    self.set(col + 1, y, Cell::continuation(fg, bg, attrs));
                    col += 2;
                }
            }
        }

        Some(width)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text width ──────────────────────────────────────────────────────────────

/// Columns a character occupies: 0 for control characters, 2 for wide ones.
#[inline]
#[must_use]
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// Columns a string occupies.
///
/// ```
/// use kb_term::buffer::string_width;
///
/// assert_eq!(string_width("|"), 1);
/// assert_eq!(string_width("中文"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
