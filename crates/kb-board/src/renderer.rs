//! Board renderer: borders, cells, progress overlay, input prompt.
//!
//! Every position is reached through the [`RelativeCursor`]: a paint call
//! snaps the cursor to the board origin, walks it row by row with relative
//! moves, and returns it to where the caller had it. The same grid painted
//! twice therefore produces the same frame, wherever the cursor was left.
//!
//! # Layout
//!
//! Relative to the origin `(ox, oy)`:
//!
//! ```text
//!  oy + 0    -----------------------------   top rule, starts at ox + 1
//!  oy + 1   |0   0   0   0   0   0   0   0|  cell row 0
//!  oy + 2   |                             |  blank separator
//!  oy + 3   |0   0   0   0   0   0   0   0|  cell row 1
//!   ...
//!  oy + 15  |0   0   0   0   0   0   0   0|  cell row 7
//!  oy + 16   -----------------------------   bottom rule
//!  oy + 18  completed: 0.0%                  progress overlay
//!  oy + 19  knight's position (row, col):    input prompt
//! ```
//!
//! Cell `(row, col)` is at `(ox + 1 + 4·col, oy + 1 + 2·row)`.
//!
//! Each separator row is painted as a full `|` + blanks + `|` bar before
//! the cell row below it, so a repaint never leaves stale glyphs behind.

use std::time::Duration;

use kb_term::buffer::string_width;
use kb_term::input::Key;

use crate::cursor::RelativeCursor;
use crate::error::{Error, Result};
use crate::grid::{BOARD_SIZE, Grid};
use crate::style::Style;
use crate::surface::{Side, Surface};

/// Dashes in the top and bottom rules.
pub const RULE_WIDTH: usize = 29;

/// Columns from the left bar to the right bar inclusive.
pub const BOARD_WIDTH: u16 = 31;

/// Rows from the top rule to the bottom rule inclusive.
pub const BOARD_HEIGHT: u16 = 17;

/// Board plus the progress and prompt lines beneath it.
pub const FRAME_HEIGHT: u16 = BOARD_HEIGHT + 3;

/// Columns between the starts of neighbouring cell glyphs.
const CELL_STRIDE: i32 = 4;

const PROGRESS_ROW: i32 = 18;
const PROMPT_ROW: i32 = 19;

pub const PROGRESS_LABEL: &str = "completed: ";
pub const PROMPT: &str = "knight's position (row, col):";

// ---------------------------------------------------------------------------
// RenderOptions
// ---------------------------------------------------------------------------

/// What a paint cycle includes and how long it lingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw the `completed: N%` line under the board.
    pub show_progress: bool,
    /// Let [`BoardRenderer::prompt`] ask for input.
    pub allow_input: bool,
    /// Pause after each paint.
    pub pause: Duration,
}

impl RenderOptions {
    pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
            allow_input: false,
            pause: Self::DEFAULT_PAUSE,
        }
    }
}

// ---------------------------------------------------------------------------
// BoardRenderer
// ---------------------------------------------------------------------------

/// Paints a [`Grid`] onto a [`Surface`].
///
/// Holds only its options; the surface, cursor and grid are borrowed per
/// call.
#[derive(Debug, Clone, Default)]
pub struct BoardRenderer {
    options: RenderOptions,
}

impl BoardRenderer {
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// One paint cycle: board, optional progress line, flush, pause.
    ///
    /// The board is always drawn at the cursor's origin, not at its current
    /// position: moving the cursor between calls does not move the board.
    /// Use [`RelativeCursor::with_origin`] or [`RelativeCursor::centered`]
    /// to place it. The cursor is back at its starting position afterwards,
    /// error or not.
    ///
    /// # Errors
    ///
    /// [`Error::SurfaceBounds`] if the board does not fit the surface, or
    /// whatever the surface's flush or pause fails with.
    pub fn paint<S>(&self, surface: &mut S, cursor: &mut RelativeCursor, grid: &Grid) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let start = cursor.position();
        cursor.reset();
        let painted = self.paint_frame(surface, cursor, grid);
        cursor.return_to(start);
        painted?;

        log::debug!("painted board, {} visited", grid.progress_text());
        surface.flush()?;
        surface.pause(self.options.pause)
    }

    fn paint_frame<S>(&self, surface: &mut S, cursor: &mut RelativeCursor, grid: &Grid) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        let separator = format!("|{}|", " ".repeat(RULE_WIDTH));
        Self::horizontal_line(surface, cursor)?;

        for (row, cells) in grid.rows().enumerate() {
            cursor.reset_x();

            if row > 0 {
                put(surface, cursor, &separator, Style::Boundary)?;
                cursor.move_y(1);
            }

            Self::vertical_line(surface, cursor, Side::Left)?;
            for (col, state) in cells.iter().enumerate() {
                let mut glyph = [0u8; 4];
                let glyph = state.glyph().encode_utf8(&mut glyph);
                put(surface, cursor, glyph, Style::for_cell(*state))?;
                cursor.move_x(1);
                if col != BOARD_SIZE - 1 {
                    cursor.move_x(CELL_STRIDE - 1);
                }
            }
            Self::vertical_line(surface, cursor, Side::Right)?;
        }

        cursor.reset_x();
        Self::horizontal_line(surface, cursor)?;

        if self.options.show_progress {
            Self::progress_line(surface, cursor, grid)?;
        }
        Ok(())
    }

    /// A rule of dashes one column right of the cursor; moves one row down.
    ///
    /// # Errors
    ///
    /// [`Error::SurfaceBounds`] when the rule does not fit.
    pub fn horizontal_line<S>(surface: &mut S, cursor: &mut RelativeCursor) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        cursor.move_x(1);
        put(surface, cursor, &"-".repeat(RULE_WIDTH), Style::Boundary)?;
        cursor.move_y(1);
        Ok(())
    }

    /// A `|` at the cursor. The left bar steps right onto the first cell;
    /// the right bar steps down to the next line.
    ///
    /// # Errors
    ///
    /// [`Error::SurfaceBounds`] when the bar does not fit.
    pub fn vertical_line<S>(surface: &mut S, cursor: &mut RelativeCursor, side: Side) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        put(surface, cursor, "|", Style::Boundary)?;
        match side {
            Side::Left => cursor.move_x(1),
            Side::Right => cursor.move_y(1),
        }
        Ok(())
    }

    /// Clear the progress line and print `completed: N%` on it.
    fn progress_line<S>(surface: &mut S, cursor: &mut RelativeCursor, grid: &Grid) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        Self::overlay_line(surface, cursor, PROGRESS_ROW)?;
        put(surface, cursor, PROGRESS_LABEL, Style::Plain)?;

        cursor.move_x(label_width(PROGRESS_LABEL));
        put(surface, cursor, &grid.progress_text(), Style::Progress)?;
        cursor.move_x(-label_width(PROGRESS_LABEL));
        Ok(())
    }

    /// Move to `row` below the origin, at the left margin, and blank that
    /// line out to the right edge of the surface.
    fn overlay_line<S>(surface: &mut S, cursor: &mut RelativeCursor, row: i32) -> Result<()>
    where
        S: Surface + ?Sized,
    {
        cursor.reset();
        cursor.move_y(row);
        let width = i32::from(cursor.max_x()) - cursor.x();
        let blank = " ".repeat(usize::try_from(width).unwrap_or(0));
        put(surface, cursor, &blank, Style::Plain)
    }

    /// Ask for a line of input under the board.
    ///
    /// Clears the prompt line, prints the prompt and a blank column, turns
    /// echo on, and collects keys until Enter. Backspace drops the last
    /// character. Echo is off again when this returns. Returns `None`
    /// without touching the surface when input is not allowed.
    ///
    /// # Errors
    ///
    /// [`Error::Interrupted`] on Ctrl-C or Esc, [`Error::SurfaceBounds`]
    /// when the prompt does not fit, or a read error from the surface.
    pub fn prompt<S>(&self, surface: &mut S, cursor: &mut RelativeCursor) -> Result<Option<String>>
    where
        S: Surface + ?Sized,
    {
        if !self.options.allow_input {
            return Ok(None);
        }

        let start = cursor.position();
        let line = Self::read_line(surface, cursor);
        cursor.return_to(start);
        line.map(Some)
    }

    fn read_line<S>(surface: &mut S, cursor: &mut RelativeCursor) -> Result<String>
    where
        S: Surface + ?Sized,
    {
        Self::overlay_line(surface, cursor, PROMPT_ROW)?;
        put(surface, cursor, PROMPT, Style::Plain)?;
        cursor.move_x(label_width(PROMPT));
        put(surface, cursor, " ", Style::Plain)?;
        surface.flush()?;

        surface.set_echo(true);
        let typed = collect_line(surface);
        surface.set_echo(false);
        surface.flush()?;

        let typed = typed?;
        log::info!("prompt answered: {typed:?}");
        Ok(typed)
    }
}

/// Keys up to Enter, with Backspace editing.
fn collect_line<S>(surface: &mut S) -> Result<String>
where
    S: Surface + ?Sized,
{
    let mut line = String::new();
    loop {
        match surface.read_key()? {
            Key::Enter => return Ok(line),
            Key::Char(ch) => line.push(ch),
            Key::Backspace => {
                line.pop();
            }
            Key::Interrupt | Key::Escape => return Err(Error::Interrupted),
            Key::Other => {}
        }
    }
}

fn put<S>(surface: &mut S, cursor: &RelativeCursor, text: &str, style: Style) -> Result<()>
where
    S: Surface + ?Sized,
{
    let (x, y) = cursor.position();
    surface.put_str(x, y, text, style)
}

fn label_width(label: &str) -> i32 {
    i32::try_from(string_width(label)).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
