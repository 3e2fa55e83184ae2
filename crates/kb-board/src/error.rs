//! Error types for the board painter.
//!
//! Every failure is terminal to the operation that hit it: nothing here is
//! retried. The binary restores the terminal and reports the error.

use std::io;

use thiserror::Error;

/// Why a `row,col` string did not name a board cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordError {
    /// Not exactly two comma-separated fields.
    #[error("expected `row,col`, got {0} field(s)")]
    WrongArity(usize),
    /// A field that is not a non-negative integer.
    #[error("`{0}` is not a number")]
    NotANumber(String),
    /// Both numbers parsed but at least one is past the 8×8 board.
    #[error("({row}, {col}) is off the board")]
    OutOfRange { row: usize, col: usize },
}

/// Everything a paint, prompt or session can fail with.
#[derive(Debug, Error)]
pub enum Error {
    /// A border side designator other than `L` or `R`.
    #[error("invalid border side `{0}` (expected `L` or `R`)")]
    InvalidSide(char),

    /// A write that does not fit on the surface.
    #[error("text of width {width} at ({x}, {y}) does not fit a {max_x}x{max_y} surface")]
    SurfaceBounds {
        x: i32,
        y: i32,
        width: usize,
        max_x: u16,
        max_y: u16,
    },

    /// Prompt input that is not a board coordinate.
    #[error("invalid position: {0}")]
    InputParse(#[from] ParseCoordError),

    /// The user aborted with Ctrl-C, `q` or Esc.
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
