//! # kb-board: the chessboard painter
//!
//! Draws an 8×8 board in a terminal and repaints it as cells get visited:
//!
//! - **[`grid`]**: `Grid`, `CellState`, `Coord` and progress
//! - **[`cursor`]**: `RelativeCursor`, the offset-driven draw position
//! - **[`style`]**: `Style` names and the `Palette` that colors them
//! - **[`surface`]**: the `Surface` trait every paint goes through
//! - **[`renderer`]**: `BoardRenderer`: borders, cells, progress, prompt
//! - **[`session`]**: the fill-the-board animation loop
//! - **[`screen`]** / **[`memory`]**: terminal and in-memory surfaces
//!
//! ```
//! use kb_board::cursor::RelativeCursor;
//! use kb_board::grid::Grid;
//! use kb_board::memory::MemorySurface;
//! use kb_board::renderer::{BoardRenderer, RenderOptions};
//!
//! let mut surface = MemorySurface::new(80, 24);
//! let mut cursor = RelativeCursor::new(80, 24);
//! let renderer = BoardRenderer::new(RenderOptions::default());
//!
//! renderer.paint(&mut surface, &mut cursor, &Grid::new())?;
//! assert_eq!(surface.row_text(18).trim_end(), "completed: 0.0%");
//! # Ok::<(), kb_board::Error>(())
//! ```

pub mod cursor;
pub mod error;
pub mod grid;
pub mod memory;
pub mod renderer;
pub mod screen;
pub mod session;
pub mod style;
pub mod surface;

pub use error::{Error, ParseCoordError, Result};
