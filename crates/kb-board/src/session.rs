//! The animation loop around the renderer.
//!
//! A session clears the surface, paints the empty board, optionally asks
//! where the knight starts, then visits every cell in row-major order and
//! repaints after each step. Which cell comes next is not a tour search;
//! the board is simply filled in reading order.

use crate::cursor::RelativeCursor;
use crate::error::{Error, Result};
use crate::grid::{CellState, Coord, Grid};
use crate::renderer::{BOARD_WIDTH, BoardRenderer, FRAME_HEIGHT, RenderOptions};
use crate::surface::Surface;

/// How a session is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    pub render: RenderOptions,
    /// Center the board on the surface instead of drawing it top-left.
    pub center: bool,
}

/// What a finished session did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    /// Paint cycles performed.
    pub frames: usize,
    /// Final progress percentage.
    pub progress: f64,
    /// Where the marker was placed, if it was asked for.
    pub marker: Option<Coord>,
}

/// Owns the grid and cursor for one run over a borrowed surface.
pub struct Session<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    renderer: BoardRenderer,
    cursor: RelativeCursor,
    grid: Grid,
    frames: usize,
}

impl<'s, S: Surface + ?Sized> Session<'s, S> {
    #[must_use]
    pub fn new(surface: &'s mut S, config: SessionConfig) -> Self {
        let (max_x, max_y) = surface.extents();
        let cursor = if config.center {
            RelativeCursor::centered(max_x, max_y, BOARD_WIDTH, FRAME_HEIGHT)
        } else {
            RelativeCursor::new(max_x, max_y)
        };
        Self {
            surface,
            renderer: BoardRenderer::new(config.render),
            cursor,
            grid: Grid::new(),
            frames: 0,
        }
    }

    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub const fn cursor(&self) -> &RelativeCursor {
        &self.cursor
    }

    /// Run to completion.
    ///
    /// # Errors
    ///
    /// Any paint, prompt or parse error ends the session. An interrupt is
    /// logged as a warning before it is returned.
    pub fn run(mut self) -> Result<SessionReport> {
        let result = self.drive();
        match &result {
            Ok(report) => log::info!(
                "session finished: {} frames, {}",
                report.frames,
                self.grid.progress_text()
            ),
            Err(Error::Interrupted) => log::warn!(
                "session interrupted after {} frames at {}",
                self.frames,
                self.grid.progress_text()
            ),
            Err(err) => log::error!("session failed after {} frames: {err}", self.frames),
        }
        result
    }

    fn drive(&mut self) -> Result<SessionReport> {
        let (max_x, max_y) = self.surface.extents();
        log::info!("session start on a {max_x}x{max_y} surface");

        self.surface.clear()?;
        self.repaint()?;

        let mut marker = None;
        if let Some(answer) = self.renderer.prompt(&mut *self.surface, &mut self.cursor)? {
            let at = self.grid.place_marker(&answer)?;
            log::info!("marker placed at {at}");
            marker = Some(at);
            self.repaint()?;
        }

        for at in Coord::all() {
            self.grid.set(at, CellState::Visited);
            self.cursor.reset();
            self.repaint()?;
        }

        Ok(SessionReport {
            frames: self.frames,
            progress: self.grid.progress(),
            marker,
        })
    }

    fn repaint(&mut self) -> Result<()> {
        self.renderer.paint(&mut *self.surface, &mut self.cursor, &self.grid)?;
        self.frames += 1;
        Ok(())
    }
}
