// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each flush compares the freshly painted FrameBuffer with the one shown
// last time and emits escapes only for cells that changed. A knight's tour
// repaint flips one board glyph and a few progress digits per frame, so
// almost every row is skipped with a single slice comparison.
//
// A frame goes out as:
//
//   begin_sync, [clear + home on first frame or resize], changed cells,
//   SGR reset, end_sync
//
// all collected in one OutputBuffer and written with one syscall.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What a render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame.
    pub cells_rendered: usize,
    /// Cells that matched and were skipped.
    pub cells_skipped: usize,
    /// Bytes of escape output produced.
    pub bytes_written: usize,
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Keeps the last shown frame and turns the next one into minimal output.
///
/// ```
/// use kb_term::buffer::FrameBuffer;
/// use kb_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(31, 17);
///
/// let first = renderer.render(&frame);
/// assert_eq!(first.cells_rendered, 31 * 17);
///
/// let second = renderer.render(&frame);
/// assert_eq!(second.cells_rendered, 0);
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// No previous frame yet, so the first render draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame into the output buffer.
    ///
    /// Follow with [`flush`](Self::flush) or [`flush_to`](Self::flush_to).
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let mut stats = RenderStats::default();
        if current.width() == 0 || current.height() == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == current.width() && prev.height() == current.height());

        if previous.is_none() {
            ansi::clear_screen(&mut self.output).ok();
            ansi::cursor_to(&mut self.output, 0, 0).ok();
        }

        for y in 0..current.height() {
            let Some(row) = current.row(y) else { break };
            let old_row = previous.and_then(|prev| prev.row(y));

            if old_row == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }

            for (x, cell) in (0u16..).zip(row) {
                let unchanged = old_row.is_some_and(|old| old[usize::from(x)] == *cell);
                if unchanged {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        // Leave the terminal in plain SGR so nothing bleeds past the frame.
        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();

        stats.bytes_written = self.output.len();
        self.store_frame(current);
        stats
    }

    /// Raw bytes from the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write pending output to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write pending output to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Forget the previous frame; the next render clears and redraws.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Attr, Cell};
    use crate::color::CellColor;

    fn render_frame(renderer: &mut DiffRenderer, frame: &FrameBuffer) -> (RenderStats, String) {
        let stats = renderer.render(frame);
        let output = String::from_utf8(renderer.output_bytes().to_vec()).unwrap();
        (stats, output)
    }

    #[test]
    fn first_render_clears_and_draws_everything() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(10, 5);

        let (stats, output) = render_frame(&mut renderer, &frame);

        assert_eq!(stats.cells_rendered, 50);
        assert_eq!(stats.cells_skipped, 0);
        assert!(output.starts_with("\x1b[?2026h\x1b[2J\x1b[1;1H"));
        assert!(output.ends_with("\x1b[0m\x1b[?2026l"));
    }

    #[test]
    fn identical_frame_renders_nothing() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(10, 5);
        renderer.render(&frame);

        let (stats, output) = render_frame(&mut renderer, &frame);

        assert_eq!(stats.cells_rendered, 0);
        assert_eq!(stats.cells_skipped, 50);
        assert_eq!(output, "\x1b[?2026h\x1b[0m\x1b[?2026l");
    }

    #[test]
    fn single_glyph_change_is_positioned() {
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(31, 17);
        renderer.render(&frame);

        frame.set(13, 7, Cell::styled('1', CellColor::GREEN, CellColor::BLACK, Attr::empty()));
        let (stats, output) = render_frame(&mut renderer, &frame);

        assert_eq!(stats.cells_rendered, 1);
        assert_eq!(stats.cells_rendered + stats.cells_skipped, 31 * 17);
        assert!(output.contains("\x1b[8;14H\x1b[32m\x1b[40m1"));
    }

    #[test]
    fn only_changed_row_is_visited() {
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(40, 20);
        renderer.render(&frame);

        frame.put_str(0, 18, "completed: ", CellColor::Default, CellColor::Default, Attr::empty());
        let (stats, _) = render_frame(&mut renderer, &frame);

        // "completed: " ends in a space, which equals the blank cell.
        assert_eq!(stats.cells_rendered, 10);
        assert_eq!(stats.cells_skipped, 790);
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(10, 5));

        let (stats, output) = render_frame(&mut renderer, &FrameBuffer::new(20, 10));

        assert_eq!(stats.cells_rendered, 200);
        assert!(output.contains("\x1b[2J"));
    }

    #[test]
    fn force_redraw_draws_again() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(4, 2);
        renderer.render(&frame);
        renderer.force_redraw();

        let (stats, output) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 8);
        assert!(output.contains("\x1b[2J"));
    }

    #[test]
    fn zero_size_frame_is_silent() {
        let mut renderer = DiffRenderer::new();
        let (stats, output) = render_frame(&mut renderer, &FrameBuffer::new(0, 0));
        assert_eq!(stats, RenderStats::default());
        assert!(output.is_empty());
    }

    #[test]
    fn revert_is_a_change_too() {
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(5, 1);
        renderer.render(&frame);

        frame.set(0, 0, Cell::new('2'));
        assert_eq!(renderer.render(&frame).cells_rendered, 1);
        frame.set(0, 0, Cell::EMPTY);
        assert_eq!(renderer.render(&frame).cells_rendered, 1);
        assert_eq!(renderer.render(&frame).cells_rendered, 0);
    }

    #[test]
    fn flush_to_writes_and_drains() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(2, 1));
        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(renderer.output_bytes().is_empty());
    }
}
