use std::time::Duration;

use kb_board::ParseCoordError;
use kb_board::cursor::RelativeCursor;
use kb_board::grid::{BOARD_SIZE, CELL_COUNT, CellState, Coord, Grid};
use kb_board::memory::MemorySurface;
use kb_board::renderer::{BoardRenderer, RenderOptions};
use proptest::prelude::*;

fn values() -> impl Strategy<Value = [[u8; BOARD_SIZE]; BOARD_SIZE]> {
    prop::array::uniform8(prop::array::uniform8(0u8..3))
}

fn renderer(show_progress: bool) -> BoardRenderer {
    BoardRenderer::new(RenderOptions {
        show_progress,
        allow_input: false,
        pause: Duration::ZERO,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Progress counts visited cells only; markers and blanks never add to it.
    #[test]
    fn progress_counts_visited_cells(values in values()) {
        let grid = Grid::from_values(values);
        let visited = values.iter().flatten().filter(|&&v| v == 1).count();

        prop_assert_eq!(grid.visited_count(), visited);
        #[allow(clippy::cast_precision_loss)]
        let expected = visited as f64 / CELL_COUNT as f64 * 100.0;
        prop_assert!((grid.progress() - expected).abs() < 1e-9);
        prop_assert!(grid.progress_text().ends_with('%'));
    }

    /// An off-board address never becomes a `Coord`; an on-board one can
    /// always be written to and read back from a grid.
    #[test]
    fn coords_stay_on_the_board(row in 0usize..20, col in 0usize..20) {
        let on_board = row < BOARD_SIZE && col < BOARD_SIZE;
        let parsed = format!("{row},{col}").parse::<Coord>();

        match Coord::new(row, col) {
            Some(at) => {
                prop_assert!(on_board);
                prop_assert_eq!(parsed, Ok(at));
                let mut grid = Grid::new();
                grid.set(at, CellState::Visited);
                prop_assert_eq!(grid.get(at), CellState::Visited);
                prop_assert_eq!(grid.visited_count(), 1);
            }
            None => {
                prop_assert!(!on_board);
                prop_assert_eq!(parsed, Err(ParseCoordError::OutOfRange { row, col }));
                let mut grid = Grid::new();
                let input = format!("{row},{col}");
                prop_assert!(grid.place_marker(&input).is_err());
                prop_assert_eq!(grid, Grid::new());
            }
        }
    }

    /// Any walk whose x steps cancel out ends back in the starting column.
    #[test]
    fn balanced_moves_return_to_origin(
        ox in 0i32..50,
        oy in 0i32..10,
        steps in prop::collection::vec(-20i32..20, 0..16),
    ) {
        let mut cursor = RelativeCursor::with_origin(ox, oy, 80, 24);
        for &step in &steps {
            cursor.move_x(step);
            cursor.move_y(1);
        }
        for &step in steps.iter().rev() {
            cursor.move_x(-step);
        }
        prop_assert_eq!(cursor.x(), ox);

        cursor.reset_y();
        prop_assert_eq!(cursor.position(), (ox, oy));
    }

    /// Painting leaves the cursor wherever it was before the paint.
    #[test]
    fn paint_has_no_net_displacement(
        dx in -40i32..40,
        dy in -20i32..20,
        values in values(),
        show_progress in any::<bool>(),
    ) {
        let mut surface = MemorySurface::new(80, 24);
        let mut cursor = RelativeCursor::new(80, 24);
        cursor.move_x(dx);
        cursor.move_y(dy);

        renderer(show_progress)
            .paint(&mut surface, &mut cursor, &Grid::from_values(values))
            .unwrap();
        prop_assert_eq!(cursor.position(), (dx, dy));
    }

    /// Painting the same grid twice gives the same frame.
    #[test]
    fn repaint_is_idempotent(values in values()) {
        let grid = Grid::from_values(values);
        let mut surface = MemorySurface::new(80, 24);
        let mut cursor = RelativeCursor::new(80, 24);
        let renderer = renderer(true);

        renderer.paint(&mut surface, &mut cursor, &grid).unwrap();
        let first = surface.lines();
        renderer.paint(&mut surface, &mut cursor, &grid).unwrap();
        prop_assert_eq!(surface.lines(), first);
    }

    /// Every cell glyph lands at its fixed offset from the origin.
    #[test]
    fn cells_land_on_their_columns(values in values(), ox in 0u16..40, oy in 0u16..4) {
        let grid = Grid::from_values(values);
        let mut surface = MemorySurface::new(80, 24);
        let mut cursor = RelativeCursor::with_origin(i32::from(ox), i32::from(oy), 80, 24);
        renderer(true).paint(&mut surface, &mut cursor, &grid).unwrap();

        for (r, row) in values.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                let x = ox + 1 + 4 * u16::try_from(c).unwrap();
                let y = oy + 1 + 2 * u16::try_from(r).unwrap();
                let glyph = CellState::from_value(v).unwrap().glyph();
                prop_assert_eq!(surface.cell(x, y).unwrap().character(), Some(glyph));
            }
        }
    }
}
