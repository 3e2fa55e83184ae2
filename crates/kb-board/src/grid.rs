//! The 8×8 board state and the coordinates that address it.
//!
//! A [`Grid`] is a fixed array of [`CellState`]s. It never resizes. Progress
//! is derived on demand from the number of visited cells; a marker does not
//! count as visited.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseCoordError;

/// Rows and columns on the board.
pub const BOARD_SIZE: usize = 8;

/// Total number of cells.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

// ---------------------------------------------------------------------------
// CellState
// ---------------------------------------------------------------------------

/// What a board cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Unvisited,
    Visited,
    /// The single distinguished occupant (the knight).
    Marker,
}

impl CellState {
    /// Numeric value: 0, 1 or 2.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Unvisited => 0,
            Self::Visited => 1,
            Self::Marker => 2,
        }
    }

    /// Inverse of [`value`](Self::value).
    #[must_use]
    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unvisited),
            1 => Some(Self::Visited),
            2 => Some(Self::Marker),
            _ => None,
        }
    }

    /// The glyph painted for this state: its value as a digit.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Unvisited => '0',
            Self::Visited => '1',
            Self::Marker => '2',
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A cell address, 0-indexed, always inside the board.
///
/// Built only through [`Coord::new`], [`Coord::all`] or parsing, so
/// indexing a [`Grid`] with one never goes out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// `None` when either index is off the board.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[inline]
    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Every cell in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Self { row, col }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Parses `"row,col"`. Whitespace around either number is ignored.
///
/// ```
/// use kb_board::grid::Coord;
///
/// let c: Coord = "3, 4".parse().unwrap();
/// assert_eq!((c.row(), c.col()), (3, 4));
/// assert!("abc".parse::<Coord>().is_err());
/// ```
impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let [row, col] = fields[..] else {
            return Err(ParseCoordError::WrongArity(fields.len()));
        };

        let number = |field: &str| {
            field
                .parse::<usize>()
                .map_err(|_| ParseCoordError::NotANumber(field.to_string()))
        };
        let (row, col) = (number(row)?, number(col)?);

        Self::new(row, col).ok_or(ParseCoordError::OutOfRange { row, col })
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// The board: 8 rows of 8 cells.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Grid {
    cells: [[CellState; BOARD_SIZE]; BOARD_SIZE],
}

impl Grid {
    /// All cells unvisited.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from numeric values; anything other than 1 or 2 is unvisited.
    #[must_use]
    pub fn from_values(values: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let cells = values.map(|row| row.map(|v| CellState::from_value(v).unwrap_or_default()));
        Self { cells }
    }

    #[inline]
    #[must_use]
    pub const fn get(&self, at: Coord) -> CellState {
        self.cells[at.row][at.col]
    }

    #[inline]
    pub const fn set(&mut self, at: Coord, state: CellState) {
        self.cells[at.row][at.col] = state;
    }

    /// One row of cells, left to right.
    #[must_use]
    pub const fn row(&self, row: usize) -> &[CellState; BOARD_SIZE] {
        &self.cells[row]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState; BOARD_SIZE]> {
        self.cells.iter()
    }

    /// Cells in the `Visited` state.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&s| s == CellState::Visited)
            .count()
    }

    /// Percentage of visited cells, `visited / 64 * 100`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        self.visited_count() as f64 / CELL_COUNT as f64 * 100.0
    }

    /// [`progress`](Self::progress) as display text, e.g. `50.0%`.
    #[must_use]
    pub fn progress_text(&self) -> String {
        format_percent(self.progress())
    }

    /// Parse `"row,col"` and put the marker there.
    ///
    /// Other cells are left alone; uniqueness of the marker is the caller's
    /// business.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed or off-board input.
    pub fn place_marker(&mut self, input: &str) -> Result<Coord, ParseCoordError> {
        let at = input.parse()?;
        self.set(at, CellState::Marker);
        Ok(at)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid[")?;
        for row in &self.cells {
            let line: String = row.iter().map(|s| s.glyph()).collect();
            writeln!(f, "  {line}")?;
        }
        write!(f, "]")
    }
}

/// Shortest round-trip form of `percent`, always with a fractional part,
/// followed by `%`: `0.0%`, `1.5625%`, `100.0%`.
#[must_use]
pub fn format_percent(percent: f64) -> String {
    if percent.fract() == 0.0 {
        format!("{percent:.1}%")
    } else {
        format!("{percent}%")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn state_values_and_glyphs() {
        for state in [CellState::Unvisited, CellState::Visited, CellState::Marker] {
            assert_eq!(CellState::from_value(state.value()), Some(state));
            assert_eq!(state.to_string(), state.value().to_string());
        }
        assert_eq!(CellState::from_value(3), None);
    }

    #[test]
    fn empty_grid_has_no_progress() {
        let grid = Grid::new();
        assert_eq!(grid.visited_count(), 0);
        assert_eq!(grid.progress(), 0.0);
        assert_eq!(grid.progress_text(), "0.0%");
    }

    #[test]
    fn full_grid_is_complete() {
        let grid = Grid::from_values([[1; BOARD_SIZE]; BOARD_SIZE]);
        assert_eq!(grid.progress(), 100.0);
        assert_eq!(grid.progress_text(), "100.0%");
    }

    #[test]
    fn marker_does_not_count_as_visited() {
        let mut grid = Grid::new();
        grid.set(at(3, 4), CellState::Marker);
        assert_eq!(grid.progress(), 0.0);
    }

    #[test]
    fn half_visited_is_exactly_fifty() {
        let mut grid = Grid::new();
        for coord in Coord::all().take(32) {
            grid.set(coord, CellState::Visited);
        }
        assert_eq!(grid.progress(), 50.0);
        assert_eq!(grid.progress_text(), "50.0%");
    }

    #[test]
    fn fractional_progress_prints_in_full() {
        let mut grid = Grid::new();
        grid.set(at(0, 0), CellState::Visited);
        assert_eq!(grid.progress_text(), "1.5625%");
        assert_eq!(format_percent(4.6875), "4.6875%");
    }

    #[test]
    fn coords_are_row_major() {
        let all: Vec<Coord> = Coord::all().collect();
        assert_eq!(all.len(), CELL_COUNT);
        assert_eq!(all[0], at(0, 0));
        assert_eq!(all[1], at(0, 1));
        assert_eq!(all[8], at(1, 0));
        assert_eq!(all[63], at(7, 7));
    }

    #[test]
    fn coord_bounds() {
        assert!(Coord::new(7, 7).is_some());
        assert!(Coord::new(8, 0).is_none());
        assert!(Coord::new(0, 8).is_none());
        assert!(Coord::new(usize::MAX, 0).is_none());
    }

    #[test]
    fn coord_accessors() {
        let c = at(2, 5);
        assert_eq!((c.row(), c.col()), (2, 5));
        assert_eq!(c.to_string(), "2,5");
    }

    #[test]
    fn parse_coord() {
        assert_eq!("3,4".parse::<Coord>(), Ok(at(3, 4)));
        assert_eq!(" 0 , 7 ".parse::<Coord>(), Ok(at(0, 7)));
    }

    #[test]
    fn parse_coord_errors() {
        assert_eq!("abc".parse::<Coord>(), Err(ParseCoordError::WrongArity(1)));
        assert_eq!("".parse::<Coord>(), Err(ParseCoordError::WrongArity(1)));
        assert_eq!("1,2,3".parse::<Coord>(), Err(ParseCoordError::WrongArity(3)));
        assert_eq!(
            "a,1".parse::<Coord>(),
            Err(ParseCoordError::NotANumber("a".to_string()))
        );
        assert_eq!(
            "1,-2".parse::<Coord>(),
            Err(ParseCoordError::NotANumber("-2".to_string()))
        );
        assert_eq!(
            "8,1".parse::<Coord>(),
            Err(ParseCoordError::OutOfRange { row: 8, col: 1 })
        );
    }

    #[test]
    fn place_marker_sets_cell() {
        let mut grid = Grid::new();
        assert_eq!(grid.place_marker("3,4"), Ok(at(3, 4)));
        assert_eq!(grid.get(at(3, 4)), CellState::Marker);
        assert_eq!(grid.progress(), 0.0);
    }

    #[test]
    fn place_marker_rejects_garbage_without_change() {
        let mut grid = Grid::new();
        assert!(grid.place_marker("abc").is_err());
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn from_values_and_rows() {
        let mut values = [[0; BOARD_SIZE]; BOARD_SIZE];
        values[1][2] = 2;
        values[7][0] = 1;
        values[0][0] = 9;
        let grid = Grid::from_values(values);
        assert_eq!(grid.row(1)[2], CellState::Marker);
        assert_eq!(grid.get(at(7, 0)), CellState::Visited);
        assert_eq!(grid.get(at(0, 0)), CellState::Unvisited);
        assert_eq!(grid.rows().count(), BOARD_SIZE);
    }

    #[test]
    fn debug_shows_digits() {
        let mut grid = Grid::new();
        grid.set(at(0, 1), CellState::Marker);
        let dbg = format!("{grid:?}");
        assert!(dbg.starts_with("Grid[\n  02000000\n"));
    }
}
