//! Named styles and the palette that resolves them.
//!
//! Paint code only ever names a [`Style`]. The surface owns a [`Palette`]
//! and turns the style into concrete colors when it writes cells, so there
//! is no global color-pair table to register or index into.

use kb_term::cell::{Attr, Cell};
use kb_term::color::CellColor;

use crate::grid::CellState;

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Role of a piece of text on the board screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Border rules and bars.
    Boundary,
    /// A visited cell glyph.
    Visited,
    /// The marker's cell glyph.
    Marker,
    /// An unvisited cell glyph.
    Unvisited,
    /// The progress percentage.
    Progress,
    /// Labels, prompt text and echoed input.
    Plain,
}

impl Style {
    /// Style of a cell glyph.
    #[must_use]
    pub const fn for_cell(state: CellState) -> Self {
        match state {
            CellState::Unvisited => Self::Unvisited,
            CellState::Visited => Self::Visited,
            CellState::Marker => Self::Marker,
        }
    }
}

// ---------------------------------------------------------------------------
// Appearance
// ---------------------------------------------------------------------------

/// Concrete colors and attributes for one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Appearance {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Appearance {
    #[must_use]
    pub const fn new(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self { fg, bg, attrs }
    }

    /// Foreground on black, the board's background everywhere.
    #[must_use]
    pub const fn on_black(fg: CellColor) -> Self {
        Self::new(fg, CellColor::BLACK, Attr::empty())
    }

    #[must_use]
    pub const fn with_attrs(self, attrs: Attr) -> Self {
        Self { attrs, ..self }
    }

    /// Whether `cell` is drawn in this appearance, whatever its character.
    #[must_use]
    pub fn matches(self, cell: &Cell) -> bool {
        cell.fg == self.fg && cell.bg == self.bg && cell.attrs == self.attrs
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Style → appearance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub boundary: Appearance,
    pub visited: Appearance,
    pub marker: Appearance,
    pub unvisited: Appearance,
    pub progress: Appearance,
    pub plain: Appearance,
}

impl Palette {
    /// Yellow borders, green visited, bold red marker, white unvisited,
    /// cyan progress, all on black.
    #[must_use]
    pub const fn classic() -> Self {
        Self {
            boundary: Appearance::on_black(CellColor::YELLOW),
            visited: Appearance::on_black(CellColor::GREEN),
            marker: Appearance::on_black(CellColor::RED).with_attrs(Attr::BOLD),
            unvisited: Appearance::on_black(CellColor::WHITE),
            progress: Appearance::on_black(CellColor::CYAN),
            plain: Appearance::new(CellColor::Default, CellColor::Default, Attr::empty()),
        }
    }

    #[must_use]
    pub const fn resolve(&self, style: Style) -> Appearance {
        match style {
            Style::Boundary => self.boundary,
            Style::Visited => self.visited,
            Style::Marker => self.marker,
            Style::Unvisited => self.unvisited,
            Style::Progress => self.progress,
            Style::Plain => self.plain,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}
