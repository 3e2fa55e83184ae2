//! Relative cursor: a draw position moved by offsets.
//!
//! Paint code never computes absolute coordinates. It moves the cursor by
//! signed deltas (`move_x`, `move_y`) and snaps an axis back to the origin
//! (`reset_x`, `reset_y`) at the start of each row. The origin is the
//! board's top-left corner; it is `(0, 0)` unless the board is centered.
//!
//! # No clamping
//!
//! The cursor is a plain accumulator. Its position can leave the surface in
//! any direction; the surface is what rejects an out-of-range write. The
//! surface extents are carried along only so overlay code can size a line
//! clear without asking the surface again.

/// Draw position plus origin and surface extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeCursor {
    x: i32,
    y: i32,
    origin_x: i32,
    origin_y: i32,
    max_x: u16,
    max_y: u16,
}

impl RelativeCursor {
    /// Cursor at `(0, 0)` on a `max_x` × `max_y` surface.
    #[must_use]
    pub const fn new(max_x: u16, max_y: u16) -> Self {
        Self::with_origin(0, 0, max_x, max_y)
    }

    /// Cursor at `(origin_x, origin_y)`, which is also where resets go.
    #[must_use]
    pub const fn with_origin(origin_x: i32, origin_y: i32, max_x: u16, max_y: u16) -> Self {
        Self {
            x: origin_x,
            y: origin_y,
            origin_x,
            origin_y,
            max_x,
            max_y,
        }
    }

    /// Origin that puts a `width` × `height` block in the middle of the
    /// surface. Falls back to 0 on an axis the block does not fit.
    #[must_use]
    pub fn centered(max_x: u16, max_y: u16, width: u16, height: u16) -> Self {
        let offset = |max: u16, len: u16| i32::from(max.saturating_sub(len) / 2);
        Self::with_origin(offset(max_x, width), offset(max_y, height), max_x, max_y)
    }

    // -- Accessors ----------------------------------------------------------

    /// Current `(x, y)`.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Where `reset_x` / `reset_y` go.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    #[inline]
    #[must_use]
    pub const fn max_x(&self) -> u16 {
        self.max_x
    }

    #[inline]
    #[must_use]
    pub const fn max_y(&self) -> u16 {
        self.max_y
    }

    // -- Movement -----------------------------------------------------------

    #[inline]
    pub const fn move_x(&mut self, delta: i32) {
        self.x = self.x.saturating_add(delta);
    }

    #[inline]
    pub const fn move_y(&mut self, delta: i32) {
        self.y = self.y.saturating_add(delta);
    }

    /// Back to the left margin.
    #[inline]
    pub const fn reset_x(&mut self) {
        self.x = self.origin_x;
    }

    /// Back to the top margin.
    #[inline]
    pub const fn reset_y(&mut self) {
        self.y = self.origin_y;
    }

    /// Both axes back to the origin.
    #[inline]
    pub const fn reset(&mut self) {
        self.reset_x();
        self.reset_y();
    }

    /// Move by whatever delta lands on `(x, y)`.
    pub const fn return_to(&mut self, (x, y): (i32, i32)) {
        self.move_x(x - self.x);
        self.move_y(y - self.y);
    }

}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
