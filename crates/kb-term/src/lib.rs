// SPDX-License-Identifier: MIT
//
// kb-term — terminal backend for knight-board.
//
// Everything that ends up on the terminal goes through here: styled cells
// painted into a FrameBuffer, diffed against the previous frame, encoded
// as ANSI escapes and written in one go. Raw mode and the alternate screen
// are handled with termios directly, and stdin is read byte by byte into
// a handful of key events.
//
// There is no widget layer. Callers position text themselves.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod input;
pub mod output;
pub mod terminal;
