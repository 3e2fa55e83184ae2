// SPDX-License-Identifier: MIT
//
// Keyboard input parser.
//
// Turns raw stdin bytes into the few keys a line prompt cares about:
// printable characters, Enter, Backspace, Escape and Ctrl-C. Raw mode
// turns off the terminal's own signal handling, so Ctrl-C arrives here as
// byte 0x03 and is reported as `Key::Interrupt`.
//
// Escape sequences (arrows, function keys, mouse reports) are recognised
// only far enough to be skipped whole, so their tail bytes never leak into
// the prompt as text.
//
// Sequences can span several reads, so the parser buffers. Feed bytes with
// [`Parser::advance`]; after a read timeout call [`Parser::flush`] to turn
// a lone pending ESC into a real Escape press.

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// CR or LF.
    Enter,
    /// DEL or BS.
    Backspace,
    Escape,
    /// Ctrl-C.
    Interrupt,
    /// Anything else: other control bytes, navigation keys, mouse reports.
    Other,
}

impl Key {
    /// Whether the key ends a session early (Ctrl-C, `q`, Escape).
    #[inline]
    #[must_use]
    pub const fn is_quit(self) -> bool {
        matches!(self, Self::Interrupt | Self::Escape | Self::Char('q'))
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Incremental byte-to-key decoder.
///
/// ```
/// use kb_term::input::{Key, Parser};
///
/// let mut parser = Parser::new();
/// assert_eq!(parser.advance(b"3,4\r"), vec![
///     Key::Char('3'), Key::Char(','), Key::Char('4'), Key::Enter,
/// ]);
/// ```
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed bytes; returns every key that is complete so far.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Key> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Skip(consumed) => pos += consumed,
                Parsed::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        keys
    }

    /// Bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve whatever is pending after a timeout.
    ///
    /// A lone ESC becomes [`Key::Escape`]; a truncated sequence is dropped.
    pub fn flush(&mut self) -> Vec<Key> {
        let keys = if self.buf.first() == Some(&ESC) {
            vec![Key::Escape]
        } else {
            Vec::new()
        };
        self.buf.clear();
        keys
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;

enum Parsed {
    Key(Key, usize),
    Skip(usize),
    Incomplete,
}

fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        ESC => parse_escape(buf),
        0x03 => Parsed::Key(Key::Interrupt, 1),
        0x0A | 0x0D => Parsed::Key(Key::Enter, 1),
        0x08 | 0x7F => Parsed::Key(Key::Backspace, 1),
        b @ 0x20..=0x7E => Parsed::Key(Key::Char(char::from(b)), 1),
        0x00..=0x1F => Parsed::Key(Key::Other, 1),
        0xC0..=0xF7 => parse_utf8(buf),
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };
    match next {
        // CSI: parameters and intermediates until a final byte in 0x40..=0x7E.
        b'[' => buf[2..]
            .iter()
            .position(|b| (0x40..=0x7E).contains(b))
            .map_or(Parsed::Incomplete, |end| Parsed::Key(Key::Other, end + 3)),
        // SS3: exactly one more byte.
        b'O' => {
            if buf.len() < 3 {
                Parsed::Incomplete
            } else {
                Parsed::Key(Key::Other, 3)
            }
        }
        // Alt+key.
        0x20..=0x7E => Parsed::Key(Key::Other, 2),
        // ESC followed by something unrelated: the ESC stands alone.
        _ => Parsed::Key(Key::Escape, 1),
    }
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let len = utf8_char_len(buf[0]);
    if buf.len() < len {
        return Parsed::Incomplete;
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| Parsed::Key(Key::Char(ch), len))
}

const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> Vec<Key> {
        Parser::new().advance(data)
    }

    #[test]
    fn printable_ascii() {
        assert_eq!(parse(b"a1,"), vec![Key::Char('a'), Key::Char('1'), Key::Char(',')]);
        assert_eq!(parse(b" "), vec![Key::Char(' ')]);
    }

    #[test]
    fn enter_from_cr_and_lf() {
        assert_eq!(parse(b"\r\n"), vec![Key::Enter, Key::Enter]);
    }

    #[test]
    fn backspace_variants() {
        assert_eq!(parse(&[0x7F, 0x08]), vec![Key::Backspace, Key::Backspace]);
    }

    #[test]
    fn ctrl_c_is_interrupt() {
        assert_eq!(parse(&[0x03]), vec![Key::Interrupt]);
        assert!(Key::Interrupt.is_quit());
    }

    #[test]
    fn other_control_bytes() {
        assert_eq!(parse(&[0x01, 0x09]), vec![Key::Other, Key::Other]);
    }

    #[test]
    fn arrow_key_is_swallowed_whole() {
        assert_eq!(parse(b"\x1b[A5"), vec![Key::Other, Key::Char('5')]);
        assert_eq!(parse(b"\x1b[1;5C"), vec![Key::Other]);
        assert_eq!(parse(b"\x1bOP"), vec![Key::Other]);
    }

    #[test]
    fn lone_escape_needs_flush() {
        let mut parser = Parser::new();
        assert!(parser.advance(&[ESC]).is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.flush(), vec![Key::Escape]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn escape_before_control_byte_stands_alone() {
        assert_eq!(parse(&[ESC, 0x0D]), vec![Key::Escape, Key::Enter]);
    }

    #[test]
    fn sequence_split_across_reads() {
        let mut parser = Parser::new();
        assert!(parser.advance(b"\x1b[1;").is_empty());
        assert_eq!(parser.advance(b"2Dx"), vec![Key::Other, Key::Char('x')]);
    }

    #[test]
    fn utf8_characters() {
        assert_eq!(parse("é♞".as_bytes()), vec![Key::Char('é'), Key::Char('♞')]);
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "♞".as_bytes();
        let mut parser = Parser::new();
        assert!(parser.advance(&bytes[..1]).is_empty());
        assert_eq!(parser.advance(&bytes[1..]), vec![Key::Char('♞')]);
    }

    #[test]
    fn stray_continuation_byte_skipped() {
        assert_eq!(parse(&[0x80, b'a']), vec![Key::Char('a')]);
    }

    #[test]
    fn quit_keys() {
        assert!(Key::Char('q').is_quit());
        assert!(Key::Escape.is_quit());
        assert!(!Key::Char('3').is_quit());
        assert!(!Key::Enter.is_quit());
    }
}
