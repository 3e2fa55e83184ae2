// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, stdin reads, RAII cleanup.
//
// Safety: termios (tcgetattr, tcsetattr), ioctl (TIOCGWINSZ), isatty, poll
// and read go through libc. Each unsafe block is a single call.
#![allow(unsafe_code)]
//
// Raw mode turns off line buffering, echo and signal generation. The board
// painter echoes prompt input itself and sees Ctrl-C as a key, so a session
// can always be interrupted and the terminal handed back in one piece.
//
// The panic hook writes a fixed restore sequence straight to fd 1, skipping
// the stdout lock a panicking paint may still hold, then restores termios
// from a global backup before the default handler prints the message.

use std::io::{self, Write};
use std::sync::{Mutex, Once};
use std::time::Duration;

use crate::ansi;

// ─── Size ────────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when stdout is not a terminal.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Current terminal size via `ioctl(TIOCGWINSZ)`, `None` when not a terminal.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    (result == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Reading ─────────────────────────────────────────────────────────────────

const READ_BUF_SIZE: usize = 256;

/// Read whatever stdin has, waiting at most `timeout` (forever if `None`).
///
/// Returns an empty `Vec` on timeout and `UnexpectedEof` when stdin closed.
///
/// # Errors
///
/// Returns an error if `poll` or `read` fails, or on end of input.
#[cfg(unix)]
pub fn read_input(timeout: Option<Duration>) -> io::Result<Vec<u8>> {
    let timeout_ms = timeout.map_or(-1, |t| {
        libc::c_int::try_from(t.as_millis()).unwrap_or(libc::c_int::MAX)
    });

    let ready = unsafe {
        let mut pfd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };
        libc::poll(&raw mut pfd, 1, timeout_ms)
    };

    if ready < 0 {
        let err = io::Error::last_os_error();
        // A signal (SIGWINCH) woke us up; the caller simply polls again.
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(Vec::new())
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(Vec::new());
    }

    let mut buf = [0u8; READ_BUF_SIZE];
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    match usize::try_from(n) {
        Ok(0) => Err(io::ErrorKind::UnexpectedEof.into()),
        Ok(n) => Ok(buf[..n].to_vec()),
        Err(_) => Err(io::Error::last_os_error()),
    }
}

/// Blocking fallback: the timeout is not honoured.
///
/// # Errors
///
/// Returns an error if reading stdin fails, or on end of input.
#[cfg(not(unix))]
pub fn read_input(_timeout: Option<Duration>) -> io::Result<Vec<u8>> {
    use std::io::Read;

    let mut buf = [0u8; READ_BUF_SIZE];
    match io::stdin().lock().read(&mut buf)? {
        0 => Err(io::ErrorKind::UnexpectedEof.into()),
        n => Ok(buf[..n].to_vec()),
    }
}

// ─── Panic-safe restore ──────────────────────────────────────────────────────

/// Original termios for the panic hook, which cannot reach the [`Terminal`].
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn get_attrs() -> io::Result<libc::termios> {
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_attrs(termios: &libc::termios, when: libc::c_int) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, when, termios) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// End sync output, reset SGR, show cursor, leave the alternate screen.
/// The screen switch goes last so the shell reappears clean.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Put the terminal back before the panic message prints, so it lands on
/// the normal screen in cooked mode.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

#[cfg(unix)]
fn restore_after_panic() {
    // Raw write(2): the stdout lock may be held by the panicking thread.
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }
    let saved = TERMIOS_BACKUP.lock().ok().and_then(|backup| *backup);
    if let Some(original) = saved {
        let _ = set_attrs(&original, libc::TCSANOW);
    }
}

#[cfg(not(unix))]
fn restore_after_panic() {
    let mut out = io::stdout();
    let _ = out.write_all(EMERGENCY_RESTORE);
    let _ = out.flush();
}

// ─── Terminal ────────────────────────────────────────────────────────────────

/// Owns the terminal's raw state and gives it back on drop.
///
/// ```no_run
/// use kb_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... paint frames, read keys ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Query the size (80×24 if unknown). Does not touch terminal modes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            original_termios: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen.
    /// No-op when already active.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::enter_alt_screen(&mut lock)?;
        ansi::cursor_hide(&mut lock)?;
        ansi::clear_screen(&mut lock)?;
        lock.flush()?;

        self.active = true;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). No-op when inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut lock = stdout.lock();
        ansi::end_sync(&mut lock)?;
        ansi::reset(&mut lock)?;
        ansi::cursor_show(&mut lock)?;
        ansi::exit_alt_screen(&mut lock)?;
        lock.flush()?;
        drop(lock);

        self.disable_raw_mode()?;
        self.active = false;
        Ok(())
    }

    // ── termios ──────────────────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }

        let original = get_attrs()?;
        self.original_termios = Some(original);
        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = Some(original);
        }

        let mut attrs = original;
        unsafe { libc::cfmakeraw(&raw mut attrs) };
        // Whole-byte reads with no inter-byte timer; `read_input` polls.
        attrs.c_cc[libc::VMIN] = 1;
        attrs.c_cc[libc::VTIME] = 0;
        set_attrs(&attrs, libc::TCSAFLUSH)
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        let Some(original) = self.original_termios.take() else {
            return Ok(());
        };
        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = None;
        }
        set_attrs(&original, libc::TCSAFLUSH)
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
