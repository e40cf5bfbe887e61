// SPDX-License-Identifier: MIT
//
// Real terminal backend — isatty, OSC color queries over /dev/tty.
//
// Safety: This module necessarily uses `unsafe` for the POSIX terminal
// interfaces: isatty, open, termios (tcgetattr, tcsetattr), poll, read,
// write, close. There is no safe alternative for talking to a tty at
// this level. Each unsafe block is minimal, and the temporary termios
// change is guarded by RAII so the terminal is restored even on error.
#![allow(unsafe_code)]
//
// A color query is a round-trip over the terminal's control channel: we
// write an OSC request and the terminal answers inline on the input
// stream, X-resource style (`rgb:RRRR/GGGG/BBBB`). The reply only ever
// arrives if a real terminal is attached, so every query is bounded by a
// caller-supplied deadline, and we refuse outright when output is not
// interactive — writing query sequences into a pipe would corrupt
// whatever is reading it.
//
// The round-trip goes through /dev/tty rather than stdin/stdout so that
// redirected standard streams never block it, and the tty is switched to
// a no-echo, non-canonical mode for the duration so the reply is neither
// displayed nor line-buffered.

use std::io::{self, Write};
use std::time::Duration;
#[cfg(unix)]
use std::time::Instant;

#[cfg(unix)]
use tracing::trace;

use crate::backend::Console;
use crate::error::ConsoleError;
use crate::state::{ColorQuery, OsVersion, RawConsoleState, VtReport};

/// The live terminal attached to this process.
///
/// Stateless: every call inspects or writes to the tty directly. On
/// platforms without a register console, the state-snapshot methods
/// report [`ConsoleError::Unsupported`] and callers degrade to the
/// escape-sequence paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtyConsole;

impl TtyConsole {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_sequence(&self, sequence: &str) -> Result<(), ConsoleError> {
        if !self.is_output_interactive() {
            return Err(ConsoleError::Unsupported(
                "output is not an interactive terminal",
            ));
        }
        let mut out = io::stdout().lock();
        out.write_all(sequence.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

impl Console for TtyConsole {
    fn raw_color_state(&self) -> Result<RawConsoleState, ConsoleError> {
        Err(ConsoleError::Unsupported(
            "no register console on this platform",
        ))
    }

    fn enable_vt(&self) -> Result<VtReport, ConsoleError> {
        // VT processing is not a switchable mode here; the terminal either
        // speaks VT or it does not, which detection learns from the
        // environment instead.
        Err(ConsoleError::Unsupported(
            "no switchable console mode on this platform",
        ))
    }

    fn os_version(&self) -> Option<OsVersion> {
        // No versioned console host on a plain tty. Detection treats the
        // absence as "assume standard terminal defaults".
        None
    }

    fn is_output_interactive(&self) -> bool {
        stdout_is_tty()
    }

    fn query_color(
        &self,
        query: ColorQuery,
        timeout: Duration,
    ) -> Result<(u8, u8, u8), ConsoleError> {
        if !self.is_output_interactive() {
            return Err(ConsoleError::Unsupported(
                "output is not an interactive terminal",
            ));
        }
        query_color_tty(query, timeout)
    }

    fn title(&self) -> Result<String, ConsoleError> {
        // Most terminals refuse the title-report escape for security
        // reasons, so there is no reliable readback path.
        Err(ConsoleError::Unsupported(
            "title readback is not available on this platform",
        ))
    }

    fn set_title(&self, title: &str) -> Result<(), ConsoleError> {
        self.write_sequence(&format!("\x1b]2;{title}\x07"))
    }

    fn set_cursor_position(&self, x: u16, y: u16) -> Result<(), ConsoleError> {
        let (x, y) = (x.max(1), y.max(1));
        self.write_sequence(&format!("\x1b[{y};{x}H"))
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        self.write_sequence("\x1b[2J\x1b[H")
    }
}

// ─── Interactivity ──────────────────────────────────────────────────────────

#[cfg(unix)]
fn stdout_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
}

#[cfg(not(unix))]
fn stdout_is_tty() -> bool {
    false
}

// ─── OSC round-trip ─────────────────────────────────────────────────────────

/// Longest reply we accept before declaring it garbage. A well-formed
/// answer (`ESC ] 4;255;rgb:aaaa/bbbb/cccc ESC \`) is under 32 bytes.
#[cfg(unix)]
const MAX_REPLY_BYTES: usize = 64;

#[cfg(unix)]
const DEV_TTY: &[u8] = b"/dev/tty\0";

#[cfg(unix)]
fn query_color_tty(query: ColorQuery, timeout: Duration) -> Result<(u8, u8, u8), ConsoleError> {
    let request = match query {
        ColorQuery::Foreground => "\x1b]10;?\x07".to_owned(),
        ColorQuery::Background => "\x1b]11;?\x07".to_owned(),
        ColorQuery::Index(slot) => format!("\x1b]4;{slot};?\x07"),
    };

    let tty = RawTty::open()?;
    tty.write_all(request.as_bytes())?;
    let deadline = Instant::now() + timeout;
    let bytes = tty.read_reply(deadline, timeout)?;
    drop(tty);

    let reply = String::from_utf8_lossy(&bytes);
    trace!(?query, reply = reply.as_ref(), "color query round-trip");
    parse_osc_color(&reply).ok_or_else(|| ConsoleError::MalformedReply(reply.into_owned()))
}

#[cfg(not(unix))]
fn query_color_tty(_query: ColorQuery, _timeout: Duration) -> Result<(u8, u8, u8), ConsoleError> {
    Err(ConsoleError::Unsupported("color queries need a POSIX tty"))
}

/// The controlling terminal, held open in no-echo non-canonical mode.
/// Dropping it restores the saved termios and closes the fd.
#[cfg(unix)]
struct RawTty {
    fd: libc::c_int,
    saved: libc::termios,
}

#[cfg(unix)]
impl RawTty {
    fn open() -> io::Result<Self> {
        let fd = unsafe { libc::open(DEV_TTY.as_ptr().cast(), libc::O_RDWR | libc::O_CLOEXEC) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut saved) } != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }

        let mut raw = saved;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(err);
        }

        Ok(Self { fd, saved })
    }

    fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        let mut written = 0;
        while written < bytes.len() {
            let n = unsafe {
                libc::write(
                    self.fd,
                    bytes[written..].as_ptr().cast(),
                    bytes.len() - written,
                )
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            #[allow(clippy::cast_sign_loss)] // n >= 0 checked above
            {
                written += n as usize;
            }
        }
        Ok(())
    }

    /// Reads one reply, byte at a time, until a BEL or ST terminator or
    /// the deadline. Byte-wise reads keep us from swallowing input that
    /// belongs to whatever runs after the query.
    fn read_reply(&self, deadline: Instant, timeout: Duration) -> Result<Vec<u8>, ConsoleError> {
        let mut reply = Vec::with_capacity(32);
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Err(ConsoleError::Timeout { waited: timeout });
            }
            let remaining = deadline - now;
            let wait_ms = i32::try_from(remaining.as_millis())
                .unwrap_or(i32::MAX)
                .max(1);

            let mut pfd = libc::pollfd {
                fd: self.fd,
                events: libc::POLLIN,
                revents: 0,
            };
            let ready = unsafe { libc::poll(&raw mut pfd, 1, wait_ms) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }
            if ready == 0 {
                return Err(ConsoleError::Timeout { waited: timeout });
            }

            let mut byte = 0u8;
            let n = unsafe { libc::read(self.fd, (&raw mut byte).cast(), 1) };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err.into());
            }
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "terminal closed mid-reply",
                )
                .into());
            }

            reply.push(byte);
            if reply.ends_with(b"\x07") || reply.ends_with(b"\x1b\\") {
                return Ok(reply);
            }
            if reply.len() > MAX_REPLY_BYTES {
                return Err(ConsoleError::MalformedReply(
                    String::from_utf8_lossy(&reply).into_owned(),
                ));
            }
        }
    }
}

#[cfg(unix)]
impl Drop for RawTty {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSANOW, &raw const self.saved);
            libc::close(self.fd);
        }
    }
}

// ─── Reply parsing ──────────────────────────────────────────────────────────

/// Extracts an 8-bit RGB triple from an X-resource style color reply
/// (`… rgb:RRRR/GGGG/BBBB …`). Components may be 1–4 hex digits and are
/// scaled to 8 bits. Returns `None` for anything else.
fn parse_osc_color(reply: &str) -> Option<(u8, u8, u8)> {
    let start = reply.find("rgb:")? + 4;
    let rest = reply[start..]
        .trim_end_matches('\x07')
        .trim_end_matches("\x1b\\");
    let mut parts = rest.splitn(3, '/');
    let r = scale_component(parts.next()?)?;
    let g = scale_component(parts.next()?)?;
    let b = scale_component(parts.next()?)?;
    Some((r, g, b))
}

/// Scales a 1–4 digit hex component to 8 bits with rounding, so `ffff`
/// maps to 255 and `8` (out of 15) to 136.
fn scale_component(hex: &str) -> Option<u8> {
    if hex.is_empty() || hex.len() > 4 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    let max = (1u32 << (4 * hex.len())) - 1;
    #[allow(clippy::cast_possible_truncation)] // value <= max keeps the result in 0..=255
    Some(((value * 255 + max / 2) / max) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ─── Reply parsing ───────────────────────────────────────────

    #[test]
    fn parses_bel_terminated_replies() {
        assert_eq!(
            parse_osc_color("\x1b]11;rgb:0000/0000/0000\x07"),
            Some((0, 0, 0))
        );
        assert_eq!(
            parse_osc_color("\x1b]10;rgb:ffff/ffff/ffff\x07"),
            Some((255, 255, 255))
        );
    }

    #[test]
    fn parses_st_terminated_replies() {
        assert_eq!(
            parse_osc_color("\x1b]11;rgb:dead/beef/cafe\x1b\\"),
            Some((222, 190, 202))
        );
    }

    #[test]
    fn parses_palette_slot_replies() {
        assert_eq!(
            parse_osc_color("\x1b]4;5;rgb:cdcd/0000/cdcd\x07"),
            Some((205, 0, 205))
        );
    }

    #[test]
    fn scales_short_components() {
        // One digit scales out of 15, two digits pass through.
        assert_eq!(parse_osc_color("rgb:8/8/8"), Some((136, 136, 136)));
        assert_eq!(parse_osc_color("rgb:80/80/80"), Some((128, 128, 128)));
        assert_eq!(parse_osc_color("rgb:fff/000/fff"), Some((255, 0, 255)));
    }

    #[test]
    fn rejects_garbage_replies() {
        assert_eq!(parse_osc_color(""), None);
        assert_eq!(parse_osc_color("\x1b]11;?\x07"), None);
        assert_eq!(parse_osc_color("rgb:zz/00/00"), None);
        assert_eq!(parse_osc_color("rgb:12345/00/00"), None);
        assert_eq!(parse_osc_color("rgb:00/00"), None);
        assert_eq!(parse_osc_color("rgb://"), None);
        assert_eq!(parse_osc_color("rgb:aa/bb/cc/dd"), None);
    }

    #[test]
    fn scale_component_rounds() {
        assert_eq!(scale_component("ffff"), Some(255));
        assert_eq!(scale_component("0"), Some(0));
        assert_eq!(scale_component("8"), Some(136));
        assert_eq!(scale_component("cd00"), Some(205));
        assert_eq!(scale_component(""), None);
    }

    // ─── Live console ────────────────────────────────────────────

    #[test]
    fn reports_missing_register_console_as_permanent() {
        let console = TtyConsole::new();
        assert!(console.raw_color_state().is_err_and(|e| e.is_permanent()));
        assert!(console.enable_vt().is_err_and(|e| e.is_permanent()));
        assert!(console.title().is_err_and(|e| e.is_permanent()));
        assert!(console.os_version().is_none());
    }

    #[test]
    fn non_interactive_output_refuses_escape_writes() {
        let console = TtyConsole::new();
        if console.is_output_interactive() {
            // Running under a real terminal; the refusal path is not
            // reachable here.
            return;
        }
        assert!(matches!(
            console.set_title("x"),
            Err(ConsoleError::Unsupported(_))
        ));
        assert!(matches!(console.clear(), Err(ConsoleError::Unsupported(_))));
        assert!(matches!(
            console.set_cursor_position(1, 1),
            Err(ConsoleError::Unsupported(_))
        ));
        assert!(matches!(
            console.query_color(ColorQuery::Background, Duration::from_millis(1)),
            Err(ConsoleError::Unsupported(_))
        ));
    }
}
