// SPDX-License-Identifier: MIT
//
// Value types crossing the console boundary.
//
// Everything here is a plain snapshot or request — no handles, no I/O.
// The backend trait traffics exclusively in these types so that decision
// code above it never touches a platform API directly.

use std::fmt;

// ─── Color requests ─────────────────────────────────────────────────────────

/// Which half of a character attribute a color id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTarget {
    Foreground,
    Background,
}

/// What to ask the terminal for in a color query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorQuery {
    /// The default foreground color (OSC 10).
    Foreground,
    /// The default background color (OSC 11).
    Background,
    /// A specific slot of the extended palette (OSC 4).
    Index(u8),
}

impl From<ColorTarget> for ColorQuery {
    fn from(target: ColorTarget) -> Self {
        match target {
            ColorTarget::Foreground => Self::Foreground,
            ColorTarget::Background => Self::Background,
        }
    }
}

// ─── VT switching ───────────────────────────────────────────────────────────

/// Outcome of requesting VT escape processing on one output stream.
///
/// A fresh enable and a no-op are reported distinctly so callers can tell
/// whether they changed console state, but both count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VtSwitch {
    /// The processing flag was newly set on this stream.
    Enabled,
    /// The flag was already set; nothing changed.
    AlreadyEnabled,
    /// The stream rejected the mode change.
    Refused,
}

impl VtSwitch {
    /// Whether VT processing is active on the stream after the request.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Refused)
    }
}

impl fmt::Display for VtSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enabled => "enabled",
            Self::AlreadyEnabled => "already enabled",
            Self::Refused => "refused",
        })
    }
}

/// Per-stream outcomes of a VT enable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VtReport {
    pub stdout: VtSwitch,
    pub stderr: VtSwitch,
}

impl VtReport {
    /// True when VT processing is active on both streams, whether freshly
    /// switched or already on.
    #[must_use]
    pub const fn all_enabled(self) -> bool {
        self.stdout.is_enabled() && self.stderr.is_enabled()
    }
}

// ─── Console snapshots ──────────────────────────────────────────────────────

/// Raw screen-buffer state as the console reports it.
///
/// `attributes` packs the active colors into nibbles: foreground in bits
/// 0–3, background in bits 4–7, both in register order. Cursor coordinates
/// are zero-based, straight from the platform; the state-query layer
/// converts them to the 1-based convention terminals use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawConsoleState {
    pub attributes: u16,
    pub cursor_x: i16,
    pub cursor_y: i16,
}

/// Version of the hosting console subsystem.
///
/// The build number bands which default palette the host ships and whether
/// it understands VT sequences at all. Platforms without a versioned
/// console host report no version, which detection treats as "assume
/// standard terminal defaults".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl OsVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}
