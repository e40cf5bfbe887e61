// SPDX-License-Identifier: MIT
//
// The console backend trait.
//
// This is the single seam between decision code and the platform. The
// real terminal implements it with syscalls and escape-sequence queries
// (tty.rs); tests implement it with scripted canned state (script.rs).
// Decision layers hold a `&dyn Console` and never know which they got.

use std::time::Duration;

use crate::error::ConsoleError;
use crate::state::{ColorQuery, OsVersion, RawConsoleState, VtReport};

/// Platform console access, as a narrow capability interface.
///
/// Implementations must be side-effect free on the query methods: calling
/// [`Console::raw_color_state`] or [`Console::os_version`] any number of
/// times observes state without changing it. [`Console::enable_vt`] is the
/// one deliberate mutation, and it is idempotent — re-enabling reports
/// [`VtSwitch::AlreadyEnabled`] rather than failing.
///
/// [`VtSwitch::AlreadyEnabled`]: crate::state::VtSwitch::AlreadyEnabled
pub trait Console {
    /// Snapshot of the screen-buffer attributes and cursor, in raw
    /// platform form.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Unsupported`] when the platform has no register
    /// console to read.
    fn raw_color_state(&self) -> Result<RawConsoleState, ConsoleError>;

    /// Ask the console to interpret VT escape sequences on both output
    /// streams, reporting the per-stream outcome.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Unsupported`] when the platform has no switchable
    /// console mode.
    fn enable_vt(&self) -> Result<VtReport, ConsoleError>;

    /// Version of the hosting console subsystem, or `None` when the
    /// platform has no versioned console host.
    fn os_version(&self) -> Option<OsVersion>;

    /// Whether output is attached to an interactive terminal. Queries
    /// that write escape sequences must be skipped when it is not.
    fn is_output_interactive(&self) -> bool;

    /// Ask the terminal for a color over the control channel, waiting at
    /// most `timeout` for the reply.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Unsupported`] when output is not interactive,
    /// [`ConsoleError::Timeout`] when the terminal stays silent, and
    /// [`ConsoleError::MalformedReply`] when the answer cannot be parsed.
    fn query_color(
        &self,
        query: ColorQuery,
        timeout: Duration,
    ) -> Result<(u8, u8, u8), ConsoleError>;

    /// The current window title.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Unsupported`] when the platform offers no title
    /// readback.
    fn title(&self) -> Result<String, ConsoleError>;

    /// Replace the window title.
    ///
    /// # Errors
    ///
    /// Propagates write failures; [`ConsoleError::Unsupported`] when
    /// output is not interactive.
    fn set_title(&self, title: &str) -> Result<(), ConsoleError>;

    /// Move the cursor to 1-based `(x, y)`, matching the coordinates
    /// reported by cursor queries. Values below 1 are clamped to 1.
    ///
    /// # Errors
    ///
    /// Propagates write failures; [`ConsoleError::Unsupported`] when
    /// output is not interactive.
    fn set_cursor_position(&self, x: u16, y: u16) -> Result<(), ConsoleError>;

    /// Clear the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Propagates write failures; [`ConsoleError::Unsupported`] when
    /// output is not interactive.
    fn clear(&self) -> Result<(), ConsoleError>;
}
