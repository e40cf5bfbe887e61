// SPDX-License-Identifier: MIT
//
// Scripted console — a deterministic in-memory backend.
//
// Detection and state-query logic is exercised against this instead of a
// live terminal: the test scripts exactly what the "platform" reports
// (attributes, VT outcomes, host version, canned color replies), and the
// console records every side-effecting call so tests can assert not just
// results but which calls were made — or, as importantly, not made.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::backend::Console;
use crate::error::ConsoleError;
use crate::state::{ColorQuery, OsVersion, RawConsoleState, VtReport};

/// A side-effecting call observed by the scripted console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedEvent {
    VtRequested,
    ColorQueried(ColorQuery),
    TitleSet(String),
    CursorMoved { x: u16, y: u16 },
    Cleared,
}

/// An in-memory console with fully scripted behavior.
///
/// Starts detached: not interactive, no register console, no VT switch,
/// no host version. Builder methods add capabilities one at a time, so a
/// test states exactly the platform it means and nothing more.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    raw_state: Option<RawConsoleState>,
    vt_report: Option<VtReport>,
    os_version: Option<OsVersion>,
    interactive: bool,
    title: RefCell<Option<String>>,
    color_replies: RefCell<VecDeque<(u8, u8, u8)>>,
    events: RefCell<Vec<ScriptedEvent>>,
}

impl ScriptedConsole {
    /// A fully detached console: nothing supported, nothing attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the raw screen-buffer snapshot.
    #[must_use]
    pub fn with_raw_state(mut self, state: RawConsoleState) -> Self {
        self.raw_state = Some(state);
        self
    }

    /// Scripts just the attribute word, keeping any scripted cursor.
    #[must_use]
    pub fn with_attributes(mut self, attributes: u16) -> Self {
        let mut state = self.raw_state.unwrap_or_default();
        state.attributes = attributes;
        self.raw_state = Some(state);
        self
    }

    /// Scripts just the raw cursor, keeping any scripted attributes.
    #[must_use]
    pub fn with_cursor(mut self, x: i16, y: i16) -> Self {
        let mut state = self.raw_state.unwrap_or_default();
        state.cursor_x = x;
        state.cursor_y = y;
        self.raw_state = Some(state);
        self
    }

    /// Scripts the outcome of VT enable requests.
    #[must_use]
    pub fn with_vt_report(mut self, report: VtReport) -> Self {
        self.vt_report = Some(report);
        self
    }

    /// Scripts the console host version.
    #[must_use]
    pub fn with_os_version(mut self, version: OsVersion) -> Self {
        self.os_version = Some(version);
        self
    }

    /// Scripts a host version with the given build number.
    #[must_use]
    pub fn with_build(self, build: u32) -> Self {
        self.with_os_version(OsVersion::new(10, 0, build))
    }

    /// Marks output as attached to an interactive terminal (or not).
    #[must_use]
    pub const fn interactive(mut self, yes: bool) -> Self {
        self.interactive = yes;
        self
    }

    /// Queues one reply for a future color query. Replies are consumed
    /// in order; a query with no reply left times out.
    #[must_use]
    pub fn with_color_reply(self, rgb: (u8, u8, u8)) -> Self {
        self.color_replies.borrow_mut().push_back(rgb);
        self
    }

    /// Scripts the current window title.
    #[must_use]
    pub fn with_title(self, title: &str) -> Self {
        *self.title.borrow_mut() = Some(title.to_owned());
        self
    }

    /// Every side-effecting call made so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<ScriptedEvent> {
        self.events.borrow().clone()
    }

    /// Number of scripted color replies not yet consumed.
    #[must_use]
    pub fn replies_remaining(&self) -> usize {
        self.color_replies.borrow().len()
    }

    fn record(&self, event: ScriptedEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Console for ScriptedConsole {
    fn raw_color_state(&self) -> Result<RawConsoleState, ConsoleError> {
        self.raw_state
            .ok_or(ConsoleError::Unsupported("no register console scripted"))
    }

    fn enable_vt(&self) -> Result<VtReport, ConsoleError> {
        self.record(ScriptedEvent::VtRequested);
        self.vt_report
            .ok_or(ConsoleError::Unsupported("no VT switch scripted"))
    }

    fn os_version(&self) -> Option<OsVersion> {
        self.os_version
    }

    fn is_output_interactive(&self) -> bool {
        self.interactive
    }

    fn query_color(
        &self,
        query: ColorQuery,
        timeout: Duration,
    ) -> Result<(u8, u8, u8), ConsoleError> {
        self.record(ScriptedEvent::ColorQueried(query));
        if !self.interactive {
            return Err(ConsoleError::Unsupported(
                "output is not an interactive terminal",
            ));
        }
        self.color_replies
            .borrow_mut()
            .pop_front()
            .ok_or(ConsoleError::Timeout { waited: timeout })
    }

    fn title(&self) -> Result<String, ConsoleError> {
        self.title
            .borrow()
            .clone()
            .ok_or(ConsoleError::Unsupported("no title scripted"))
    }

    fn set_title(&self, title: &str) -> Result<(), ConsoleError> {
        self.record(ScriptedEvent::TitleSet(title.to_owned()));
        *self.title.borrow_mut() = Some(title.to_owned());
        Ok(())
    }

    fn set_cursor_position(&self, x: u16, y: u16) -> Result<(), ConsoleError> {
        self.record(ScriptedEvent::CursorMoved { x, y });
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        self.record(ScriptedEvent::Cleared);
        Ok(())
    }
}
