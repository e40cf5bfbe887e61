// SPDX-License-Identifier: MIT
//
// sense-console — platform console access for termsense.
//
// The one crate in the workspace that touches the operating system. It
// defines the narrow backend trait the decision layers program against,
// the value types that cross it, and two implementations: the live
// terminal (syscalls and OSC escape round-trips) and a scripted
// in-memory console for deterministic tests.
//
// Decision code never calls a platform API directly. Everything it can
// learn about the console arrives through `backend::Console`, so the
// whole detection pipeline runs unchanged against canned state — the
// same way it runs against real hardware.

pub mod backend;
pub mod error;
pub mod script;
pub mod state;
pub mod tty;
