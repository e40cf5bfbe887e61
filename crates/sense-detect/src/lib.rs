//! # sense-detect — terminal capability detection
//!
//! Answers the questions no single platform API answers directly: *how
//! much color does the attached terminal actually support*, *which RGB
//! values does its basic palette render*, and *what state is the console
//! in right now*.
//!
//! # Architecture
//!
//! ```text
//! signals.rs:  DetectionSignals — immutable evidence snapshot
//!     │
//!     ▼
//! detect.rs:   upgrade-only rule ladder
//!              → Detection (support level + palette + source)
//!     │
//!     ▼
//! state.rs:    StateQuery — active colors, cursor, theme verdict
//! ```
//!
//! Decision logic is pure over the snapshot; the only platform call the
//! ladder makes is the VT enable probe, and it goes through the
//! [`sense_console::backend::Console`] seam like everything else. Hand
//! any layer a scripted console and every path runs deterministically.

pub mod detect;
pub mod signals;
pub mod state;
pub mod support;

pub use detect::{
    Detection, Detector, MODERN_PALETTE_BUILD, NamedColorLookup, PaletteSource, VT_CAPABLE_BUILD,
};
pub use signals::DetectionSignals;
pub use state::{StateQuery, ThemeVerdict};
pub use support::ColorSupport;
