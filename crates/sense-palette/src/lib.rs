//! # sense-palette — basic-palette data and color-order translation
//!
//! The foundation layer of termsense: everything here is plain data and
//! pure functions, with no platform calls and no I/O.
//!
//! # Architecture
//!
//! ```text
//! order.rs:   ColorRegister ↔ AnsiIndex, one involutive swap table
//!     │
//!     ▼
//! tables.rs:  PaletteTable + the built-in 16-color tables
//!             (xterm, console legacy/modern, VGA, Tango, Solarized)
//! ```
//!
//! Higher layers pick a table (capability detection) and translate raw
//! register ids into ANSI slots (console state queries). Both operations
//! are total over validated inputs, so neither can fail at runtime.

pub mod order;
pub mod tables;

pub use order::{AnsiIndex, ColorRegister, OutOfRange, to_ansi, to_register};
pub use tables::PaletteTable;
