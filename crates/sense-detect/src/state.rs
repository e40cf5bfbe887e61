//! Console state queries — active colors, cursor position, theme.
//!
//! Everything here reads live state through the console seam and
//! translates raw platform values into terminal conventions: attribute
//! nibbles become ANSI color slots, zero-based cursor coordinates become
//! 1-based ones, and a handful of background signals become a dark/light
//! verdict.
//!
//! The theme guess deserves a note: it is evidence on top of heuristics,
//! so it returns a verdict rather than a `Result`. Missing state is an
//! ordinary outcome ([`ThemeVerdict::Unknown`]), never a failure.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use sense_console::backend::Console;
use sense_console::error::ConsoleError;
use sense_console::state::{ColorQuery, ColorTarget, RawConsoleState};
use sense_palette::{AnsiIndex, ColorRegister, PaletteTable, order};

/// Foreground color id lives in the low nibble of the attribute word.
const FOREGROUND_MASK: u16 = 0x000F;
/// Background color id lives in the next nibble up.
const BACKGROUND_MASK: u16 = 0x00F0;
const BACKGROUND_SHIFT: u16 = 4;

/// Backgrounds with luma below this midpoint read as dark.
const LUMINANCE_SPLIT: u32 = 128;

/// Whether the terminal background looks dark, light, or undecidable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeVerdict {
    Dark,
    Light,
    Unknown,
}

impl fmt::Display for ThemeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Unknown => "unknown",
        })
    }
}

/// Extracts one color id from a raw attribute word and translates it to
/// ANSI order.
///
/// Pure and total: each target reads only its own nibble, so any bits
/// outside it — blink, underline, whatever the platform packs there —
/// cannot influence the result.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // nibble masks keep both casts in 0..=15
pub const fn color_id_from_attributes(target: ColorTarget, attributes: u16) -> AnsiIndex {
    let register = match target {
        ColorTarget::Foreground => ColorRegister::from_nibble((attributes & FOREGROUND_MASK) as u8),
        ColorTarget::Background => {
            ColorRegister::from_nibble(((attributes & BACKGROUND_MASK) >> BACKGROUND_SHIFT) as u8)
        }
    };
    order::to_ansi(register)
}

/// Converts a raw zero-based cursor position to the 1-based convention
/// terminals report, clamping negative coordinates to the origin.
#[must_use]
pub fn cursor_from_state(state: &RawConsoleState) -> (u16, u16) {
    #[allow(clippy::cast_sign_loss)] // max(0) guarantees non-negative
    let one_based = |raw: i16| raw.max(0) as u16 + 1;
    (one_based(state.cursor_x), one_based(state.cursor_y))
}

/// Integer Rec. 601 luma, 0–255.
fn luminance(rgb: (u8, u8, u8)) -> u32 {
    let (r, g, b) = rgb;
    (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000
}

/// Decides a theme from a `FG;BG` hint string.
///
/// The background component is compared *lexically* against `"8"`,
/// matching the convention consumers of this hint settled on long ago —
/// including its quirk: a two-digit id like `"10"` sorts below `"8"` and
/// reads as dark. A hint with no separator has an empty background,
/// which also reads as dark.
fn theme_from_hint(hint: &str) -> ThemeVerdict {
    let background = match hint.split_once(';') {
        Some((_, background)) => background,
        None => "",
    };
    if background < "8" {
        ThemeVerdict::Dark
    } else {
        ThemeVerdict::Light
    }
}

/// Reads live console state through a [`Console`] backend.
///
/// Optionally carries the palette table detection chose, which lets
/// color queries answer instantly from the register snapshot instead of
/// a terminal round-trip.
pub struct StateQuery<'a> {
    console: &'a dyn Console,
    palette: Option<&'a PaletteTable>,
}

impl<'a> StateQuery<'a> {
    #[must_use]
    pub fn new(console: &'a dyn Console) -> Self {
        Self {
            console,
            palette: None,
        }
    }

    /// Uses `palette` to resolve register colors to RGB. Pass the table
    /// detection chose so both layers agree on what "red" means.
    #[must_use]
    pub const fn with_palette(mut self, palette: &'a PaletteTable) -> Self {
        self.palette = Some(palette);
        self
    }

    /// The active color id for `target`, in ANSI order.
    ///
    /// # Errors
    ///
    /// Propagates the backend error when no register snapshot exists.
    pub fn color_id(&self, target: ColorTarget) -> Result<AnsiIndex, ConsoleError> {
        let state = self.console.raw_color_state()?;
        Ok(color_id_from_attributes(target, state.attributes))
    }

    /// The cursor position, 1-based: the top-left cell is `(1, 1)`.
    ///
    /// # Errors
    ///
    /// Propagates the backend error when no register snapshot exists.
    pub fn cursor_position(&self) -> Result<(u16, u16), ConsoleError> {
        Ok(cursor_from_state(&self.console.raw_color_state()?))
    }

    /// The concrete RGB of the active foreground or background.
    ///
    /// Answered from the register snapshot and the configured palette
    /// when both exist; otherwise by asking the terminal over the
    /// control channel, waiting at most `timeout` for the reply.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Unsupported`] when output is not an interactive
    /// terminal (the query path writes escape sequences, which must
    /// never land in a pipe), [`ConsoleError::Timeout`] when the
    /// terminal stays silent, and [`ConsoleError::MalformedReply`] when
    /// the answer cannot be parsed.
    pub fn color(
        &self,
        target: ColorTarget,
        timeout: Duration,
    ) -> Result<(u8, u8, u8), ConsoleError> {
        if !self.console.is_output_interactive() {
            return Err(ConsoleError::Unsupported(
                "output is not an interactive terminal",
            ));
        }
        if let Some(palette) = self.palette {
            if let Ok(state) = self.console.raw_color_state() {
                let id = color_id_from_attributes(target, state.attributes);
                return Ok(palette.color(id));
            }
        }
        self.console.query_color(ColorQuery::from(target), timeout)
    }

    /// Guesses whether the terminal background is dark or light.
    ///
    /// Evidence is tried in order of trustworthiness: an explicit `FG;BG`
    /// hint, then the register background id (dark half means dark), and
    /// finally — on interactive output only — a background color query
    /// judged by luma. Empty hints count as absent. Exhausted evidence is
    /// [`ThemeVerdict::Unknown`], never an error.
    #[must_use]
    pub fn theme(&self, hint: Option<&str>, timeout: Duration) -> ThemeVerdict {
        if let Some(hint) = hint.filter(|hint| !hint.is_empty()) {
            let verdict = theme_from_hint(hint);
            debug!(hint, %verdict, "theme decided from hint");
            return verdict;
        }

        if let Ok(state) = self.console.raw_color_state() {
            let background = color_id_from_attributes(ColorTarget::Background, state.attributes);
            let verdict = if background.is_dark() {
                ThemeVerdict::Dark
            } else {
                ThemeVerdict::Light
            };
            debug!(%background, %verdict, "theme decided from register background");
            return verdict;
        }

        if self.console.is_output_interactive() {
            if let Ok(rgb) = self.console.query_color(ColorQuery::Background, timeout) {
                let luma = luminance(rgb);
                let verdict = if luma < LUMINANCE_SPLIT {
                    ThemeVerdict::Dark
                } else {
                    ThemeVerdict::Light
                };
                debug!(?rgb, luma, %verdict, "theme decided from background query");
                return verdict;
            }
        }

        ThemeVerdict::Unknown
    }
}
