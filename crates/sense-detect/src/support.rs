//! Color support levels.
//!
//! The four-rung ladder every terminal lands on somewhere. Levels are
//! totally ordered so detection rules can upgrade with a plain `max` and
//! never need to reason about downgrades.

use std::fmt;

/// How much color the attached terminal understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ColorSupport {
    /// No color evidence at all; emit plain text.
    #[default]
    None,
    /// The sixteen basic colors.
    Basic,
    /// The 256-color extended palette.
    Extended,
    /// Direct 24-bit RGB.
    Truecolor,
}

impl ColorSupport {
    /// Any color at all?
    #[must_use]
    pub const fn is_colored(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Can the terminal address the 256-color palette?
    #[must_use]
    pub const fn has_extended(self) -> bool {
        matches!(self, Self::Extended | Self::Truecolor)
    }

    /// Can the terminal render arbitrary RGB?
    #[must_use]
    pub const fn has_truecolor(self) -> bool {
        matches!(self, Self::Truecolor)
    }
}

impl fmt::Display for ColorSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Extended => "extended",
            Self::Truecolor => "truecolor",
        })
    }
}
