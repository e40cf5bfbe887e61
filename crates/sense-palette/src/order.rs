//! Register ↔ ANSI color-order translation.
//!
//! Everyone agrees the basic palette has sixteen colors; nobody agrees on
//! how to number them. ANSI terminals count red=1, yellow=3, blue=4.
//! Register-style consoles store the same colors as IRGB bit fields, which
//! puts blue=1, cyan=3, red=4. The two orders differ only in pairs swapped
//! within each brightness half, so a single permutation table maps either
//! direction.
//!
//! ```text
//! register  0  1  2  3  4  5  6  7    8  9 10 11 12 13 14 15
//! ansi      0  4  2  6  1  5  3  7    8 12 10 14  9 13 11 15
//! ```
//!
//! Both [`ColorRegister`] and [`AnsiIndex`] are validated at construction,
//! so the translation functions are total: no slot can be out of range.

use thiserror::Error;

/// Error returned when a raw color id does not fit the 16-color range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("color id {value} is outside the 16-color range 0..=15")]
pub struct OutOfRange {
    /// The rejected value.
    pub value: u8,
}

/// A palette slot in *register* order (blue=1, red=4). Always `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorRegister(u8);

/// A palette slot in *ANSI* order (red=1, blue=4). Always `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnsiIndex(u8);

/// The shared permutation. Indexing with a register id yields the ANSI id;
/// because every swap is a 2-cycle (blue↔red, cyan↔yellow in each half),
/// indexing with an ANSI id yields the register id with the same table.
const ORDER_SWAP: [u8; 16] = [
    0, 4, 2, 6, 1, 5, 3, 7, // dark half
    8, 12, 10, 14, 9, 13, 11, 15, // bright half, same swaps
];

impl ColorRegister {
    pub const BLACK: Self = Self(0);
    pub const BLUE: Self = Self(1);
    pub const GREEN: Self = Self(2);
    pub const CYAN: Self = Self(3);
    pub const RED: Self = Self(4);
    pub const MAGENTA: Self = Self(5);
    pub const YELLOW: Self = Self(6);
    pub const GREY: Self = Self(7);

    /// All sixteen register slots in ascending order.
    pub const ALL: [Self; 16] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
        Self(9),
        Self(10),
        Self(11),
        Self(12),
        Self(13),
        Self(14),
        Self(15),
    ];

    /// Validates a raw id. Returns `None` above 15.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 15 { Some(Self(value)) } else { None }
    }

    /// Builds a register slot from the low nibble of `value`, ignoring the
    /// high bits. Total by construction; use [`Self::new`] to reject
    /// out-of-range input instead of masking it.
    #[must_use]
    pub const fn from_nibble(value: u8) -> Self {
        Self(value & 0x0F)
    }

    /// The raw slot number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Slots 0–7: the dark half of the palette.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        self.0 < 8
    }

    /// Slots 8–15: the bright half of the palette.
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self.0 >= 8
    }
}

impl TryFrom<u8> for ColorRegister {
    type Error = OutOfRange;

    fn try_from(value: u8) -> Result<Self, OutOfRange> {
        Self::new(value).ok_or(OutOfRange { value })
    }
}

impl AnsiIndex {
    pub const BLACK: Self = Self(0);
    pub const RED: Self = Self(1);
    pub const GREEN: Self = Self(2);
    pub const YELLOW: Self = Self(3);
    pub const BLUE: Self = Self(4);
    pub const MAGENTA: Self = Self(5);
    pub const CYAN: Self = Self(6);
    pub const WHITE: Self = Self(7);
    pub const BRIGHT_BLACK: Self = Self(8);
    pub const BRIGHT_RED: Self = Self(9);
    pub const BRIGHT_GREEN: Self = Self(10);
    pub const BRIGHT_YELLOW: Self = Self(11);
    pub const BRIGHT_BLUE: Self = Self(12);
    pub const BRIGHT_MAGENTA: Self = Self(13);
    pub const BRIGHT_CYAN: Self = Self(14);
    pub const BRIGHT_WHITE: Self = Self(15);

    /// All sixteen ANSI slots in ascending order.
    pub const ALL: [Self; 16] = [
        Self::BLACK,
        Self::RED,
        Self::GREEN,
        Self::YELLOW,
        Self::BLUE,
        Self::MAGENTA,
        Self::CYAN,
        Self::WHITE,
        Self::BRIGHT_BLACK,
        Self::BRIGHT_RED,
        Self::BRIGHT_GREEN,
        Self::BRIGHT_YELLOW,
        Self::BRIGHT_BLUE,
        Self::BRIGHT_MAGENTA,
        Self::BRIGHT_CYAN,
        Self::BRIGHT_WHITE,
    ];

    /// Validates a raw id. Returns `None` above 15.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 15 { Some(Self(value)) } else { None }
    }

    /// Builds an ANSI slot from the low nibble of `value`, ignoring the
    /// high bits. Total by construction; use [`Self::new`] to reject
    /// out-of-range input instead of masking it.
    #[must_use]
    pub const fn from_nibble(value: u8) -> Self {
        Self(value & 0x0F)
    }

    /// The raw slot number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Slots 0–7: the dark half of the palette.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        self.0 < 8
    }

    /// Slots 8–15: the bright half of the palette.
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self.0 >= 8
    }

    /// The dark-half counterpart of this slot (identity for slots 0–7).
    #[must_use]
    pub const fn base(self) -> Self {
        Self(self.0 & 0x07)
    }

    /// The bright-half counterpart of this slot (identity for slots 8–15).
    #[must_use]
    pub const fn brightened(self) -> Self {
        Self(self.0 | 0x08)
    }

    /// The conventional English name of this slot.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.0 {
            0 => "black",
            1 => "red",
            2 => "green",
            3 => "yellow",
            4 => "blue",
            5 => "magenta",
            6 => "cyan",
            7 => "white",
            8 => "bright black",
            9 => "bright red",
            10 => "bright green",
            11 => "bright yellow",
            12 => "bright blue",
            13 => "bright magenta",
            14 => "bright cyan",
            _ => "bright white",
        }
    }
}

impl TryFrom<u8> for AnsiIndex {
    type Error = OutOfRange;

    fn try_from(value: u8) -> Result<Self, OutOfRange> {
        Self::new(value).ok_or(OutOfRange { value })
    }
}

impl std::fmt::Display for AnsiIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Translates a register-order slot to its ANSI-order equivalent.
///
/// ```
/// use sense_palette::order::{AnsiIndex, ColorRegister, to_ansi};
///
/// // Register 1 is blue; ANSI numbers blue as 4.
/// assert_eq!(to_ansi(ColorRegister::BLUE), AnsiIndex::BLUE);
/// assert_eq!(to_ansi(ColorRegister::BLUE).get(), 4);
/// ```
#[must_use]
pub const fn to_ansi(register: ColorRegister) -> AnsiIndex {
    AnsiIndex(ORDER_SWAP[register.0 as usize])
}

/// Translates an ANSI-order slot back to register order.
///
/// Exact inverse of [`to_ansi`] over the whole range: translating any slot
/// there and back returns the original.
#[must_use]
pub const fn to_register(index: AnsiIndex) -> ColorRegister {
    ColorRegister(ORDER_SWAP[index.0 as usize])
}
