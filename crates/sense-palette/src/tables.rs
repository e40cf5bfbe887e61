//! Built-in 16-color palette tables.
//!
//! Each table pins down the concrete RGB values a terminal family renders
//! for the sixteen basic slots, in ANSI order. Slots 0–7 hold the dark
//! variants and 8–15 the bright variants of the same hues, so a table is
//! really two related halves.
//!
//! The tables are plain immutable data. Detection picks one of them (see
//! the capability detector), and callers may also pass one in explicitly
//! when they already know what hardware they are talking to.

use crate::order::AnsiIndex;

/// An immutable basic palette: one RGB triple per ANSI slot, exactly 16.
///
/// The fixed-size array makes the length invariant structural — there is
/// no way to build a table with a missing or extra slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    colors: [(u8, u8, u8); 16],
}

impl PaletteTable {
    /// Wraps sixteen RGB triples, ordered by ANSI slot number.
    #[must_use]
    pub const fn new(colors: [(u8, u8, u8); 16]) -> Self {
        Self { colors }
    }

    /// The RGB value rendered for `index`. Total: every valid slot has a
    /// color.
    #[must_use]
    pub const fn color(&self, index: AnsiIndex) -> (u8, u8, u8) {
        self.colors[index.get() as usize]
    }

    /// The dark half of the table, slots 0–7.
    #[must_use]
    pub fn dark(&self) -> &[(u8, u8, u8)] {
        &self.colors[..8]
    }

    /// The bright half of the table, slots 8–15.
    #[must_use]
    pub fn bright(&self) -> &[(u8, u8, u8)] {
        &self.colors[8..]
    }

    /// Iterates the table in slot order, yielding each slot with its RGB
    /// value.
    pub fn iter(&self) -> impl Iterator<Item = (AnsiIndex, (u8, u8, u8))> + '_ {
        AnsiIndex::ALL.into_iter().zip(self.colors.iter().copied())
    }

    /// The slot whose color sits closest to `rgb` by squared Euclidean
    /// distance. Ties resolve to the lowest slot number.
    #[must_use]
    pub fn nearest(&self, rgb: (u8, u8, u8)) -> AnsiIndex {
        let mut best = AnsiIndex::BLACK;
        let mut best_distance = u32::MAX;
        for (index, candidate) in self.iter() {
            let distance = distance_squared(candidate, rgb);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        best
    }
}

fn distance_squared(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let dr = u32::from(a.0.abs_diff(b.0));
    let dg = u32::from(a.1.abs_diff(b.1));
    let db = u32::from(a.2.abs_diff(b.2));
    dr * dr + dg * dg + db * db
}

/// The xterm defaults. Also the safe fallback whenever local palette
/// evidence is missing or untrustworthy (remote sessions, unknown hosts).
pub static XTERM: PaletteTable = PaletteTable::new([
    (0, 0, 0),       //  0 black
    (205, 0, 0),     //  1 red
    (0, 205, 0),     //  2 green
    (205, 205, 0),   //  3 yellow
    (0, 0, 238),     //  4 blue
    (205, 0, 205),   //  5 magenta
    (0, 205, 205),   //  6 cyan
    (229, 229, 229), //  7 white
    (127, 127, 127), //  8 bright black
    (255, 0, 0),     //  9 bright red
    (0, 255, 0),     // 10 bright green
    (255, 255, 0),   // 11 bright yellow
    (92, 92, 255),   // 12 bright blue
    (255, 0, 255),   // 13 bright magenta
    (0, 255, 255),   // 14 bright cyan
    (255, 255, 255), // 15 bright white
]);

/// The register-console palette used for decades before the refresh:
/// half-intensity dark slots, full-intensity bright slots.
pub static CONSOLE_LEGACY: PaletteTable = PaletteTable::new([
    (0, 0, 0),       //  0 black
    (128, 0, 0),     //  1 red
    (0, 128, 0),     //  2 green
    (128, 128, 0),   //  3 yellow
    (0, 0, 128),     //  4 blue
    (128, 0, 128),   //  5 magenta
    (0, 128, 128),   //  6 cyan
    (192, 192, 192), //  7 white
    (128, 128, 128), //  8 bright black
    (255, 0, 0),     //  9 bright red
    (0, 255, 0),     // 10 bright green
    (255, 255, 0),   // 11 bright yellow
    (0, 0, 255),     // 12 bright blue
    (255, 0, 255),   // 13 bright magenta
    (0, 255, 255),   // 14 bright cyan
    (255, 255, 255), // 15 bright white
]);

/// The refreshed register-console palette (the "Campbell" scheme) shipped
/// with newer console hosts.
pub static CONSOLE_MODERN: PaletteTable = PaletteTable::new([
    (12, 12, 12),    //  0 black
    (197, 15, 31),   //  1 red
    (19, 161, 14),   //  2 green
    (193, 156, 0),   //  3 yellow
    (0, 55, 218),    //  4 blue
    (136, 23, 152),  //  5 magenta
    (58, 150, 221),  //  6 cyan
    (204, 204, 204), //  7 white
    (118, 118, 118), //  8 bright black
    (231, 72, 86),   //  9 bright red
    (22, 198, 12),   // 10 bright green
    (249, 241, 165), // 11 bright yellow
    (59, 120, 255),  // 12 bright blue
    (180, 0, 158),   // 13 bright magenta
    (97, 214, 214),  // 14 bright cyan
    (242, 242, 242), // 15 bright white
]);

/// The classic PC text-mode palette: 2/3 intensity dark slots with the
/// traditional brown in place of dark yellow.
pub static VGA: PaletteTable = PaletteTable::new([
    (0, 0, 0),       //  0 black
    (170, 0, 0),     //  1 red
    (0, 170, 0),     //  2 green
    (170, 85, 0),    //  3 yellow (brown)
    (0, 0, 170),     //  4 blue
    (170, 0, 170),   //  5 magenta
    (0, 170, 170),   //  6 cyan
    (170, 170, 170), //  7 white
    (85, 85, 85),    //  8 bright black
    (255, 85, 85),   //  9 bright red
    (85, 255, 85),   // 10 bright green
    (255, 255, 85),  // 11 bright yellow
    (85, 85, 255),   // 12 bright blue
    (255, 85, 255),  // 13 bright magenta
    (85, 255, 255),  // 14 bright cyan
    (255, 255, 255), // 15 bright white
]);

/// The GNOME Tango palette, common across Linux desktop terminals.
pub static TANGO: PaletteTable = PaletteTable::new([
    (0, 0, 0),       //  0 black
    (204, 0, 0),     //  1 red
    (78, 154, 6),    //  2 green
    (196, 160, 0),   //  3 yellow
    (52, 101, 164),  //  4 blue
    (117, 80, 123),  //  5 magenta
    (6, 152, 154),   //  6 cyan
    (211, 215, 207), //  7 white
    (85, 87, 83),    //  8 bright black
    (239, 41, 41),   //  9 bright red
    (138, 226, 52),  // 10 bright green
    (252, 233, 79),  // 11 bright yellow
    (114, 159, 207), // 12 bright blue
    (173, 127, 168), // 13 bright magenta
    (52, 226, 226),  // 14 bright cyan
    (238, 238, 236), // 15 bright white
]);

/// Solarized Dark mapped onto the basic slots. The bright half carries the
/// scheme's base tones rather than literal brighter hues, as the scheme
/// defines it.
pub static SOLARIZED_DARK: PaletteTable = PaletteTable::new([
    (7, 54, 66),     //  0 black   (base02)
    (220, 50, 47),   //  1 red
    (133, 153, 0),   //  2 green
    (181, 137, 0),   //  3 yellow
    (38, 139, 210),  //  4 blue
    (211, 54, 130),  //  5 magenta
    (42, 161, 152),  //  6 cyan
    (238, 232, 213), //  7 white   (base2)
    (0, 43, 54),     //  8 bright black   (base03)
    (203, 75, 22),   //  9 bright red     (orange)
    (88, 110, 117),  // 10 bright green   (base01)
    (101, 123, 131), // 11 bright yellow  (base00)
    (131, 148, 150), // 12 bright blue    (base0)
    (108, 113, 196), // 13 bright magenta (violet)
    (147, 161, 161), // 14 bright cyan    (base1)
    (253, 246, 227), // 15 bright white   (base3)
]);
