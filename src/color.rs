//! System color table
//!
//! A [`Color`] is an index into the fixed 64-entry console color table.
//! Sprites never store RGB directly: pixels pick a palette slot, palette
//! slots pick a `Color`, and only exporters turn a `Color` into RGB.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of entries in the system color table.
pub const COLOR_COUNT: usize = 64;

/// The 2C02 color table as RGB triples, indexed by [`Color`].
///
/// Entries `0x0D`, `0x0E`, `0x0F`, `0x1D..=0x1F`, `0x2E`, `0x2F`, `0x3E`
/// and `0x3F` all decode to black, so the table holds 55 distinct RGB values.
pub const NES_PALETTE: [[u8; 3]; COLOR_COUNT] = [
    [0x7C, 0x7C, 0x7C], [0x00, 0x00, 0xFC], [0x00, 0x00, 0xBC], [0x44, 0x28, 0xBC],
    [0x94, 0x00, 0x84], [0xA8, 0x00, 0x20], [0xA8, 0x10, 0x00], [0x88, 0x14, 0x00],
    [0x50, 0x30, 0x00], [0x00, 0x78, 0x00], [0x00, 0x68, 0x00], [0x00, 0x58, 0x00],
    [0x00, 0x40, 0x58], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xBC, 0xBC, 0xBC], [0x00, 0x78, 0xF8], [0x00, 0x58, 0xF8], [0x68, 0x44, 0xFC],
    [0xD8, 0x00, 0xCC], [0xE4, 0x00, 0x58], [0xF8, 0x38, 0x00], [0xE4, 0x5C, 0x10],
    [0xAC, 0x7C, 0x00], [0x00, 0xB8, 0x00], [0x00, 0xA8, 0x00], [0x00, 0xA8, 0x44],
    [0x00, 0x88, 0x88], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xF8, 0xF8, 0xF8], [0x3C, 0xBC, 0xFC], [0x68, 0x88, 0xFC], [0x98, 0x78, 0xF8],
    [0xF8, 0x78, 0xF8], [0xF8, 0x58, 0x98], [0xF8, 0x78, 0x58], [0xFC, 0xA0, 0x44],
    [0xF8, 0xB8, 0x00], [0xB8, 0xF8, 0x18], [0x58, 0xD8, 0x54], [0x58, 0xF8, 0x98],
    [0x00, 0xE8, 0xD8], [0x78, 0x78, 0x78], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
    [0xFC, 0xFC, 0xFC], [0xA4, 0xE4, 0xFC], [0xB8, 0xB8, 0xF8], [0xD8, 0xB8, 0xF8],
    [0xF8, 0xB8, 0xF8], [0xF8, 0xA4, 0xC0], [0xF0, 0xD0, 0xB0], [0xFC, 0xE0, 0xA8],
    [0xF8, 0xD8, 0x78], [0xD8, 0xF8, 0x78], [0xB8, 0xF8, 0xB8], [0xB8, 0xF8, 0xD8],
    [0x00, 0xFC, 0xFC], [0xF8, 0xD8, 0xF8], [0x00, 0x00, 0x00], [0x00, 0x00, 0x00],
];

/// Error type for color lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Index is past the end of the color table
    #[error("color index {0} is outside the {COLOR_COUNT}-entry color table")]
    OutOfRange(u16),
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// Well-formed hex that is not one of the table colors
    #[error("{0} is not a system color")]
    NotInTable(String),
}

/// An index into [`NES_PALETTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u8")]
pub struct Color(u8);

impl Color {
    /// Color `0x0F`, the canonical black.
    pub const BLACK: Color = Color(0x0F);

    /// Create a color from a table index.
    pub fn new(index: u8) -> Result<Self, ColorError> {
        if (index as usize) < COLOR_COUNT {
            Ok(Color(index))
        } else {
            Err(ColorError::OutOfRange(index as u16))
        }
    }

    /// The table index.
    pub fn index(self) -> u8 {
        self.0
    }

    /// RGB components from the color table.
    pub fn rgb(self) -> [u8; 3] {
        NES_PALETTE[self.0 as usize]
    }

    /// Opaque RGBA pixel for raster export.
    pub fn rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.rgb();
        Rgba([r, g, b, 255])
    }

    /// `#RRGGBB` representation used by vector export.
    pub fn hex(self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Find the first table entry with exactly this hex value.
    ///
    /// Accepts `#RGB` and `#RRGGBB`, case-insensitive.
    ///
    /// ```
    /// use chrsmith::color::Color;
    ///
    /// let white = Color::from_hex("#FCFCFC").unwrap();
    /// assert_eq!(white.index(), 0x30);
    /// assert_eq!(Color::from_hex("#000").unwrap(), Color::new(0x0D).unwrap());
    /// ```
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let rgb = parse_hex_rgb(s)?;
        NES_PALETTE
            .iter()
            .position(|entry| *entry == rgb)
            .map(|i| Color(i as u8))
            .ok_or_else(|| ColorError::NotInTable(s.to_string()))
    }

    /// Iterate over every table color in index order.
    pub fn all() -> impl Iterator<Item = Color> {
        (0..COLOR_COUNT as u8).map(Color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:02X}", self.0)
    }
}

impl TryFrom<u16> for Color {
    type Error = ColorError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (value as usize) < COLOR_COUNT {
            Ok(Color(value as u8))
        } else {
            Err(ColorError::OutOfRange(value))
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> u8 {
        color.0
    }
}

/// Parse `#RGB` / `#RRGGBB` into components.
fn parse_hex_rgb(s: &str) -> Result<[u8; 3], ColorError> {
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    for c in hex.chars() {
        if !c.is_ascii_hexdigit() {
            return Err(ColorError::InvalidHex(c));
        }
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        // #RGB -> #RRGGBB (doubled digits)
        3 => Ok([digits[0] * 17, digits[1] * 17, digits[2] * 17]),
        6 => Ok([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ]),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit already known to be valid.
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}
