//! Palette slots, palettes and the four-palette bank
//!
//! Pixels hold a [`PaletteSlot`] (2 bits). A tile names one [`PaletteIndex`]
//! in the [`PaletteBank`], and that palette maps the slot to a system
//! [`Color`]. Slot 0 is always transparent: its stored color is kept for
//! round-tripping but is never used to draw a pixel.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error for out-of-range slot or palette numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette slot {0} is out of range (0-3)")]
    InvalidSlot(u8),
    #[error("palette index {0} is out of range (0-3)")]
    InvalidIndex(u8),
}

/// A 2-bit pixel value selecting one of the four palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PaletteSlot(u8);

impl PaletteSlot {
    /// Slot 0, the transparent sentinel.
    pub const TRANSPARENT: PaletteSlot = PaletteSlot(0);

    pub fn new(value: u8) -> Result<Self, PaletteError> {
        if value <= 3 {
            Ok(PaletteSlot(value))
        } else {
            Err(PaletteError::InvalidSlot(value))
        }
    }

    /// Build a slot from the low two bits of `value`.
    pub fn from_bits(value: u8) -> Self {
        PaletteSlot(value & 0b11)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_transparent(self) -> bool {
        self.0 == 0
    }

    /// Bitplane 0 contribution.
    pub fn low_bit(self) -> u8 {
        self.0 & 1
    }

    /// Bitplane 1 contribution.
    pub fn high_bit(self) -> u8 {
        (self.0 >> 1) & 1
    }
}

impl TryFrom<u8> for PaletteSlot {
    type Error = PaletteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PaletteSlot::new(value)
    }
}

impl From<PaletteSlot> for u8 {
    fn from(slot: PaletteSlot) -> u8 {
        slot.0
    }
}

impl fmt::Display for PaletteSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the four palettes in the bank a tile uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PaletteIndex(u8);

impl PaletteIndex {
    pub fn new(value: u8) -> Result<Self, PaletteError> {
        if value <= 3 {
            Ok(PaletteIndex(value))
        } else {
            Err(PaletteError::InvalidIndex(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All four indices in order.
    pub fn all() -> [PaletteIndex; 4] {
        [PaletteIndex(0), PaletteIndex(1), PaletteIndex(2), PaletteIndex(3)]
    }
}

impl TryFrom<u8> for PaletteIndex {
    type Error = PaletteError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PaletteIndex::new(value)
    }
}

impl From<PaletteIndex> for u8 {
    fn from(index: PaletteIndex) -> u8 {
        index.0
    }
}

impl fmt::Display for PaletteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Four colors addressed by [`PaletteSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(pub [Color; 4]);

impl Palette {
    /// Color a pixel should be drawn with, or `None` for slot 0.
    pub fn resolve(&self, slot: PaletteSlot) -> Option<Color> {
        if slot.is_transparent() {
            None
        } else {
            Some(self.0[slot.value() as usize])
        }
    }

    /// Stored color of a slot, including the unused slot-0 value.
    pub fn color(&self, slot: PaletteSlot) -> Color {
        self.0[slot.value() as usize]
    }

    pub fn set(&mut self, slot: PaletteSlot, color: Color) {
        self.0[slot.value() as usize] = color;
    }
}

impl Default for Palette {
    /// `[$00, $01, $15, $22]`, the editor's starting palette.
    fn default() -> Self {
        let pick = |i: u8| Color::new(i).unwrap_or_default();
        Palette([pick(0x00), pick(0x01), pick(0x15), pick(0x22)])
    }
}

/// Exactly four palettes. The bank never grows or shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteBank(pub [Palette; 4]);

impl PaletteBank {
    pub fn get(&self, index: PaletteIndex) -> &Palette {
        &self.0[index.value() as usize]
    }

    pub fn get_mut(&mut self, index: PaletteIndex) -> &mut Palette {
        &mut self.0[index.value() as usize]
    }

    /// Resolve a pixel through one palette of the bank.
    pub fn resolve(&self, index: PaletteIndex, slot: PaletteSlot) -> Option<Color> {
        self.get(index).resolve(slot)
    }

    pub fn set_color(&mut self, index: PaletteIndex, slot: PaletteSlot, color: Color) {
        self.get_mut(index).set(slot, color);
    }

    /// Stored slot-0 color of palette 0.
    ///
    /// Only used to fill screen pixels that no background tile or sprite
    /// covers; sprites and tiles never draw with it.
    pub fn backdrop(&self) -> Color {
        self.0[0].color(PaletteSlot::TRANSPARENT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PaletteIndex, &Palette)> {
        PaletteIndex::all().into_iter().zip(self.0.iter())
    }
}
