//! The screen canvas: background grid plus placed sprites
//!
//! A [`Screen`] is a value. Every mutation builds a candidate copy, runs
//! it through [`validate`](crate::validate::validate) and hands it back only
//! if it passes, so a refused edit leaves the caller's screen untouched.

use crate::palette::PaletteIndex;
use crate::tile::{Tile, TileError, CELL};
use crate::validate::{validate, HardwareLimits, PlacementViolation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SCREEN_WIDTH: u32 = 256;
pub const SCREEN_HEIGHT: u32 = 240;
/// Background grid rows of 8x8 tiles
pub const BACKGROUND_ROWS: usize = 30;
/// Background grid columns of 8x8 tiles
pub const BACKGROUND_COLS: usize = 32;

/// Error type for screen edits
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("{0}")]
    Placement(#[from] PlacementViolation),
    #[error("no sprite instance {index} on screen ({len} placed)")]
    InstanceOutOfRange { index: usize, len: usize },
    #[error("sprite {index} does not exist (sheet has {len} sprites)")]
    UnknownSprite { index: usize, len: usize },
    #[error("background cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    InvalidBackgroundCell { row: usize, col: usize, rows: usize, cols: usize },
    #[error("background tiles must be 8x8: got {width}x{height}")]
    InvalidBackgroundTile { width: u32, height: u32 },
    #[error("screen must be {expected_width}x{expected_height}: got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32, expected_width: u32, expected_height: u32 },
    #[error("background grid must be {expected_rows}x{expected_cols} tiles: got {rows} rows, row {row} has {cols} tiles")]
    BackgroundShape {
        rows: usize,
        row: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },
}

/// A sprite placed on the screen.
///
/// Holds a copy of the sheet tile's contents at the time it was placed,
/// the signed screen position of its top-left pixel and the sheet slot it
/// came from. The tile's palette index is the palette it draws with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SpriteInstanceRecord", into = "SpriteInstanceRecord")]
pub struct SpriteInstance {
    pub sprite_index: usize,
    pub x: i32,
    pub y: i32,
    pub tile: Tile,
}

/// Serialized form: the tile's fields sit next to the placement fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpriteInstanceRecord {
    sprite_index: usize,
    x: i32,
    y: i32,
    #[serde(default)]
    palette_index: PaletteIndex,
    width: u32,
    height: u32,
    pixels: Vec<Vec<u8>>,
}

impl TryFrom<SpriteInstanceRecord> for SpriteInstance {
    type Error = TileError;

    fn try_from(record: SpriteInstanceRecord) -> Result<Self, Self::Error> {
        let tile =
            Tile::from_grid(record.width, record.height, &record.pixels, record.palette_index)?;
        Ok(SpriteInstance::new(record.sprite_index, record.x, record.y, tile))
    }
}

impl From<SpriteInstance> for SpriteInstanceRecord {
    fn from(instance: SpriteInstance) -> Self {
        SpriteInstanceRecord {
            sprite_index: instance.sprite_index,
            x: instance.x,
            y: instance.y,
            palette_index: instance.tile.palette_index(),
            width: instance.tile.width(),
            height: instance.tile.height(),
            pixels: instance.tile.to_rows(),
        }
    }
}

impl SpriteInstance {
    /// Place `tile`; any resize history it carries is not copied.
    pub fn new(sprite_index: usize, x: i32, y: i32, tile: Tile) -> Self {
        Self { sprite_index, x, y, tile: tile.flatten() }
    }

    pub fn palette_index(&self) -> PaletteIndex {
        self.tile.palette_index()
    }

    /// Same placement drawn with another palette.
    pub fn with_palette(mut self, palette_index: PaletteIndex) -> Self {
        self.tile.set_palette_index(palette_index);
        self
    }

    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..self.clone() }
    }
}

/// Fixed-size screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScreenRecord", into = "ScreenRecord")]
pub struct Screen {
    width: u32,
    height: u32,
    background: Vec<Vec<Tile>>,
    sprites: Vec<SpriteInstance>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// A 256x240 screen with an empty 30x32 background and no sprites.
    pub fn new() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            background: vec![vec![Tile::default(); BACKGROUND_COLS]; BACKGROUND_ROWS],
            sprites: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Background tiles, row-major.
    pub fn background(&self) -> &[Vec<Tile>] {
        &self.background
    }

    pub fn background_tile(&self, row: usize, col: usize) -> Option<&Tile> {
        self.background.get(row).and_then(|r| r.get(col))
    }

    /// Placed sprites in placement order.
    pub fn sprites(&self) -> &[SpriteInstance] {
        &self.sprites
    }

    pub fn sprite(&self, index: usize) -> Result<&SpriteInstance, ScreenError> {
        self.sprites
            .get(index)
            .ok_or(ScreenError::InstanceOutOfRange { index, len: self.sprites.len() })
    }

    /// Check this screen as it stands.
    pub fn check(&self, limits: &HardwareLimits) -> Result<(), PlacementViolation> {
        validate(self, limits)
    }

    fn accept(self, limits: &HardwareLimits) -> Result<Self, ScreenError> {
        validate(&self, limits)?;
        Ok(self)
    }

    /// Add one sprite instance.
    pub fn with_sprite(
        &self,
        instance: SpriteInstance,
        limits: &HardwareLimits,
    ) -> Result<Self, ScreenError> {
        let mut next = self.clone();
        next.sprites.push(instance);
        next.accept(limits)
    }

    /// Move the `index`-th placed sprite.
    pub fn with_sprite_moved(
        &self,
        index: usize,
        x: i32,
        y: i32,
        limits: &HardwareLimits,
    ) -> Result<Self, ScreenError> {
        let moved = self.sprite(index)?.moved_to(x, y);
        let mut next = self.clone();
        next.sprites[index] = moved;
        next.accept(limits)
    }

    /// Replace every placed sprite at once (bulk import).
    pub fn with_sprites<I>(&self, sprites: I, limits: &HardwareLimits) -> Result<Self, ScreenError>
    where
        I: IntoIterator<Item = SpriteInstance>,
    {
        self.with_sprites_unchecked(sprites).accept(limits)
    }

    pub(crate) fn with_sprites_unchecked<I>(&self, sprites: I) -> Self
    where
        I: IntoIterator<Item = SpriteInstance>,
    {
        Self { sprites: sprites.into_iter().collect(), ..self.clone() }
    }

    /// Remove the `index`-th placed sprite. Removal is never refused on
    /// placement grounds.
    pub fn without_sprite(&self, index: usize) -> Result<Self, ScreenError> {
        self.sprite(index)?;
        let mut next = self.clone();
        next.sprites.remove(index);
        Ok(next)
    }

    /// Replace one background cell with an 8x8 tile.
    pub fn with_background_tile(&self, row: usize, col: usize, tile: Tile) -> Result<Self, ScreenError> {
        if tile.width() != CELL || tile.height() != CELL {
            return Err(ScreenError::InvalidBackgroundTile {
                width: tile.width(),
                height: tile.height(),
            });
        }
        if self.background_tile(row, col).is_none() {
            return Err(ScreenError::InvalidBackgroundCell {
                row,
                col,
                rows: self.background.len(),
                cols: self.background.first().map_or(0, Vec::len),
            });
        }
        let mut next = self.clone();
        next.background[row][col] = tile.flatten();
        Ok(next)
    }
}

/// Serialized form: `{ width, height, backgroundTiles, sprites }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenRecord {
    width: u32,
    height: u32,
    background_tiles: Vec<Vec<Tile>>,
    #[serde(default)]
    sprites: Vec<SpriteInstance>,
}

impl TryFrom<ScreenRecord> for Screen {
    type Error = ScreenError;

    fn try_from(record: ScreenRecord) -> Result<Self, Self::Error> {
        if record.width != SCREEN_WIDTH || record.height != SCREEN_HEIGHT {
            return Err(ScreenError::InvalidDimensions {
                width: record.width,
                height: record.height,
                expected_width: SCREEN_WIDTH,
                expected_height: SCREEN_HEIGHT,
            });
        }

        let rows = record.background_tiles.len();
        for (row, tiles) in record.background_tiles.iter().enumerate() {
            if rows != BACKGROUND_ROWS || tiles.len() != BACKGROUND_COLS {
                return Err(ScreenError::BackgroundShape {
                    rows,
                    row,
                    cols: tiles.len(),
                    expected_rows: BACKGROUND_ROWS,
                    expected_cols: BACKGROUND_COLS,
                });
            }
            if let Some(bad) = tiles.iter().find(|t| t.width() != CELL || t.height() != CELL) {
                return Err(ScreenError::InvalidBackgroundTile {
                    width: bad.width(),
                    height: bad.height(),
                });
            }
        }
        if rows != BACKGROUND_ROWS {
            return Err(ScreenError::BackgroundShape {
                rows,
                row: 0,
                cols: 0,
                expected_rows: BACKGROUND_ROWS,
                expected_cols: BACKGROUND_COLS,
            });
        }

        Ok(Screen {
            width: record.width,
            height: record.height,
            background: record.background_tiles,
            sprites: record.sprites,
        })
    }
}

impl From<Screen> for ScreenRecord {
    fn from(screen: Screen) -> Self {
        ScreenRecord {
            width: screen.width,
            height: screen.height,
            background_tiles: screen.background,
            sprites: screen.sprites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteSlot;
    use crate::validate::Violation;

    fn sprite(index: usize, x: i32, y: i32) -> SpriteInstance {
        SpriteInstance::new(index, x, y, Tile::default())
    }

    #[test]
    fn test_new_screen_shape() {
        let screen = Screen::new();
        assert_eq!((screen.width(), screen.height()), (256, 240));
        assert_eq!(screen.background().len(), 30);
        assert!(screen.background().iter().all(|row| row.len() == 32));
        assert!(screen.sprites().is_empty());
    }

    #[test]
    fn test_with_sprite_accepts_and_leaves_original() {
        let limits = HardwareLimits::default();
        let screen = Screen::new();
        let next = screen.with_sprite(sprite(3, 10, 20), &limits).unwrap();
        assert_eq!(next.sprites().len(), 1);
        assert_eq!(next.sprite(0).unwrap().sprite_index, 3);
        assert!(screen.sprites().is_empty());
    }

    #[test]
    fn test_rejected_placement_returns_violation() {
        let limits = HardwareLimits::default();
        let mut screen = Screen::new();
        for i in 0..8 {
            screen = screen.with_sprite(sprite(i, i as i32 * 8, 0), &limits).unwrap();
        }
        let err = screen.with_sprite(sprite(8, 100, 4), &limits).unwrap_err();
        match err {
            ScreenError::Placement(v) => {
                assert!(matches!(&v.violations()[0], Violation::Scanline { rows, .. } if rows[0] == 4));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(screen.sprites().len(), 8);
    }

    #[test]
    fn test_move_is_validated() {
        let limits = HardwareLimits::default();
        let mut screen = Screen::new();
        for i in 0..8 {
            screen = screen.with_sprite(sprite(i, 0, 0), &limits).unwrap();
        }
        screen = screen.with_sprite(sprite(8, 0, 100), &limits).unwrap();

        assert!(screen.with_sprite_moved(8, 0, 3, &limits).is_err());
        let moved = screen.with_sprite_moved(8, -20, 50, &limits).unwrap();
        assert_eq!((moved.sprite(8).unwrap().x, moved.sprite(8).unwrap().y), (-20, 50));
        assert!(matches!(
            screen.with_sprite_moved(42, 0, 0, &limits),
            Err(ScreenError::InstanceOutOfRange { index: 42, len: 9 })
        ));
    }

    #[test]
    fn test_without_sprite_never_refused() {
        let crowded = Screen::new().with_sprites_unchecked((0..10).map(|i| sprite(i, 0, 0)));
        let next = crowded.without_sprite(0).unwrap();
        assert_eq!(next.sprites().len(), 9);
        assert!(next.check(&HardwareLimits::default()).is_err());
    }

    #[test]
    fn test_bulk_import_all_or_nothing() {
        let limits = HardwareLimits::default();
        let screen = Screen::new();
        let err = screen.with_sprites((0..9).map(|i| sprite(i, 0, 0)), &limits);
        assert!(err.is_err());
        let ok = screen.with_sprites((0..9).map(|i| sprite(i, 0, i as i32 * 8)), &limits).unwrap();
        assert_eq!(ok.sprites().len(), 9);
    }

    #[test]
    fn test_background_tile_checks() {
        let screen = Screen::new();
        let tile = Tile::filled(8, 8, PaletteSlot::new(1).unwrap(), PaletteIndex::default()).unwrap();
        let next = screen.with_background_tile(29, 31, tile.clone()).unwrap();
        assert_eq!(next.background_tile(29, 31), Some(&tile));

        assert!(matches!(
            screen.with_background_tile(30, 0, tile),
            Err(ScreenError::InvalidBackgroundCell { .. })
        ));
        let big = Tile::new(16, 8, PaletteIndex::default()).unwrap();
        assert!(matches!(
            screen.with_background_tile(0, 0, big),
            Err(ScreenError::InvalidBackgroundTile { width: 16, height: 8 })
        ));
    }

    #[test]
    fn test_instance_json_is_flat() {
        let instance = sprite(5, -3, 7).with_palette(PaletteIndex::new(2).unwrap());
        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["spriteIndex"], 5);
        assert_eq!(json["x"], -3);
        assert_eq!(json["paletteIndex"], 2);
        assert_eq!(json["pixels"].as_array().unwrap().len(), 8);

        let back: SpriteInstance = serde_json::from_value(json).unwrap();
        assert_eq!(back, instance);
    }

    #[test]
    fn test_screen_record_rejects_wrong_size() {
        let mut json = serde_json::to_value(Screen::new()).unwrap();
        json["width"] = 320.into();
        let err = serde_json::from_value::<Screen>(json).unwrap_err();
        assert!(err.to_string().contains("256x240"));
    }
}
