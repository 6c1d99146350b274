//! Sprite tiles
//!
//! A [`Tile`] is a width x height grid of [`PaletteSlot`] values (both
//! dimensions multiples of 8) tagged with the palette it is drawn with.
//! Tiles are values: editing helpers return a new tile and leave the old
//! one untouched. The optional [`Backing`] handle remembers pixels that a
//! shrinking resize pushed out of view, see [`crate::resize`].

use crate::backing::{Backing, BackingRecord};
use crate::palette::{PaletteError, PaletteIndex, PaletteSlot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tiles are built from 8x8 cells.
pub const CELL: u32 = 8;

/// Largest tile side in pixels.
pub const MAX_SIDE: u32 = 4096;

/// Error type for tile construction, codec and resize operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Dimension is zero, not a multiple of 8, or larger than [`MAX_SIDE`]
    #[error("tile size must be positive multiples of 8 no larger than 4096: got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    /// A fixed-size path got a tile of the wrong size
    #[error("{operation} only supports {expected} tiles: got {width}x{height}")]
    UnsupportedSize {
        operation: &'static str,
        expected: &'static str,
        width: u32,
        height: u32,
    },
    /// Pixel coordinate outside the tile
    #[error("pixel ({x}, {y}) is outside the {width}x{height} tile")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
    /// Pixel value is not a 2-bit slot
    #[error(transparent)]
    Palette(#[from] PaletteError),
    /// Grid rows don't match the declared size
    #[error("row {row} has {found} pixels, expected {expected}")]
    RowLengthMismatch { row: usize, found: usize, expected: usize },
    /// Grid row count doesn't match the declared height
    #[error("tile has {found} rows, expected {expected}")]
    RowCountMismatch { found: usize, expected: usize },
    /// CHR data length doesn't match the requested tile size
    #[error("CHR data is {found} bytes, expected {expected}")]
    TruncatedChr { found: usize, expected: usize },
    /// Resize history would outgrow its size limit
    #[error("resize history would be {width}x{height}, the limit is {max}x{max}")]
    HistoryTooLarge { width: u64, height: u64, max: u32 },
    /// Stored resize history is malformed or disagrees with the tile
    #[error("invalid resize history: {0}")]
    InvalidHistory(String),
}

/// Check that a tile size is positive, a multiple of 8 and at most
/// [`MAX_SIDE`] on both axes.
pub fn check_size(width: u32, height: u32) -> Result<(), TileError> {
    let valid = |side: u32| side != 0 && side % CELL == 0 && side <= MAX_SIDE;
    if !valid(width) || !valid(height) {
        return Err(TileError::InvalidSize { width, height });
    }
    Ok(())
}

/// A grid of palette slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TileRecord", into = "TileRecord")]
pub struct Tile {
    width: u32,
    height: u32,
    palette_index: PaletteIndex,
    /// Row-major, `width * height` entries
    pixels: Vec<PaletteSlot>,
    backing: Option<Backing>,
}

impl PartialEq for Tile {
    /// Tiles compare by visible content; the backing store is history, not content.
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.palette_index == other.palette_index
            && self.pixels == other.pixels
    }
}

impl Eq for Tile {}

impl Default for Tile {
    /// An empty 8x8 tile using palette 0.
    fn default() -> Self {
        Self::blank(CELL, CELL, PaletteIndex::default())
    }
}

impl Tile {
    /// Create a transparent tile.
    pub fn new(width: u32, height: u32, palette_index: PaletteIndex) -> Result<Self, TileError> {
        Self::filled(width, height, PaletteSlot::TRANSPARENT, palette_index)
    }

    /// Create a tile with every pixel set to `fill`.
    pub fn filled(
        width: u32,
        height: u32,
        fill: PaletteSlot,
        palette_index: PaletteIndex,
    ) -> Result<Self, TileError> {
        check_size(width, height)?;
        Ok(Self {
            width,
            height,
            palette_index,
            pixels: vec![fill; (width * height) as usize],
            backing: None,
        })
    }

    /// Size already known to be valid.
    pub(crate) fn blank(width: u32, height: u32, palette_index: PaletteIndex) -> Self {
        Self {
            width,
            height,
            palette_index,
            pixels: vec![PaletteSlot::TRANSPARENT; (width * height) as usize],
            backing: None,
        }
    }

    /// Build a tile from rows of raw 2-bit values.
    ///
    /// ```
    /// use chrsmith::palette::PaletteIndex;
    /// use chrsmith::tile::Tile;
    ///
    /// let rows = vec![vec![1u8; 8]; 8];
    /// let tile = Tile::from_rows(&rows, PaletteIndex::default()).unwrap();
    /// assert_eq!(tile.get(7, 7).unwrap().value(), 1);
    /// ```
    pub fn from_rows<R: AsRef<[u8]>>(
        rows: &[R],
        palette_index: PaletteIndex,
    ) -> Result<Self, TileError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let side = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        check_size(side(width), side(height))?;

        let mut pixels = Vec::with_capacity(width * height);
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(TileError::RowLengthMismatch {
                    row: row_idx,
                    found: row.len(),
                    expected: width,
                });
            }
            for &value in row {
                pixels.push(PaletteSlot::new(value)?);
            }
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            palette_index,
            pixels,
            backing: None,
        })
    }

    /// Build a tile from rows and check them against a declared size.
    pub fn from_grid<R: AsRef<[u8]>>(
        width: u32,
        height: u32,
        rows: &[R],
        palette_index: PaletteIndex,
    ) -> Result<Self, TileError> {
        check_size(width, height)?;
        if rows.len() != height as usize {
            return Err(TileError::RowCountMismatch { found: rows.len(), expected: height as usize });
        }
        for (row, values) in rows.iter().enumerate() {
            let found = values.as_ref().len();
            if found != width as usize {
                return Err(TileError::RowLengthMismatch { row, found, expected: width as usize });
            }
        }
        Tile::from_rows(rows, palette_index)
    }

    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        palette_index: PaletteIndex,
        pixels: Vec<PaletteSlot>,
        backing: Option<Backing>,
    ) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, palette_index, pixels, backing }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette_index(&self) -> PaletteIndex {
        self.palette_index
    }

    /// Row-major pixel slice.
    pub fn pixels(&self) -> &[PaletteSlot] {
        &self.pixels
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[PaletteSlot]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Rows as raw 2-bit values.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(|row| row.iter().map(|s| s.value()).collect()).collect()
    }

    pub fn backing(&self) -> Option<&Backing> {
        self.backing.as_ref()
    }

    fn index_of(&self, x: u32, y: u32) -> Result<usize, TileError> {
        if x >= self.width || y >= self.height {
            return Err(TileError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Result<PaletteSlot, TileError> {
        Ok(self.pixels[self.index_of(x, y)?])
    }

    /// Signed lookup for clipping callers; `None` outside the grid.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<PaletteSlot> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.pixels[(y as u32 * self.width + x as u32) as usize])
    }

    pub fn set(&mut self, x: u32, y: u32, slot: PaletteSlot) -> Result<(), TileError> {
        let i = self.index_of(x, y)?;
        self.pixels[i] = slot;
        Ok(())
    }

    /// Copy-on-write pixel edit. The backing store carries over, so later
    /// resizes still see the edit.
    pub fn with_pixel(&self, x: u32, y: u32, slot: PaletteSlot) -> Result<Self, TileError> {
        let mut next = self.clone();
        next.set(x, y, slot)?;
        Ok(next)
    }

    pub fn with_palette_index(&self, palette_index: PaletteIndex) -> Self {
        Self { palette_index, ..self.clone() }
    }

    pub fn set_palette_index(&mut self, palette_index: PaletteIndex) {
        self.palette_index = palette_index;
    }

    /// A fresh transparent tile of the same size and palette, with no history.
    pub fn cleared(&self) -> Self {
        Self::blank(self.width, self.height, self.palette_index)
    }

    /// The same pixels with the backing store detached.
    pub fn flatten(&self) -> Self {
        Self { backing: None, ..self.clone() }
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [PaletteSlot] {
        &mut self.pixels
    }

    /// Copy a rectangular region into a new tile.
    pub fn sub_tile(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self, TileError> {
        check_size(width, height)?;
        let fits = |start: u32, len: u32, limit: u32| start.checked_add(len).is_some_and(|end| end <= limit);
        if !fits(x, width, self.width) || !fits(y, height, self.height) {
            return Err(TileError::PixelOutOfBounds {
                x: x.saturating_add(width - 1),
                y: y.saturating_add(height - 1),
                width: self.width,
                height: self.height,
            });
        }
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for row in self.rows().skip(y as usize).take(height as usize) {
            pixels.extend_from_slice(&row[x as usize..(x + width) as usize]);
        }
        Ok(Self::from_parts(width, height, self.palette_index, pixels, None))
    }

    /// Split into 8x8 cells, top row of cells first, left to right.
    pub fn split_8x8(&self) -> Vec<Tile> {
        let mut cells = Vec::with_capacity(((self.width / CELL) * (self.height / CELL)) as usize);
        for cy in (0..self.height).step_by(CELL as usize) {
            for cx in (0..self.width).step_by(CELL as usize) {
                let mut pixels = Vec::with_capacity((CELL * CELL) as usize);
                for row in self.rows().skip(cy as usize).take(CELL as usize) {
                    pixels.extend_from_slice(&row[cx as usize..(cx + CELL) as usize]);
                }
                cells.push(Self::from_parts(CELL, CELL, self.palette_index, pixels, None));
            }
        }
        cells
    }

    /// Number of non-transparent pixels.
    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|s| !s.is_transparent()).count()
    }
}

/// Serialized form of a tile: `{ width, height, paletteIndex, pixels: [[u8]] }`,
/// plus `backing` when the tile carries resize history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileRecord {
    width: u32,
    height: u32,
    #[serde(default)]
    palette_index: PaletteIndex,
    pixels: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backing: Option<BackingRecord>,
}

impl TryFrom<TileRecord> for Tile {
    type Error = TileError;

    fn try_from(record: TileRecord) -> Result<Self, Self::Error> {
        let mut tile =
            Tile::from_grid(record.width, record.height, &record.pixels, record.palette_index)?;
        if let Some(history) = record.backing {
            tile.backing = Some(Backing::from_record(history, &tile)?);
        }
        Ok(tile)
    }
}

impl From<Tile> for TileRecord {
    fn from(tile: Tile) -> Self {
        TileRecord {
            width: tile.width,
            height: tile.height,
            palette_index: tile.palette_index,
            pixels: tile.to_rows(),
            backing: tile.backing.as_ref().map(|b| b.to_record(&tile)),
        }
    }
}
