//! Off-view pixel history for non-destructive resizing
//!
//! A [`BackingStore`] is an unbounded canvas that grows (never shrinks) to
//! contain every view a tile has ever been resized to. Successive versions
//! of the same logical tile share one store through a [`Backing`] handle,
//! each remembering where its own view sits.
//!
//! View positions are kept in logical coordinates: `(0, 0)` is the tile's
//! top-left corner at the moment the store was seeded. The store maps
//! logical to grid coordinates with `offset_x`/`offset_y`, which move
//! whenever the grid grows on the left or top edge.

use crate::palette::PaletteSlot;
use crate::tile::{Tile, TileError};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Largest store side. Resizes that would grow the history past it fail.
pub const MAX_HISTORY_SIDE: u32 = 16384;

/// The shared pixel canvas behind a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingStore {
    pixels: Vec<PaletteSlot>,
    width: u32,
    height: u32,
    /// Grid column of logical x = 0
    offset_x: i32,
    /// Grid row of logical y = 0
    offset_y: i32,
    /// Value written into newly grown areas
    fill: PaletteSlot,
}

impl BackingStore {
    /// Seed a store with a copy of a tile's pixels at logical origin (0, 0).
    pub fn seed(pixels: &[PaletteSlot], width: u32, height: u32, fill: PaletteSlot) -> Self {
        Self {
            pixels: pixels.to_vec(),
            width,
            height,
            offset_x: 0,
            offset_y: 0,
            fill,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn offset(&self) -> (i32, i32) {
        (self.offset_x, self.offset_y)
    }

    pub fn fill(&self) -> PaletteSlot {
        self.fill
    }

    /// Grid coordinate of a logical point, if it lies inside the grid.
    fn grid_index(&self, lx: i64, ly: i64) -> Option<usize> {
        let gx = lx + self.offset_x as i64;
        let gy = ly + self.offset_y as i64;
        if gx < 0 || gy < 0 || gx >= self.width as i64 || gy >= self.height as i64 {
            return None;
        }
        Some((gy * self.width as i64 + gx) as usize)
    }

    /// Slot at a logical coordinate.
    pub fn get(&self, lx: i32, ly: i32) -> Option<PaletteSlot> {
        self.grid_index(lx.into(), ly.into()).map(|i| self.pixels[i])
    }

    /// Whether the logical rectangle lies entirely inside the grid.
    pub fn contains(&self, left: i64, top: i64, width: u32, height: u32) -> bool {
        let gx = left + self.offset_x as i64;
        let gy = top + self.offset_y as i64;
        gx >= 0
            && gy >= 0
            && gx + width as i64 <= self.width as i64
            && gy + height as i64 <= self.height as i64
    }

    /// Copy a view's pixels into the store at logical `(left, top)`.
    pub fn write_view(&mut self, left: i32, top: i32, width: u32, pixels: &[PaletteSlot]) {
        for (i, &slot) in pixels.iter().enumerate() {
            let x = left as i64 + (i as u64 % width as u64) as i64;
            let y = top as i64 + (i as u64 / width as u64) as i64;
            if let Some(idx) = self.grid_index(x, y) {
                self.pixels[idx] = slot;
            }
        }
    }

    /// Read a view out of the store; cells outside the grid read as `fill`.
    pub fn read_view(&self, left: i32, top: i32, width: u32, height: u32) -> Vec<PaletteSlot> {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i64 {
            for x in 0..width as i64 {
                let slot = self.grid_index(left as i64 + x, top as i64 + y).map(|i| self.pixels[i]);
                out.push(slot.unwrap_or(self.fill));
            }
        }
        out
    }

    /// Grow the grid so the logical rectangle fits, filling new cells with
    /// `fill`. Returns `true` if the grid was reallocated.
    pub fn grow_to_contain(
        &mut self,
        left: i64,
        top: i64,
        width: u32,
        height: u32,
        fill: PaletteSlot,
    ) -> Result<bool, TileError> {
        if self.contains(left, top, width, height) {
            return Ok(false);
        }

        // Requested rectangle in current grid coordinates
        let gl = left + self.offset_x as i64;
        let gt = top + self.offset_y as i64;
        let gr = gl + width as i64;
        let gb = gt + height as i64;

        let new_left = gl.min(0);
        let new_top = gt.min(0);
        let next_width = gr.max(self.width as i64) - new_left;
        let next_height = gb.max(self.height as i64) - new_top;
        if next_width > MAX_HISTORY_SIDE as i64 || next_height > MAX_HISTORY_SIDE as i64 {
            return Err(TileError::HistoryTooLarge {
                width: next_width as u64,
                height: next_height as u64,
                max: MAX_HISTORY_SIDE,
            });
        }

        // Both bounded by MAX_HISTORY_SIDE from here on
        let shift_x = (-new_left) as usize;
        let shift_y = (-new_top) as usize;
        let next_width = next_width as usize;
        let next_height = next_height as usize;
        let old_width = self.width as usize;

        let mut next = vec![fill; next_width * next_height];
        for y in 0..self.height as usize {
            let src = y * old_width;
            let dst = (y + shift_y) * next_width + shift_x;
            next[dst..dst + old_width].copy_from_slice(&self.pixels[src..src + old_width]);
        }

        log::debug!(
            "backing store grew {}x{} -> {}x{} (shift {}, {})",
            self.width,
            self.height,
            next_width,
            next_height,
            shift_x,
            shift_y
        );

        self.pixels = next;
        self.width = next_width as u32;
        self.height = next_height as u32;
        self.offset_x += shift_x as i32;
        self.offset_y += shift_y as i32;
        self.fill = fill;
        Ok(true)
    }
}

/// A tile's handle on its shared store plus the logical origin of its view.
#[derive(Debug, Clone)]
pub struct Backing {
    store: Rc<RefCell<BackingStore>>,
    origin_x: i32,
    origin_y: i32,
}

impl Backing {
    /// Start a new store seeded with the given view at logical origin (0, 0).
    pub fn seed(pixels: &[PaletteSlot], width: u32, height: u32, fill: PaletteSlot) -> Self {
        Self {
            store: Rc::new(RefCell::new(BackingStore::seed(pixels, width, height, fill))),
            origin_x: 0,
            origin_y: 0,
        }
    }

    /// Same store, different view origin.
    pub(crate) fn moved_to(&self, origin_x: i32, origin_y: i32) -> Self {
        Self {
            store: Rc::clone(&self.store),
            origin_x,
            origin_y,
        }
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    pub(crate) fn store(&self) -> &RefCell<BackingStore> {
        &self.store
    }

    /// Snapshot of the shared store.
    pub fn snapshot(&self) -> BackingStore {
        self.store.borrow().clone()
    }

    /// Whether two handles share one store.
    pub fn shares_store_with(&self, other: &Backing) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }

    /// Serialized history for `tile`, with the tile's current pixels
    /// written over its view.
    pub(crate) fn to_record(&self, tile: &Tile) -> BackingRecord {
        let mut store = self.snapshot();
        store.write_view(self.origin_x, self.origin_y, tile.width(), tile.pixels());
        BackingRecord {
            width: store.width,
            height: store.height,
            offset_x: store.offset_x,
            offset_y: store.offset_y,
            origin_x: self.origin_x,
            origin_y: self.origin_y,
            fill: store.fill,
            pixels: store
                .pixels
                .chunks(store.width as usize)
                .map(|row| row.iter().map(|s| s.value()).collect())
                .collect(),
        }
    }

    /// Rebuild a handle from its record. The view at the recorded origin
    /// must hold exactly `tile`'s pixels.
    pub(crate) fn from_record(record: BackingRecord, tile: &Tile) -> Result<Self, TileError> {
        let invalid = |reason: &str| TileError::InvalidHistory(reason.to_string());

        if record.width == 0
            || record.height == 0
            || record.width > MAX_HISTORY_SIDE
            || record.height > MAX_HISTORY_SIDE
        {
            return Err(TileError::HistoryTooLarge {
                width: record.width.into(),
                height: record.height.into(),
                max: MAX_HISTORY_SIDE,
            });
        }
        if record.pixels.len() != record.height as usize {
            return Err(invalid("row count does not match height"));
        }
        if !(0..record.width as i64).contains(&(record.offset_x as i64))
            || !(0..record.height as i64).contains(&(record.offset_y as i64))
        {
            return Err(invalid("offset lies outside the store"));
        }

        let mut pixels = Vec::with_capacity(record.width as usize * record.height as usize);
        for row in &record.pixels {
            if row.len() != record.width as usize {
                return Err(invalid("row length does not match width"));
            }
            for &value in row {
                pixels.push(PaletteSlot::new(value)?);
            }
        }

        let store = BackingStore {
            pixels,
            width: record.width,
            height: record.height,
            offset_x: record.offset_x,
            offset_y: record.offset_y,
            fill: record.fill,
        };
        let (left, top) = (record.origin_x, record.origin_y);
        if !store.contains(left.into(), top.into(), tile.width(), tile.height())
            || store.read_view(left, top, tile.width(), tile.height()) != tile.pixels()
        {
            return Err(invalid("stored view does not match the tile's pixels"));
        }

        Ok(Self { store: Rc::new(RefCell::new(store)), origin_x: left, origin_y: top })
    }
}

/// Serialized form of a tile's resize history:
/// `{ width, height, offsetX, offsetY, originX, originY, fill, pixels }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackingRecord {
    width: u32,
    height: u32,
    offset_x: i32,
    offset_y: i32,
    origin_x: i32,
    origin_y: i32,
    #[serde(default)]
    fill: PaletteSlot,
    pixels: Vec<Vec<u8>>,
}
