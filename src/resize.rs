//! Tile resizing
//!
//! [`resize`] is non-destructive: the tile's pixels are a view over its
//! [`BackingStore`](crate::backing::BackingStore), so shrinking hides pixels
//! instead of discarding them and growing back with the same anchor brings
//! them back exactly. [`crop_resize`] is the flattening variant that pastes
//! the old pixels into a fresh canvas and forgets everything else.

use crate::backing::{Backing, MAX_HISTORY_SIDE};
use crate::palette::PaletteSlot;
use crate::tile::{check_size, Tile, TileError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alignment of the old content along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Left/top edge stays put
    Start,
    /// Size change is split between both edges
    Center,
    /// Right/bottom edge stays put
    End,
}

impl Align {
    /// Where the old content's origin lands inside the new extent.
    ///
    /// Center uses floor division so odd splits favour the leading edge.
    pub fn paste_offset(self, prev: u32, next: u32) -> i64 {
        let delta = i64::from(next) - i64::from(prev);
        match self {
            Align::Start => 0,
            Align::Center => delta.div_euclid(2),
            Align::End => delta,
        }
    }
}

/// Which part of the tile stays fixed while resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Left,
        Anchor::Center,
        Anchor::Right,
        Anchor::BottomLeft,
        Anchor::Bottom,
        Anchor::BottomRight,
    ];

    pub fn horizontal(self) -> Align {
        match self {
            Anchor::TopLeft | Anchor::Left | Anchor::BottomLeft => Align::Start,
            Anchor::Top | Anchor::Center | Anchor::Bottom => Align::Center,
            Anchor::TopRight | Anchor::Right | Anchor::BottomRight => Align::End,
        }
    }

    pub fn vertical(self) -> Align {
        match self {
            Anchor::TopLeft | Anchor::Top | Anchor::TopRight => Align::Start,
            Anchor::Left | Anchor::Center | Anchor::Right => Align::Center,
            Anchor::BottomLeft | Anchor::Bottom | Anchor::BottomRight => Align::End,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::Top => "top",
            Anchor::TopRight => "top-right",
            Anchor::Left => "left",
            Anchor::Center => "center",
            Anchor::Right => "right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::Bottom => "bottom",
            Anchor::BottomRight => "bottom-right",
        }
    }

    /// Offset of the old content's origin inside a `next_w` x `next_h` canvas.
    pub fn paste_offset(self, prev_w: u32, prev_h: u32, next_w: u32, next_h: u32) -> (i64, i64) {
        (
            self.horizontal().paste_offset(prev_w, next_w),
            self.vertical().paste_offset(prev_h, next_h),
        )
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Anchor::ALL.iter().map(|a| a.as_str()).collect();
                format!("unknown anchor '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Resize a tile without losing pixels.
///
/// The first resize of an unbacked tile seeds a backing store from its
/// current pixels. The old view is written back into the store, the view
/// moves by the anchor displacement, the store grows (filled with `fill`)
/// if the new view pokes out of it, and the new pixels are read back out.
/// The returned tile shares the store with `tile`; `tile` itself keeps its
/// pixels.
///
/// ```
/// use chrsmith::palette::{PaletteIndex, PaletteSlot};
/// use chrsmith::resize::{resize, Anchor};
/// use chrsmith::tile::Tile;
///
/// let tile = Tile::filled(16, 16, PaletteSlot::new(1).unwrap(), PaletteIndex::default()).unwrap();
/// let small = resize(&tile, 8, 8, Anchor::Center, PaletteSlot::TRANSPARENT).unwrap();
/// let back = resize(&small, 16, 16, Anchor::Center, PaletteSlot::TRANSPARENT).unwrap();
/// assert_eq!(back, tile);
/// ```
pub fn resize(
    tile: &Tile,
    next_width: u32,
    next_height: u32,
    anchor: Anchor,
    fill: PaletteSlot,
) -> Result<Tile, TileError> {
    check_size(next_width, next_height)?;

    let backing = match tile.backing() {
        Some(backing) => backing.clone(),
        None => Backing::seed(tile.pixels(), tile.width(), tile.height(), fill),
    };

    let (cur_left, cur_top) = backing.origin();
    let (paste_x, paste_y) =
        anchor.paste_offset(tile.width(), tile.height(), next_width, next_height);
    // The view moves opposite to where the old content is pasted
    let next_left = i64::from(cur_left) - paste_x;
    let next_top = i64::from(cur_top) - paste_y;

    let (pixels, next_left, next_top) = {
        let mut store = backing.store().borrow_mut();
        // No-op for views placed by this function
        store.grow_to_contain(cur_left.into(), cur_top.into(), tile.width(), tile.height(), fill)?;
        store.write_view(cur_left, cur_top, tile.width(), tile.pixels());
        store.grow_to_contain(next_left, next_top, next_width, next_height, fill)?;
        let too_large = || TileError::HistoryTooLarge {
            width: store.width().into(),
            height: store.height().into(),
            max: MAX_HISTORY_SIDE,
        };
        let left = i32::try_from(next_left).map_err(|_| too_large())?;
        let top = i32::try_from(next_top).map_err(|_| too_large())?;
        (store.read_view(left, top, next_width, next_height), left, top)
    };

    log::debug!(
        "resize {}x{} -> {}x{} anchor={} view=({}, {})",
        tile.width(),
        tile.height(),
        next_width,
        next_height,
        anchor,
        next_left,
        next_top
    );

    Ok(Tile::from_parts(
        next_width,
        next_height,
        tile.palette_index(),
        pixels,
        Some(backing.moved_to(next_left, next_top)),
    ))
}

/// Resize by pasting into a fresh canvas, discarding overflow.
///
/// New cells are set to `fill`. The result has no backing store.
pub fn crop_resize(
    tile: &Tile,
    next_width: u32,
    next_height: u32,
    anchor: Anchor,
    fill: PaletteSlot,
) -> Result<Tile, TileError> {
    let mut dst = Tile::filled(next_width, next_height, fill, tile.palette_index())?;
    let (dx, dy) = anchor.paste_offset(tile.width(), tile.height(), next_width, next_height);

    for (y, row) in tile.rows().enumerate() {
        let ty = y as i64 + dy;
        if ty < 0 || ty >= i64::from(next_height) {
            continue;
        }
        for (x, &slot) in row.iter().enumerate() {
            let tx = x as i64 + dx;
            if tx < 0 || tx >= i64::from(next_width) {
                continue;
            }
            dst.set(tx as u32, ty as u32, slot)?;
        }
    }
    Ok(dst)
}
