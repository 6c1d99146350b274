//! 8x8 block exchange for reordering cells inside a larger tile

use crate::tile::{Tile, CELL};

/// Snap a pixel coordinate to the top-left corner of its 8x8 block.
pub fn block_origin(x: i32, y: i32) -> (i32, i32) {
    (x.div_euclid(CELL as i32) * CELL as i32, y.div_euclid(CELL as i32) * CELL as i32)
}

/// Exchange the 8x8 blocks whose top-left corners are `(ax, ay)` and
/// `(bx, by)`.
///
/// Cell pairs where either side falls outside the tile are skipped, so the
/// call never fails. The input tile is left unchanged.
pub fn swap_blocks(tile: &Tile, ax: i32, ay: i32, bx: i32, by: i32) -> Tile {
    let width = tile.width() as i32;
    let height = tile.height() as i32;
    let index = |x: i32, y: i32| -> Option<usize> {
        if x < 0 || y < 0 || x >= width || y >= height {
            None
        } else {
            Some((y * width + x) as usize)
        }
    };

    let mut next = tile.clone();
    let pixels = next.pixels_mut();
    for dy in 0..CELL as i32 {
        for dx in 0..CELL as i32 {
            if let (Some(a), Some(b)) = (index(ax + dx, ay + dy), index(bx + dx, by + dy)) {
                pixels.swap(a, b);
            }
        }
    }
    next
}
