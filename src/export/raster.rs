//! Raster export: tile pixels to an RGBA image

use crate::output::{scale_image, OutputError};
use crate::palette::Palette;
use crate::tile::Tile;
use image::{Rgba, RgbaImage};

/// Fully transparent pixel used for slot 0.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Render a tile at one image pixel per tile pixel.
///
/// Slot 0 pixels get alpha 0; every other pixel is the opaque color its
/// slot resolves to in `palette`.
pub fn render_tile(tile: &Tile, palette: &Palette) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(tile.width(), tile.height(), TRANSPARENT);
    for (y, row) in tile.rows().enumerate() {
        for (x, &slot) in row.iter().enumerate() {
            if let Some(color) = palette.resolve(slot) {
                image.put_pixel(x as u32, y as u32, color.rgba());
            }
        }
    }
    image
}

/// Render a tile and scale it by an integer factor (nearest neighbour).
pub fn render_tile_scaled(
    tile: &Tile,
    palette: &Palette,
    scale: u32,
) -> Result<RgbaImage, OutputError> {
    scale_image(render_tile(tile, palette), scale)
}
