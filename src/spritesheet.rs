//! Sprite sheet preview - every sprite slot laid out in a grid

use crate::export::raster::{render_tile_scaled, TRANSPARENT};
use crate::output::OutputError;
use crate::palette::PaletteBank;
use crate::tile::Tile;
use image::RgbaImage;

/// Default number of columns in a sheet preview.
pub const DEFAULT_COLUMNS: u32 = 8;

/// Render multiple images into a grid with `cols` columns.
///
/// Cells are sized to the largest image; smaller images sit in the
/// top-left of their cell and the rest stays transparent.
///
/// ```
/// use image::RgbaImage;
/// use chrsmith::spritesheet::render_sheet;
///
/// let frame = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
/// let frames = vec![frame.clone(), frame.clone(), frame.clone()];
///
/// let sheet = render_sheet(&frames, 2);
/// assert_eq!(sheet.dimensions(), (4, 4));
/// ```
pub fn render_sheet(frames: &[RgbaImage], cols: u32) -> RgbaImage {
    if frames.is_empty() {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let cell_w = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let cell_h = frames.iter().map(|f| f.height()).max().unwrap_or(1);
    let columns = cols.clamp(1, frames.len() as u32);
    let rows = (frames.len() as u32).div_ceil(columns);

    let mut sheet = RgbaImage::from_pixel(columns * cell_w, rows * cell_h, TRANSPARENT);
    for (i, frame) in frames.iter().enumerate() {
        let x = (i as u32 % columns) * cell_w;
        let y = (i as u32 / columns) * cell_h;
        image::imageops::replace(&mut sheet, frame, x as i64, y as i64);
    }
    sheet
}

/// Render each tile with its own palette from `bank`, then lay them out.
pub fn render_tiles(
    tiles: &[Tile],
    bank: &PaletteBank,
    cols: u32,
    scale: u32,
) -> Result<RgbaImage, OutputError> {
    let frames = tiles
        .iter()
        .map(|tile| render_tile_scaled(tile, bank.get(tile.palette_index()), scale))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render_sheet(&frames, cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{PaletteIndex, PaletteSlot};
    use image::Rgba;

    #[test]
    fn test_empty_frames() {
        let sheet = render_sheet(&[], 8);
        assert_eq!(sheet.dimensions(), (1, 1));
        assert_eq!(*sheet.get_pixel(0, 0), TRANSPARENT);
    }

    #[test]
    fn test_columns_capped_by_frame_count() {
        let frames = vec![RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])); 3];
        let sheet = render_sheet(&frames, 8);
        assert_eq!(sheet.dimensions(), (6, 2));
    }

    #[test]
    fn test_grid_order_row_major() {
        let red = Rgba([255, 0, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let frames = vec![
            RgbaImage::from_pixel(2, 2, red),
            RgbaImage::from_pixel(2, 2, red),
            RgbaImage::from_pixel(2, 2, blue),
        ];
        let sheet = render_sheet(&frames, 2);
        assert_eq!(*sheet.get_pixel(0, 2), blue);
        // Missing fourth cell stays clear
        assert_eq!(*sheet.get_pixel(3, 3), TRANSPARENT);
    }

    #[test]
    fn test_mixed_sizes_padded() {
        let frames = vec![
            RgbaImage::from_pixel(8, 16, Rgba([1, 1, 1, 255])),
            RgbaImage::from_pixel(8, 8, Rgba([2, 2, 2, 255])),
        ];
        let sheet = render_sheet(&frames, 2);
        assert_eq!(sheet.dimensions(), (16, 16));
        assert_eq!(*sheet.get_pixel(8, 12), TRANSPARENT);
    }

    #[test]
    fn test_render_tiles_uses_each_palette() {
        let mut bank = PaletteBank::default();
        let one = PaletteSlot::new(1).unwrap();
        let p1 = PaletteIndex::new(1).unwrap();
        bank.set_color(p1, one, crate::color::Color::new(0x16).unwrap());

        let a = Tile::filled(8, 8, one, PaletteIndex::default()).unwrap();
        let b = Tile::filled(8, 8, one, p1).unwrap();
        let sheet = render_tiles(&[a, b], &bank, 8, 1).unwrap();

        assert_eq!(*sheet.get_pixel(0, 0), bank.get(PaletteIndex::default()).color(one).rgba());
        assert_eq!(*sheet.get_pixel(8, 0), crate::color::Color::new(0x16).unwrap().rgba());
    }
}
