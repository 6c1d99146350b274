//! Screen composition - background layer under sprite layer
//!
//! Both layers are tri-state: a cell is either a resolved [`Color`] or
//! empty. Slot-0 pixels never write, so "nothing drawn here" can't be
//! confused with a palette entry that happens to share the transparent
//! slot's stored color. Cells left empty by both layers show the bank's
//! backdrop color.

use crate::color::Color;
use crate::palette::{Palette, PaletteBank};
use crate::screen::Screen;
use crate::tile::{Tile, CELL};
use image::RgbaImage;

/// A fully resolved screen raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    /// Row-major
    pixels: Vec<Color>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Opaque RGBA image of the frame, one image pixel per screen pixel.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            self.pixels[(y * self.width + x) as usize].rgba()
        })
    }
}

/// One compositing layer.
struct Layer {
    width: u32,
    height: u32,
    cells: Vec<Option<Color>>,
}

impl Layer {
    fn new(width: u32, height: u32) -> Self {
        Self { width, height, cells: vec![None; (width * height) as usize] }
    }

    /// Draw `tile` with its top-left at `(x, y)`, clipped to the layer.
    /// Transparent pixels are skipped.
    fn blit(&mut self, tile: &Tile, palette: &Palette, x: i64, y: i64) {
        for (ty, row) in tile.rows().enumerate() {
            let dest_y = y + ty as i64;
            if dest_y < 0 {
                continue;
            }
            if dest_y >= self.height as i64 {
                break;
            }
            for (tx, &slot) in row.iter().enumerate() {
                let dest_x = x + tx as i64;
                if dest_x < 0 {
                    continue;
                }
                if dest_x >= self.width as i64 {
                    break;
                }
                if let Some(color) = palette.resolve(slot) {
                    self.cells[(dest_y * self.width as i64 + dest_x) as usize] = Some(color);
                }
            }
        }
    }
}

fn background_layer(screen: &Screen, bank: &PaletteBank) -> Layer {
    let mut layer = Layer::new(screen.width(), screen.height());
    for (row, tiles) in screen.background().iter().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            let palette = bank.get(tile.palette_index());
            layer.blit(tile, palette, (col as u32 * CELL) as i64, (row as u32 * CELL) as i64);
        }
    }
    layer
}

fn flatten(width: u32, height: u32, layers: &[&Layer], backdrop: Color) -> Frame {
    let pixels = (0..(width * height) as usize)
        .map(|i| layers.iter().find_map(|layer| layer.cells[i]).unwrap_or(backdrop))
        .collect();
    Frame { width, height, pixels }
}

/// Render the background tiles alone.
pub fn render_background(screen: &Screen, bank: &PaletteBank) -> Frame {
    let background = background_layer(screen, bank);
    flatten(screen.width(), screen.height(), &[&background], bank.backdrop())
}

/// Render a screen: background first, then sprites by ascending sprite
/// index (ties keep placement order), so higher indices end up on top.
///
/// ```
/// use chrsmith::composition::render;
/// use chrsmith::palette::PaletteBank;
/// use chrsmith::screen::Screen;
///
/// let bank = PaletteBank::default();
/// let frame = render(&Screen::new(), &bank);
/// assert_eq!(frame.get(0, 0), Some(bank.backdrop()));
/// ```
pub fn render(screen: &Screen, bank: &PaletteBank) -> Frame {
    let background = background_layer(screen, bank);

    let mut order: Vec<_> = screen.sprites().iter().collect();
    order.sort_by_key(|s| s.sprite_index);

    let mut sprites = Layer::new(screen.width(), screen.height());
    for sprite in order {
        sprites.blit(&sprite.tile, bank.get(sprite.palette_index()), sprite.x as i64, sprite.y as i64);
    }

    flatten(screen.width(), screen.height(), &[&sprites, &background], bank.backdrop())
}
