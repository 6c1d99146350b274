//! Vector export: one unit square per opaque pixel

use crate::palette::Palette;
use crate::tile::Tile;
use std::fmt::Write;

/// Render a tile as an SVG document.
///
/// The viewBox is the tile grid (`0 0 width height`) and the document size
/// is the grid times `scale`. Each non-transparent pixel becomes a 1x1
/// `<rect>` filled with its resolved hex color; slot 0 emits nothing.
///
/// ```
/// use chrsmith::export::svg::render_tile_svg;
/// use chrsmith::palette::Palette;
/// use chrsmith::tile::Tile;
///
/// let svg = render_tile_svg(&Tile::default(), &Palette::default(), 8);
/// assert!(svg.contains(r#"viewBox="0 0 8 8""#));
/// assert!(!svg.contains("<rect"));
/// ```
pub fn render_tile_svg(tile: &Tile, palette: &Palette, scale: u32) -> String {
    let w = tile.width();
    let h = tile.height();

    let mut svg = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" shape-rendering="crispEdges">"#,
        u64::from(w) * u64::from(scale),
        u64::from(h) * u64::from(scale),
        w,
        h
    );

    for (y, row) in tile.rows().enumerate() {
        for (x, &slot) in row.iter().enumerate() {
            if let Some(color) = palette.resolve(slot) {
                let _ = writeln!(
                    svg,
                    r#"<rect x="{}" y="{}" width="1" height="1" fill="{}"/>"#,
                    x,
                    y,
                    color.hex()
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}
