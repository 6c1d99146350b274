//! CHR tile codec
//!
//! Converts tiles to and from the console's pattern-table layout: each 8x8
//! cell is a 16-byte record, 8 bytes of bitplane 0 (pixel low bits, rows
//! 0..7) followed by 8 bytes of bitplane 1 (high bits). Column 0 is bit 7.
//! Larger tiles are a row-major sequence of cell records.

use crate::palette::{PaletteIndex, PaletteSlot};
use crate::tile::{check_size, Tile, TileError, CELL};

/// Bytes per 8x8 record.
pub const RECORD_LEN: usize = 16;

/// Encode one 8x8 tile.
///
/// ```
/// use chrsmith::chr::encode_8x8;
/// use chrsmith::tile::Tile;
///
/// assert_eq!(encode_8x8(&Tile::default()).unwrap(), [0u8; 16]);
/// ```
pub fn encode_8x8(tile: &Tile) -> Result<[u8; RECORD_LEN], TileError> {
    if tile.width() != CELL || tile.height() != CELL {
        return Err(TileError::UnsupportedSize {
            operation: "encode_8x8",
            expected: "8x8",
            width: tile.width(),
            height: tile.height(),
        });
    }

    let mut out = [0u8; RECORD_LEN];
    for (y, row) in tile.rows().enumerate() {
        let mut plane0 = 0u8;
        let mut plane1 = 0u8;
        for (x, slot) in row.iter().enumerate() {
            plane0 |= slot.low_bit() << (7 - x);
            plane1 |= slot.high_bit() << (7 - x);
        }
        out[y] = plane0;
        out[y + 8] = plane1;
    }
    Ok(out)
}

/// Encode an 8x16 sprite given as its top and bottom 8x8 halves.
pub fn encode_8x16(top: &Tile, bottom: &Tile) -> Result<[u8; RECORD_LEN * 2], TileError> {
    for half in [top, bottom] {
        if half.width() != CELL || half.height() != CELL {
            return Err(TileError::UnsupportedSize {
                operation: "encode_8x16",
                expected: "8x8 top and bottom",
                width: half.width(),
                height: half.height(),
            });
        }
    }

    let mut out = [0u8; RECORD_LEN * 2];
    out[..RECORD_LEN].copy_from_slice(&encode_8x8(top)?);
    out[RECORD_LEN..].copy_from_slice(&encode_8x8(bottom)?);
    Ok(out)
}

/// Encode a tile of any valid size as concatenated 8x8 records.
///
/// 8x16 tiles go through [`encode_8x16`]; the bytes are the same as the
/// general path.
pub fn encode(tile: &Tile) -> Result<Vec<u8>, TileError> {
    check_size(tile.width(), tile.height())?;

    if tile.width() == CELL && tile.height() == CELL * 2 {
        let top = tile.sub_tile(0, 0, CELL, CELL)?;
        let bottom = tile.sub_tile(0, CELL, CELL, CELL)?;
        return Ok(encode_8x16(&top, &bottom)?.to_vec());
    }

    let cells = tile.split_8x8();
    let mut out = Vec::with_capacity(cells.len() * RECORD_LEN);
    for cell in &cells {
        out.extend_from_slice(&encode_8x8(cell)?);
    }
    Ok(out)
}

/// Decode one 16-byte record into an 8x8 tile using palette 0.
pub fn decode_8x8(bytes: &[u8; RECORD_LEN]) -> Tile {
    decode_record(bytes, PaletteIndex::default())
}

fn decode_record(bytes: &[u8], palette_index: PaletteIndex) -> Tile {
    let mut pixels = Vec::with_capacity((CELL * CELL) as usize);
    for y in 0..CELL as usize {
        let plane0 = bytes[y];
        let plane1 = bytes[y + 8];
        for x in 0..CELL {
            let bit0 = (plane0 >> (7 - x)) & 1;
            let bit1 = (plane1 >> (7 - x)) & 1;
            pixels.push(PaletteSlot::from_bits((bit1 << 1) | bit0));
        }
    }
    Tile::from_parts(CELL, CELL, palette_index, pixels, None)
}

/// Inverse of [`encode`]: rebuild a `width` x `height` tile from its records.
pub fn decode(
    bytes: &[u8],
    width: u32,
    height: u32,
    palette_index: PaletteIndex,
) -> Result<Tile, TileError> {
    check_size(width, height)?;
    let cols = width / CELL;
    let expected = ((width / CELL) * (height / CELL)) as usize * RECORD_LEN;
    if bytes.len() != expected {
        return Err(TileError::TruncatedChr { found: bytes.len(), expected });
    }

    let mut tile = Tile::new(width, height, palette_index)?;
    for (i, record) in bytes.chunks_exact(RECORD_LEN).enumerate() {
        let cell = decode_record(record, palette_index);
        let ox = (i as u32 % cols) * CELL;
        let oy = (i as u32 / cols) * CELL;
        for (y, row) in cell.rows().enumerate() {
            for (x, &slot) in row.iter().enumerate() {
                tile.set(ox + x as u32, oy + y as u32, slot)?;
            }
        }
    }
    Ok(tile)
}
