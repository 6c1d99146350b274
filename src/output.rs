//! File output and default export paths

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("scaled image would be {width}x{height} at {factor}x, the limit is 16384 pixels per side")]
    TooLarge { width: u64, height: u64, factor: u32 },
}

/// Largest side of a scaled output image.
pub const MAX_IMAGE_SIDE: u32 = 16384;

/// Largest accepted upscale factor.
pub const MAX_SCALE: u32 = 64;

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Write raw bytes (CHR records) to a file, creating parent directories.
pub fn save_bytes(bytes: &[u8], path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Write a text document (SVG, project JSON) to a file.
pub fn save_text(text: &str, path: &Path) -> Result<(), OutputError> {
    save_bytes(text.as_bytes(), path)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Factors of 0 and 1 return the image unchanged. Results wider or taller
/// than [`MAX_IMAGE_SIDE`] are refused.
pub fn scale_image(image: RgbaImage, factor: u32) -> Result<RgbaImage, OutputError> {
    if factor <= 1 {
        return Ok(image);
    }
    let (w, h) = image.dimensions();
    let side = |n: u32| n.checked_mul(factor).filter(|&s| s <= MAX_IMAGE_SIDE);
    match (side(w), side(h)) {
        (Some(sw), Some(sh)) => Ok(image::imageops::resize(&image, sw, sh, FilterType::Nearest)),
        _ => Err(OutputError::TooLarge {
            width: u64::from(w) * u64::from(factor),
            height: u64::from(h) * u64::from(factor),
            factor,
        }),
    }
}

/// File name used when a tile is exported without an explicit path.
///
/// ```
/// use chrsmith::output::default_file_name;
///
/// assert_eq!(default_file_name(8, 16, "chr"), "sprite_8x16.chr");
/// assert_eq!(default_file_name(16, 8, "svg"), "sprite_16x8.svg");
/// ```
pub fn default_file_name(width: u32, height: u32, extension: &str) -> String {
    format!("sprite_{}x{}.{}", width, height, extension)
}

/// Resolve where an exported tile is written.
///
/// | `-o` argument | Output |
/// |---------------|--------|
/// | none | `sprite_{w}x{h}.{ext}` in the working directory |
/// | `dir/` or an existing directory | `dir/sprite_{w}x{h}.{ext}` |
/// | `file.ext` | `file.ext` |
pub fn default_output_path(
    width: u32,
    height: u32,
    extension: &str,
    output_arg: Option<&Path>,
) -> PathBuf {
    let name = default_file_name(width, height, extension);
    match output_arg {
        Some(output) => {
            let is_dir = output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir();
            if is_dir {
                output.join(name)
            } else {
                output.to_path_buf()
            }
        }
        None => PathBuf::from(name),
    }
}
