//! Tile export formats.
//!
//! Three formats are supported, each behind the [`Exporter`] trait:
//!
//! - **CHR**: packed two-bitplane records for hardware pattern tables
//! - **PNG**: raster image, transparent where the pixel uses slot 0
//! - **SVG**: one unit square per opaque pixel
//!
//! # Example
//!
//! ```no_run
//! use chrsmith::export::{exporter_for, ExportFormat, ExportOptions};
//! use chrsmith::palette::Palette;
//! use chrsmith::tile::Tile;
//! use std::path::Path;
//!
//! let exporter = exporter_for(ExportFormat::Png);
//! exporter
//!     .export(&Tile::default(), &Palette::default(), Path::new("sprite_8x8.png"), &ExportOptions::default())
//!     .unwrap();
//! ```

pub mod raster;
pub mod svg;

pub use raster::{render_tile, render_tile_scaled};
pub use svg::render_tile_svg;

use crate::chr;
use crate::output::{save_bytes, save_png, save_text, OutputError};
use crate::palette::Palette;
use crate::tile::{Tile, TileError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Common error type for export operations.
#[derive(Debug)]
pub enum ExportError {
    /// Writing the output failed
    Output(OutputError),
    /// The tile cannot be encoded in this format
    Tile(TileError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Output(e) => write!(f, "Output error: {}", e),
            ExportError::Tile(e) => write!(f, "Tile error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Output(e) => Some(e),
            ExportError::Tile(e) => Some(e),
        }
    }
}

impl From<OutputError> for ExportError {
    fn from(e: OutputError) -> Self {
        ExportError::Output(e)
    }
}

impl From<TileError> for ExportError {
    fn from(e: TileError) -> Self {
        ExportError::Tile(e)
    }
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Chr,
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Chr => "chr",
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Options for export operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Integer upscale factor for PNG output
    pub scale: u32,
    /// Output size multiplier for SVG (the viewBox stays at tile size)
    pub svg_scale: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { scale: 8, svg_scale: 8 }
    }
}

/// Trait for export format implementations.
pub trait Exporter {
    /// Export one tile, resolved through `palette`, to the specified path.
    fn export(
        &self,
        tile: &Tile,
        palette: &Palette,
        output_path: &Path,
        options: &ExportOptions,
    ) -> Result<(), ExportError>;

    /// Get the format name for this exporter.
    fn format_name(&self) -> &'static str;

    /// Get the default file extension for this format.
    fn extension(&self) -> &'static str;
}

/// Writes CHR records. Colors are irrelevant; only slot values are stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChrExporter;

impl Exporter for ChrExporter {
    fn export(
        &self,
        tile: &Tile,
        _palette: &Palette,
        output_path: &Path,
        _options: &ExportOptions,
    ) -> Result<(), ExportError> {
        let bytes = chr::encode(tile)?;
        save_bytes(&bytes, output_path)?;
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "CHR"
    }

    fn extension(&self) -> &'static str {
        ExportFormat::Chr.extension()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PngExporter;

impl Exporter for PngExporter {
    fn export(
        &self,
        tile: &Tile,
        palette: &Palette,
        output_path: &Path,
        options: &ExportOptions,
    ) -> Result<(), ExportError> {
        let image = render_tile_scaled(tile, palette, options.scale)?;
        save_png(&image, output_path)?;
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "PNG"
    }

    fn extension(&self) -> &'static str {
        ExportFormat::Png.extension()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SvgExporter;

impl Exporter for SvgExporter {
    fn export(
        &self,
        tile: &Tile,
        palette: &Palette,
        output_path: &Path,
        options: &ExportOptions,
    ) -> Result<(), ExportError> {
        let svg = render_tile_svg(tile, palette, options.svg_scale);
        save_text(&svg, output_path)?;
        Ok(())
    }

    fn format_name(&self) -> &'static str {
        "SVG"
    }

    fn extension(&self) -> &'static str {
        ExportFormat::Svg.extension()
    }
}

/// Pick the exporter for a format.
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Chr => Box::new(ChrExporter),
        ExportFormat::Png => Box::new(PngExporter),
        ExportFormat::Svg => Box::new(SvgExporter),
    }
}
