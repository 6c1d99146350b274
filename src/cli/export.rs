//! Export commands (export, sheet)

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::export::{exporter_for, ExportFormat};
use crate::output::{default_output_path, save_png};
use crate::spritesheet::render_tiles;

use super::{load_project, load_settings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the export command
pub fn run_export(
    config_path: Option<&Path>,
    project_path: &Path,
    sprite: usize,
    format: ExportFormat,
    output: Option<&Path>,
    scale: Option<u32>,
) -> ExitCode {
    // --scale applies to whichever image format is being written
    let overrides = match format {
        ExportFormat::Svg => CliOverrides { svg_scale: scale, ..Default::default() },
        _ => CliOverrides { scale, ..Default::default() },
    };
    let config = match load_settings(config_path, &overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let project = match load_project(project_path, &config) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let tile = match project.sprites.get(sprite) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    let palette = project.palettes.get(tile.palette_index());
    let exporter = exporter_for(format);
    let path = default_output_path(tile.width(), tile.height(), exporter.extension(), output);

    match exporter.export(tile, palette, &path, &config.export_options()) {
        Ok(()) => {
            println!("Saved {} {} to {}", exporter.format_name(), sprite, path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the sheet command
pub fn run_sheet(
    config_path: Option<&Path>,
    project_path: &Path,
    output: &Path,
    cols: u32,
    scale: Option<u32>,
) -> ExitCode {
    if cols == 0 {
        eprintln!("Error: --cols must be at least 1");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    let overrides = CliOverrides { scale, ..Default::default() };
    let config = match load_settings(config_path, &overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let project = match load_project(project_path, &config) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let sheet =
        match render_tiles(project.sprites.tiles(), &project.palettes, cols, config.export.scale) {
            Ok(sheet) => sheet,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
    if let Err(e) = save_png(&sheet, output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved sprite sheet ({}x{}) to {}", sheet.width(), sheet.height(), output.display());
    ExitCode::from(EXIT_SUCCESS)
}
