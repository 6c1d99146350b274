//! Project editing commands (new, resize, place)

use std::path::Path;
use std::process::ExitCode;

use crate::config::{ChrsmithConfig, CliOverrides};
use crate::editor::Editor;
use crate::palette::PaletteIndex;
use crate::project::Project;
use crate::resize::Anchor;

use super::{load_project, load_settings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the new command
pub fn run_new(output: &Path, force: bool) -> ExitCode {
    if output.exists() && !force {
        eprintln!("Error: '{}' already exists (use --force to overwrite)", output.display());
        return ExitCode::from(EXIT_ERROR);
    }
    if let Err(e) = Project::default().save(output) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Created project at {}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}

fn open_editor(
    config_path: Option<&Path>,
    project_path: &Path,
    overrides: &CliOverrides,
) -> Result<(Editor, ChrsmithConfig), ExitCode> {
    let config = load_settings(config_path, overrides)?;
    let project = load_project(project_path, &config)?;
    let editor = Editor::new(project, config.hardware_limits()).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    Ok((editor, config))
}

fn save_editor(editor: Editor, project_path: &Path, output: Option<&Path>) -> ExitCode {
    let target = output.unwrap_or(project_path);
    match editor.into_project().save(target) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: Failed to write '{}': {}", target.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the resize command
pub fn run_resize(
    config_path: Option<&Path>,
    project_path: &Path,
    sprite: usize,
    width: u32,
    height: u32,
    anchor: Option<Anchor>,
    fill: Option<u8>,
    output: Option<&Path>,
) -> ExitCode {
    let overrides = CliOverrides { anchor, fill, ..Default::default() };
    let (mut editor, config) = match open_editor(config_path, project_path, &overrides) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    if let Err(e) =
        editor.resize_sprite(sprite, width, height, config.resize.anchor, config.resize_fill())
    {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    println!("Resized sprite {} to {}x{} (anchor {})", sprite, width, height, config.resize.anchor);
    save_editor(editor, project_path, output)
}

/// Execute the place command
pub fn run_place(
    config_path: Option<&Path>,
    project_path: &Path,
    sprite: usize,
    x: i32,
    y: i32,
    palette: Option<u8>,
    output: Option<&Path>,
) -> ExitCode {
    let palette = match palette.map(PaletteIndex::new).transpose() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let (mut editor, _) = match open_editor(config_path, project_path, &CliOverrides::default()) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    match editor.place_sprite(sprite, x, y, palette) {
        Ok(instance) => {
            println!("Placed sprite {} at ({}, {}) as instance {}", sprite, x, y, instance);
            save_editor(editor, project_path, output)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
