//! Screen rendering command

use std::path::Path;
use std::process::ExitCode;

use crate::composition::render;
use crate::config::CliOverrides;
use crate::output::{save_png, scale_image};

use super::{load_project, load_settings, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the screen command
pub fn run_screen(
    config_path: Option<&Path>,
    project_path: &Path,
    output: &Path,
    scale: u32,
) -> ExitCode {
    let config = match load_settings(config_path, &CliOverrides::default()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let project = match load_project(project_path, &config) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let frame = render(&project.screen, &project.palettes);
    let image = match scale_image(frame.to_rgba(), scale) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!(
        "Saved screen ({} sprites) to {}",
        project.screen.sprites().len(),
        output.display()
    );
    ExitCode::from(EXIT_SUCCESS)
}
