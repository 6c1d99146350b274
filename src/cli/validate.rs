//! Validate command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::project::{Project, ProjectError};
use crate::screen::ScreenError;
use crate::validate::{scanline_counts, ScanlinePolicy};

use super::{load_settings, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the validate command
///
/// Prints each broken placement rule; exits with 1 if there are any.
pub fn run_validate(
    config_path: Option<&Path>,
    project_path: &Path,
    scanline_policy: Option<ScanlinePolicy>,
    json: bool,
) -> ExitCode {
    let overrides = CliOverrides { scanline_policy, ..Default::default() };
    let config = match load_settings(config_path, &overrides) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let project = match Project::read(project_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: Cannot load project '{}': {}", project_path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let limits = config.hardware_limits();
    let problems: Vec<(String, String)> = match project.check(&limits) {
        Ok(()) => Vec::new(),
        Err(ProjectError::Screen(ScreenError::Placement(v))) => {
            v.violations().iter().map(|v| (v.kind().to_string(), v.to_string())).collect()
        }
        Err(other) => vec![("reference".to_string(), other.to_string())],
    };
    let busiest = scanline_counts(&project.screen, &limits).into_iter().max().unwrap_or(0);

    if json {
        let result = serde_json::json!({
            "valid": problems.is_empty(),
            "sprites": project.screen.sprites().len(),
            "max_sprites": limits.max_sprites,
            "busiest_scanline": busiest,
            "violations": problems.iter().map(|(kind, message)| {
                serde_json::json!({ "kind": kind, "message": message })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&result) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else if problems.is_empty() {
        println!(
            "{}: OK ({}/{} sprites, busiest scanline {}/{})",
            project_path.display(),
            project.screen.sprites().len(),
            limits.max_sprites,
            busiest,
            limits.max_sprites_per_scanline
        );
    } else {
        for (kind, message) in &problems {
            eprintln!("{}: {}: {}", project_path.display(), kind, message);
        }
    }

    if problems.is_empty() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}
