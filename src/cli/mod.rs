//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod export;
mod project;
mod screen;
mod validate;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, ChrsmithConfig, CliOverrides};
use crate::export::ExportFormat;
use crate::project::Project;
use crate::resize::Anchor;
use crate::spritesheet::DEFAULT_COLUMNS;
use crate::validate::ScanlinePolicy;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// chrsmith - edit and export console sprite tiles
#[derive(Parser)]
#[command(name = "chrs")]
#[command(about = "chrsmith - sprite tiles, CHR export and screen layout for 8-bit consoles")]
#[command(version)]
pub struct Cli {
    /// Use this chrsmith.toml instead of searching for one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default project (64 empty 8x8 sprites, empty screen)
    New {
        /// Project file to create
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Export one sprite as CHR, PNG or SVG
    Export {
        /// Project file (.json or .json5)
        project: PathBuf,

        /// Sprite sheet slot (0-63)
        #[arg(short, long, default_value = "0")]
        sprite: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "chr")]
        format: ExportFormat,

        /// Output file or directory.
        /// If omitted: sprite_{w}x{h}.{ext}
        /// If directory (ends with /): dir/sprite_{w}x{h}.{ext}
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PNG scale factor, or SVG size multiplier (default from config: 8)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,
    },

    /// Render the whole sprite sheet to one PNG
    Sheet {
        project: PathBuf,

        /// Output PNG path
        #[arg(short, long, default_value = "sprites.png")]
        output: PathBuf,

        /// Sprites per row
        #[arg(long, default_value_t = DEFAULT_COLUMNS)]
        cols: u32,

        /// Scale factor (default from config: 8)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: Option<u32>,
    },

    /// Composite the screen (background and sprites) to PNG
    Screen {
        project: PathBuf,

        /// Output PNG path
        #[arg(short, long, default_value = "screen.png")]
        output: PathBuf,

        /// Scale factor
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=16))]
        scale: u32,
    },

    /// Check the screen against sprite count and scanline limits
    Validate {
        project: PathBuf,

        /// How sprites above or below the screen are counted
        #[arg(long)]
        scanline_policy: Option<ScanlinePolicy>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resize a sprite, keeping pixels pushed out of view
    Resize {
        project: PathBuf,

        #[arg(short, long)]
        sprite: usize,

        /// New width (multiple of 8)
        #[arg(long)]
        width: u32,

        /// New height (multiple of 8)
        #[arg(long)]
        height: u32,

        /// Which edge or corner stays put (default from config: top-left)
        #[arg(long)]
        anchor: Option<Anchor>,

        /// Palette slot for newly exposed pixels (0-3)
        #[arg(long)]
        fill: Option<u8>,

        /// Write the result here instead of updating the project in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Place a sprite on the screen
    Place {
        project: PathBuf,

        #[arg(short, long)]
        sprite: usize,

        #[arg(short, long, allow_negative_numbers = true)]
        x: i32,

        #[arg(short, long, allow_negative_numbers = true)]
        y: i32,

        /// Draw with this palette instead of the sprite's own (0-3)
        #[arg(short, long)]
        palette: Option<u8>,

        /// Write the result here instead of updating the project in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Set up `env_logger`. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

/// Load chrsmith.toml (explicit, discovered or default) and apply CLI
/// overrides. Prints the error and returns the exit code on failure.
pub(crate) fn load_settings(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<ChrsmithConfig, ExitCode> {
    let mut config = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    merge_cli_overrides(&mut config, overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok(config)
}

/// Load and check a project file.
pub(crate) fn load_project(path: &Path, config: &ChrsmithConfig) -> Result<Project, ExitCode> {
    Project::load(path, &config.hardware_limits()).map_err(|e| {
        eprintln!("Error: Cannot load project '{}': {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();

    match cli.command {
        Commands::New { output, force } => project::run_new(&output, force),
        Commands::Export { project, sprite, format, output, scale } => {
            export::run_export(config, &project, sprite, format, output.as_deref(), scale)
        }
        Commands::Sheet { project, output, cols, scale } => {
            export::run_sheet(config, &project, &output, cols, scale)
        }
        Commands::Screen { project, output, scale } => {
            screen::run_screen(config, &project, &output, scale)
        }
        Commands::Validate { project, scanline_policy, json } => {
            validate::run_validate(config, &project, scanline_policy, json)
        }
        Commands::Resize { project, sprite, width, height, anchor, fill, output } => {
            project::run_resize(
                config,
                &project,
                sprite,
                width,
                height,
                anchor,
                fill,
                output.as_deref(),
            )
        }
        Commands::Place { project, sprite, x, y, palette, output } => {
            project::run_place(config, &project, sprite, x, y, palette, output.as_deref())
        }
    }
}
