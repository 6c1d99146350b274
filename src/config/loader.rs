//! Configuration loading and discovery for `chrsmith.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::ChrsmithConfig;
use crate::resize::Anchor;
use crate::validate::ScanlinePolicy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up during discovery.
pub const CONFIG_FILE_NAME: &str = "chrsmith.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse chrsmith.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub scale: Option<u32>,
    pub svg_scale: Option<u32>,
    pub anchor: Option<Anchor>,
    pub fill: Option<u8>,
    pub scanline_policy: Option<ScanlinePolicy>,
}

/// Find chrsmith.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for chrsmith.toml
/// 2. Check XDG_CONFIG_HOME/chrsmith/chrsmith.toml (or ~/.config/chrsmith/chrsmith.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }
    find_xdg_config()
}

/// Find chrsmith.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("chrsmith").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find chrsmith.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, [`find_config`] is used and
/// a missing file means the default configuration.
pub fn load_config(path: Option<&Path>) -> Result<ChrsmithConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(ChrsmithConfig::default()),
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<ChrsmithConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate config text.
pub fn parse_config(contents: &str) -> Result<ChrsmithConfig, ConfigError> {
    let config: ChrsmithConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Merge CLI overrides into a configuration and validate the result.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    config: &mut ChrsmithConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(scale) = overrides.scale {
        config.export.scale = scale;
    }
    if let Some(svg_scale) = overrides.svg_scale {
        config.export.svg_scale = svg_scale;
    }
    if let Some(anchor) = overrides.anchor {
        config.resize.anchor = anchor;
    }
    if let Some(fill) = overrides.fill {
        config.resize.fill = fill;
    }
    if let Some(policy) = overrides.scanline_policy {
        config.limits.scanline_policy = policy;
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}
