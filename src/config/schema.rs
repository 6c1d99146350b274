//! Configuration schema types for `chrsmith.toml`
//!
//! Every section and field is optional; a missing file or an empty one
//! yields the console's stock limits and the editor's export defaults.
//!
//! ```toml
//! [limits]
//! max_sprites = 64
//! max_sprites_per_scanline = 8
//! max_reported_rows = 10
//! scanline_policy = "clamp"
//!
//! [export]
//! scale = 8
//! svg_scale = 8
//!
//! [resize]
//! anchor = "top-left"
//! fill = 0
//! ```

use crate::export::ExportOptions;
use crate::output::MAX_SCALE;
use crate::palette::PaletteSlot;
use crate::resize::Anchor;
use crate::validate::{HardwareLimits, ScanlinePolicy};
use serde::{Deserialize, Serialize};

/// Placement limits section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_sprites: usize,
    pub max_sprites_per_scanline: usize,
    /// Offending rows listed per scanline message
    pub max_reported_rows: usize,
    pub scanline_policy: ScanlinePolicy,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = HardwareLimits::default();
        Self {
            max_sprites: limits.max_sprites,
            max_sprites_per_scanline: limits.max_sprites_per_scanline,
            max_reported_rows: limits.max_reported_rows,
            scanline_policy: limits.scanline_policy,
        }
    }
}

/// Export section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// PNG upscale factor
    pub scale: u32,
    /// SVG width/height multiplier
    pub svg_scale: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let options = ExportOptions::default();
        Self { scale: options.scale, svg_scale: options.svg_scale }
    }
}

/// Resize defaults section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    pub anchor: Anchor,
    /// Slot written into newly exposed pixels
    pub fill: u8,
}

/// Root configuration structure for `chrsmith.toml`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChrsmithConfig {
    pub limits: LimitsConfig,
    pub export: ExportConfig,
    pub resize: ResizeConfig,
}

/// Validation error for configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "export.scale")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chrsmith.toml: '{}' {}", self.field, self.message)
    }
}

impl ChrsmithConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: u64| {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        };

        positive("limits.max_sprites", self.limits.max_sprites as u64);
        positive("limits.max_sprites_per_scanline", self.limits.max_sprites_per_scanline as u64);
        positive("limits.max_reported_rows", self.limits.max_reported_rows as u64);
        positive("export.scale", self.export.scale as u64);
        positive("export.svg_scale", self.export.svg_scale as u64);
        for (field, value) in
            [("export.scale", self.export.scale), ("export.svg_scale", self.export.svg_scale)]
        {
            if value > MAX_SCALE {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("must be at most {}, got {}", MAX_SCALE, value),
                });
            }
        }

        if PaletteSlot::new(self.resize.fill).is_err() {
            errors.push(ConfigValidationError {
                field: "resize.fill".to_string(),
                message: format!("must be a palette slot 0-3, got {}", self.resize.fill),
            });
        }

        errors
    }

    pub fn hardware_limits(&self) -> HardwareLimits {
        HardwareLimits {
            max_sprites: self.limits.max_sprites,
            max_sprites_per_scanline: self.limits.max_sprites_per_scanline,
            max_reported_rows: self.limits.max_reported_rows,
            scanline_policy: self.limits.scanline_policy,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions { scale: self.export.scale, svg_scale: self.export.svg_scale }
    }

    /// Fill slot for resizes; out-of-range values fall back to transparent
    /// (they are rejected by [`validate`](Self::validate) on load).
    pub fn resize_fill(&self) -> PaletteSlot {
        PaletteSlot::new(self.resize.fill).unwrap_or(PaletteSlot::TRANSPARENT)
    }
}
