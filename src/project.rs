//! Project files: palette bank, sprite sheet and screen in one record
//!
//! The JSON shape is
//!
//! ```json
//! {
//!   "palettes": [[0, 1, 21, 34], ...],
//!   "sprites": [{ "width": 8, "height": 8, "paletteIndex": 0, "pixels": [[0, ...], ...] }, ...],
//!   "screen": { "width": 256, "height": 240, "backgroundTiles": [[...]], "sprites": [...] }
//! }
//! ```
//!
//! Projects written before the screen existed have no `screen` key and load
//! with an empty one.

use crate::palette::PaletteBank;
use crate::screen::{Screen, ScreenError};
use crate::tile::{Tile, TileError};
use crate::validate::HardwareLimits;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Number of slots in a sprite sheet.
pub const SHEET_LEN: usize = 64;

/// Error type for loading, saving and editing projects
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid project JSON5: {0}")]
    Json5(#[from] json5::Error),
    #[error("failed to access project file: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Tile(#[from] TileError),
    #[error(transparent)]
    Screen(#[from] ScreenError),
    #[error("sprite sheet must have {expected} slots: got {found}")]
    SheetLength { found: usize, expected: usize },
}

/// Fixed-length list of sprite tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct SpriteSheet(Vec<Tile>);

impl Default for SpriteSheet {
    /// 64 empty 8x8 tiles.
    fn default() -> Self {
        Self(vec![Tile::default(); SHEET_LEN])
    }
}

impl SpriteSheet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Result<&Tile, ProjectError> {
        self.0
            .get(index)
            .ok_or_else(|| ScreenError::UnknownSprite { index, len: self.0.len() }.into())
    }

    /// Copy of the sheet with slot `index` replaced.
    pub fn with_tile(&self, index: usize, tile: Tile) -> Result<Self, ProjectError> {
        self.get(index)?;
        let mut next = self.clone();
        next.0[index] = tile;
        Ok(next)
    }
}

impl TryFrom<Vec<Tile>> for SpriteSheet {
    type Error = ProjectError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self, Self::Error> {
        if tiles.len() != SHEET_LEN {
            return Err(ProjectError::SheetLength { found: tiles.len(), expected: SHEET_LEN });
        }
        Ok(Self(tiles))
    }
}

impl From<SpriteSheet> for Vec<Tile> {
    fn from(sheet: SpriteSheet) -> Self {
        sheet.0
    }
}

/// Everything the editor persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub palettes: PaletteBank,
    pub sprites: SpriteSheet,
    #[serde(default)]
    pub screen: Screen,
}

impl Project {
    /// Check the parts of a project that serde can't see on its own: every
    /// placed sprite refers to a real sheet slot and the screen passes the
    /// hardware limits.
    pub fn check(&self, limits: &HardwareLimits) -> Result<(), ProjectError> {
        for instance in self.screen.sprites() {
            if instance.sprite_index >= self.sprites.len() {
                return Err(ScreenError::UnknownSprite {
                    index: instance.sprite_index,
                    len: self.sprites.len(),
                }
                .into());
            }
        }
        self.screen.check(limits).map_err(ScreenError::from)?;
        Ok(())
    }

    /// Parse strict JSON and check the result.
    pub fn from_json(text: &str, limits: &HardwareLimits) -> Result<Self, ProjectError> {
        let project: Project = serde_json::from_str(text)?;
        project.check(limits)?;
        Ok(project)
    }

    /// Parse JSON5 (comments, trailing commas, unquoted keys) and check the
    /// result.
    pub fn from_json5(text: &str, limits: &HardwareLimits) -> Result<Self, ProjectError> {
        let project: Project = json5::from_str(text)?;
        project.check(limits)?;
        Ok(project)
    }

    /// Pretty-printed JSON. Sheet tiles carry their resize history along.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a project file without the placement check. Tile shapes, slot
    /// values and color indices are still enforced. `.json5` files are
    /// parsed leniently.
    pub fn read(path: &Path) -> Result<Self, ProjectError> {
        let text = std::fs::read_to_string(path)?;
        let lenient = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json5"));
        let project: Project =
            if lenient { json5::from_str(&text)? } else { serde_json::from_str(&text)? };
        Ok(project)
    }

    /// Read a project file and check it against `limits`.
    pub fn load(path: &Path, limits: &HardwareLimits) -> Result<Self, ProjectError> {
        let project = Self::read(path)?;
        project.check(limits)?;
        Ok(project)
    }

    /// Write the project as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        log::debug!("saved project to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::palette::{PaletteIndex, PaletteSlot};
    use crate::screen::SpriteInstance;

    #[test]
    fn test_default_project() {
        let project = Project::default();
        assert_eq!(project.sprites.len(), 64);
        assert!(project.sprites.tiles().iter().all(|t| t.width() == 8 && t.height() == 8));
        let defaults: Vec<u8> =
            project.palettes.get(PaletteIndex::default()).0.iter().map(|c| c.index()).collect();
        assert_eq!(defaults, vec![0, 1, 21, 34]);
    }

    #[test]
    fn test_json_field_names() {
        let json = Project::default().to_json().unwrap();
        assert!(json.contains("\"paletteIndex\""));
        assert!(json.contains("\"backgroundTiles\""));
        assert!(!json.contains("backing"));
    }

    #[test]
    fn test_json_roundtrip_preserves_content() {
        let mut project = Project::default();
        let tile = Tile::filled(16, 8, PaletteSlot::new(2).unwrap(), PaletteIndex::new(3).unwrap())
            .unwrap();
        project.sprites = project.sprites.with_tile(7, tile.clone()).unwrap();
        project.palettes.set_color(
            PaletteIndex::new(3).unwrap(),
            PaletteSlot::new(2).unwrap(),
            Color::new(0x2C).unwrap(),
        );
        project.screen = project
            .screen
            .with_sprite(SpriteInstance::new(7, -4, 100, tile), &HardwareLimits::default())
            .unwrap();

        let json = project.to_json().unwrap();
        let back = Project::from_json(&json, &HardwareLimits::default()).unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn test_missing_screen_defaults() {
        let mut value = serde_json::to_value(Project::default()).unwrap();
        value.as_object_mut().unwrap().remove("screen");
        let text = value.to_string();
        let project = Project::from_json(&text, &HardwareLimits::default()).unwrap();
        assert_eq!(project.screen, Screen::new());
    }

    #[test]
    fn test_rejects_short_sheet() {
        let mut value = serde_json::to_value(Project::default()).unwrap();
        value["sprites"].as_array_mut().unwrap().pop();
        let err = Project::from_json(&value.to_string(), &HardwareLimits::default()).unwrap_err();
        assert!(err.to_string().contains("64 slots: got 63"), "{}", err);
    }

    #[test]
    fn test_rejects_bad_pixel_value() {
        let mut value = serde_json::to_value(Project::default()).unwrap();
        value["sprites"][0]["pixels"][0][0] = 4.into();
        assert!(Project::from_json(&value.to_string(), &HardwareLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_color_index() {
        let mut value = serde_json::to_value(Project::default()).unwrap();
        value["palettes"][1][2] = 64.into();
        assert!(Project::from_json(&value.to_string(), &HardwareLimits::default()).is_err());
    }

    #[test]
    fn test_rejects_unknown_sprite_reference() {
        let mut project = Project::default();
        project.screen = project
            .screen
            .with_sprite(SpriteInstance::new(80, 0, 0, Tile::default()), &HardwareLimits::default())
            .unwrap();
        let err = Project::from_json(&project.to_json().unwrap(), &HardwareLimits::default())
            .unwrap_err();
        assert!(matches!(err, ProjectError::Screen(ScreenError::UnknownSprite { index: 80, .. })));
    }

    #[test]
    fn test_sheet_lookup_reports_screen_error() {
        let sheet = SpriteSheet::default();
        assert!(sheet.get(63).is_ok());
        let err = sheet.get(64).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Screen(ScreenError::UnknownSprite { index: 64, len: SHEET_LEN })
        ));
        assert_eq!(err.to_string(), "sprite 64 does not exist (sheet has 64 sprites)");
        assert!(sheet.with_tile(99, Tile::default()).is_err());
    }

    #[test]
    fn test_save_keeps_resize_history() {
        let full = Tile::filled(16, 16, PaletteSlot::new(3).unwrap(), PaletteIndex::default())
            .unwrap();
        let small = crate::resize::resize(
            &full,
            8,
            8,
            crate::resize::Anchor::Center,
            PaletteSlot::TRANSPARENT,
        )
        .unwrap();
        let mut project = Project::default();
        project.sprites = project.sprites.with_tile(5, small).unwrap();

        let json = project.to_json().unwrap();
        assert!(json.contains("\"backing\""));
        let loaded = Project::from_json(&json, &HardwareLimits::default()).unwrap();
        let regrown = crate::resize::resize(
            loaded.sprites.get(5).unwrap(),
            16,
            16,
            crate::resize::Anchor::Center,
            PaletteSlot::TRANSPARENT,
        )
        .unwrap();
        assert_eq!(regrown, full);
    }

    #[test]
    fn test_rejects_crowded_screen() {
        let mut value = serde_json::to_value(Project::default()).unwrap();
        let sprite = serde_json::to_value(SpriteInstance::new(0, 0, 0, Tile::default())).unwrap();
        value["screen"]["sprites"] = serde_json::Value::Array(vec![sprite; 9]);
        let err = Project::from_json(&value.to_string(), &HardwareLimits::default()).unwrap_err();
        assert!(matches!(err, ProjectError::Screen(ScreenError::Placement(_))));
    }

    #[test]
    fn test_json5_is_lenient() {
        let strict = Project::default().to_json().unwrap();
        let lenient =
            format!("// saved by hand\n{}", strict.replacen('{', "{\n  // palettes first\n", 1));
        let project = Project::from_json5(&lenient, &HardwareLimits::default()).unwrap();
        assert_eq!(project, Project::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/project.json");
        let project = Project::default();
        project.save(&path).unwrap();
        assert_eq!(Project::load(&path, &HardwareLimits::default()).unwrap(), project);

        let missing = Project::load(&dir.path().join("nope.json"), &HardwareLimits::default());
        assert!(matches!(missing, Err(ProjectError::Io(_))));
    }

    #[test]
    fn test_read_skips_placement_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crowded.json5");
        let crowded = Project {
            screen: Screen::new()
                .with_sprites_unchecked((0..9).map(|i| SpriteInstance::new(i, 0, 0, Tile::default()))),
            ..Default::default()
        };
        std::fs::write(&path, crowded.to_json().unwrap()).unwrap();

        assert_eq!(Project::read(&path).unwrap(), crowded);
        assert!(Project::load(&path, &HardwareLimits::default()).is_err());
    }
}
