//! Single owner of the editing state
//!
//! [`Editor`] holds the current [`Project`] and the hardware limits. Every
//! edit computes a new value from the current one and only replaces it once
//! the whole edit has succeeded, so a failed call leaves the state exactly
//! as it was.

use crate::color::Color;
use crate::palette::{PaletteIndex, PaletteSlot};
use crate::project::{Project, ProjectError};
use crate::resize::{resize, Anchor};
use crate::screen::{ScreenError, SpriteInstance};
use crate::swap::swap_blocks;
use crate::tile::Tile;
use crate::validate::HardwareLimits;

#[derive(Debug, Clone, Default)]
pub struct Editor {
    project: Project,
    limits: HardwareLimits,
}

impl Editor {
    /// Take ownership of a project. The project is checked against `limits`.
    pub fn new(project: Project, limits: HardwareLimits) -> Result<Self, ProjectError> {
        project.check(&limits)?;
        Ok(Self { project, limits })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn limits(&self) -> &HardwareLimits {
        &self.limits
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    pub fn sprite(&self, index: usize) -> Result<&Tile, ProjectError> {
        self.project.sprites.get(index)
    }

    fn update_sprite<F>(&mut self, index: usize, edit: F) -> Result<(), ProjectError>
    where
        F: FnOnce(&Tile) -> Result<Tile, ProjectError>,
    {
        let next = edit(self.project.sprites.get(index)?)?;
        self.project.sprites = self.project.sprites.with_tile(index, next)?;
        Ok(())
    }

    pub fn set_pixel(
        &mut self,
        sprite: usize,
        x: u32,
        y: u32,
        slot: PaletteSlot,
    ) -> Result<(), ProjectError> {
        self.update_sprite(sprite, |tile| Ok(tile.with_pixel(x, y, slot)?))
    }

    /// Non-destructive resize; shrinking keeps the hidden pixels for later.
    pub fn resize_sprite(
        &mut self,
        sprite: usize,
        width: u32,
        height: u32,
        anchor: Anchor,
        fill: PaletteSlot,
    ) -> Result<(), ProjectError> {
        self.update_sprite(sprite, |tile| Ok(resize(tile, width, height, anchor, fill)?))
    }

    pub fn swap_sprite_blocks(
        &mut self,
        sprite: usize,
        a: (i32, i32),
        b: (i32, i32),
    ) -> Result<(), ProjectError> {
        self.update_sprite(sprite, |tile| Ok(swap_blocks(tile, a.0, a.1, b.0, b.1)))
    }

    /// Reset a slot to an empty tile of the same size. History is dropped.
    pub fn clear_sprite(&mut self, sprite: usize) -> Result<(), ProjectError> {
        self.update_sprite(sprite, |tile| Ok(tile.cleared()))
    }

    pub fn set_sprite_palette(
        &mut self,
        sprite: usize,
        palette: PaletteIndex,
    ) -> Result<(), ProjectError> {
        self.update_sprite(sprite, |tile| Ok(tile.with_palette_index(palette)))
    }

    pub fn set_palette_color(&mut self, palette: PaletteIndex, slot: PaletteSlot, color: Color) {
        self.project.palettes.set_color(palette, slot, color);
    }

    /// Place a copy of sheet slot `sprite` at `(x, y)`.
    ///
    /// Draws with the tile's own palette unless `palette` is given. Returns
    /// the index of the new instance.
    pub fn place_sprite(
        &mut self,
        sprite: usize,
        x: i32,
        y: i32,
        palette: Option<PaletteIndex>,
    ) -> Result<usize, ProjectError> {
        let tile = self.project.sprites.get(sprite)?.clone();
        let mut instance = SpriteInstance::new(sprite, x, y, tile);
        if let Some(palette) = palette {
            instance = instance.with_palette(palette);
        }

        let screen = self.project.screen.with_sprite(instance, &self.limits).map_err(|e| {
            log::warn!("placing sprite {} at ({}, {}) refused: {}", sprite, x, y, e);
            e
        })?;
        self.project.screen = screen;
        Ok(self.project.screen.sprites().len() - 1)
    }

    pub fn move_sprite(&mut self, instance: usize, x: i32, y: i32) -> Result<(), ProjectError> {
        let screen =
            self.project.screen.with_sprite_moved(instance, x, y, &self.limits).map_err(|e| {
                log::warn!("moving instance {} to ({}, {}) refused: {}", instance, x, y, e);
                e
            })?;
        self.project.screen = screen;
        Ok(())
    }

    /// Remove a placed sprite. Never refused for placement reasons.
    pub fn remove_sprite(&mut self, instance: usize) -> Result<SpriteInstance, ProjectError> {
        let removed = self.project.screen.sprite(instance)?.clone();
        self.project.screen = self.project.screen.without_sprite(instance)?;
        if let Err(remaining) = self.project.screen.check(&self.limits) {
            log::debug!("after removing instance {}: {}", instance, remaining);
        }
        Ok(removed)
    }

    /// Replace every placed sprite at once. All or nothing.
    pub fn import_sprites(&mut self, sprites: Vec<SpriteInstance>) -> Result<(), ProjectError> {
        let len = self.project.sprites.len();
        if let Some(bad) = sprites.iter().find(|s| s.sprite_index >= len) {
            return Err(ScreenError::UnknownSprite { index: bad.sprite_index, len }.into());
        }
        let count = sprites.len();
        let screen = self.project.screen.with_sprites(sprites, &self.limits).map_err(|e| {
            log::warn!("importing {} sprites refused: {}", count, e);
            e
        })?;
        self.project.screen = screen;
        Ok(())
    }

    pub fn set_background_tile(
        &mut self,
        row: usize,
        col: usize,
        tile: Tile,
    ) -> Result<(), ProjectError> {
        self.project.screen = self.project.screen.with_background_tile(row, col, tile)?;
        Ok(())
    }

    /// Swap in a whole project (e.g. after loading a file).
    pub fn replace_project(&mut self, project: Project) -> Result<(), ProjectError> {
        project.check(&self.limits)?;
        self.project = project;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(v: u8) -> PaletteSlot {
        PaletteSlot::new(v).unwrap()
    }

    #[test]
    fn test_set_pixel_and_bounds() {
        let mut editor = Editor::default();
        editor.set_pixel(3, 7, 7, slot(2)).unwrap();
        assert_eq!(editor.sprite(3).unwrap().get(7, 7).unwrap(), slot(2));

        let before = editor.project().clone();
        assert!(editor.set_pixel(3, 8, 0, slot(1)).is_err());
        assert!(editor.set_pixel(64, 0, 0, slot(1)).is_err());
        assert_eq!(editor.project(), &before);
    }

    #[test]
    fn test_resize_keeps_hidden_pixels() {
        let mut editor = Editor::default();
        editor.resize_sprite(0, 16, 16, Anchor::TopLeft, slot(0)).unwrap();
        editor.set_pixel(0, 12, 12, slot(3)).unwrap();
        editor.resize_sprite(0, 8, 8, Anchor::TopLeft, slot(0)).unwrap();
        assert_eq!(editor.sprite(0).unwrap().opaque_count(), 0);
        editor.resize_sprite(0, 16, 16, Anchor::TopLeft, slot(0)).unwrap();
        assert_eq!(editor.sprite(0).unwrap().get(12, 12).unwrap(), slot(3));
    }

    #[test]
    fn test_clear_drops_history() {
        let mut editor = Editor::default();
        editor.resize_sprite(0, 16, 8, Anchor::Left, slot(0)).unwrap();
        editor.set_pixel(0, 15, 0, slot(1)).unwrap();
        editor.clear_sprite(0).unwrap();

        let cleared = editor.sprite(0).unwrap();
        assert_eq!((cleared.width(), cleared.height()), (16, 8));
        assert!(cleared.backing().is_none());
        assert_eq!(cleared.opaque_count(), 0);
    }

    #[test]
    fn test_swap_and_palette_edits() {
        let mut editor = Editor::default();
        editor.resize_sprite(1, 16, 8, Anchor::TopLeft, slot(0)).unwrap();
        editor.set_pixel(1, 0, 0, slot(1)).unwrap();
        editor.swap_sprite_blocks(1, (0, 0), (8, 0)).unwrap();
        assert_eq!(editor.sprite(1).unwrap().get(8, 0).unwrap(), slot(1));

        let p2 = PaletteIndex::new(2).unwrap();
        editor.set_sprite_palette(1, p2).unwrap();
        assert_eq!(editor.sprite(1).unwrap().palette_index(), p2);

        let red = Color::new(0x16).unwrap();
        editor.set_palette_color(p2, slot(1), red);
        assert_eq!(editor.project().palettes.resolve(p2, slot(1)), Some(red));
    }

    #[test]
    fn test_place_move_remove() {
        let mut editor = Editor::default();
        for i in 0..8 {
            assert_eq!(editor.place_sprite(i, 0, 0, None).unwrap(), i);
        }
        let refused = editor.place_sprite(8, 0, 7, None);
        assert!(matches!(refused, Err(ProjectError::Screen(ScreenError::Placement(_)))));
        assert_eq!(editor.project().screen.sprites().len(), 8);

        let idx = editor.place_sprite(8, 0, 8, Some(PaletteIndex::new(1).unwrap())).unwrap();
        assert_eq!(editor.project().screen.sprite(idx).unwrap().palette_index().value(), 1);
        assert!(editor.move_sprite(idx, 0, 0).is_err());
        editor.move_sprite(idx, 200, 200).unwrap();

        let removed = editor.remove_sprite(0).unwrap();
        assert_eq!(removed.sprite_index, 0);
        assert_eq!(editor.project().screen.sprites().len(), 8);
    }

    #[test]
    fn test_placed_copy_is_independent_of_sheet() {
        let mut editor = Editor::default();
        editor.place_sprite(2, 10, 10, None).unwrap();
        editor.set_pixel(2, 0, 0, slot(3)).unwrap();
        assert_eq!(editor.project().screen.sprite(0).unwrap().tile.opaque_count(), 0);
    }

    #[test]
    fn test_import_checks_references_and_limits() {
        let mut editor = Editor::default();
        let unknown = vec![SpriteInstance::new(99, 0, 0, Tile::default())];
        assert!(editor.import_sprites(unknown).is_err());

        let crowded: Vec<_> = (0..9).map(|i| SpriteInstance::new(i, 0, 0, Tile::default())).collect();
        assert!(editor.import_sprites(crowded).is_err());
        assert!(editor.project().screen.sprites().is_empty());

        let spread: Vec<_> =
            (0..9).map(|i| SpriteInstance::new(i, 0, i as i32 * 8, Tile::default())).collect();
        editor.import_sprites(spread).unwrap();
        assert_eq!(editor.project().screen.sprites().len(), 9);
    }

    #[test]
    fn test_replace_project_respects_limits() {
        let strict = HardwareLimits { max_sprites: 1, ..Default::default() };
        let mut editor = Editor::new(Project::default(), strict).unwrap();

        let mut loose = Editor::default();
        loose.place_sprite(0, 0, 0, None).unwrap();
        loose.place_sprite(1, 0, 100, None).unwrap();

        assert!(editor.replace_project(loose.project().clone()).is_err());
        assert!(editor.project().screen.sprites().is_empty());
    }
}
