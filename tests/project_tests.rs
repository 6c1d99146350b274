//! Project file loading, saving and format compatibility

use std::fs;
use std::path::Path;

use chrsmith::editor::Editor;
use chrsmith::palette::{PaletteIndex, PaletteSlot};
use chrsmith::project::{Project, ProjectError};
use chrsmith::resize::Anchor;
use chrsmith::screen::{Screen, ScreenError};
use chrsmith::validate::HardwareLimits;
use tempfile::TempDir;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn test_legacy_project_loads_with_empty_screen() {
    let project =
        Project::load(&fixture("legacy_no_screen.json"), &HardwareLimits::default()).unwrap();
    assert_eq!(project.screen, Screen::new());
    assert_eq!(project.sprites.len(), 64);

    let arrow = project.sprites.get(0).unwrap();
    assert_eq!(arrow.palette_index(), PaletteIndex::new(1).unwrap());
    assert_eq!(arrow.get(3, 2).unwrap().value(), 3);
    assert_eq!(project.palettes.get(PaletteIndex::new(1).unwrap()).0[3].index(), 48);
}

#[test]
fn test_legacy_project_gains_screen_on_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upgraded.json");

    let project =
        Project::load(&fixture("legacy_no_screen.json"), &HardwareLimits::default()).unwrap();
    project.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"screen\""));
    assert!(text.contains("\"backgroundTiles\""));
    assert_eq!(Project::load(&path, &HardwareLimits::default()).unwrap(), project);
}

#[test]
fn test_json5_fixture() {
    let project = Project::load(&fixture("arrow.json5"), &HardwareLimits::default()).unwrap();
    assert_eq!(project.screen.sprites().len(), 1);

    let placed = &project.screen.sprites()[0];
    assert_eq!((placed.sprite_index, placed.x, placed.y), (0, 16, 24));
    assert_eq!(placed.tile, *project.sprites.get(0).unwrap());
}

#[test]
fn test_json5_and_json_agree() {
    let json5 = Project::load(&fixture("arrow.json5"), &HardwareLimits::default()).unwrap();
    let text = json5.to_json().unwrap();
    assert_eq!(Project::from_json(&text, &HardwareLimits::default()).unwrap(), json5);
}

#[test]
fn test_edit_save_load_keeps_contents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/project.json");

    let mut editor = Editor::default();
    editor.set_pixel(5, 1, 2, PaletteSlot::new(2).unwrap()).unwrap();
    editor.resize_sprite(5, 16, 8, Anchor::Left, PaletteSlot::TRANSPARENT).unwrap();
    editor.place_sprite(5, 100, -3, Some(PaletteIndex::new(3).unwrap())).unwrap();
    editor.into_project().save(&path).unwrap();

    let loaded = Project::load(&path, &HardwareLimits::default()).unwrap();
    let tile = loaded.sprites.get(5).unwrap();
    assert_eq!((tile.width(), tile.height()), (16, 8));
    assert_eq!(tile.get(1, 2).unwrap().value(), 2);

    let placed = &loaded.screen.sprites()[0];
    assert_eq!((placed.x, placed.y), (100, -3));
    assert_eq!(placed.palette_index(), PaletteIndex::new(3).unwrap());
    // The sheet tile keeps its own palette
    assert_eq!(tile.palette_index(), PaletteIndex::default());
}

#[test]
fn test_load_rejects_crowded_screen_but_read_accepts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crowded.json");

    let anything = HardwareLimits { max_sprites: 1000, ..Default::default() };
    let mut editor = Editor::new(Project::default(), anything).unwrap();
    for i in 0..65 {
        editor.place_sprite(0, (i % 8) * 32, (i / 8) * 24, None).unwrap();
    }
    editor.into_project().save(&path).unwrap();

    let err = Project::load(&path, &HardwareLimits::default()).unwrap_err();
    assert!(matches!(err, ProjectError::Screen(ScreenError::Placement(_))));
    assert!(err.to_string().contains("65/64 placed"), "{}", err);

    let read = Project::read(&path).unwrap();
    assert_eq!(read.screen.sprites().len(), 65);
}

#[test]
fn test_unknown_sprite_reference_is_rejected() {
    let mut value = serde_json::to_value(Project::default()).unwrap();
    value["screen"]["sprites"] = serde_json::json!([{
        "spriteIndex": 64,
        "x": 0,
        "y": 0,
        "width": 8,
        "height": 8,
        "pixels": vec![vec![0; 8]; 8],
    }]);

    let err = Project::from_json(&value.to_string(), &HardwareLimits::default()).unwrap_err();
    assert!(matches!(err, ProjectError::Screen(ScreenError::UnknownSprite { index: 64, .. })));
}

#[test]
fn test_structural_errors() {
    let limits = HardwareLimits::default();

    let mut value = serde_json::to_value(Project::default()).unwrap();
    value["sprites"][3]["pixels"][0][0] = serde_json::json!(4);
    assert!(Project::from_json(&value.to_string(), &limits).is_err());

    let mut value = serde_json::to_value(Project::default()).unwrap();
    value["sprites"][3]["width"] = serde_json::json!(12);
    assert!(Project::from_json(&value.to_string(), &limits).is_err());

    let mut value = serde_json::to_value(Project::default()).unwrap();
    value["palettes"][0][1] = serde_json::json!(64);
    assert!(Project::from_json(&value.to_string(), &limits).is_err());

    let mut value = serde_json::to_value(Project::default()).unwrap();
    value["sprites"].as_array_mut().unwrap().pop();
    let err = Project::from_json(&value.to_string(), &limits).unwrap_err();
    assert!(err.to_string().contains("got 63"), "{}", err);
}

#[test]
fn test_missing_file() {
    let err = Project::load(Path::new("does/not/exist.json"), &HardwareLimits::default())
        .unwrap_err();
    assert!(matches!(err, ProjectError::Io(_)));
}
