//! Criterion benchmarks for chrsmith critical paths
//!
//! Benchmarks the operations that run on every edit or export:
//! - CHR: tile to bitplane records and back
//! - Resize: non-destructive resize through the backing store
//! - Validate: placement limits on a full screen
//! - Composition: full-screen render

use chrsmith::chr::{decode, encode};
use chrsmith::composition::render;
use chrsmith::palette::{PaletteBank, PaletteIndex};
use chrsmith::resize::{resize, Anchor};
use chrsmith::screen::{Screen, SpriteInstance};
use chrsmith::tile::Tile;
use chrsmith::validate::{validate, HardwareLimits};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Tile with a repeating 0..3 pattern
fn make_tile(width: u32, height: u32) -> Tile {
    let rows: Vec<Vec<u8>> = (0..height)
        .map(|y| (0..width).map(|x| ((x + y) % 4) as u8).collect())
        .collect();
    Tile::from_rows(&rows, PaletteIndex::default()).unwrap()
}

/// Screen with 64 sprites spread so no scanline holds more than 8
fn make_full_screen() -> Screen {
    let limits = HardwareLimits::default();
    let sprites = (0..64).map(|i| {
        let x = (i % 8) as i32 * 32;
        let y = (i / 8) as i32 * 30;
        SpriteInstance::new(i, x, y, make_tile(8, 8))
    });
    let mut screen = Screen::new().with_sprites(sprites, &limits).unwrap();
    for row in 0..30 {
        for col in 0..32 {
            screen = screen.with_background_tile(row, col, make_tile(8, 8)).unwrap();
        }
    }
    screen
}

// =============================================================================
// CHR Benchmarks
// =============================================================================

fn bench_chr(c: &mut Criterion) {
    let mut group = c.benchmark_group("chr");

    for size in [8u32, 16, 32, 64].iter() {
        let tile = make_tile(*size, *size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &tile, |b, tile| {
            b.iter(|| encode(black_box(tile)))
        });

        let bytes = encode(&tile).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", size), &bytes, |b, bytes| {
            b.iter(|| decode(black_box(bytes), *size, *size, PaletteIndex::default()))
        });
    }

    group.finish();
}

// =============================================================================
// Resize Benchmarks
// =============================================================================

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    let fill = Default::default();

    let tile = make_tile(32, 32);
    group.bench_function("shrink_grow_center_32", |b| {
        b.iter(|| {
            let small = resize(black_box(&tile), 8, 8, Anchor::Center, fill).unwrap();
            resize(&small, 32, 32, Anchor::Center, fill)
        })
    });

    // Store already grown; measures the steady-state view copy
    let backed = resize(&tile, 64, 64, Anchor::BottomRight, fill).unwrap();
    group.bench_function("regrow_backed_64", |b| {
        b.iter(|| resize(black_box(&backed), 64, 64, Anchor::TopLeft, fill))
    });

    group.finish();
}

// =============================================================================
// Screen Benchmarks
// =============================================================================

fn bench_screen(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");
    let screen = make_full_screen();
    let bank = PaletteBank::default();
    let limits = HardwareLimits::default();

    group.bench_function("validate_64_sprites", |b| {
        b.iter(|| validate(black_box(&screen), &limits))
    });

    group.bench_function("render_full_screen", |b| {
        b.iter(|| render(black_box(&screen), &bank))
    });

    group.finish();
}

criterion_group!(benches, bench_chr, bench_resize, bench_screen);
criterion_main!(benches);
