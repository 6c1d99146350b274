//! chrsmith - sprite tiles for 8-bit console graphics
//!
//! This library provides:
//! - 2-bit tiles drawn through a bank of four 4-color palettes
//! - Non-destructive resizing that remembers pixels pushed out of view
//! - The CHR bitplane codec plus PNG and SVG export
//! - A screen model with hardware placement limits and a compositor

pub mod backing;
pub mod chr;
pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod editor;
pub mod export;
pub mod output;
pub mod palette;
pub mod project;
pub mod resize;
pub mod screen;
pub mod spritesheet;
pub mod swap;
pub mod tile;
pub mod validate;
