//! Configuration for chrsmith
//!
//! Provides types, discovery and parsing for `chrsmith.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
