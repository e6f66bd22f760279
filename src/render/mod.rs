//! Tile rendering
//!
//! - `color`: tint parsing
//! - `surface`: RGBA surface with source-over / source-in compositing
//! - `compositor`: atlas cell + tint -> tile image
//! - `kitty`: inline terminal preview

pub mod color;
pub mod compositor;
pub mod kitty;
pub mod surface;

pub use color::Tint;
pub use compositor::{apply_tint, TileCompositor};
pub use kitty::KittyGraphics;
pub use surface::{composite, CompositeMode, Surface};
