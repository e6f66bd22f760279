//! Bundleview - pixel-art previewer for generated asset bundles
//!
//! Reads a bundle document (player, final objective, dungeon levels, enemies,
//! weapons), cuts each entity's sprite out of a tileset atlas, tints it, and
//! lays the results out as one image.

pub mod atlas;
pub mod bundle;
pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod viewer;

// Re-export commonly used types
pub use atlas::{Atlas, AtlasHandle, AtlasStatus};
pub use bundle::{parse_document, BundleRenderer, RenderedView, Section};
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use render::TileCompositor;
pub use viewer::Viewer;
