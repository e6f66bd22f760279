//! Asset bundle documents
//!
//! A bundle describes one generated game: player, final objective, dungeon
//! levels, enemies and weapons, each carrying a tile descriptor. This module
//! resolves those descriptors and renders the document into cards.

pub mod descriptor;
pub mod document;
pub mod label;
pub mod renderer;

pub use descriptor::{DescriptorSource, TileDescriptor};
pub use document::{parse_document, BundleHeader};
pub use label::{snake_to_title, Annotation};
pub use renderer::{
    BundleRenderer, Card, CardKind, LevelRow, LevelTile, RenderOptions, RenderedView, Section,
};
