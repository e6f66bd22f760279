//! Tile descriptor normalization
//!
//! Bundle entities carry their tile either directly (`texture`, `color`,
//! `name` on the node itself) or one level down under `tile_with_texture`.
//! Everything downstream works on the normalized [`TileDescriptor`].

use serde::Deserialize;
use serde_json::Value;

use crate::atlas::GridPos;

/// Key of the nested tile object on bundle entities
pub const NESTED_TILE_KEY: &str = "tile_with_texture";

const TEXTURE_KEY: &str = "texture";
const POSITION_KEYS: [&str; 3] = ["tileset_position", "tilesetPosition", "position"];

/// Where a descriptor's data was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSource {
    /// Fields live on the node itself
    Direct,
    /// Fields live under `tile_with_texture`
    Nested,
}

/// Which atlas cell to draw and how to tint it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDescriptor {
    pub name: Option<String>,
    pub position: Option<GridPos>,
    /// Raw color text; parsed by the compositor
    pub color: Option<String>,
    pub source: DescriptorSource,
}

impl TileDescriptor {
    /// Resolve the tile of a bundle entity.
    ///
    /// Returns `None` when the entity carries no tile data in either shape.
    /// A descriptor may still lack a position; that renders as a blank tile.
    pub fn resolve(entity: &Value) -> Option<TileDescriptor> {
        let has_direct =
            entity.get(TEXTURE_KEY).is_some_and(Value::is_object) || position_in(entity).is_some();
        let has_nested = nested(entity).is_some();
        if !has_direct && !has_nested {
            return None;
        }
        Some(Self::from_tile(entity))
    }

    /// Treat `node` itself as a tile, falling back to its nested tile for
    /// any field it does not carry directly.
    pub fn from_tile(node: &Value) -> TileDescriptor {
        let inner = nested(node);
        let source = if node.get(TEXTURE_KEY).is_some() || inner.is_none() {
            DescriptorSource::Direct
        } else {
            DescriptorSource::Nested
        };

        TileDescriptor {
            name: string_field(node, "name").or_else(|| inner.and_then(|t| string_field(t, "name"))),
            position: position(node).or_else(|| inner.and_then(position)),
            color: string_field(node, "color").or_else(|| inner.and_then(|t| string_field(t, "color"))),
            source,
        }
    }
}

fn nested(node: &Value) -> Option<&Value> {
    node.get(NESTED_TILE_KEY).filter(|v| v.is_object())
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_string)
}

/// `texture.tileset_position`, or a position placed on the tile itself
fn position(node: &Value) -> Option<GridPos> {
    let texture = node.get(TEXTURE_KEY).filter(|v| v.is_object());
    texture
        .and_then(position_in)
        .or_else(|| position_in(node))
}

fn position_in(node: &Value) -> Option<GridPos> {
    POSITION_KEYS
        .iter()
        .filter_map(|key| node.get(*key))
        .find_map(|v| GridPos::deserialize(v).ok())
}
