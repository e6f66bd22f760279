//! Defensive accessors over a parsed bundle document
//!
//! The document is kept as a `serde_json::Value` so that one malformed
//! section cannot prevent the others from rendering.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{Result, ViewerError};

pub const PLAYER_KEYS: [&str; 1] = ["player"];
pub const OBJECTIVE_KEYS: [&str; 2] = ["final_objective", "finalObjective"];
pub const LEVEL_KEYS: [&str; 2] = ["dungeon_levels", "dungeonLevels"];
pub const ENEMY_KEYS: [&str; 1] = ["enemies"];
pub const WEAPON_KEYS: [&str; 1] = ["weapons"];

pub const RARITY_KEYS: [&str; 1] = ["rarity"];
/// Generated bundles spell the threat stat `thread`
pub const THREAT_KEYS: [&str; 4] = ["thread", "threat", "threat_level", "threatLevel"];
pub const WEIGHT_KEYS: [&str; 1] = ["weight"];
pub const MANA_COST_KEYS: [&str; 2] = ["mana_cost", "manaCost"];
pub const WEAPON_TYPE_KEYS: [&str; 2] = ["weapon_type", "weaponType"];

pub const WALL_TILE_KEYS: [&str; 2] = ["wall_tile_with_texture", "wallTile"];
pub const FLOOR_TILE_KEYS: [&str; 2] = ["floor_tile_with_texture", "floorTile"];

const UNTITLED: &str = "Untitled";

/// Parse document text. The root must be a JSON object.
pub fn parse_document(text: &str) -> Result<Value> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| ViewerError::DocumentParse(e.to_string()))?;
    if !doc.is_object() {
        return Err(ViewerError::DocumentParse(
            "expected a JSON object at the top level".to_string(),
        ));
    }
    Ok(doc)
}

/// Bundle title block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleHeader {
    pub name: String,
    pub description: String,
    pub generation_time_seconds: Number,
}

impl BundleHeader {
    pub fn from_document(doc: &Value) -> Self {
        let name = doc
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        let description = doc
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let generation_time_seconds = first(doc, &["generation_time_seconds", "generationTimeSeconds"])
            .and_then(Value::as_number)
            .cloned()
            .unwrap_or_else(|| Number::from(0));

        Self {
            name,
            description,
            generation_time_seconds,
        }
    }
}

/// The `items` of a list section
#[derive(Debug)]
pub enum SectionItems<'a> {
    /// Section key not present
    Absent,
    /// Present but not shaped as `{ items: [...] }`
    Malformed(&'static str),
    Items(&'a [Value]),
}

/// Look up `{ <key>: { items: [...] } }`
pub fn section_items<'a>(doc: &'a Value, keys: &[&str]) -> SectionItems<'a> {
    let Some(section) = first(doc, keys) else {
        return SectionItems::Absent;
    };
    if section.is_null() {
        return SectionItems::Absent;
    }
    if !section.is_object() {
        return SectionItems::Malformed("section is not an object");
    }

    match section.get("items") {
        None | Some(Value::Null) => SectionItems::Items(&[]),
        Some(Value::Array(items)) => SectionItems::Items(items),
        Some(_) => SectionItems::Malformed("items is not a list"),
    }
}

/// First non-null value among `keys`
pub fn first<'a>(node: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| node.get(*k))
        .find(|v| !v.is_null())
}

/// Numeric stat, if present
pub fn number(node: &Value, keys: &[&str]) -> Option<Number> {
    first(node, keys).and_then(Value::as_number).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(parse_document("{ not json"), Err(ViewerError::DocumentParse(_))));
        assert!(matches!(parse_document("[1, 2]"), Err(ViewerError::DocumentParse(_))));
        assert!(parse_document("{}").is_ok());
    }

    #[test]
    fn test_header_defaults() {
        let header = BundleHeader::from_document(&json!({}));
        assert_eq!(header.name, "Untitled");
        assert_eq!(header.description, "");
        assert_eq!(header.generation_time_seconds, Number::from(0));

        let header = BundleHeader::from_document(&json!({
            "name": "Cursed Crypts",
            "description": "Bones and candles",
            "generation_time_seconds": 42
        }));
        assert_eq!(header.name, "Cursed Crypts");
        assert_eq!(header.generation_time_seconds, Number::from(42));
    }

    #[test]
    fn test_section_shapes() {
        let doc = json!({
            "enemies": { "items": [{}, {}] },
            "weapons": { "items": "oops" },
            "dungeon_levels": {},
            "final_objective": 5
        });

        assert!(matches!(section_items(&doc, &ENEMY_KEYS), SectionItems::Items(items) if items.len() == 2));
        assert!(matches!(section_items(&doc, &WEAPON_KEYS), SectionItems::Malformed(_)));
        assert!(matches!(section_items(&doc, &LEVEL_KEYS), SectionItems::Items(items) if items.is_empty()));
        assert!(matches!(section_items(&doc, &OBJECTIVE_KEYS), SectionItems::Malformed(_)));
        assert!(matches!(section_items(&doc, &PLAYER_KEYS), SectionItems::Absent));
    }

    #[test]
    fn test_threat_aliases() {
        assert_eq!(number(&json!({ "thread": 4 }), &THREAT_KEYS), Some(Number::from(4)));
        assert_eq!(number(&json!({ "threatLevel": 9 }), &THREAT_KEYS), Some(Number::from(9)));
        assert_eq!(number(&json!({ "threat": "high" }), &THREAT_KEYS), None);
        assert_eq!(number(&json!({ "rarity": null }), &RARITY_KEYS), None);
    }
}
