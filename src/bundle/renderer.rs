//! Bundle traversal
//!
//! Walks the known sections of a bundle document in a fixed order and
//! renders one card per entity found.

use image::RgbaImage;
use serde::Serialize;
use serde_json::Value;

use super::descriptor::{DescriptorSource, TileDescriptor};
use super::document::{self, BundleHeader, SectionItems};
use super::label::{snake_to_title, Annotation};
use crate::config::LayoutConfig;
use crate::render::TileCompositor;

/// Output group a card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Player,
    Objective,
    Levels,
    Enemies,
    Weapons,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Player => "Player",
            Section::Objective => "Final Objective",
            Section::Levels => "Dungeon Levels",
            Section::Enemies => "Enemies",
            Section::Weapons => "Weapons",
        }
    }
}

/// Which annotations a card carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Player and objective: label only
    Feature,
    /// Enemies and weapons: label plus stat annotations
    Listed,
}

/// One rendered tile with its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub label: String,
    pub annotations: Vec<Annotation>,
    pub tile: RgbaImage,
    pub source: DescriptorSource,
}

/// Wall or floor tile of a level row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTile {
    pub tile: RgbaImage,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRow {
    pub name: String,
    pub depth: Option<i64>,
    pub wall: Option<LevelTile>,
    pub floor: Option<LevelTile>,
}

impl LevelRow {
    pub fn depth_label(&self) -> Option<String> {
        self.depth.map(|d| format!("Depth: {}", d))
    }
}

/// Everything produced by one render pass, grouped by section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub header: BundleHeader,
    pub player: Option<Card>,
    pub objective: Option<Card>,
    pub levels: Vec<LevelRow>,
    pub enemies: Vec<Card>,
    pub weapons: Vec<Card>,
}

impl RenderedView {
    /// All cards except level rows, in layout order
    pub fn cards(&self) -> impl Iterator<Item = (Section, &Card)> {
        self.player
            .iter()
            .map(|c| (Section::Player, c))
            .chain(self.objective.iter().map(|c| (Section::Objective, c)))
            .chain(self.enemies.iter().map(|c| (Section::Enemies, c)))
            .chain(self.weapons.iter().map(|c| (Section::Weapons, c)))
    }

    /// Number of rendered tiles, level tiles included
    pub fn tile_count(&self) -> usize {
        let level_tiles: usize = self
            .levels
            .iter()
            .map(|row| row.wall.is_some() as usize + row.floor.is_some() as usize)
            .sum();
        self.cards().count() + level_tiles
    }
}

/// Rendering switches taken from the layout config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub level_tile_labels: bool,
    pub extended_stats: bool,
}

impl From<&LayoutConfig> for RenderOptions {
    fn from(layout: &LayoutConfig) -> Self {
        Self {
            level_tile_labels: layout.level_tile_labels,
            extended_stats: layout.extended_stats,
        }
    }
}

/// Turns a bundle document into a [`RenderedView`]
pub struct BundleRenderer<'a> {
    compositor: TileCompositor<'a>,
    options: RenderOptions,
}

impl<'a> BundleRenderer<'a> {
    pub fn new(compositor: TileCompositor<'a>, options: RenderOptions) -> Self {
        Self { compositor, options }
    }

    /// Render every known section of `doc`.
    ///
    /// Never fails: malformed sections and entities are skipped with a warning.
    pub fn render(&self, doc: &Value) -> RenderedView {
        let view = RenderedView {
            header: BundleHeader::from_document(doc),
            player: self.render_feature(doc, &document::PLAYER_KEYS, Section::Player),
            objective: self.render_feature(doc, &document::OBJECTIVE_KEYS, Section::Objective),
            levels: self.render_levels(doc),
            enemies: self.render_list(doc, &document::ENEMY_KEYS, Section::Enemies),
            weapons: self.render_list(doc, &document::WEAPON_KEYS, Section::Weapons),
        };

        log::debug!(
            "Rendered '{}': {} levels, {} enemies, {} weapons",
            view.header.name,
            view.levels.len(),
            view.enemies.len(),
            view.weapons.len()
        );
        view
    }

    /// Build a card for one entity, or `None` if it has no tile data
    pub fn build_card(&self, entity: &Value, kind: CardKind) -> Option<Card> {
        let descriptor = TileDescriptor::resolve(entity)?;
        let tile = self.compositor.render_tile(&descriptor);
        let label = snake_to_title(descriptor.name.as_deref().unwrap_or_default());

        let annotations = match kind {
            CardKind::Feature => Vec::new(),
            CardKind::Listed => self.annotations(entity),
        };

        Some(Card {
            label,
            annotations,
            tile,
            source: descriptor.source,
        })
    }

    fn annotations(&self, entity: &Value) -> Vec<Annotation> {
        let mut notes = Vec::new();
        if let Some(n) = document::number(entity, &document::RARITY_KEYS) {
            notes.push(Annotation::Rarity(n));
        }
        if let Some(n) = document::number(entity, &document::THREAT_KEYS) {
            notes.push(Annotation::Threat(n));
        }

        if self.options.extended_stats {
            if let Some(n) = document::number(entity, &document::WEIGHT_KEYS) {
                notes.push(Annotation::Weight(n));
            }
            if let Some(n) = document::number(entity, &document::MANA_COST_KEYS) {
                notes.push(Annotation::ManaCost(n));
            }
            if let Some(t) = document::first(entity, &document::WEAPON_TYPE_KEYS).and_then(Value::as_str) {
                notes.push(Annotation::WeaponType(t.to_string()));
            }
        }
        notes
    }

    fn render_feature(&self, doc: &Value, keys: &[&str], section: Section) -> Option<Card> {
        let node = document::first(doc, keys)?;
        if !node.is_object() {
            log::warn!("Skipping {} section: not an object", section.title());
            return None;
        }

        let card = self.build_card(node, CardKind::Feature);
        if card.is_none() {
            log::warn!("{} has no tile data", section.title());
        }
        card
    }

    fn render_list(&self, doc: &Value, keys: &[&str], section: Section) -> Vec<Card> {
        let items = match document::section_items(doc, keys) {
            SectionItems::Absent => return Vec::new(),
            SectionItems::Malformed(reason) => {
                log::warn!("Skipping {} section: {}", section.title(), reason);
                return Vec::new();
            }
            SectionItems::Items(items) => items,
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(i, entity)| {
                let card = self.build_card(entity, CardKind::Listed);
                if card.is_none() {
                    log::warn!("Skipping {} entry #{}: no tile data", section.title(), i + 1);
                }
                card
            })
            .collect()
    }

    fn render_levels(&self, doc: &Value) -> Vec<LevelRow> {
        let items = match document::section_items(doc, &document::LEVEL_KEYS) {
            SectionItems::Absent => return Vec::new(),
            SectionItems::Malformed(reason) => {
                log::warn!("Skipping {} section: {}", Section::Levels.title(), reason);
                return Vec::new();
            }
            SectionItems::Items(items) => items,
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(i, level)| {
                if !level.is_object() {
                    log::warn!("Skipping level #{}: not an object", i + 1);
                    return None;
                }
                Some(LevelRow {
                    name: level.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                    depth: level.get("depth").and_then(Value::as_i64),
                    wall: self.level_tile(level, &document::WALL_TILE_KEYS),
                    floor: self.level_tile(level, &document::FLOOR_TILE_KEYS),
                })
            })
            .collect()
    }

    fn level_tile(&self, level: &Value, keys: &[&str]) -> Option<LevelTile> {
        let node = document::first(level, keys).filter(|v| v.is_object())?;
        let descriptor = TileDescriptor::from_tile(node);
        let label = self
            .options
            .level_tile_labels
            .then(|| snake_to_title(descriptor.name.as_deref().unwrap_or_default()));

        Some(LevelTile {
            tile: self.compositor.render_tile(&descriptor),
            label,
        })
    }
}
