//! Card placement for the composed view
//!
//! Lays the rendered view out top to bottom: header band, player and
//! objective, level rows, then the enemy and weapon grids. Text is not
//! rasterized; every label is recorded with the rectangle it belongs to.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::bundle::{Card, LevelRow, RenderedView, Section};
use crate::config::LayoutConfig;
use crate::render::{composite, CompositeMode};

const HEADER_BG: Rgba<u8> = Rgba([37, 37, 38, 255]);
const CARD_BG: Rgba<u8> = Rgba([45, 45, 48, 255]);
const ROW_BG: Rgba<u8> = Rgba([40, 40, 42, 255]);

const HEADER_HEIGHT: u32 = 56;
const SECTION_TITLE_HEIGHT: u32 = 20;
const TEXT_LINE_HEIGHT: u32 = 16;
const CARD_MIN_WIDTH: u32 = 96;
const LEVEL_NAME_WIDTH: u32 = 160;
const LEVEL_CAPTION_WIDTH: u32 = 48;

/// Pixel rectangle in the composed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn scaled(&self, factor: u32) -> Rect {
        Rect::new(self.x * factor, self.y * factor, self.width * factor, self.height * factor)
    }
}

/// What a placed element shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Header,
    SectionTitle,
    Card,
    LevelRow,
    LevelTile,
}

/// A labelled region of the composed image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEntry {
    pub kind: EntryKind,
    pub section: Option<Section>,
    pub label: String,
    pub annotations: Vec<String>,
    pub rect: Rect,
}

/// Composed view at layout resolution
#[derive(Debug, Clone)]
pub struct Composition {
    /// Transparent wherever nothing was drawn
    pub image: RgbaImage,
    pub entries: Vec<LayoutEntry>,
}

/// Computes placement and draws the view
pub struct ViewLayout<'a> {
    config: &'a LayoutConfig,
    tile_size: u32,
}

impl<'a> ViewLayout<'a> {
    /// `tile_size` is the rendered tile side (`tile_size * scale_factor`)
    pub fn new(config: &'a LayoutConfig, tile_size: u32) -> Self {
        Self { config, tile_size }
    }

    fn columns(&self) -> u32 {
        self.config.grid_columns.max(1)
    }

    fn card_width(&self) -> u32 {
        (self.tile_size + 2 * self.config.gap).max(CARD_MIN_WIDTH)
    }

    fn card_height(&self, text_lines: u32) -> u32 {
        self.tile_size + 2 * self.config.gap + text_lines * TEXT_LINE_HEIGHT
    }

    fn level_row_width(&self) -> u32 {
        let mini = self.config.level_tile_display_size;
        LEVEL_NAME_WIDTH + 2 * (LEVEL_CAPTION_WIDTH + mini + self.config.gap)
    }

    fn level_row_height(&self) -> u32 {
        let mut height = self.config.level_tile_display_size + 2 * self.config.gap;
        if self.config.level_tile_labels {
            height += TEXT_LINE_HEIGHT;
        }
        height.max(2 * TEXT_LINE_HEIGHT)
    }

    fn content_width(&self) -> u32 {
        let cols = self.columns();
        let grid = cols * self.card_width() + (cols - 1) * self.config.gap;
        grid.max(self.level_row_width())
    }

    /// Lay out and draw `view`
    pub fn compose(&self, view: &RenderedView) -> Composition {
        let pad = self.config.padding;
        let gap = self.config.gap;
        let text_lines = 1 + view
            .cards()
            .map(|(_, card)| card.annotations.len() as u32)
            .max()
            .unwrap_or(0);

        let width = 2 * pad + self.content_width();
        let height = self.total_height(view, text_lines);
        let mut canvas = Canvas::new(width, height);
        let mut entries = Vec::new();

        // Header band spans the full width
        let header = Rect::new(0, 0, width, HEADER_HEIGHT);
        canvas.fill_rect(header, HEADER_BG);
        entries.push(LayoutEntry {
            kind: EntryKind::Header,
            section: None,
            label: view.header.name.clone(),
            annotations: vec![
                view.header.description.clone(),
                format!("Generated in {}s", view.header.generation_time_seconds),
            ],
            rect: header,
        });

        let mut y = HEADER_HEIGHT + pad;

        // Player and objective share a row
        let features: Vec<(Section, &Card)> = view
            .cards()
            .filter(|(s, _)| matches!(s, Section::Player | Section::Objective))
            .collect();
        if !features.is_empty() {
            y = self.place_cards(&mut canvas, &mut entries, &features, y, text_lines);
        }

        if !view.levels.is_empty() {
            y = self.section_title(&mut entries, Section::Levels, y);
            for row in &view.levels {
                self.place_level_row(&mut canvas, &mut entries, row, y);
                y += self.level_row_height() + gap;
            }
            y += pad - gap.min(pad);
        }

        for (section, cards) in [(Section::Enemies, &view.enemies), (Section::Weapons, &view.weapons)] {
            if cards.is_empty() {
                continue;
            }
            let tagged: Vec<(Section, &Card)> = cards.iter().map(|c| (section, c)).collect();
            y = self.place_cards(&mut canvas, &mut entries, &tagged, y, text_lines);
        }

        Composition {
            image: canvas.into_image(),
            entries,
        }
    }

    fn total_height(&self, view: &RenderedView, text_lines: u32) -> u32 {
        let pad = self.config.padding;
        let gap = self.config.gap;
        let card_h = self.card_height(text_lines);
        let grid_height = |count: usize| {
            let rows = (count as u32).div_ceil(self.columns());
            SECTION_TITLE_HEIGHT + rows * card_h + rows.saturating_sub(1) * gap + pad
        };

        let features = view.player.is_some() as usize + view.objective.is_some() as usize;
        let mut height = HEADER_HEIGHT + pad;
        if features > 0 {
            height += grid_height(features);
        }
        if !view.levels.is_empty() {
            let n = view.levels.len() as u32;
            height += SECTION_TITLE_HEIGHT + n * (self.level_row_height() + gap) + pad - gap.min(pad);
        }
        for count in [view.enemies.len(), view.weapons.len()] {
            if count > 0 {
                height += grid_height(count);
            }
        }
        height
    }

    fn section_title(&self, entries: &mut Vec<LayoutEntry>, section: Section, y: u32) -> u32 {
        let pad = self.config.padding;
        entries.push(LayoutEntry {
            kind: EntryKind::SectionTitle,
            section: Some(section),
            label: section.title().to_string(),
            annotations: Vec::new(),
            rect: Rect::new(pad, y, self.content_width(), SECTION_TITLE_HEIGHT),
        });
        y + SECTION_TITLE_HEIGHT
    }

    /// Grid of cards starting at `y`; returns the y after the grid
    fn place_cards(
        &self,
        canvas: &mut Canvas,
        entries: &mut Vec<LayoutEntry>,
        cards: &[(Section, &Card)],
        y: u32,
        text_lines: u32,
    ) -> u32 {
        let pad = self.config.padding;
        let gap = self.config.gap;
        let card_w = self.card_width();
        let card_h = self.card_height(text_lines);
        let cols = self.columns();

        // Feature row is titled by its first card's section
        let mut y = self.section_title(entries, cards[0].0, y);

        for (i, (section, card)) in cards.iter().enumerate() {
            let col = i as u32 % cols;
            let row = i as u32 / cols;
            let x = pad + col * (card_w + gap);
            let top = y + row * (card_h + gap);

            let panel = Rect::new(x, top, card_w, card_h);
            canvas.fill_rect(panel, CARD_BG);

            let tile_x = x + (card_w - self.tile_size) / 2;
            let tile_rect = Rect::new(tile_x, top + gap, self.tile_size, self.tile_size);
            canvas.blit(&card.tile, tile_rect.x, tile_rect.y);

            entries.push(LayoutEntry {
                kind: EntryKind::Card,
                section: Some(*section),
                label: card.label.clone(),
                annotations: card.annotations.iter().map(|a| a.to_string()).collect(),
                rect: panel,
            });
        }

        let rows = (cards.len() as u32).div_ceil(cols);
        y += rows * card_h + rows.saturating_sub(1) * gap + pad;
        y
    }

    fn place_level_row(&self, canvas: &mut Canvas, entries: &mut Vec<LayoutEntry>, row: &LevelRow, y: u32) {
        let pad = self.config.padding;
        let gap = self.config.gap;
        let mini = self.config.level_tile_display_size;
        let row_rect = Rect::new(pad, y, self.content_width(), self.level_row_height());
        canvas.fill_rect(row_rect, ROW_BG);

        entries.push(LayoutEntry {
            kind: EntryKind::LevelRow,
            section: Some(Section::Levels),
            label: row.name.clone(),
            annotations: row.depth_label().into_iter().collect(),
            rect: row_rect,
        });

        let mut x = pad + LEVEL_NAME_WIDTH;
        for (caption, tile) in [("Wall", &row.wall), ("Floor", &row.floor)] {
            let tile_rect = Rect::new(x + LEVEL_CAPTION_WIDTH, y + gap, mini, mini);
            if let Some(tile) = tile {
                let display = imageops::resize(&tile.tile, mini, mini, FilterType::Nearest);
                canvas.blit(&display, tile_rect.x, tile_rect.y);
            }
            entries.push(LayoutEntry {
                kind: EntryKind::LevelTile,
                section: Some(Section::Levels),
                label: format!("{}:", caption),
                annotations: tile.as_ref().and_then(|t| t.label.clone()).into_iter().collect(),
                rect: tile_rect,
            });
            x += LEVEL_CAPTION_WIDTH + mini + gap;
        }
    }
}

/// Drawing target for the composition
struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let x_end = (rect.x + rect.width).min(self.image.width());
        let y_end = (rect.y + rect.height).min(self.image.height());
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                let dst = *self.image.get_pixel(x, y);
                self.image.put_pixel(x, y, composite(color, dst, CompositeMode::SourceOver));
            }
        }
    }

    fn blit(&mut self, src: &RgbaImage, x: u32, y: u32) {
        for (sx, sy, pixel) in src.enumerate_pixels() {
            let (dx, dy) = (x + sx, y + sy);
            if let Some(dst) = self.image.get_pixel_mut_checked(dx, dy) {
                *dst = composite(*pixel, *dst, CompositeMode::SourceOver);
            }
        }
    }

    fn into_image(self) -> RgbaImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Annotation, BundleHeader, DescriptorSource, LevelTile};
    use serde_json::Number;

    fn card(label: &str, color: [u8; 4]) -> Card {
        Card {
            label: label.to_string(),
            annotations: vec![Annotation::Rarity(Number::from(3))],
            tile: RgbaImage::from_pixel(48, 48, Rgba(color)),
            source: DescriptorSource::Nested,
        }
    }

    fn view() -> RenderedView {
        RenderedView {
            header: BundleHeader {
                name: "Neon Skyline".to_string(),
                description: "Rain".to_string(),
                generation_time_seconds: Number::from(3),
            },
            player: Some(card("Runner", [255, 0, 0, 255])),
            objective: None,
            levels: vec![LevelRow {
                name: "Lobby".to_string(),
                depth: Some(1),
                wall: Some(LevelTile { tile: RgbaImage::from_pixel(48, 48, Rgba([0, 0, 255, 255])), label: None }),
                floor: None,
            }],
            enemies: (0..7).map(|i| card(&format!("Drone {}", i), [0, 255, 0, 255])).collect(),
            weapons: Vec::new(),
        }
    }

    #[test]
    fn test_entries_follow_layout_order() {
        let config = LayoutConfig::default();
        let composition = ViewLayout::new(&config, 48).compose(&view());

        let kinds: Vec<EntryKind> = composition.entries.iter().map(|e| e.kind).collect();
        assert_eq!(kinds[0], EntryKind::Header);
        assert_eq!(kinds[1], EntryKind::SectionTitle);
        assert_eq!(kinds[2], EntryKind::Card);
        let cards = composition.entries.iter().filter(|e| e.kind == EntryKind::Card).count();
        assert_eq!(cards, 8);
    }

    #[test]
    fn test_all_entries_inside_image() {
        let config = LayoutConfig::default();
        let composition = ViewLayout::new(&config, 48).compose(&view());
        let (w, h) = composition.image.dimensions();

        for entry in &composition.entries {
            assert!(entry.rect.x + entry.rect.width <= w, "{:?} overflows width", entry);
            assert!(entry.rect.y + entry.rect.height <= h, "{:?} overflows height", entry);
        }
    }

    #[test]
    fn test_grid_wraps_after_columns() {
        let config = LayoutConfig::default();
        let composition = ViewLayout::new(&config, 48).compose(&view());
        let drones: Vec<&LayoutEntry> = composition
            .entries
            .iter()
            .filter(|e| e.section == Some(Section::Enemies))
            .filter(|e| e.kind == EntryKind::Card)
            .collect();

        // Seventh drone starts a second row under the first
        assert_eq!(drones[6].rect.x, drones[0].rect.x);
        assert!(drones[6].rect.y > drones[0].rect.y);
    }

    #[test]
    fn test_level_tile_drawn_at_display_size() {
        let config = LayoutConfig::default();
        let composition = ViewLayout::new(&config, 48).compose(&view());
        let wall = composition
            .entries
            .iter()
            .find(|e| e.kind == EntryKind::LevelTile && e.label == "Wall:")
            .unwrap();

        assert_eq!((wall.rect.width, wall.rect.height), (32, 32));
        let px = composition.image.get_pixel(wall.rect.x + 31, wall.rect.y + 31);
        assert_eq!(px.0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_empty_view_is_header_only() {
        let config = LayoutConfig::default();
        let empty = RenderedView {
            header: BundleHeader {
                name: "Untitled".to_string(),
                description: String::new(),
                generation_time_seconds: Number::from(0),
            },
            player: None,
            objective: None,
            levels: Vec::new(),
            enemies: Vec::new(),
            weapons: Vec::new(),
        };
        let composition = ViewLayout::new(&config, 48).compose(&empty);
        assert_eq!(composition.entries.len(), 1);
        assert_eq!(composition.image.height(), HEADER_HEIGHT + config.padding);
    }
}
