//! Tinted tile rendering
//!
//! One call produces one self-contained tile image: the atlas cell is drawn
//! at `tile_size * scale_factor` with nearest-neighbor sampling, then
//! recolored with a source-in fill so only the sprite's opaque pixels take
//! the tint.

use image::RgbaImage;

use super::color::Tint;
use super::surface::{CompositeMode, Surface};
use crate::atlas::Atlas;
use crate::bundle::TileDescriptor;
use crate::config::AtlasConfig;

/// Renders tile descriptors against a loaded atlas
#[derive(Debug, Clone, Copy)]
pub struct TileCompositor<'a> {
    atlas: &'a Atlas,
    config: &'a AtlasConfig,
}

impl<'a> TileCompositor<'a> {
    pub fn new(atlas: &'a Atlas, config: &'a AtlasConfig) -> Self {
        Self { atlas, config }
    }

    /// Side length of every rendered tile
    pub fn output_size(&self) -> u32 {
        self.config.output_size()
    }

    /// Render one tile. Never fails: a descriptor without a position gives a
    /// transparent tile, an unknown color leaves the sprite untinted.
    pub fn render_tile(&self, descriptor: &TileDescriptor) -> RgbaImage {
        let mut surface = Surface::new(self.output_size());
        let name = descriptor.name.as_deref().unwrap_or("<unnamed>");

        let Some(pos) = descriptor.position else {
            log::warn!("No texture data for tile '{}'", name);
            return surface.into_image();
        };

        let region = self.atlas.region(pos, self.config);
        surface.draw_region(self.atlas, region);

        let tint = match descriptor.color.as_deref() {
            None => Some(Tint::WHITE),
            Some(text) => {
                let parsed = Tint::parse(text);
                if parsed.is_none() {
                    log::warn!("Unrecognized color '{}' for tile '{}', leaving it untinted", text, name);
                }
                parsed
            }
        };

        if let Some(tint) = tint {
            apply_tint(&mut surface, tint);
        }

        surface.into_image()
    }
}

/// Source-in fill, then back to source-over for any later drawing
pub fn apply_tint(surface: &mut Surface, tint: Tint) {
    surface.set_mode(CompositeMode::SourceIn);
    surface.fill(tint);
    surface.set_mode(CompositeMode::SourceOver);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{sample_region, GridPos};
    use crate::bundle::DescriptorSource;
    use image::Rgba;

    /// 2x2 grid of 4px tiles: (0,0) is a plus sign, (1,0) is solid,
    /// (0,1) and (1,1) are empty.
    fn test_atlas() -> Atlas {
        Atlas::from_rgba(RgbaImage::from_fn(8, 8, |x, y| {
            let opaque = match (x / 4, y / 4) {
                (0, 0) => x % 4 == 1 || y % 4 == 1,
                (1, 0) => true,
                _ => false,
            };
            if opaque {
                Rgba([90, 60, 30, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }))
    }

    fn config() -> AtlasConfig {
        AtlasConfig {
            tile_size: 4,
            tile_spacing: 0,
            scale_factor: 3,
            ..AtlasConfig::default()
        }
    }

    fn descriptor(pos: Option<GridPos>, color: Option<&str>) -> TileDescriptor {
        TileDescriptor {
            name: Some("test_tile".to_string()),
            position: pos,
            color: color.map(str::to_string),
            source: DescriptorSource::Direct,
        }
    }

    fn alpha_mask(img: &RgbaImage) -> Vec<bool> {
        img.pixels().map(|p| p.0[3] > 0).collect()
    }

    #[test]
    fn test_missing_position_is_transparent() {
        let atlas = test_atlas();
        let config = config();
        let compositor = TileCompositor::new(&atlas, &config);

        let tile = compositor.render_tile(&descriptor(None, Some("#ff0000")));
        assert_eq!(tile.dimensions(), (12, 12));
        assert!(tile.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_tint_replaces_color_inside_sprite_only() {
        let atlas = test_atlas();
        let config = config();
        let compositor = TileCompositor::new(&atlas, &config);

        let tile = compositor.render_tile(&descriptor(Some(GridPos::new(0, 0)), Some("#00ff00")));
        // Column 1 of the source is opaque -> output columns 3..6
        assert_eq!(tile.get_pixel(4, 0).0, [0, 255, 0, 255]);
        // Source (0,0) is transparent -> output (0..3, 0..3)
        assert_eq!(tile.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_default_color_is_white() {
        let atlas = test_atlas();
        let config = config();
        let compositor = TileCompositor::new(&atlas, &config);

        let tile = compositor.render_tile(&descriptor(Some(GridPos::new(1, 0)), None));
        assert!(tile.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_bad_color_leaves_sprite_untinted() {
        let atlas = test_atlas();
        let config = config();
        let compositor = TileCompositor::new(&atlas, &config);

        let tile = compositor.render_tile(&descriptor(Some(GridPos::new(1, 0)), Some("not-a-color")));
        assert_eq!(tile.get_pixel(0, 0).0, [90, 60, 30, 255]);
    }

    #[test]
    fn test_out_of_atlas_cell_is_blank() {
        let atlas = test_atlas();
        let config = config();
        let compositor = TileCompositor::new(&atlas, &config);

        let tile = compositor.render_tile(&descriptor(Some(GridPos::new(40, 40)), None));
        assert!(tile.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_retint_keeps_alpha_mask() {
        let atlas = test_atlas();
        let mut surface = Surface::new(12);
        surface.draw_region(&atlas, sample_region(GridPos::new(0, 0), 4, 0));

        apply_tint(&mut surface, Tint::rgb(200, 10, 10));
        let first = alpha_mask(surface.image());
        apply_tint(&mut surface, Tint::rgb(200, 10, 10));
        assert_eq!(alpha_mask(surface.image()), first);

        apply_tint(&mut surface, Tint::rgb(10, 10, 200));
        assert_eq!(alpha_mask(surface.image()), first);
        assert_eq!(surface.mode(), CompositeMode::SourceOver);
    }

    #[test]
    fn test_render_is_deterministic() {
        let atlas = test_atlas();
        let config = config();
        let compositor = TileCompositor::new(&atlas, &config);
        let desc = descriptor(Some(GridPos::new(0, 0)), Some("gold"));

        assert_eq!(compositor.render_tile(&desc), compositor.render_tile(&desc));
    }
}
