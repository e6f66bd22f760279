//! Grid-to-pixel mapping for fixed-layout tilesets

use serde::{Deserialize, Serialize};

/// Zero-based cell coordinate in the atlas grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A pixel rectangle inside the atlas image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Source rectangle for a grid cell.
///
/// Cells are laid out left-to-right, top-to-bottom with `spacing` pixels
/// between them. Bounds are not checked here; pixels outside the atlas
/// sample as transparent.
pub fn sample_region(pos: GridPos, tile_size: u32, spacing: u32) -> AtlasRegion {
    let stride = tile_size.saturating_add(spacing);
    AtlasRegion {
        x: pos.x.saturating_mul(stride),
        y: pos.y.saturating_mul(stride),
        width: tile_size,
        height: tile_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_cell() {
        let region = sample_region(GridPos::new(0, 0), 16, 0);
        assert_eq!(region, AtlasRegion { x: 0, y: 0, width: 16, height: 16 });
    }

    #[test]
    fn test_offsets_over_grid() {
        for (tile_size, spacing) in [(16, 0), (16, 1), (8, 2)] {
            for x in 0..=50 {
                for y in 0..=50 {
                    let region = sample_region(GridPos::new(x, y), tile_size, spacing);
                    assert_eq!(region.x, x * (tile_size + spacing));
                    assert_eq!(region.y, y * (tile_size + spacing));
                    assert_eq!((region.width, region.height), (tile_size, tile_size));
                }
            }
        }
    }

    #[test]
    fn test_huge_coordinates_saturate() {
        let region = sample_region(GridPos::new(u32::MAX, 3), 16, 1);
        assert_eq!(region.x, u32::MAX);
        assert_eq!(region.y, 51);
    }
}
