//! Square RGBA drawing surface with Porter-Duff compositing

use image::{Rgba, RgbaImage};

use super::color::Tint;
use crate::atlas::{Atlas, AtlasRegion};

/// How new pixels combine with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Draw over existing pixels
    #[default]
    SourceOver,
    /// Keep the destination alpha, replace the color
    SourceIn,
}

/// A transparent-initialized pixel surface
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    mode: CompositeMode,
}

impl Surface {
    /// Fully transparent `size`×`size` surface in `SourceOver` mode
    pub fn new(size: u32) -> Self {
        Self {
            pixels: RgbaImage::new(size, size),
            mode: CompositeMode::SourceOver,
        }
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }

    /// Draw an atlas region stretched over the whole surface.
    ///
    /// Nearest-neighbor sampling; atlas pixels outside the image count as
    /// transparent.
    pub fn draw_region(&mut self, atlas: &Atlas, region: AtlasRegion) {
        let size = self.size();
        if size == 0 || region.width == 0 || region.height == 0 {
            return;
        }

        let mode = self.mode;
        for (ox, oy, dst) in self.pixels.enumerate_pixels_mut() {
            let sx = region.x.saturating_add(nearest(ox, region.width, size));
            let sy = region.y.saturating_add(nearest(oy, region.height, size));
            let src = atlas.pixel(sx, sy).unwrap_or(Rgba([0, 0, 0, 0]));
            *dst = composite(src, *dst, mode);
        }
    }

    /// Fill the whole surface with `tint` under the current mode
    pub fn fill(&mut self, tint: Tint) {
        let mode = self.mode;
        for dst in self.pixels.pixels_mut() {
            *dst = composite(tint.0, *dst, mode);
        }
    }

    /// True when every pixel has zero alpha
    pub fn is_transparent(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Source coordinate for output coordinate `o` when scaling `src` -> `dst`
fn nearest(o: u32, src: u32, dst: u32) -> u32 {
    ((o as u64 * src as u64) / dst as u64) as u32
}

/// Combine one source pixel with one destination pixel (straight alpha)
pub fn composite(src: Rgba<u8>, dst: Rgba<u8>, mode: CompositeMode) -> Rgba<u8> {
    match mode {
        CompositeMode::SourceOver => source_over(src, dst),
        CompositeMode::SourceIn => source_in(src, dst),
    }
}

fn source_in(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let alpha = (src.0[3] as u16 * dst.0[3] as u16 + 127) / 255;
    if alpha == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    Rgba([src.0[0], src.0[1], src.0[2], alpha as u8])
}

fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src.0[3];
    let da = dst.0[3];
    if sa == 255 || da == 0 {
        return if sa == 0 { Rgba([0, 0, 0, 0]) } else { src };
    }
    if sa == 0 {
        return dst;
    }

    let sa = sa as f32 / 255.0;
    let da = da as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src.0[i] as f32 * sa + dst.0[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}
