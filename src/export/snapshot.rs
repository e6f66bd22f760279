//! Image export
//!
//! Flattens a composed view over an opaque background, upscales it and writes
//! it as PNG together with a JSON manifest of the labels.

use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;

use super::layout::{EntryKind, LayoutEntry, Rect, ViewLayout};
use crate::bundle::{BundleHeader, RenderedView, Section};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::render::{composite, CompositeMode, Tint};

/// Label record for one placed element, in exported pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub rect: Rect,
}

impl ManifestEntry {
    fn from_layout(entry: LayoutEntry, scale: u32) -> Self {
        Self {
            kind: entry.kind,
            section: entry.section,
            label: entry.label,
            annotations: entry.annotations,
            rect: entry.rect.scaled(scale),
        }
    }
}

/// Sidecar describing an exported image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewManifest {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub header: BundleHeader,
    pub entries: Vec<ManifestEntry>,
}

/// Exported image and its manifest, not yet written
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image: RgbaImage,
    pub manifest: ViewManifest,
}

/// Compose `view` and produce the export image
pub fn capture(view: &RenderedView, config: &ViewerConfig) -> Result<Snapshot> {
    let [r, g, b, a] = Tint::parse(&config.export.background)
        .ok_or_else(|| {
            ViewerError::Config(format!("unknown background color '{}'", config.export.background))
        })?
        .rgba_array();
    if a != 255 {
        log::warn!("Background '{}' is not opaque, exporting it as opaque", config.export.background);
    }
    let background = Tint::rgb(r, g, b);
    let scale = config.export.scale.max(1);

    let composition = ViewLayout::new(&config.layout, config.atlas.output_size()).compose(view);
    let mut image = composition.image;
    for pixel in image.pixels_mut() {
        *pixel = composite(*pixel, background.0, CompositeMode::SourceOver);
    }

    let (width, height) = (image.width() * scale, image.height() * scale);
    if scale > 1 {
        image = imageops::resize(&image, width, height, FilterType::Nearest);
    }

    let manifest = ViewManifest {
        file_name: config.export.file_name.clone(),
        width,
        height,
        scale,
        header: view.header.clone(),
        entries: composition
            .entries
            .into_iter()
            .map(|e| ManifestEntry::from_layout(e, scale))
            .collect(),
    };

    Ok(Snapshot { image, manifest })
}

/// Manifest path for an image path (`view.png` -> `view.json`)
pub fn manifest_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

impl Snapshot {
    /// Write the PNG into `dir` (and the manifest when `with_manifest`).
    /// Returns the image path.
    pub fn save(&self, dir: &Path, with_manifest: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.manifest.file_name);
        self.image.save(&path)?;

        if with_manifest {
            let json = serde_json::to_string_pretty(&self.manifest)
                .map_err(|e| ViewerError::Manifest(e.to_string()))?;
            fs::write(manifest_path(&path), json)?;
        }

        log::info!(
            "Exported {}x{} view to {}",
            self.manifest.width,
            self.manifest.height,
            path.display()
        );
        Ok(path)
    }
}
