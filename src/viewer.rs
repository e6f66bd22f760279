//! Viewer session
//!
//! Ties the pieces together: an atlas handle gates rendering, each document
//! load replaces the current view, and export writes the current view.

use std::path::{Path, PathBuf};

use crate::atlas::AtlasHandle;
use crate::bundle::{parse_document, BundleRenderer, RenderOptions, RenderedView};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::export;
use crate::render::TileCompositor;

/// One viewer session over a single atlas
pub struct Viewer {
    config: ViewerConfig,
    atlas: AtlasHandle,
    view: Option<RenderedView>,
}

impl Viewer {
    pub fn new(config: ViewerConfig, atlas: AtlasHandle) -> Self {
        Self {
            config,
            atlas,
            view: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn atlas(&self) -> &AtlasHandle {
        &self.atlas
    }

    /// The most recent successful render
    pub fn view(&self) -> Option<&RenderedView> {
        self.view.as_ref()
    }

    /// Parse and render `text`, replacing the current view.
    ///
    /// Fails without touching the current view if the atlas is not ready or
    /// the text is not a JSON object.
    pub fn load_document(&mut self, text: &str) -> Result<&RenderedView> {
        let atlas = self.atlas.atlas()?;
        let doc = parse_document(text)?;

        let compositor = TileCompositor::new(&atlas, &self.config.atlas);
        let renderer = BundleRenderer::new(compositor, RenderOptions::from(&self.config.layout));
        let view = renderer.render(&doc);

        log::info!("Rendered '{}' ({} tiles)", view.header.name, view.tile_count());
        Ok(&*self.view.insert(view))
    }

    /// Write the current view into `dir`, returning the image path
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let view = self.view.as_ref().ok_or(ViewerError::NothingToExport)?;
        let snapshot = export::capture(view, &self.config)?;
        snapshot.save(dir, self.config.export.write_manifest)
    }
}
