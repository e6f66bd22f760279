//! Error types shared by the viewer pipeline

use thiserror::Error;

/// Errors surfaced to whoever drives the viewer.
///
/// Per-entity problems (a tile without texture data, an unknown color) are
/// never reported here: they degrade to a blank or untinted tile and a log line.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The atlas image could not be loaded; rendering stays disabled.
    #[error("Failed to load atlas '{path}': {reason}")]
    AssetLoad { path: String, reason: String },

    /// A render was requested before the atlas finished loading.
    #[error("Atlas is not loaded yet")]
    AtlasNotReady,

    /// The document text is not a JSON object.
    #[error("Invalid bundle document: {0}")]
    DocumentParse(String),

    /// Export was requested before anything was rendered.
    #[error("Nothing has been rendered yet")]
    NothingToExport,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to write manifest: {0}")]
    Manifest(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
