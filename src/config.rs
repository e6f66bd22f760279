//! Viewer configuration
//!
//! Compiled-in defaults that can be overridden by a RON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::render::Tint;

/// Tile size in pixels inside the atlas
pub const TILE_SIZE: u32 = 16;
/// Gap between tiles in the atlas
pub const TILE_SPACING: u32 = 0;
/// Upscale factor applied to every rendered tile (16px -> 48px)
pub const SCALE_FACTOR: u32 = 3;

/// Largest accepted rendered tile side
const MAX_TILE_OUTPUT: u32 = 1024;
/// Largest accepted atlas spacing, layout spacing and display size
const MAX_SPAN: u32 = 4096;
const MAX_EXPORT_SCALE: u32 = 16;

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub atlas: AtlasConfig,
    pub layout: LayoutConfig,
    pub export: ExportConfig,
}

/// Atlas geometry and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Image file holding the tileset
    pub path: PathBuf,
    pub tile_size: u32,
    pub tile_spacing: u32,
    pub scale_factor: u32,
    /// How long the CLI waits for the background load
    pub load_timeout_secs: u64,
}

impl AtlasConfig {
    /// Side length of a rendered tile in pixels
    pub fn output_size(&self) -> u32 {
        self.tile_size.saturating_mul(self.scale_factor)
    }
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tileset.png"),
            tile_size: TILE_SIZE,
            tile_spacing: TILE_SPACING,
            scale_factor: SCALE_FACTOR,
            load_timeout_secs: 10,
        }
    }
}

/// Placement of cards in the composed view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Displayed size of level wall/floor tiles (render resolution is unchanged)
    pub level_tile_display_size: u32,
    /// Emit labels for level wall/floor tiles
    pub level_tile_labels: bool,
    /// Add weight, mana cost and weapon type annotations to list cards
    pub extended_stats: bool,
    /// Cards per row in the enemy and weapon grids
    pub grid_columns: u32,
    pub padding: u32,
    pub gap: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_tile_display_size: 32,
            level_tile_labels: false,
            extended_stats: false,
            grid_columns: 6,
            padding: 16,
            gap: 8,
        }
    }
}

/// Snapshot export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Resolution multiplier over the layout resolution
    pub scale: u32,
    /// Solid color substituted for transparent regions
    pub background: String,
    pub file_name: String,
    /// Write a JSON manifest with labels next to the image
    pub write_manifest: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            background: "#1e1e1e".to_string(),
            file_name: "asset_bundle_view.png".to_string(),
            write_manifest: true,
        }
    }
}

impl ViewerConfig {
    /// Load and validate a RON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: ViewerConfig = ron::from_str(&content)
            .map_err(|e| ViewerError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` (or the default location), falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to load config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Write this config as pretty RON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ViewerError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Reject geometry that would produce empty or unbounded surfaces
    pub fn validate(&self) -> Result<()> {
        if self.atlas.tile_size == 0 {
            return Err(ViewerError::Config("tile_size must be greater than 0".into()));
        }
        if self.atlas.scale_factor == 0 {
            return Err(ViewerError::Config("scale_factor must be greater than 0".into()));
        }
        if self.export.scale == 0 {
            return Err(ViewerError::Config("export scale must be greater than 0".into()));
        }
        if self.layout.grid_columns == 0 {
            return Err(ViewerError::Config("grid_columns must be greater than 0".into()));
        }

        if self.atlas.output_size() > MAX_TILE_OUTPUT {
            return Err(ViewerError::Config(format!(
                "tile_size * scale_factor must be at most {}",
                MAX_TILE_OUTPUT
            )));
        }
        if self.export.scale > MAX_EXPORT_SCALE {
            return Err(ViewerError::Config(format!(
                "export scale must be at most {}",
                MAX_EXPORT_SCALE
            )));
        }
        let spans = [
            ("tile_spacing", self.atlas.tile_spacing),
            ("level_tile_display_size", self.layout.level_tile_display_size),
            ("padding", self.layout.padding),
            ("gap", self.layout.gap),
            ("grid_columns", self.layout.grid_columns),
        ];
        for (name, value) in spans {
            if value > MAX_SPAN {
                return Err(ViewerError::Config(format!("{} must be at most {}", name, MAX_SPAN)));
            }
        }

        match Tint::parse(&self.export.background) {
            None => Err(ViewerError::Config(format!(
                "unknown background color '{}'",
                self.export.background
            ))),
            Some(tint) if tint.rgba_array()[3] != 255 => Err(ViewerError::Config(format!(
                "background '{}' must be opaque",
                self.export.background
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// Default config location in the platform config directory
pub fn default_config_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "bundleview", "Bundleview") {
        proj_dirs.config_dir().join("viewer.ron")
    } else {
        PathBuf::from("./viewer.ron")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = ViewerConfig::default();
        assert_eq!(config.atlas.output_size(), 48);
        assert_eq!(config.layout.level_tile_display_size, 32);
        assert_eq!(config.export.scale, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config: ViewerConfig =
            ron::from_str("(atlas: (tile_size: 8, tile_spacing: 1))").unwrap();
        assert_eq!(config.atlas.tile_size, 8);
        assert_eq!(config.atlas.tile_spacing, 1);
        assert_eq!(config.atlas.scale_factor, SCALE_FACTOR);
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let mut config = ViewerConfig::default();
        config.atlas.tile_size = 0;
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_unbounded_geometry_rejected() {
        let mut config = ViewerConfig::default();
        config.atlas.tile_spacing = u32::MAX;
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));

        let mut config = ViewerConfig::default();
        config.atlas.tile_size = u32::MAX;
        assert_eq!(config.atlas.output_size(), u32::MAX);
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));

        let mut config = ViewerConfig::default();
        config.layout.gap = u32::MAX;
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));
    }

    #[test]
    fn test_background_must_be_opaque() {
        let mut config = ViewerConfig::default();
        config.export.background = "transparent".to_string();
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));

        config.export.background = "#11223380".to_string();
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));

        config.export.background = "nope".to_string();
        assert!(matches!(config.validate(), Err(ViewerError::Config(_))));

        config.export.background = "navy".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("bundleview-config-{}", std::process::id()));
        let path = dir.join("viewer.ron");

        let mut config = ViewerConfig::default();
        config.layout.level_tile_labels = true;
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ViewerConfig::load_or_default(Some(Path::new("/nonexistent/viewer.ron")));
        assert_eq!(config, ViewerConfig::default());
    }
}
