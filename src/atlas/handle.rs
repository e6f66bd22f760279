//! Atlas image and its load-once readiness handle

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image::{DynamicImage, Rgba, RgbaImage};
use parking_lot::{Condvar, Mutex};

use super::sampler::{sample_region, AtlasRegion, GridPos};
use crate::config::AtlasConfig;
use crate::error::{Result, ViewerError};

/// A loaded tileset image. Read-only once constructed.
#[derive(Debug, Clone)]
pub struct Atlas {
    image: RgbaImage,
}

impl Atlas {
    /// Wrap an already-decoded image
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image: image.to_rgba8() }
    }

    /// Wrap raw RGBA pixels
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode an atlas from an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| ViewerError::AssetLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_image(img))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Number of whole cells (columns, rows) for the given geometry
    pub fn grid_size(&self, config: &AtlasConfig) -> (u32, u32) {
        let stride = config.tile_size.saturating_add(config.tile_spacing).max(1);
        let (w, h) = self.image.dimensions();
        // The last column/row has no trailing gap
        let cols = w.saturating_add(config.tile_spacing) / stride;
        let rows = h.saturating_add(config.tile_spacing) / stride;
        (cols, rows)
    }

    /// Pixel at `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Source rectangle of a grid cell under `config`
    pub fn region(&self, pos: GridPos, config: &AtlasConfig) -> AtlasRegion {
        sample_region(pos, config.tile_size, config.tile_spacing)
    }
}

/// Marks the handle failed if the loader unwinds before settling
struct SettleOnPanic<'a> {
    handle: &'a AtlasHandle,
    path: &'a Path,
}

impl Drop for SettleOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() && self.handle.status() == AtlasStatus::Loading {
            log::error!("Atlas loader for {} panicked", self.path.display());
            self.handle.settle(Err(ViewerError::AssetLoad {
                path: self.path.display().to_string(),
                reason: "loader thread panicked".to_string(),
            }));
        }
    }
}

/// Observable state of an [`AtlasHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
enum AtlasState {
    Loading,
    Ready(Arc<Atlas>),
    Failed(LoadFailure),
}

#[derive(Debug, Clone)]
struct LoadFailure {
    path: String,
    reason: String,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<AtlasState>,
    settled: Condvar,
}

/// Shared handle to the process atlas.
///
/// Starts in `Loading` and settles exactly once, to either `Ready` or
/// `Failed`. Later settle attempts are ignored.
#[derive(Debug, Clone)]
pub struct AtlasHandle {
    shared: Arc<Shared>,
}

impl AtlasHandle {
    /// A handle that has not been settled yet
    pub fn pending() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(AtlasState::Loading),
                settled: Condvar::new(),
            }),
        }
    }

    /// A handle that is already ready with `atlas`
    pub fn ready(atlas: Atlas) -> Self {
        let handle = Self::pending();
        handle.settle(Ok(atlas));
        handle
    }

    /// Start decoding `path` on a background thread
    pub fn load_async(path: impl Into<PathBuf>, config: AtlasConfig) -> Self {
        let path = path.into();
        let handle = Self::pending();
        let worker = handle.clone();

        let spawned = thread::Builder::new()
            .name("atlas-loader".to_string())
            .spawn(move || worker.load_into(&path, &config));

        if let Err(e) = spawned {
            handle.settle(Err(ViewerError::AssetLoad {
                path: String::new(),
                reason: format!("could not spawn loader thread: {}", e),
            }));
        }

        handle
    }

    /// Decode `path` on the current thread
    pub fn load_blocking(path: impl AsRef<Path>, config: &AtlasConfig) -> Self {
        let handle = Self::pending();
        handle.load_into(path.as_ref(), config);
        handle
    }

    fn load_into(&self, path: &Path, config: &AtlasConfig) {
        let _guard = SettleOnPanic { handle: self, path };
        let result = Atlas::open(path);
        match &result {
            Ok(atlas) => {
                let (w, h) = atlas.dimensions();
                let (cols, rows) = atlas.grid_size(config);
                log::info!(
                    "Loaded atlas {} ({}x{} px, {}x{} tiles)",
                    path.display(),
                    w,
                    h,
                    cols,
                    rows
                );
            }
            Err(e) => log::error!("{}", e),
        }
        self.settle(result);
    }

    /// Publish the load result. Only the first call has an effect.
    pub fn settle(&self, result: Result<Atlas>) {
        let mut state = self.shared.state.lock();
        if !matches!(*state, AtlasState::Loading) {
            log::warn!("Atlas already settled, ignoring new load result");
            return;
        }

        *state = match result {
            Ok(atlas) => AtlasState::Ready(Arc::new(atlas)),
            Err(ViewerError::AssetLoad { path, reason }) => {
                AtlasState::Failed(LoadFailure { path, reason })
            }
            Err(e) => AtlasState::Failed(LoadFailure {
                path: String::new(),
                reason: e.to_string(),
            }),
        };
        self.shared.settled.notify_all();
    }

    pub fn status(&self) -> AtlasStatus {
        match &*self.shared.state.lock() {
            AtlasState::Loading => AtlasStatus::Loading,
            AtlasState::Ready(_) => AtlasStatus::Ready,
            AtlasState::Failed(info) => AtlasStatus::Failed(info.reason.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == AtlasStatus::Ready
    }

    /// The loaded atlas, or the reason rendering is not possible
    pub fn atlas(&self) -> Result<Arc<Atlas>> {
        match &*self.shared.state.lock() {
            AtlasState::Loading => Err(ViewerError::AtlasNotReady),
            AtlasState::Ready(atlas) => Ok(Arc::clone(atlas)),
            AtlasState::Failed(info) => Err(ViewerError::AssetLoad {
                path: info.path.clone(),
                reason: info.reason.clone(),
            }),
        }
    }

    /// Block until the handle settles or `timeout` elapses
    pub fn wait(&self, timeout: Duration) -> AtlasStatus {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        while matches!(*state, AtlasState::Loading) {
            if self.shared.settled.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        drop(state);
        self.status()
    }
}
