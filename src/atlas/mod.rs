//! Tileset atlas access
//!
//! The atlas is a single image of fixed-size tiles on a regular grid.
//! [`AtlasHandle`] tracks whether it has finished loading; [`sample_region`]
//! maps grid cells to pixel rectangles.

pub mod handle;
pub mod sampler;

pub use handle::{Atlas, AtlasHandle, AtlasStatus};
pub use sampler::{sample_region, AtlasRegion, GridPos};
