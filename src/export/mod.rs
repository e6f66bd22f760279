//! Composed view export
//!
//! - `layout`: places cards and level rows on one canvas
//! - `snapshot`: background fill, upscaling, PNG and manifest output

pub mod layout;
pub mod snapshot;

pub use layout::{Composition, EntryKind, LayoutEntry, Rect, ViewLayout};
pub use snapshot::{capture, manifest_path, ManifestEntry, Snapshot, ViewManifest};
