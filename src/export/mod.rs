//! Export module for saving terrain data to renderer-friendly formats.
//!
//! Supports 16-bit PNG heightmaps for universal compatibility, RAW formats
//! for game engine imports, and RGB normal maps.

mod normal_map;
mod png;
mod raw;

pub use normal_map::{export_normal_map_png, NormalMapError};
pub use png::{export_height_png, PngExportError, PngExportOptions};
pub use raw::{export_height_raw, RawExportError, RawFormat};
