//! Height grid module.
//!
//! Provides the core HeightField data structure holding elevations and
//! their derived normals.

mod field;

pub use field::HeightField;
