//! Procedural terrain height fields with hydraulic erosion.
//!
//! This crate builds a terrain height field from fractal noise or an
//! external height source, shapes it through a pointwise transform
//! pipeline, and erodes it with a particle-based hydraulic simulation.
//! The result is a grid of elevations and derived normals ready for an
//! external renderer.

pub mod erosion;
pub mod export;
pub mod grid;
pub mod noise;
pub mod source;
pub mod transform;

pub use erosion::{erode, ErosionConfig, ErosionStats};
pub use grid::HeightField;
pub use noise::NoiseField;
pub use source::{load_height_source, HeightSampler, LoadError};
pub use transform::{apply_transform, Floor, Offset, PointTransform, Scale, TransformPipeline};
