//! External height sources.
//!
//! Loads precomputed height grids from JSON payloads and exposes them as
//! coordinate-to-height samplers for the transform pipeline.

mod json;

pub use json::{load_height_source, HeightSampler, HeightSourceData, LoadError, SourceDims};
