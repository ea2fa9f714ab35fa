//! Hydraulic erosion module.
//!
//! Simulates water droplets flowing downhill across the height field,
//! picking up and depositing sediment to carve erosion channels and build
//! deposition fans.

mod config;
mod hydraulic;
mod particle;

pub use config::ErosionConfig;
pub use hydraulic::{erode, ErosionStats};
pub use particle::Particle;
