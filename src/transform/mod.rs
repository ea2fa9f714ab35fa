//! Pointwise height transforms and the pipeline that applies them.
//!
//! Provides a trait-based architecture for composable height rewrites that
//! can be chained into a complete field-shaping pipeline.

mod pointwise;

pub use pointwise::{apply_transform, Floor, Offset, PointTransform, Scale, TransformPipeline};
