//! Pointwise transform trait, the standard transforms, and the pipeline.

use rayon::prelude::*;

use crate::grid::HeightField;
use crate::noise::NoiseField;
use crate::source::HeightSampler;

/// A pure pointwise height rewrite.
///
/// Implementers map a vertex's plane coordinates and current height to a new
/// height; they hold no per-call state, so applying one over a field is
/// embarrassingly parallel. Composition order is significant: scale-then-
/// offset differs from offset-then-scale.
pub trait PointTransform: Send + Sync {
    /// Maps `(x, y, z)` to the vertex's new height.
    fn apply(&self, x: f32, y: f32, z: f32) -> f32;
}

/// Multiplies every height by a constant factor.
pub struct Scale(pub f32);

impl PointTransform for Scale {
    fn apply(&self, _x: f32, _y: f32, z: f32) -> f32 {
        self.0 * z
    }
}

/// Adds a constant to every height.
pub struct Offset(pub f32);

impl PointTransform for Offset {
    fn apply(&self, _x: f32, _y: f32, z: f32) -> f32 {
        z + self.0
    }
}

/// Clamps heights from below; never lowers a value already above the floor.
pub struct Floor(pub f32);

impl PointTransform for Floor {
    fn apply(&self, _x: f32, _y: f32, z: f32) -> f32 {
        z.max(self.0)
    }
}

/// Fractal noise as a transform: replaces the height with the noise value
/// at the vertex's plane coordinates.
impl PointTransform for NoiseField {
    fn apply(&self, x: f32, y: f32, _z: f32) -> f32 {
        self.sample(x, y)
    }
}

/// External source as a transform: replaces the height with the sampler's
/// value at the vertex's plane coordinates.
impl PointTransform for HeightSampler {
    fn apply(&self, x: f32, y: f32, _z: f32) -> f32 {
        self.sample(x, y)
    }
}

/// Applies a single transform to every vertex of the field in place.
///
/// Normals are left untouched; recompute them once after the last transform
/// in a chain (or use [`TransformPipeline::run`], which does so).
pub fn apply_transform<T: PointTransform + ?Sized>(field: &mut HeightField, transform: &T) {
    let width = field.width;
    let extent = field.extent;
    let inv_w = 1.0 / (field.width - 1) as f32;
    let inv_h = 1.0 / (field.height - 1) as f32;

    field
        .heights
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, z)| {
            let col = (i as u32) % width;
            let row = (i as u32) / width;
            let x = (col as f32 * inv_w - 0.5) * extent;
            let y = (row as f32 * inv_h - 0.5) * extent;
            *z = transform.apply(x, y, *z);
        });
}

/// An ordered sequence of transforms applied over every vertex of a field.
///
/// The pipeline holds no state between runs; it simply applies its
/// transforms in insertion order and derives normals from the final surface.
#[derive(Default)]
pub struct TransformPipeline {
    transforms: Vec<Box<dyn PointTransform>>,
}

impl TransformPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Appends a transform to the end of the chain.
    pub fn add<T: PointTransform + 'static>(&mut self, transform: T) -> &mut Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Appends an already-boxed transform to the end of the chain.
    pub fn add_boxed(&mut self, transform: Box<dyn PointTransform>) -> &mut Self {
        self.transforms.push(transform);
        self
    }

    /// Number of transforms in the chain.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Applies every transform in insertion order, then recomputes the
    /// field's normals once from the final heights.
    pub fn run(&self, field: &mut HeightField) {
        for transform in &self.transforms {
            apply_transform(field, transform.as_ref());
        }
        field.recompute_normals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_exact() {
        let t = Scale(0.25);
        assert_eq!(t.apply(0.0, 0.0, 1.0), 0.25);
        assert_eq!(t.apply(3.0, -2.0, -4.0), -1.0);
        assert_eq!(t.apply(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_offset_is_exact() {
        let t = Offset(-0.10);
        assert_eq!(t.apply(0.0, 0.0, 0.5), 0.4);
        assert_eq!(t.apply(1.0, 1.0, 0.0), -0.10);
    }

    #[test]
    fn test_floor_clamps_from_below_only() {
        let t = Floor(0.0);
        assert_eq!(t.apply(0.0, 0.0, -0.3), 0.0);
        assert_eq!(t.apply(0.0, 0.0, 0.7), 0.7);

        for z in [-2.0f32, -0.5, 0.0, 0.5, 2.0] {
            assert!(t.apply(0.0, 0.0, z) >= 0.0);
        }
    }

    #[test]
    fn test_composition_order_is_significant() {
        let mut a = HeightField::new(2, 2, 1.0);
        a.heights.fill(1.0);
        let mut forward = TransformPipeline::new();
        forward.add(Scale(2.0)).add(Offset(1.0));
        forward.run(&mut a);
        assert!(a.heights.iter().all(|&z| z == 3.0));

        let mut b = HeightField::new(2, 2, 1.0);
        b.heights.fill(1.0);
        let mut reversed = TransformPipeline::new();
        reversed.add(Offset(1.0)).add(Scale(2.0));
        reversed.run(&mut b);
        assert!(b.heights.iter().all(|&z| z == 4.0));
    }

    #[test]
    fn test_reference_chain_on_small_field() {
        // Flat 3x3 with the center raised to 1.0, pushed through the
        // reference scale -> offset -> floor chain.
        let mut field = HeightField::new(3, 3, 1.0);
        field.set_height(1, 1, 1.0);

        apply_transform(&mut field, &Scale(0.5));
        assert_eq!(field.get_height(1, 1), 0.5);

        apply_transform(&mut field, &Offset(-0.1));
        assert!((field.get_height(1, 1) - 0.4).abs() < 1e-6);
        assert!((field.get_height(0, 0) + 0.1).abs() < 1e-6);

        apply_transform(&mut field, &Floor(0.0));
        assert!((field.get_height(1, 1) - 0.4).abs() < 1e-6);
        // Cells the offset pushed negative are raised to the floor.
        assert_eq!(field.get_height(0, 0), 0.0);
        assert!(field.heights.iter().all(|&z| z >= 0.0));
    }

    #[test]
    fn test_noise_transform_ignores_incoming_height() {
        let noise = crate::noise::NoiseField::new(4, 99);
        let a = noise.apply(0.3, 0.4, 0.0);
        let b = noise.apply(0.3, 0.4, 123.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_pipeline_refreshes_normals() {
        let mut field = HeightField::new(8, 8, 1.0);
        let mut pipeline = TransformPipeline::new();
        pipeline.add(crate::noise::NoiseField::new(4, 7));
        pipeline.run(&mut field);

        assert!(
            field.normals.iter().any(|n| (n.z - 1.0).abs() > 1e-6),
            "noise terrain should tilt at least one normal"
        );
    }
}
