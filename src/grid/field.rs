//! HeightField: the mutable height grid and its derived normal field.

use glam::Vec3;
use rayon::prelude::*;

/// A rectangular grid of elevation samples over a regular lattice, plus the
/// unit normals derived from them.
///
/// Vertices are indexed linearly as `idx = row * width + col`. The grid spans
/// a square region of side `extent` centred on the origin, so vertex plane
/// coordinates run over `[-extent/2, extent/2]` along each axis.
#[derive(Debug, Clone)]
pub struct HeightField {
    /// Vertex resolution along the x axis.
    pub width: u32,
    /// Vertex resolution along the y axis.
    pub height: u32,
    /// World-space span of the plane.
    pub extent: f32,
    /// Elevation per vertex, row-major.
    pub heights: Vec<f32>,
    /// Unit normal per vertex, row-major. Derived from `heights`; call
    /// [`HeightField::recompute_normals`] after bulk height mutation.
    pub normals: Vec<Vec3>,
}

impl HeightField {
    /// Creates a flat field with the given vertex resolution per axis.
    ///
    /// Heights start at 0.0 and normals point straight up.
    ///
    /// # Panics
    /// Panics if either dimension is below 2 or the extent is not positive.
    pub fn new(width: u32, height: u32, extent: f32) -> Self {
        assert!(width >= 2 && height >= 2, "field needs at least 2x2 vertices");
        assert!(extent > 0.0, "extent must be positive");

        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            extent,
            heights: vec![0.0; count],
            normals: vec![Vec3::Z; count],
        }
    }

    /// Creates a field with `resolution + 1` vertices per side, matching a
    /// plane subdivided into `resolution` segments per axis.
    pub fn from_resolution(resolution: u32, extent: f32) -> Self {
        assert!(resolution >= 1, "resolution must be positive");
        Self::new(resolution + 1, resolution + 1, extent)
    }

    /// Total number of vertices.
    pub fn vertex_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Linear index of a vertex.
    #[inline]
    pub fn index(&self, col: u32, row: u32) -> usize {
        debug_assert!(col < self.width && row < self.height);
        (row * self.width + col) as usize
    }

    /// Returns the height at the given vertex.
    ///
    /// # Panics
    /// Panics in debug builds if the coordinate is out of bounds.
    pub fn get_height(&self, col: u32, row: u32) -> f32 {
        self.heights[self.index(col, row)]
    }

    /// Sets the height at the given vertex.
    ///
    /// # Panics
    /// Panics in debug builds if the coordinate is out of bounds.
    pub fn set_height(&mut self, col: u32, row: u32, value: f32) {
        let idx = self.index(col, row);
        self.heights[idx] = value;
    }

    /// Height lookup with neighbor coordinates clamped to the grid edge.
    pub fn height_at_clamped(&self, col: i64, row: i64) -> f32 {
        let c = col.clamp(0, self.width as i64 - 1) as u32;
        let r = row.clamp(0, self.height as i64 - 1) as u32;
        self.get_height(c, r)
    }

    /// Grid spacing (distance between adjacent vertices) along each axis.
    pub fn spacing(&self) -> (f32, f32) {
        (
            self.extent / (self.width - 1) as f32,
            self.extent / (self.height - 1) as f32,
        )
    }

    /// Plane coordinates of a vertex, centred on the origin.
    pub fn vertex_position(&self, col: u32, row: u32) -> (f32, f32) {
        let x = (col as f32 / (self.width - 1) as f32 - 0.5) * self.extent;
        let y = (row as f32 / (self.height - 1) as f32 - 0.5) * self.extent;
        (x, y)
    }

    /// Computes the surface normal at a vertex from the current heights.
    ///
    /// Uses a Sobel gradient over the 3x3 neighborhood (edge-clamped), so the
    /// result always reflects live terrain even mid-mutation.
    pub fn normal_at(&self, col: u32, row: u32) -> Vec3 {
        let (dx, dy) = self.spacing();
        let x = col as i64;
        let y = row as i64;

        let tl = self.height_at_clamped(x - 1, y - 1);
        let tc = self.height_at_clamped(x, y - 1);
        let tr = self.height_at_clamped(x + 1, y - 1);
        let ml = self.height_at_clamped(x - 1, y);
        let mr = self.height_at_clamped(x + 1, y);
        let bl = self.height_at_clamped(x - 1, y + 1);
        let bc = self.height_at_clamped(x, y + 1);
        let br = self.height_at_clamped(x + 1, y + 1);

        let gx = ((tr + 2.0 * mr + br) - (tl + 2.0 * ml + bl)) / (8.0 * dx);
        let gy = ((bl + 2.0 * bc + br) - (tl + 2.0 * tc + tr)) / (8.0 * dy);

        Vec3::new(-gx, -gy, 1.0).normalize()
    }

    /// Recomputes the entire normal field from the current heights.
    pub fn recompute_normals(&mut self) {
        let width = self.width;
        let normals: Vec<Vec3> = (0..self.vertex_count())
            .into_par_iter()
            .map(|i| {
                let col = (i as u32) % width;
                let row = (i as u32) / width;
                self.normal_at(col, row)
            })
            .collect();
        self.normals = normals;
    }

    /// Returns the global (min, max) height values.
    pub fn height_range(&self) -> (f32, f32) {
        let min = self.heights.iter().cloned().fold(f32::MAX, f32::min);
        let max = self.heights.iter().cloned().fold(f32::MIN, f32::max);
        (min, max)
    }

    /// Returns an iterator over all (col, row) vertex coordinates.
    pub fn vertex_coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        let h = self.height;
        (0..h).flat_map(move |row| (0..w).map(move |col| (col, row)))
    }

    /// Interleaved `(x, y, z)` vertex buffer, stride 3, for the renderer.
    pub fn vertex_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertex_count() * 3);
        for (col, row) in self.vertex_coords() {
            let (x, y) = self.vertex_position(col, row);
            out.push(x);
            out.push(y);
            out.push(self.get_height(col, row));
        }
        out
    }

    /// Interleaved `(nx, ny, nz)` normal buffer, stride 3, parallel to
    /// [`HeightField::vertex_buffer`].
    pub fn normal_buffer(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertex_count() * 3);
        for n in &self.normals {
            out.push(n.x);
            out.push(n.y);
            out.push(n.z);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = HeightField::from_resolution(4, 1.0);
        assert_eq!(field.width, 5);
        assert_eq!(field.height, 5);
        assert_eq!(field.heights.len(), 25);
        assert_eq!(field.normals.len(), 25);
        assert!(field.heights.iter().all(|&h| h == 0.0));
    }

    #[test]
    #[should_panic]
    fn test_degenerate_field_rejected() {
        HeightField::new(1, 8, 1.0);
    }

    #[test]
    fn test_get_set_height() {
        let mut field = HeightField::new(8, 8, 1.0);
        field.set_height(3, 5, 0.25);
        assert_eq!(field.get_height(3, 5), 0.25);
        assert_eq!(field.heights[5 * 8 + 3], 0.25);
    }

    #[test]
    fn test_clamped_lookup_stays_in_bounds() {
        let mut field = HeightField::new(4, 4, 1.0);
        field.set_height(0, 0, -1.0);
        field.set_height(3, 3, 2.0);
        assert_eq!(field.height_at_clamped(-5, -5), -1.0);
        assert_eq!(field.height_at_clamped(10, 10), 2.0);
    }

    #[test]
    fn test_vertex_positions_span_extent() {
        let field = HeightField::from_resolution(2, 1.0);
        let (x0, y0) = field.vertex_position(0, 0);
        let (x2, y2) = field.vertex_position(2, 2);
        assert!((x0 + 0.5).abs() < 1e-6 && (y0 + 0.5).abs() < 1e-6);
        assert!((x2 - 0.5).abs() < 1e-6 && (y2 - 0.5).abs() < 1e-6);

        let (cx, cy) = field.vertex_position(1, 1);
        assert!(cx.abs() < 1e-6 && cy.abs() < 1e-6);
    }

    #[test]
    fn test_flat_field_normals_point_up() {
        let mut field = HeightField::new(6, 6, 1.0);
        field.recompute_normals();
        for n in &field.normals {
            assert!((n.z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_slope_tilts_normal_downhill() {
        // Height decreases with col: downhill is +x, so nx must be positive.
        let mut field = HeightField::new(8, 8, 1.0);
        for (col, row) in field.vertex_coords().collect::<Vec<_>>() {
            field.set_height(col, row, -(col as f32) * 0.1);
        }
        field.recompute_normals();

        let n = field.normal_at(4, 4);
        assert!(n.x > 0.0, "normal should tilt toward descending x");
        assert!(n.y.abs() < 1e-6);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_buffers_are_parallel_and_strided() {
        let mut field = HeightField::from_resolution(3, 2.0);
        field.set_height(1, 2, 0.7);
        field.recompute_normals();

        let verts = field.vertex_buffer();
        let normals = field.normal_buffer();
        assert_eq!(verts.len(), 16 * 3);
        assert_eq!(normals.len(), verts.len());

        // z of vertex (1, 2) sits at stride-3 offset of idx = 2*4 + 1.
        let idx = 2 * 4 + 1;
        assert_eq!(verts[3 * idx + 2], 0.7);
    }

    #[test]
    fn test_height_range() {
        let mut field = HeightField::new(4, 4, 1.0);
        field.set_height(0, 0, -0.5);
        field.set_height(3, 1, 1.5);
        assert_eq!(field.height_range(), (-0.5, 1.5));
    }
}
