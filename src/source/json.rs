//! JSON height-source loading and sampling.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Full-scale raw sample value; normalized elevation = raw / 65536.
const FULL_SCALE: f32 = 65536.0;

/// Reference span of the normalized sampling plane (coordinates in [-1, 1]).
const REFERENCE_SPAN: f32 = 1.0;

/// Errors that can occur while loading an external height source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("source dimensions must be positive (got {0}x{1})")]
    EmptyDims(u32, u32),
    #[error("source has {found} rows, expected dims.y = {expected}")]
    RowCountMismatch { expected: u32, found: usize },
    #[error("row {row} has {found} samples, expected dims.x = {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: u32,
        found: usize,
    },
}

/// Source grid dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceDims {
    pub x: u32,
    pub y: u32,
}

/// On-disk height source payload.
///
/// `heights` is row-major: `heights[row][col]`, `row < dims.y`,
/// `col < dims.x`. Samples are 16-bit range with a full-scale value of
/// 65536 (normalized 1.0), so they are stored one width up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeightSourceData {
    pub dims: SourceDims,
    pub heights: Vec<Vec<u32>>,
}

/// A read-only sampler over a loaded height source.
///
/// Queried by normalized plane coordinate in `[-1, 1]`, not by grid index.
/// Coordinates mapping outside the source grid yield height 0 with a
/// diagnostic instead of an error.
#[derive(Debug)]
pub struct HeightSampler {
    dims: SourceDims,
    samples: Vec<u32>,
    oob_samples: AtomicU64,
    oob_reported: AtomicBool,
}

impl HeightSampler {
    /// Builds a sampler from a parsed payload, validating its structure.
    pub fn from_data(data: HeightSourceData) -> Result<Self, LoadError> {
        let dims = data.dims;
        if dims.x == 0 || dims.y == 0 {
            return Err(LoadError::EmptyDims(dims.x, dims.y));
        }
        if data.heights.len() != dims.y as usize {
            return Err(LoadError::RowCountMismatch {
                expected: dims.y,
                found: data.heights.len(),
            });
        }

        let mut samples = Vec::with_capacity((dims.x as usize) * (dims.y as usize));
        for (row, cols) in data.heights.iter().enumerate() {
            if cols.len() != dims.x as usize {
                return Err(LoadError::RowLengthMismatch {
                    row,
                    expected: dims.x,
                    found: cols.len(),
                });
            }
            samples.extend_from_slice(cols);
        }

        Ok(Self {
            dims,
            samples,
            oob_samples: AtomicU64::new(0),
            oob_reported: AtomicBool::new(false),
        })
    }

    /// Source grid dimensions.
    pub fn dims(&self) -> SourceDims {
        self.dims
    }

    /// Number of samples that fell outside the source grid so far.
    pub fn out_of_bounds_samples(&self) -> u64 {
        self.oob_samples.load(Ordering::Relaxed)
    }

    /// Samples the normalized height at a plane coordinate.
    ///
    /// `[-1, 1]` maps across the source grid; the mapped index is rounded to
    /// the nearest sample. Both axes are remapped against the source
    /// *width*, so non-square sources sample anisotropically along y.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let ix = (self.dims.x as f32 * 0.5 * (x / REFERENCE_SPAN + 1.0)).round() as i64;
        let iy = (self.dims.x as f32 * 0.5 * (y / REFERENCE_SPAN + 1.0)).round() as i64;

        if (0..self.dims.x as i64).contains(&ix) && (0..self.dims.y as i64).contains(&iy) {
            let idx = (iy as u32 * self.dims.x + ix as u32) as usize;
            self.samples[idx] as f32 / FULL_SCALE
        } else {
            self.note_out_of_bounds(ix, iy);
            0.0
        }
    }

    fn note_out_of_bounds(&self, ix: i64, iy: i64) {
        self.oob_samples.fetch_add(1, Ordering::Relaxed);
        if !self.oob_reported.swap(true, Ordering::Relaxed) {
            eprintln!(
                "height source: sample at ({}, {}) outside {}x{} grid, returning 0 \
                 (further reports suppressed)",
                ix, iy, self.dims.x, self.dims.y
            );
        }
    }
}

/// Loads a height source payload from a JSON file and builds its sampler.
///
/// This is the pipeline's only suspension point; callers await it (or block
/// on it with `pollster::block_on`) before applying transforms that
/// reference the sampler.
pub async fn load_height_source(path: &Path) -> Result<HeightSampler, LoadError> {
    let bytes = std::fs::read(path)?;
    let data: HeightSourceData = serde_json::from_slice(&bytes)?;
    HeightSampler::from_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn two_by_two() -> HeightSampler {
        let data = HeightSourceData {
            dims: SourceDims { x: 2, y: 2 },
            heights: vec![vec![0, 65536], vec![32768, 65536]],
        };
        HeightSampler::from_data(data).unwrap()
    }

    #[test]
    fn test_center_maps_to_row1_col1() {
        let sampler = two_by_two();
        // (0, 0) remaps to index (1, 1): raw 65536 -> normalized 1.0.
        assert_eq!(sampler.sample(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_corner_maps_to_origin_sample() {
        let sampler = two_by_two();
        // (-1, -1) remaps to index (0, 0): raw 0 -> normalized 0.0, in bounds.
        assert_eq!(sampler.sample(-1.0, -1.0), 0.0);
        assert_eq!(sampler.out_of_bounds_samples(), 0);
    }

    #[test]
    fn test_half_scale_sample() {
        let sampler = two_by_two();
        // (-1, 0) remaps to index (0, 1): raw 32768 -> 0.5.
        assert_eq!(sampler.sample(-1.0, 0.0), 0.5);
    }

    #[test]
    fn test_out_of_bounds_returns_zero_without_error() {
        let sampler = two_by_two();
        // (1, 1) remaps to index (2, 2), one past the grid edge.
        assert_eq!(sampler.sample(1.0, 1.0), 0.0);
        assert_eq!(sampler.sample(5.0, 0.0), 0.0);
        assert_eq!(sampler.out_of_bounds_samples(), 2);
    }

    #[test]
    fn test_row_count_mismatch_rejected() {
        let data = HeightSourceData {
            dims: SourceDims { x: 2, y: 3 },
            heights: vec![vec![0, 0], vec![0, 0]],
        };
        assert!(matches!(
            HeightSampler::from_data(data),
            Err(LoadError::RowCountMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_row_length_mismatch_rejected() {
        let data = HeightSourceData {
            dims: SourceDims { x: 3, y: 1 },
            heights: vec![vec![0, 0]],
        };
        assert!(matches!(
            HeightSampler::from_data(data),
            Err(LoadError::RowLengthMismatch { row: 0, expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_zero_dims_rejected() {
        let data = HeightSourceData {
            dims: SourceDims { x: 0, y: 2 },
            heights: vec![],
        };
        assert!(matches!(
            HeightSampler::from_data(data),
            Err(LoadError::EmptyDims(0, 2))
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dims":{{"x":2,"y":2}},"heights":[[0,65536],[32768,65536]]}}"#
        )
        .unwrap();

        let sampler = pollster::block_on(load_height_source(file.path())).unwrap();
        assert_eq!(sampler.dims().x, 2);
        assert_eq!(sampler.sample(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_load_malformed_json_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let result = pollster::block_on(load_height_source(file.path()));
        assert!(matches!(result, Err(LoadError::Json(_))));
    }
}
