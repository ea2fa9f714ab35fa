//! RAW format export for game engine compatibility.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::grid::HeightField;

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian (Unity default).
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian (high precision).
    R32Float,
}

impl Default for RawFormat {
    fn default() -> Self {
        RawFormat::R16LittleEndian
    }
}

/// Exports the field as a headerless RAW heightmap, row-major.
///
/// R16 formats normalize heights into `[min_height, max_height]`; R32Float
/// writes raw height values and ignores the range.
pub fn export_height_raw(
    field: &HeightField,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && min_height >= max_height {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let range = max_height - min_height;

    for (col, row) in field.vertex_coords() {
        let height = field.get_height(col, row);
        match format {
            RawFormat::R16LittleEndian => {
                let normalized = ((height - min_height) / range).clamp(0.0, 1.0);
                let value = (normalized * 65535.0) as u16;
                writer.write_all(&value.to_le_bytes())?;
            }
            RawFormat::R16BigEndian => {
                let normalized = ((height - min_height) / range).clamp(0.0, 1.0);
                let value = (normalized * 65535.0) as u16;
                writer.write_all(&value.to_be_bytes())?;
            }
            RawFormat::R32Float => {
                writer.write_all(&height.to_le_bytes())?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_r16_size() {
        let field = HeightField::new(32, 32, 1.0);
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");

        export_height_raw(&field, &path, RawFormat::R16LittleEndian, -1.0, 1.0).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), 32 * 32 * 2);
    }

    #[test]
    fn test_export_r32_size() {
        let field = HeightField::new(16, 16, 1.0);
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");

        export_height_raw(&field, &path, RawFormat::R32Float, 0.0, 0.0).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), 16 * 16 * 4);
    }

    #[test]
    fn test_invalid_range_rejected_for_r16() {
        let field = HeightField::new(8, 8, 1.0);
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.raw");

        let result = export_height_raw(&field, &path, RawFormat::R16LittleEndian, 1.0, 1.0);
        assert!(result.is_err());
    }
}
