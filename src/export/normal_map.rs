//! Normal map export from the field's derived normals.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use crate::grid::HeightField;

/// Errors that can occur during normal map export.
#[derive(Error, Debug)]
pub enum NormalMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

fn encode_normal_rgb8(n: Vec3) -> [u8; 3] {
    let c = (n * 0.5) + Vec3::splat(0.5);
    [
        (c.x.clamp(0.0, 1.0) * 255.0) as u8,
        (c.y.clamp(0.0, 1.0) * 255.0) as u8,
        (c.z.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

/// Exports the field's stored normals as an RGB PNG.
///
/// Output is tangent-space-like with Z pointing "out of the image". The
/// stored normals are written as-is; call
/// [`HeightField::recompute_normals`] first if heights changed since the
/// last derivation.
pub fn export_normal_map_png(field: &HeightField, path: &Path) -> Result<(), NormalMapError> {
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(field.width, field.height);

    for (col, row) in field.vertex_coords() {
        let n = field.normals[field.index(col, row)];
        img.put_pixel(col, row, Rgb(encode_normal_rgb8(n)));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder.write_image(
        img.as_raw(),
        field.width,
        field.height,
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(())
}
