//! 16-bit grayscale PNG export for scalar grids.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageBuffer, ImageEncoder, Luma};
use image::codecs::png::PngEncoder;

use super::{ExportError, PngExportOptions};
use crate::elevation::ElevationGrid;
use crate::terrain::Grid;

/// Quantizes a `[0,1]` value to the full 16-bit range.
fn to_u16(v: f32) -> u16 {
    let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    (v * 65535.0).round() as u16
}

/// Export a `[0,1]` scalar grid as a 16-bit grayscale PNG.
///
/// Values outside `[0,1]` are clamped; non-finite values are written as 0.
pub fn export_layer_png(
    grid: &Grid<f32>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    if grid.is_empty() {
        return Err(ExportError::EmptyGrid);
    }
    let (width, height) = grid.dimensions();

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for (x, y, &v) in grid.iter() {
        img.put_pixel(x, y, Luma([to_u16(v)]));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    log::debug!("Wrote {}x{} grayscale PNG to {}", width, height, path.display());
    Ok(())
}

/// Export an elevation grid as a 16-bit grayscale heightmap.
pub fn export_elevation_png(
    elevation: &ElevationGrid,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    export_layer_png(elevation, path, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn quantization_clamps() {
        assert_eq!(to_u16(0.0), 0);
        assert_eq!(to_u16(1.0), 65535);
        assert_eq!(to_u16(2.0), 65535);
        assert_eq!(to_u16(-1.0), 0);
        assert_eq!(to_u16(f32::NAN), 0);
    }

    #[test]
    fn test_export_elevation_png() {
        let grid = Grid::from_fn(32, 16, |x, y| (x + y) as f32 / 46.0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("elevation.png");
        export_elevation_png(&grid, &path, &PngExportOptions::default()).unwrap();

        assert!(path.exists());
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let grid: Grid<f32> = Grid::filled(0, 0, 0.0);
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let result = export_layer_png(&grid, &path, &PngExportOptions::default());
        assert!(matches!(result, Err(ExportError::EmptyGrid)));
        assert!(!path.exists());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let grid = Grid::filled(4, 4, 0.5f32);
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("layer.png");
        let result = export_layer_png(&grid, &path, &PngExportOptions::default());
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
