//! Color preview maps for classified and geological grids.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ImageBuffer, ImageEncoder, Rgb};

use super::{ExportError, PngExportOptions};
use crate::biomes::ClassifiedGrid;
use crate::layers::GeologicalClass;
use crate::terrain::Grid;

/// Writes any grid as an RGB PNG using `color` per cell.
fn write_rgb<T, F>(
    grid: &Grid<T>,
    path: &Path,
    options: &PngExportOptions,
    color: F,
) -> Result<(), ExportError>
where
    F: Fn(&T) -> [u8; 3],
{
    if grid.is_empty() {
        return Err(ExportError::EmptyGrid);
    }
    let (width, height) = grid.dimensions();

    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (x, y, cell) in grid.iter() {
        img.put_pixel(x, y, Rgb(color(cell)));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;
    Ok(())
}

/// Export a classified grid as an RGB biome preview.
pub fn export_classified_png(
    grid: &ClassifiedGrid,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    write_rgb(grid, path, options, |b| b.preview_rgb())?;
    log::debug!("Wrote biome preview to {}", path.display());
    Ok(())
}

/// Export a geological layer as an RGB preview.
pub fn export_geological_png(
    grid: &Grid<GeologicalClass>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), ExportError> {
    write_rgb(grid, path, options, |g| g.preview_rgb())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use tempfile::tempdir;

    #[test]
    fn test_export_classified_png() {
        let grid = Grid::from_fn(Biome::COUNT as u32, 3, |x, _| Biome::ALL[x as usize]);
        let dir = tempdir().unwrap();
        let path = dir.path().join("biomes.png");

        export_classified_png(&grid, &path, &PngExportOptions::default()).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_geological_png() {
        let grid = Grid::from_fn(4, 4, |x, _| match x {
            0 => GeologicalClass::Ocean,
            1 => GeologicalClass::Plains,
            2 => GeologicalClass::Hills,
            _ => GeologicalClass::Mountains,
        });
        let dir = tempdir().unwrap();
        let path = dir.path().join("geo.png");

        export_geological_png(&grid, &path, &PngExportOptions::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_classified_grid_is_rejected() {
        let grid: ClassifiedGrid = Grid::filled(0, 5, Biome::Ocean);
        let dir = tempdir().unwrap();
        let result =
            export_classified_png(&grid, &dir.path().join("x.png"), &PngExportOptions::default());
        assert!(matches!(result, Err(ExportError::EmptyGrid)));
    }
}
