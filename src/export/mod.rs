//! Preview export of pipeline grids to PNG files.
//!
//! Scalar layers and elevation are written as 16-bit grayscale; biome and
//! geological grids as 8-bit RGB using each class's preview color.

mod biome_map;
mod png;

pub use biome_map::{export_classified_png, export_geological_png};
pub use png::{export_elevation_png, export_layer_png};

use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType};
use thiserror::Error;

use crate::elevation::ElevationGrid;
use crate::layers::LayerSet;

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Cannot export an empty grid")]
    EmptyGrid,
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Writes the decomposed layers and elevation into `dir`.
///
/// Files are named `{base_name}_geological.png`, `{base_name}_hydrological.png`,
/// `{base_name}_biological.png` and `{base_name}_elevation.png`. The
/// directory is created if missing.
///
/// # Returns
/// Paths of the written files, in the order above.
pub fn export_layer_set(
    layers: &LayerSet,
    elevation: &ElevationGrid,
    dir: &Path,
    base_name: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;
    let options = PngExportOptions::default();
    let path = |suffix: &str| dir.join(format!("{base_name}_{suffix}.png"));

    let written = vec![
        path("geological"),
        path("hydrological"),
        path("biological"),
        path("elevation"),
    ];
    export_geological_png(&layers.geological, &written[0], &options)?;
    export_layer_png(&layers.hydrological, &written[1], &options)?;
    export_layer_png(&layers.biological, &written[2], &options)?;
    export_elevation_png(elevation, &written[3], &options)?;

    log::info!("Exported layer set '{}' to {}", base_name, dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::layers::LayerDecomposer;
    use crate::terrain::Grid;
    use tempfile::tempdir;

    #[test]
    fn test_export_layer_set() {
        let biomes = Grid::from_fn(8, 4, |x, _| {
            if x < 3 {
                Biome::Ocean
            } else {
                Biome::Forest
            }
        });
        let layers = LayerDecomposer::default().decompose_biomes(&biomes);
        let elevation = Grid::from_fn(8, 4, |x, _| x as f32 / 7.0);

        let dir = tempdir().unwrap();
        let out = dir.path().join("layers");
        let written = export_layer_set(&layers, &elevation, &out, "map").unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }
        assert!(out.join("map_hydrological.png").exists());
    }
}
