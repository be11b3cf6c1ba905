//! Earth composite: structure from one source, detail from another.
//!
//! The structure map (preferably a scenario save) fixes dimensions, biomes
//! and the water mask. The detail map (preferably a WorldBuilder save)
//! contributes elevation and biological potential, resampled to the
//! structure's dimensions when they differ.

use std::path::PathBuf;

use super::{PipelineError, StageId};
use crate::biomes::{ClassifiedGrid, Classification};
use crate::elevation::ElevationGrid;
use crate::layers::{overlays_from_source, LayerDecomposer, LayerInputs};
use crate::source::{RawMapData, SourceFormat};
use crate::terrain::Grid;

/// Present water coverage of Earth.
pub const EARTH_WATER_COVERAGE: f32 = 0.71;
/// Earth is fully habitable.
pub const EARTH_BIOSPHERE_DENSITY: f32 = 1.0;

/// Gap kept between water-cell elevation and sea level.
const WATER_MARGIN: f32 = 0.01;

/// A parsed, classified and elevated source map.
#[derive(Debug, Clone)]
pub struct IngestedMap {
    pub data: RawMapData,
    pub source_file: Option<PathBuf>,
    pub classification: Classification,
    pub elevation: ElevationGrid,
}

impl IngestedMap {
    pub fn format(&self) -> SourceFormat {
        self.data.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.classification.grid.dimensions()
    }
}

pub struct EarthComposite {
    pub classified: ClassifiedGrid,
    pub elevation: ElevationGrid,
    /// Biological potential from the detail map, zero on water.
    pub potential: Option<Grid<f32>>,
}

/// Picks `(structure, detail)` from the available maps.
///
/// A scenario map is preferred for structure and a WorldBuilder map for
/// detail; with matching formats the first map provides structure. A single
/// map fills both roles.
pub fn assign_roles(maps: &[IngestedMap]) -> Option<(&IngestedMap, Option<&IngestedMap>)> {
    match maps {
        [] => None,
        [only] => Some((only, None)),
        [a, b, ..] => {
            if a.format() == SourceFormat::WorldBuilder && b.format() == SourceFormat::Scenario {
                Some((b, Some(a)))
            } else {
                Some((a, Some(b)))
            }
        }
    }
}

/// Builds the composite grids.
///
/// # Arguments
/// * `structure` - Map providing dimensions, biomes and water mask
/// * `detail` - Optional map providing elevation and biological potential
/// * `decomposer` - Used to derive the detail map's biological layer
/// * `sea_level` - Normalized sea level for reconciling elevation with water
pub fn merge(
    structure: &IngestedMap,
    detail: Option<&IngestedMap>,
    decomposer: &LayerDecomposer,
    sea_level: f32,
) -> Result<EarthComposite, PipelineError> {
    let classified = structure.classification.grid.clone();
    let (w, h) = classified.dimensions();

    let (mut elevation, potential) = match detail {
        Some(detail) => {
            if detail.dimensions() != (w, h) {
                log::info!(
                    "Resampling {}x{} detail map to {}x{}",
                    detail.dimensions().0,
                    detail.dimensions().1,
                    w,
                    h
                );
            }
            let elevation = detail
                .elevation
                .resample_nearest(w, h)
                .ok_or_else(|| {
                    PipelineError::stage_failed(StageId::Elevation, "empty detail map")
                })?;

            let overlays = overlays_from_source(&detail.data);
            let layers = decomposer
                .decompose(
                    &detail.classification.grid,
                    LayerInputs {
                        elevation: Some(&detail.elevation),
                        overlays: overlays.as_ref(),
                        water_fraction: None,
                    },
                )
                .map_err(|e| PipelineError::stage_failed(StageId::Decompose, e))?;
            let potential = layers
                .biological
                .resample_nearest(w, h)
                .ok_or_else(|| {
                    PipelineError::stage_failed(StageId::Decompose, "empty detail map")
                })?;
            (elevation, Some(potential))
        }
        None => (structure.elevation.clone(), None),
    };

    // Structure decides water; elevation must agree with it.
    for (e, biome) in elevation.cells_mut().iter_mut().zip(classified.cells()) {
        let reconciled = if biome.is_water() {
            e.min(sea_level - WATER_MARGIN)
        } else {
            e.max(sea_level)
        };
        *e = reconciled.clamp(0.0, 1.0);
    }
    let potential = potential.map(|p| {
        p.map_with_coords(|x, y, &v| if classified.get(x, y).is_water() { 0.0 } else { v })
    });

    Ok(EarthComposite {
        classified,
        elevation,
        potential,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::{Biome, BiomeCounts};
    use crate::source::{RawCell, RawContent};

    fn ingested(format: SourceFormat, grid: ClassifiedGrid, elevation: f32) -> IngestedMap {
        let (w, h) = grid.dimensions();
        let content = match format {
            SourceFormat::WorldBuilder => RawContent::Plots(vec![RawCell::new(0, 0).with_river()]),
            SourceFormat::Scenario => RawContent::Codes(Grid::filled(w, h, 'g')),
        };
        IngestedMap {
            data: RawMapData {
                format,
                width: w,
                height: h,
                content,
            },
            source_file: None,
            classification: Classification {
                counts: BiomeCounts::from_grid(&grid),
                grid,
            },
            elevation: Grid::filled(w, h, elevation),
        }
    }

    #[test]
    fn scenario_map_takes_structure_role() {
        let wb = ingested(SourceFormat::WorldBuilder, Grid::filled(2, 2, Biome::Forest), 0.6);
        let sc = ingested(SourceFormat::Scenario, Grid::filled(4, 4, Biome::Grasslands), 0.55);
        let maps = vec![wb, sc];
        let (structure, detail) = assign_roles(&maps).unwrap();
        assert_eq!(structure.format(), SourceFormat::Scenario);
        assert_eq!(detail.map(IngestedMap::format), Some(SourceFormat::WorldBuilder));

        let single = vec![maps[0].clone()];
        let (structure, detail) = assign_roles(&single).unwrap();
        assert_eq!(structure.format(), SourceFormat::WorldBuilder);
        assert!(detail.is_none());
        assert!(assign_roles(&[]).is_none());
    }

    #[test]
    fn detail_is_resampled_to_structure() {
        let mut structure_grid = Grid::filled(4, 4, Biome::Grasslands);
        structure_grid.set(0, 0, Biome::Ocean);
        let structure = ingested(SourceFormat::Scenario, structure_grid, 0.55);
        let detail = ingested(SourceFormat::WorldBuilder, Grid::filled(2, 2, Biome::Forest), 0.7);

        let composite = merge(&structure, Some(&detail), &LayerDecomposer::default(), 0.5).unwrap();
        assert_eq!(composite.elevation.dimensions(), (4, 4));
        assert!(*composite.elevation.get(0, 0) < 0.5);
        assert!((*composite.elevation.get(3, 3) - 0.7).abs() < 1e-6);

        let potential = composite.potential.unwrap();
        assert_eq!(potential.dimensions(), (4, 4));
        assert_eq!(*potential.get(0, 0), 0.0);
        assert!(*potential.get(3, 3) > 0.0);
    }

    #[test]
    fn structure_alone_keeps_land_floor() {
        let mut grid = Grid::filled(3, 3, Biome::Plains);
        grid.set(1, 1, Biome::DeepSea);
        let mut structure = ingested(SourceFormat::Scenario, grid, 0.3);
        structure.elevation.set(1, 1, 0.8);

        let composite = merge(&structure, None, &LayerDecomposer::default(), 0.5).unwrap();
        assert!(composite.potential.is_none());
        for (e, b) in composite.elevation.cells().iter().zip(composite.classified.cells()) {
            if b.is_water() {
                assert!(*e < 0.5);
            } else {
                assert!(*e >= 0.5);
            }
        }
    }
}
