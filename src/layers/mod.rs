//! Layer decomposition.
//!
//! Splits a classified map into three independently addressable grids:
//! - geological: structural class from elevation banding (or biome)
//! - hydrological: water coverage weight in [0, 1]
//! - biological: vegetation potential in [0, 1]
//!
//! Decomposition is a pure function of its inputs. Running it twice on the
//! same grids yields identical layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::{smoothstep, Biome, ClassifiedGrid};
use crate::elevation::ElevationGrid;
use crate::source::{FeatureCode, RawMapData};
use crate::terrain::Grid;

/// Errors that can occur during decomposition.
#[derive(Error, Debug, PartialEq)]
pub enum LayerError {
    #[error("{layer} grid is {found:?}, expected {expected:?}")]
    DimensionMismatch {
        layer: &'static str,
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("Water fraction {0} outside [0, 1]")]
    InvalidWaterFraction(f32),
}

/// Structural terrain class. Ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeologicalClass {
    Ocean = 0,
    Plains = 1,
    Hills = 2,
    Mountains = 3,
}

impl GeologicalClass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// RGB preview color for this class.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            GeologicalClass::Ocean => [15, 40, 90],
            GeologicalClass::Plains => [120, 170, 90],
            GeologicalClass::Hills => [160, 140, 100],
            GeologicalClass::Mountains => [200, 200, 200],
        }
    }

    /// Structural class implied by a biome when no elevation is available.
    pub fn from_biome(biome: Biome) -> Self {
        match biome {
            Biome::Ocean | Biome::DeepSea => GeologicalClass::Ocean,
            Biome::Rocky => GeologicalClass::Mountains,
            Biome::Boreal | Biome::Tundra | Biome::Arctic => GeologicalClass::Hills,
            Biome::Grasslands
            | Biome::Plains
            | Biome::Desert
            | Biome::Forest
            | Biome::Jungle
            | Biome::Swamp
            | Biome::Wetlands => GeologicalClass::Plains,
        }
    }
}

/// Per-cell overlay attributes carried over from the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellOverlay {
    pub feature: Option<FeatureCode>,
    pub has_river: bool,
}

/// Overlay grid for a parsed map. Scenario maps carry no overlays.
pub fn overlays_from_source(data: &RawMapData) -> Option<Grid<CellOverlay>> {
    let plots = data.plot_grid()?;
    Some(plots.map(|cell| match cell {
        Some(c) => CellOverlay {
            feature: c.feature.clone(),
            has_river: c.has_river,
        },
        None => CellOverlay::default(),
    }))
}

/// Thresholds and weights for decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Land cells below this are plains.
    pub hills_threshold: f32,
    /// Land cells at or above this are mountains.
    pub mountains_threshold: f32,
    /// Half-width of the smoothed water/land transition.
    pub coverage_band: f32,
    /// Vegetation bonus for river cells.
    pub river_boost: f32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            hills_threshold: 0.70,
            mountains_threshold: 0.85,
            coverage_band: 0.02,
            river_boost: 0.25,
        }
    }
}

/// The three decomposed layers, all with the input's dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSet {
    pub geological: Grid<GeologicalClass>,
    pub hydrological: Grid<f32>,
    pub biological: Grid<f32>,
}

impl LayerSet {
    pub fn dimensions(&self) -> (u32, u32) {
        self.geological.dimensions()
    }

    /// Fraction of cells whose hydrological weight is at least one half.
    pub fn water_fraction(&self) -> f32 {
        if self.hydrological.is_empty() {
            return 0.0;
        }
        let wet = self.hydrological.cells().iter().filter(|&&w| w >= 0.5).count();
        wet as f32 / self.hydrological.len() as f32
    }
}

/// Optional inputs to decomposition beyond the classified grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerInputs<'a> {
    pub elevation: Option<&'a ElevationGrid>,
    pub overlays: Option<&'a Grid<CellOverlay>>,
    /// Target fraction of the map covered by water, in [0, 1].
    pub water_fraction: Option<f32>,
}

/// Decomposes classified terrain into layers.
#[derive(Debug, Clone, Default)]
pub struct LayerDecomposer {
    pub config: LayerConfig,
}

impl LayerDecomposer {
    pub fn new(config: LayerConfig) -> Self {
        Self { config }
    }

    /// Builds the three layers.
    ///
    /// # Arguments
    /// * `biomes` - Classified map
    /// * `inputs` - Optional elevation, overlays and target water fraction
    ///
    /// # Returns
    /// A [`LayerSet`] with the dimensions of `biomes`, or an error if an
    /// optional input grid has different dimensions.
    pub fn decompose(
        &self,
        biomes: &ClassifiedGrid,
        inputs: LayerInputs<'_>,
    ) -> Result<LayerSet, LayerError> {
        if let Some(e) = inputs.elevation {
            check_dimensions("elevation", biomes, e)?;
        }
        if let Some(o) = inputs.overlays {
            check_dimensions("overlay", biomes, o)?;
        }
        if let Some(p) = inputs.water_fraction {
            if !(0.0..=1.0).contains(&p) {
                return Err(LayerError::InvalidWaterFraction(p));
            }
        }

        Ok(LayerSet {
            geological: self.geological(biomes, inputs.elevation),
            hydrological: self.hydrological(biomes, inputs.elevation, inputs.water_fraction),
            biological: self.biological(biomes, inputs.overlays),
        })
    }

    /// Layers from the classified grid alone. Cannot fail.
    pub fn decompose_biomes(&self, biomes: &ClassifiedGrid) -> LayerSet {
        LayerSet {
            geological: self.geological(biomes, None),
            hydrological: self.hydrological(biomes, None, None),
            biological: self.biological(biomes, None),
        }
    }

    fn geological(
        &self,
        biomes: &ClassifiedGrid,
        elevation: Option<&ElevationGrid>,
    ) -> Grid<GeologicalClass> {
        match elevation {
            Some(e) => biomes.map_with_coords(|x, y, &biome| {
                if biome.is_water() {
                    return GeologicalClass::Ocean;
                }
                let h = *e.get(x, y);
                if h >= self.config.mountains_threshold {
                    GeologicalClass::Mountains
                } else if h >= self.config.hills_threshold {
                    GeologicalClass::Hills
                } else {
                    GeologicalClass::Plains
                }
            }),
            None => biomes.map(|&b| GeologicalClass::from_biome(b)),
        }
    }

    fn hydrological(
        &self,
        biomes: &ClassifiedGrid,
        elevation: Option<&ElevationGrid>,
        water_fraction: Option<f32>,
    ) -> Grid<f32> {
        let (e, p) = match (elevation, water_fraction) {
            (Some(e), Some(p)) => (e, p),
            _ => return biomes.map(|b| if b.is_water() { 1.0 } else { 0.0 }),
        };
        let threshold = water_threshold(e, p);
        let band = self.config.coverage_band;
        biomes.map_with_coords(|x, y, &biome| {
            if biome.is_water() {
                return 1.0;
            }
            if p <= 0.0 {
                return 0.0;
            }
            1.0 - smoothstep(threshold - band, threshold + band, *e.get(x, y))
        })
    }

    fn biological(
        &self,
        biomes: &ClassifiedGrid,
        overlays: Option<&Grid<CellOverlay>>,
    ) -> Grid<f32> {
        biomes.map_with_coords(|x, y, &biome| {
            if biome.is_water() {
                return 0.0;
            }
            let mut veg = biome.base_veg();
            if let Some(o) = overlays.map(|g| g.get(x, y)) {
                veg = match o.feature {
                    Some(FeatureCode::Forest) => veg * 1.2,
                    Some(FeatureCode::Jungle) => veg * 1.1,
                    Some(FeatureCode::FloodPlains) | Some(FeatureCode::Oasis) => veg + 0.10,
                    Some(FeatureCode::Fallout) => veg * 0.2,
                    _ => veg,
                };
                if o.has_river {
                    veg += self.config.river_boost;
                }
            }
            veg.clamp(0.0, 1.0)
        })
    }
}

/// Elevation below which a fraction `p` of all cells lie.
pub fn water_threshold(elevation: &ElevationGrid, p: f32) -> f32 {
    if elevation.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<f32> = elevation.cells().to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let k = ((p.clamp(0.0, 1.0) * n as f32).round() as usize).min(n);
    match k {
        0 => sorted[0] - f32::EPSILON,
        k if k >= n => sorted[n - 1],
        k => 0.5 * (sorted[k - 1] + sorted[k]),
    }
}

fn check_dimensions<U>(
    layer: &'static str,
    biomes: &ClassifiedGrid,
    other: &Grid<U>,
) -> Result<(), LayerError> {
    if biomes.same_dimensions(other) {
        Ok(())
    } else {
        Err(LayerError::DimensionMismatch {
            layer,
            expected: biomes.dimensions(),
            found: other.dimensions(),
        })
    }
}
