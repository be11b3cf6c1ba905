//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use crate::biomes::ClassifierConfig;
use crate::climate::ClimateConfig;
use crate::elevation::{ElevationConfig, SEA_LEVEL};
use crate::layers::LayerConfig;
use crate::noise::FractalNoiseConfig;
use crate::source::{ScenarioConfig, SourceFormat};

/// Settings for the procedural fallback generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralConfig {
    pub width: u32,
    pub height: u32,
    /// Terrain noise. The seed is drawn from the run RNG.
    pub noise: FractalNoiseConfig,
    /// Fraction of cells below sea level when no target is given.
    pub water_fraction: f32,
    pub sea_level: f32,
    pub climate: ClimateConfig,
}

impl Default for ProceduralConfig {
    fn default() -> Self {
        Self {
            width: 180,
            height: 90,
            noise: FractalNoiseConfig::terrain(0),
            water_fraction: 0.6,
            sea_level: SEA_LEVEL,
            climate: ClimateConfig::earth_like(),
        }
    }
}

/// Aggregated configuration for [`super::PipelineOrchestrator`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run seed. When unset a fresh seed is drawn and reported in the output.
    pub seed: Option<u64>,
    /// Target fraction of the map covered by water.
    pub water_fraction: Option<f32>,
    pub classifier: ClassifierConfig,
    pub scenario: ScenarioConfig,
    pub worldbuilder_elevation: ElevationConfig,
    pub scenario_elevation: ElevationConfig,
    pub layers: LayerConfig,
    pub procedural: ProceduralConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            water_fraction: None,
            classifier: ClassifierConfig::default(),
            scenario: ScenarioConfig::default(),
            worldbuilder_elevation: ElevationConfig::worldbuilder(),
            scenario_elevation: ElevationConfig::scenario(),
            layers: LayerConfig::default(),
            procedural: ProceduralConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Elevation preset for a source format.
    pub fn elevation_for(&self, format: SourceFormat) -> &ElevationConfig {
        match format {
            SourceFormat::WorldBuilder => &self.worldbuilder_elevation,
            SourceFormat::Scenario => &self.scenario_elevation,
        }
    }
}
