//! Elevation synthesis configuration.

use serde::{Deserialize, Serialize};

use crate::noise::FractalNoiseConfig;

/// Configuration for [`super::ElevationSynthesizer`].
///
/// All elevations are normalized to [0, 1] with nominal sea level at 0.50.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Minimum elevation of any non-water cell in the final grid.
    pub sea_level: f32,

    // --- Jitter ---
    /// Enables the random jitter pass.
    pub jitter: bool,
    /// Half-width of the symmetric jitter applied outside the desert band.
    pub jitter_amplitude: f32,
    /// Inclusive elevation band treated as potential flat desert.
    pub desert_band: (f32, f32),
    /// Fixed uplift applied to desert-band cells.
    pub desert_boost: f32,
    /// Half-width of the random variation added on top of the desert uplift.
    pub desert_variation: f32,
    /// Desert-band cells never exceed this after jitter.
    pub desert_cap: f32,
    /// Floor re-applied to land cells after jitter.
    pub land_minimum: f32,
    /// Floor re-applied to water cells after jitter.
    pub water_minimum: f32,

    // --- Smoothing ---
    /// Number of full-grid smoothing sweeps.
    pub smoothing_passes: u32,
    /// Weight of the current cell; neighbors share `1 - weight`.
    pub smoothing_weight: f32,
    /// Cells with fewer in-bounds neighbors keep their value.
    pub min_neighbors: usize,

    // --- Scenario hints ---
    /// Maximum deviation of perturbed scenario elevation from its hint.
    pub hint_range: f32,
    /// Noise used to perturb scenario hints. The seed is drawn from the run RNG.
    pub noise: FractalNoiseConfig,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self::worldbuilder()
    }
}

impl ElevationConfig {
    /// Preset for WorldBuilder plots: two gentle passes.
    pub fn worldbuilder() -> Self {
        Self {
            sea_level: 0.50,
            jitter: true,
            jitter_amplitude: 0.025,
            desert_band: (0.50, 0.65),
            desert_boost: 0.15,
            desert_variation: 0.15,
            desert_cap: 0.80,
            land_minimum: 0.55,
            water_minimum: 0.05,
            smoothing_passes: 2,
            smoothing_weight: 0.7,
            min_neighbors: 3,
            hint_range: 0.2,
            noise: FractalNoiseConfig::perturbation(0),
        }
    }

    /// Preset for scenario character maps: coarser source, stronger smoothing.
    pub fn scenario() -> Self {
        Self {
            smoothing_passes: 3,
            smoothing_weight: 0.6,
            min_neighbors: 1,
            ..Self::worldbuilder()
        }
    }

    /// Disables jitter, making synthesis independent of the RNG.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }
}
