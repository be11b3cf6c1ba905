//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for the annual-mean climate estimate used by procedural maps.
///
/// Units:
/// - temperatures: °C
/// - elevation: normalized `[0, 1]`, scaled to km by `relief_km`
/// - precipitation: mm per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateConfig {
    pub sea_level: f32,
    /// Height in km of a normalized elevation of 1.0 above sea level.
    pub relief_km: f32,

    // Temperature model
    pub equator_temp_c: f32,
    pub pole_temp_c: f32,
    pub lapse_rate_c_per_km: f32,
    /// Amplitude of noise-driven temperature variation.
    pub jitter_temp_c: f32,

    // Precipitation bands
    pub equator_precip_mm: f32,
    pub subtropic_precip_mm: f32,
    pub midlatitude_precip_mm: f32,
    pub polar_precip_mm: f32,
    /// Relative noise-driven precipitation variation (0.4 = ±40 %).
    pub precip_variation: f32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.5,
            relief_km: 6.0,

            equator_temp_c: 30.0,
            pole_temp_c: -20.0,
            lapse_rate_c_per_km: 6.5,
            jitter_temp_c: 2.0,

            equator_precip_mm: 2400.0,
            subtropic_precip_mm: 250.0,
            midlatitude_precip_mm: 1000.0,
            polar_precip_mm: 200.0,
            precip_variation: 0.4,
        }
    }
}

impl ClimateConfig {
    pub fn earth_like() -> Self {
        Self::default()
    }
}
