//! Annual-mean climate estimate for procedural maps.
//!
//! Produces one temperature + precipitation sample per cell from latitude,
//! elevation and low-frequency noise. Not a circulation model.

mod config;
mod moisture;
mod temperature;

pub use config::ClimateConfig;
pub use moisture::precipitation_mm;
pub use temperature::{height_above_sea_km, temperature_c};

use serde::{Deserialize, Serialize};

use crate::elevation::ElevationGrid;
use crate::noise::{cell_to_sphere, row_latitude, sample_fractal_noise, FractalNoiseConfig};
use crate::terrain::Grid;

/// Annual climate of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClimateSample {
    pub temp_mean_c: f32,
    pub precip_annual_mm: f32,
}

/// Computes a climate sample for every cell of an equirectangular elevation grid.
///
/// # Arguments
/// * `elevation` - Normalized elevation, rows spanning +90° to -90° latitude
/// * `cfg` - Climate parameters
/// * `seed` - Noise seed for ecotone jitter
pub fn compute_climate(
    elevation: &ElevationGrid,
    cfg: &ClimateConfig,
    seed: i32,
) -> Grid<ClimateSample> {
    let (w, h) = elevation.dimensions();
    // Single-octave noise is enough for ecotone jitter.
    let jitter = FractalNoiseConfig {
        octaves: 1,
        frequency: 3.0,
        lacunarity: 2.0,
        persistence: 0.5,
        seed: seed ^ 0x5a5a_1234,
    };
    let moisture = FractalNoiseConfig {
        seed: seed.wrapping_add(7919),
        ..FractalNoiseConfig::perturbation(seed)
    };

    elevation.map_with_coords(|x, y, &e| {
        let lat = row_latitude(y, h);
        let p = cell_to_sphere(x, y, w, h);
        let j = sample_fractal_noise(p, &jitter);
        let m = sample_fractal_noise(p, &moisture);
        ClimateSample {
            temp_mean_c: temperature_c(lat, e, cfg) + cfg.jitter_temp_c * j,
            precip_annual_mm: precipitation_mm(lat, m, cfg),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climate_grid_matches_dimensions_and_is_deterministic() {
        let elevation = Grid::filled(12, 6, 0.6f32);
        let cfg = ClimateConfig::earth_like();
        let a = compute_climate(&elevation, &cfg, 11);
        let b = compute_climate(&elevation, &cfg, 11);
        assert!(a.same_dimensions(&elevation));
        assert_eq!(a, b);
        assert!(a.cells().iter().all(|s| s.precip_annual_mm >= 0.0));
    }

    #[test]
    fn top_row_is_colder_than_middle_row() {
        let elevation = Grid::filled(8, 9, 0.5f32);
        let mut cfg = ClimateConfig::earth_like();
        cfg.jitter_temp_c = 0.0;
        let climate = compute_climate(&elevation, &cfg, 3);
        assert!(climate.get(0, 0).temp_mean_c < climate.get(0, 4).temp_mean_c);
    }
}
