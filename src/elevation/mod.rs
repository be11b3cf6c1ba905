//! Elevation synthesis.
//!
//! Produces a normalized [`ElevationGrid`] from parsed source data in two stages:
//! - base estimation from plot levels and codes (or scenario elevation hints
//!   perturbed by fractal noise)
//! - post-processing: biome-aware jitter, neighborhood smoothing and a final
//!   land-floor pass
//!
//! The only randomness comes from the RNG passed to
//! [`ElevationSynthesizer::synthesize`], so a seeded RNG reproduces a grid
//! exactly.

mod config;
mod estimate;
mod postprocess;

pub use config::ElevationConfig;
pub use estimate::{code_hint, estimate, perturb_hint, SEA_LEVEL};
pub use postprocess::{apply_jitter, enforce_land_floor, smooth, smooth_pass};

use rand::Rng;

use crate::biomes::ClassifiedGrid;
use crate::noise::{cell_to_sphere, FractalNoiseConfig};
use crate::source::{RawContent, RawMapData};
use crate::terrain::Grid;

/// Normalized elevation per cell, each value in [0, 1].
pub type ElevationGrid = Grid<f32>;

/// Builds elevation grids for parsed maps.
#[derive(Debug, Clone, Default)]
pub struct ElevationSynthesizer {
    pub config: ElevationConfig,
}

impl ElevationSynthesizer {
    pub fn new(config: ElevationConfig) -> Self {
        Self { config }
    }

    /// Base elevation before post-processing.
    ///
    /// Positions without a source plot fall back to the elevation hint of
    /// their classified biome.
    ///
    /// # Arguments
    /// * `data` - Parsed source map
    /// * `biomes` - Classification of the same map
    /// * `noise_seed` - Seed for scenario hint perturbation
    pub fn base_elevation(
        &self,
        data: &RawMapData,
        biomes: &ClassifiedGrid,
        noise_seed: i32,
    ) -> ElevationGrid {
        let (width, height) = biomes.dimensions();
        let mut grid = match &data.content {
            RawContent::Plots(cells) => {
                let mut grid = biomes.map(|b| b.elevation_hint());
                for cell in cells {
                    if cell.x < width && cell.y < height {
                        grid.set(cell.x, cell.y, estimate(cell));
                    }
                }
                grid
            }
            RawContent::Codes(codes) => {
                let noise = FractalNoiseConfig {
                    seed: noise_seed,
                    ..self.config.noise.clone()
                };
                codes.map_with_coords(|x, y, &code| {
                    let hint = code_hint(code, *biomes.get(x, y));
                    let pos = cell_to_sphere(x, y, width, height);
                    perturb_hint(hint, pos, self.config.hint_range, &noise)
                })
            }
        };
        enforce_land_floor(&mut grid, biomes, self.config.sea_level);
        grid
    }

    /// Runs estimation and post-processing.
    ///
    /// The result has the same dimensions as `biomes`, every value lies in
    /// [0, 1], and every non-water cell sits at or above sea level.
    pub fn synthesize<R: Rng>(
        &self,
        data: &RawMapData,
        biomes: &ClassifiedGrid,
        rng: &mut R,
    ) -> ElevationGrid {
        let noise_seed: i32 = rng.random();
        let base = self.base_elevation(data, biomes, noise_seed);
        self.postprocess(base, biomes, rng)
    }

    /// Jitter, smoothing and land-floor enforcement on an existing grid.
    pub fn postprocess<R: Rng>(
        &self,
        base: ElevationGrid,
        biomes: &ClassifiedGrid,
        rng: &mut R,
    ) -> ElevationGrid {
        let cfg = &self.config;
        let jittered = if cfg.jitter {
            apply_jitter(&base, biomes, cfg, rng)
        } else {
            base
        };
        let mut out = smooth(
            jittered,
            cfg.smoothing_passes,
            cfg.smoothing_weight,
            cfg.min_neighbors,
        );
        enforce_land_floor(&mut out, biomes, cfg.sea_level);

        let (min, max) = out.value_range();
        log::debug!("Elevation range after post-processing: {:.3}..{:.3}", min, max);
        out
    }
}
