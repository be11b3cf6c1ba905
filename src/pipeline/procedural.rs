//! Procedural terrain when no usable source map exists.

use rand::Rng;

use super::ProceduralConfig;
use crate::biomes::{classify_whittaker_like, vegetation_potential, ClassifiedGrid};
use crate::climate::{compute_climate, ClimateConfig};
use crate::elevation::ElevationGrid;
use crate::layers::water_threshold;
use crate::noise::{sample_noise_grid, FractalNoiseConfig};
use crate::terraform::PlanetDescriptor;
use crate::terrain::Grid;

/// Mean annual surface temperature of Earth in °C, the climate baseline.
const BASELINE_MEAN_TEMP_C: f32 = 15.0;

pub struct ProceduralTerrain {
    pub elevation: ElevationGrid,
    pub classified: ClassifiedGrid,
    /// Climate-scaled biological potential in `[0, 1]`.
    pub potential: Grid<f32>,
}

/// Adjusts the baseline climate to a body's temperature and water signals.
pub fn climate_for(planet: &PlanetDescriptor, base: &ClimateConfig) -> ClimateConfig {
    let mut cfg = base.clone();
    if let Some(kelvin) = planet.surface_temperature_k {
        let offset = (kelvin - 273.15) - BASELINE_MEAN_TEMP_C;
        cfg.equator_temp_c += offset;
        cfg.pole_temp_c += offset;
    }
    if !planet.has_water_vapor() && !planet.has_surface_water() {
        let dry = 0.1;
        cfg.equator_precip_mm *= dry;
        cfg.subtropic_precip_mm *= dry;
        cfg.midlatitude_precip_mm *= dry;
        cfg.polar_precip_mm *= dry;
    }
    cfg
}

/// Remaps raw noise so that `water_fraction` of cells fall below `sea_level`.
///
/// Water cells land in `[0, sea_level)`, land cells in `[sea_level, 1]`.
pub fn remap_to_sea_level(noise: &Grid<f32>, water_fraction: f32, sea_level: f32) -> ElevationGrid {
    let (min, max) = noise.value_range();
    let threshold = water_threshold(noise, water_fraction);
    let below = (threshold - min).max(f32::EPSILON);
    let above = (max - threshold).max(f32::EPSILON);
    noise.map(|&v| {
        if v < threshold {
            (sea_level * (v - min) / below).clamp(0.0, sea_level - f32::EPSILON)
        } else {
            (sea_level + (1.0 - sea_level) * (v - threshold) / above).clamp(sea_level, 1.0)
        }
    })
}

/// Generates elevation, classification and biological potential.
///
/// # Arguments
/// * `cfg` - Dimensions, noise and climate baseline
/// * `planet` - Target body; shifts temperature and moisture
/// * `water_fraction` - Target water coverage, or `None` for the config default
/// * `rng` - Run RNG; supplies the noise seed
pub fn generate<R: Rng>(
    cfg: &ProceduralConfig,
    planet: &PlanetDescriptor,
    water_fraction: Option<f32>,
    rng: &mut R,
) -> ProceduralTerrain {
    let seed: i32 = rng.random();
    let noise_cfg = FractalNoiseConfig {
        seed,
        ..cfg.noise.clone()
    };
    let fraction = water_fraction.unwrap_or(cfg.water_fraction).clamp(0.0, 1.0);
    log::info!(
        "Generating procedural {}x{} terrain for {} (water fraction {:.2})",
        cfg.width,
        cfg.height,
        planet.name,
        fraction
    );

    let noise = sample_noise_grid(cfg.width, cfg.height, &noise_cfg);
    let elevation = remap_to_sea_level(&noise, fraction, cfg.sea_level);

    let climate_cfg = climate_for(planet, &cfg.climate);
    let climate = compute_climate(&elevation, &climate_cfg, seed);

    let classified = elevation.map_with_coords(|x, y, &e| {
        classify_whittaker_like(e, *climate.get(x, y), cfg.sea_level)
    });
    let potential =
        classified.map_with_coords(|x, y, &b| vegetation_potential(b, *climate.get(x, y)));

    ProceduralTerrain {
        elevation,
        classified,
        potential,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config() -> ProceduralConfig {
        ProceduralConfig {
            width: 24,
            height: 12,
            ..ProceduralConfig::default()
        }
    }

    #[test]
    fn water_cells_sit_below_sea_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let terrain = generate(&small_config(), &PlanetDescriptor::earth(), None, &mut rng);
        assert_eq!(terrain.elevation.dimensions(), (24, 12));
        for (e, b) in terrain.elevation.cells().iter().zip(terrain.classified.cells()) {
            assert!((0.0..=1.0).contains(e));
            assert_eq!(b.is_water(), *e < 0.5);
        }
        assert!(terrain.potential.cells().iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn remap_hits_target_fraction() {
        let noise = Grid::from_fn(10, 10, |x, y| (x + 10 * y) as f32 / 100.0 - 0.5);
        let elevation = remap_to_sea_level(&noise, 0.3, 0.5);
        let water = elevation.cells().iter().filter(|&&e| e < 0.5).count();
        assert_eq!(water, 30);
        let (min, max) = elevation.value_range();
        assert!(min >= 0.0 && max <= 1.0);
        assert!((max - 1.0).abs() < 1e-5);
    }

    #[test]
    fn same_seed_same_terrain() {
        let cfg = small_config();
        let planet = PlanetDescriptor::mars();
        let a = generate(&cfg, &planet, Some(0.2), &mut ChaCha8Rng::seed_from_u64(9));
        let b = generate(&cfg, &planet, Some(0.2), &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a.elevation, b.elevation);
        assert_eq!(a.classified, b.classified);
    }

    #[test]
    fn dry_cold_body_shifts_climate() {
        let base = ClimateConfig::earth_like();
        let cfg = climate_for(&PlanetDescriptor::mars(), &base);
        assert!(cfg.equator_temp_c < base.equator_temp_c - 70.0);
        assert!(cfg.equator_precip_mm < base.equator_precip_mm);
    }
}
