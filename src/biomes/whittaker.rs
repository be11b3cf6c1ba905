//! Climate-driven classification for procedurally generated maps.

use super::{smoothstep, Biome};
use crate::climate::ClimateSample;

/// Water deeper than this below sea level is deep sea.
const DEEP_WATER_DEPTH: f32 = 0.15;
/// Normalized elevation at which land becomes bare rock.
const MOUNTAIN_ELEVATION: f32 = 0.85;
/// Land within this band above sea level can be waterlogged.
const LOWLAND_BAND: f32 = 0.04;

/// Classifies a cell into a biome using a Whittaker-like scheme.
///
/// Inputs should already include ecotone jitter.
pub fn classify_whittaker_like(elevation: f32, climate: ClimateSample, sea_level: f32) -> Biome {
    if elevation < sea_level {
        if elevation < sea_level - DEEP_WATER_DEPTH {
            return Biome::DeepSea;
        }
        return Biome::Ocean;
    }
    if elevation >= MOUNTAIN_ELEVATION {
        return Biome::Rocky;
    }

    let t = climate.temp_mean_c;
    let p = climate.precip_annual_mm;

    // Permanent ice: sustained cold.
    if t <= -10.0 {
        return Biome::Arctic;
    }

    if t < 0.0 {
        if p < 350.0 {
            return Biome::Tundra;
        }
        return Biome::Boreal;
    }

    let lowland = elevation < sea_level + LOWLAND_BAND;

    if t >= 20.0 {
        if p >= 2500.0 {
            return if lowland { Biome::Swamp } else { Biome::Jungle };
        }
        if p >= 1200.0 {
            return Biome::Forest;
        }
        if p >= 450.0 {
            return Biome::Plains;
        }
        return Biome::Desert;
    }

    if p >= 1600.0 {
        return if lowland { Biome::Wetlands } else { Biome::Forest };
    }
    if p >= 800.0 {
        return Biome::Forest;
    }
    if p >= 350.0 {
        return Biome::Grasslands;
    }
    Biome::Desert
}

/// Biological potential in `[0, 1]`: biome base weight scaled by climate.
pub fn vegetation_potential(biome: Biome, climate: ClimateSample) -> f32 {
    if biome.is_water() {
        return 0.0;
    }
    let temp_w = smoothstep(-5.0, 25.0, climate.temp_mean_c);
    let precip_w = smoothstep(100.0, 2200.0, climate.precip_annual_mm);
    (biome.base_veg() * (0.35 + 0.65 * temp_w * precip_w)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(temp_mean_c: f32, precip_annual_mm: f32) -> ClimateSample {
        ClimateSample {
            temp_mean_c,
            precip_annual_mm,
        }
    }

    #[test]
    fn water_depends_only_on_elevation() {
        let hot_wet = sample(30.0, 3000.0);
        assert_eq!(classify_whittaker_like(0.45, hot_wet, 0.5), Biome::Ocean);
        assert_eq!(classify_whittaker_like(0.10, hot_wet, 0.5), Biome::DeepSea);
        assert!(!classify_whittaker_like(0.50, hot_wet, 0.5).is_water());
    }

    #[test]
    fn climate_bands() {
        assert_eq!(classify_whittaker_like(0.6, sample(-15.0, 500.0), 0.5), Biome::Arctic);
        assert_eq!(classify_whittaker_like(0.6, sample(-5.0, 200.0), 0.5), Biome::Tundra);
        assert_eq!(classify_whittaker_like(0.6, sample(-5.0, 600.0), 0.5), Biome::Boreal);
        assert_eq!(classify_whittaker_like(0.6, sample(25.0, 3000.0), 0.5), Biome::Jungle);
        assert_eq!(classify_whittaker_like(0.51, sample(25.0, 3000.0), 0.5), Biome::Swamp);
        assert_eq!(classify_whittaker_like(0.6, sample(25.0, 100.0), 0.5), Biome::Desert);
        assert_eq!(classify_whittaker_like(0.6, sample(12.0, 500.0), 0.5), Biome::Grasslands);
        assert_eq!(classify_whittaker_like(0.9, sample(25.0, 3000.0), 0.5), Biome::Rocky);
    }

    #[test]
    fn potential_is_bounded_and_zero_on_water() {
        assert_eq!(vegetation_potential(Biome::Ocean, sample(25.0, 2000.0)), 0.0);
        let lush = vegetation_potential(Biome::Jungle, sample(28.0, 3000.0));
        let cold = vegetation_potential(Biome::Jungle, sample(-10.0, 50.0));
        assert!(lush > cold);
        assert!((0.0..=1.0).contains(&lush));
    }
}
