//! Annual precipitation from latitude bands.

use super::ClimateConfig;
use crate::biomes::smoothstep;

/// Annual precipitation (mm) at `latitude_rad`, scaled by a noise value in `[-1, 1]`.
///
/// Bands: wet equator, dry subtropics near 25°, wetter mid-latitudes near
/// 50°, dry poles beyond 75°. Neighbouring bands blend with smoothstep.
pub fn precipitation_mm(latitude_rad: f32, noise: f32, cfg: &ClimateConfig) -> f32 {
    let lat = latitude_rad.abs().to_degrees();
    let banded = if lat < 25.0 {
        lerp(cfg.equator_precip_mm, cfg.subtropic_precip_mm, smoothstep(5.0, 25.0, lat))
    } else if lat < 50.0 {
        lerp(cfg.subtropic_precip_mm, cfg.midlatitude_precip_mm, smoothstep(25.0, 50.0, lat))
    } else {
        lerp(cfg.midlatitude_precip_mm, cfg.polar_precip_mm, smoothstep(50.0, 75.0, lat))
    };
    (banded * (1.0 + cfg.precip_variation * noise.clamp(-1.0, 1.0))).max(0.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtropics_are_drier_than_equator_and_midlatitudes() {
        let cfg = ClimateConfig::default();
        let equator = precipitation_mm(0.0, 0.0, &cfg);
        let subtropic = precipitation_mm(25f32.to_radians(), 0.0, &cfg);
        let midlat = precipitation_mm(50f32.to_radians(), 0.0, &cfg);
        let pole = precipitation_mm(90f32.to_radians(), 0.0, &cfg);
        assert!(equator > midlat);
        assert!(midlat > subtropic);
        assert!(midlat > pole);
        assert!((equator - cfg.equator_precip_mm).abs() < 1e-3);
    }

    #[test]
    fn noise_scales_but_never_negative() {
        let mut cfg = ClimateConfig::default();
        cfg.precip_variation = 2.0;
        assert_eq!(precipitation_mm(0.0, -1.0, &cfg), 0.0);
        let wet = precipitation_mm(0.0, 0.5, &cfg);
        assert!((wet - cfg.equator_precip_mm * 2.0).abs() < 1e-2);
    }
}
