//! Annual mean temperature model.

use super::ClimateConfig;

/// Annual mean temperature (°C) for a cell at `latitude_rad` with normalized `elevation`.
pub fn temperature_c(latitude_rad: f32, elevation: f32, cfg: &ClimateConfig) -> f32 {
    let t = (latitude_rad.abs() / std::f32::consts::FRAC_PI_2).clamp(0.0, 1.0);

    // Nonlinear curve gives larger polar contrast.
    let lat_w = t.powf(1.15);
    let baseline = cfg.equator_temp_c * (1.0 - lat_w) + cfg.pole_temp_c * lat_w;

    baseline - cfg.lapse_rate_c_per_km * height_above_sea_km(elevation, cfg)
}

/// Converts a normalized elevation to km above sea level (0 for water).
pub fn height_above_sea_km(elevation: f32, cfg: &ClimateConfig) -> f32 {
    let span = (1.0 - cfg.sea_level).max(f32::EPSILON);
    ((elevation - cfg.sea_level).max(0.0) / span) * cfg.relief_km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_is_warmer_than_pole() {
        let cfg = ClimateConfig::default();
        let equator = temperature_c(0.0, 0.5, &cfg);
        let pole = temperature_c(std::f32::consts::FRAC_PI_2, 0.5, &cfg);
        assert!((equator - cfg.equator_temp_c).abs() < 1e-4);
        assert!((pole - cfg.pole_temp_c).abs() < 1e-4);
    }

    #[test]
    fn higher_elevation_is_colder_by_lapse_rate() {
        let cfg = ClimateConfig::default();
        let lat = 0.25;
        let t0 = temperature_c(lat, 0.5, &cfg);
        let t1 = temperature_c(lat, 1.0, &cfg);
        let expected_drop = cfg.lapse_rate_c_per_km * cfg.relief_km;
        let actual_drop = t0 - t1;
        assert!(
            (actual_drop - expected_drop).abs() < 1e-3,
            "expected drop ~{}, got {}",
            expected_drop,
            actual_drop
        );
    }

    #[test]
    fn water_has_no_lapse() {
        let cfg = ClimateConfig::default();
        assert_eq!(height_above_sea_km(0.2, &cfg), 0.0);
        assert_eq!(temperature_c(0.3, 0.2, &cfg), temperature_c(0.3, 0.5, &cfg));
    }
}
