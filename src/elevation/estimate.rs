//! Base elevation estimation from source codes.

use glam::Vec3;

use crate::biomes::Biome;
use crate::noise::{sample_fractal_noise, FractalNoiseConfig};
use crate::source::{FeatureCode, PlotLevel, RawCell, TerrainCode};

/// Nominal sea level. Land never sits below this.
pub const SEA_LEVEL: f32 = 0.50;

/// Elevation below which ice is read as sea ice rather than glacier.
const SEA_ICE_THRESHOLD: f32 = 0.3;

/// Coarse base from the plot level. Level 3 is disambiguated by terrain.
fn plot_base(cell: &RawCell) -> f32 {
    match cell.plot_level {
        Some(PlotLevel::Flat) => 0.65,
        Some(PlotLevel::Coastal) => 0.55,
        Some(PlotLevel::Hills) => 0.80,
        Some(PlotLevel::WaterOrPeak) => match cell.terrain {
            Some(TerrainCode::Ocean) => 0.35,
            Some(TerrainCode::Coast) => 0.45,
            Some(TerrainCode::Snow) => 0.90,
            Some(TerrainCode::Grass) => 0.85,
            Some(TerrainCode::Plains) => 0.80,
            Some(TerrainCode::Tundra) => 0.85,
            Some(TerrainCode::Desert) => 0.75,
            _ => 0.15,
        },
        None => 0.50,
    }
}

fn terrain_delta(cell: &RawCell) -> f32 {
    if cell.is_water_plot() {
        return 0.0;
    }
    match cell.terrain {
        Some(TerrainCode::Snow) => 0.30,
        Some(TerrainCode::Tundra) => 0.15,
        Some(TerrainCode::Desert) => 0.10,
        Some(TerrainCode::Plains) => -0.05,
        Some(TerrainCode::Grass) if cell.plot_level == Some(PlotLevel::Flat) => -0.05,
        _ => 0.0,
    }
}

fn apply_feature(elevation: f32, feature: Option<&FeatureCode>) -> f32 {
    match feature {
        Some(FeatureCode::Forest) => elevation + 0.05,
        Some(FeatureCode::Jungle) => elevation + 0.03,
        Some(FeatureCode::Fallout) => elevation + 0.10,
        Some(FeatureCode::FloodPlains) => elevation - 0.10,
        Some(FeatureCode::Oasis) => elevation - 0.05,
        Some(FeatureCode::Ice) if elevation < SEA_ICE_THRESHOLD => 0.20,
        Some(FeatureCode::Ice) => elevation.max(0.90),
        Some(FeatureCode::Other(_)) | None => elevation,
    }
}

/// Estimates the normalized elevation of a WorldBuilder plot.
///
/// Any plot whose terrain is not explicit water is raised to sea level.
pub fn estimate(cell: &RawCell) -> f32 {
    let mut e = plot_base(cell) + terrain_delta(cell);
    e = apply_feature(e, cell.feature.as_ref());

    let explicit_water = cell.terrain.as_ref().is_some_and(TerrainCode::is_water);
    if !explicit_water {
        e = e.max(SEA_LEVEL);
    }
    e.clamp(0.0, 1.0)
}

/// Elevation hint for a scenario terrain character.
///
/// Hills and mountains both classify as rocky but sit at different heights.
pub fn code_hint(code: char, biome: Biome) -> f32 {
    match code {
        'h' => 0.70,
        'm' => 0.90,
        _ => biome.elevation_hint(),
    }
}

/// Perturbs a hint with fractal noise, keeping it within `hint ± range`.
pub fn perturb_hint(hint: f32, pos: Vec3, range: f32, noise: &FractalNoiseConfig) -> f32 {
    let n = sample_fractal_noise(pos, noise).clamp(-1.0, 1.0);
    let lo = (hint - range).max(0.0);
    let hi = (hint + range).min(1.0);
    (hint + n * range).clamp(lo, hi)
}
