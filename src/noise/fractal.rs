//! Multi-octave fractal Brownian motion (fBm) noise sampled over map grids.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

use crate::terrain::Grid;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (4-8 typical).
    pub octaves: u8,
    /// Base frequency of the noise (1.0-4.0 typical).
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 2.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 42,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Continental-scale terrain for procedural maps.
    pub fn terrain(seed: i32) -> Self {
        Self {
            octaves: 8,
            frequency: 1.5,
            lacunarity: 2.1,
            persistence: 0.55,
            seed,
        }
    }

    /// Low-octave, higher-frequency detail used to perturb elevation hints.
    pub fn perturbation(seed: i32) -> Self {
        Self {
            octaves: 3,
            frequency: 4.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed,
        }
    }
}

/// Maps a grid cell center to a point on the unit sphere.
///
/// The grid is treated as an equirectangular projection: x spans longitude
/// [-π, π), y spans latitude from +π/2 (top row) to -π/2 (bottom row).
pub fn cell_to_sphere(x: u32, y: u32, width: u32, height: u32) -> Vec3 {
    let u = (x as f32 + 0.5) / width.max(1) as f32;
    let v = (y as f32 + 0.5) / height.max(1) as f32;
    let lon = (u * 2.0 - 1.0) * std::f32::consts::PI;
    let lat = (0.5 - v) * std::f32::consts::PI;
    Vec3::new(lat.cos() * lon.cos(), lat.sin(), lat.cos() * lon.sin())
}

/// Latitude in radians of a grid row center (+π/2 at the top).
pub fn row_latitude(y: u32, height: u32) -> f32 {
    let v = (y as f32 + 0.5) / height.max(1) as f32;
    (0.5 - v) * std::f32::consts::PI
}

/// Samples fractal noise at a 3D position (typically on a unit sphere).
///
/// Uses 4D simplex noise with the w dimension set to 0, which provides
/// seamless sampling on spherical surfaces without UV distortion artifacts.
///
/// # Arguments
/// * `pos` - A 3D position (typically a point on the unit sphere)
/// * `config` - Noise configuration parameters
///
/// # Returns
/// A noise value in approximately [-1, 1] range (normalized by amplitude sum)
pub fn sample_fractal_noise(pos: Vec3, config: &FractalNoiseConfig) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    for octave in 0..config.octaves {
        // Each octave gets a different seed offset for variation
        let octave_seed = config.seed.wrapping_add(octave as i32 * 31337);
        let p = pos * frequency;

        let noise_value = NoiseBuilder::fbm_4d_offset(p.x, 1, p.y, 1, p.z, 1, 0.0, 1)
            .with_seed(octave_seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];

        total += noise_value * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude <= 0.0 {
        return 0.0;
    }
    total / max_amplitude
}

/// Samples fractal noise for every cell of a `width × height` map.
///
/// Cells are projected onto the sphere with [`cell_to_sphere`], so the left
/// and right map edges join without a seam.
pub fn sample_noise_grid(width: u32, height: u32, config: &FractalNoiseConfig) -> Grid<f32> {
    Grid::from_fn(width, height, |x, y| {
        sample_fractal_noise(cell_to_sphere(x, y, width, height), config)
    })
}
