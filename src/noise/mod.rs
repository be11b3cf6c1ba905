//! Noise generation module for procedural elevation.
//!
//! Uses simdnoise for high-performance SIMD-accelerated noise generation.

mod fractal;

pub use fractal::{
    cell_to_sphere, row_latitude, sample_fractal_noise, sample_noise_grid, FractalNoiseConfig,
};
