//! Terrain grid module.
//!
//! Provides the row-major [`Grid`] container that every stage of the
//! ingestion pipeline reads and produces.

mod grid;

pub use grid::Grid;
