//! Terrain ingestion and reclassification for legacy strategy-game maps.
//!
//! Parses WorldBuilder saves and Scenario text maps into a common raw form,
//! classifies every cell into a canonical biome, synthesizes a normalized
//! elevation grid, decomposes the result into geological, hydrological and
//! biological layers, and optionally regresses the map to a barren baseline
//! for a target planet. When no usable source is available the pipeline
//! falls back to a seeded procedural world.

pub mod biomes;
pub mod climate;
pub mod elevation;
pub mod export;
pub mod layers;
pub mod markers;
pub mod noise;
pub mod pipeline;
pub mod source;
pub mod terraform;
pub mod terrain;

pub use biomes::{Biome, BiomeCounts, ClassifiedGrid, ClassifierConfig, TerrainClassifier};
pub use climate::ClimateConfig;
pub use elevation::{ElevationConfig, ElevationGrid, ElevationSynthesizer};
pub use layers::{GeologicalClass, LayerDecomposer, LayerSet};
pub use markers::StrategicMarkers;
pub use noise::FractalNoiseConfig;
pub use pipeline::{PipelineConfig, PipelineInput, PipelineOrchestrator, PipelineOutput, StageId};
pub use source::{RawMapData, ScenarioParser, SourceFormat, WorldBuilderParser};
pub use terraform::{PlanetClassification, PlanetDescriptor, ReverseTerraformMapper};
pub use terrain::Grid;
