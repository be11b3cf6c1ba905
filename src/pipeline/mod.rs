//! Pipeline orchestration: source map to layered terrain.
//!
//! Three paths share one output shape:
//! - Earth: a structure map and a detail map merged into a habitable surface
//! - other bodies: a single source decomposed into bare terrain
//! - procedural fallback when no source is given or parsing fails

mod config;
mod earth;
mod orchestrator;
mod procedural;
mod stage;

pub use config::{PipelineConfig, ProceduralConfig};
pub use earth::{EARTH_BIOSPHERE_DENSITY, EARTH_WATER_COVERAGE};
pub use orchestrator::{
    ExtractionQuality, MapSource, PipelineInput, PipelineMetadata, PipelineOrchestrator,
    PipelineOutput, RenderingMode, SurfaceState,
};
pub use procedural::{climate_for, remap_to_sea_level};
pub use stage::{PipelineError, StageId};
