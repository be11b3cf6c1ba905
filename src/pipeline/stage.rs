//! Stage identifiers and pipeline errors.

use thiserror::Error;

/// Unique identifier for pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Format detection and parsing of the source save.
    Parse,
    /// Source codes to canonical biomes.
    Classify,
    /// Elevation synthesis from plots or scenario hints.
    Elevation,
    /// Noise and climate generation when no source is usable.
    Procedural,
    /// Geological, hydrological and biological layers.
    Decompose,
    /// Resource, settlement and strategic markers.
    Markers,
    /// Optional barren baseline.
    ReverseTerraform,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Parse => "parse",
            StageId::Classify => "classify",
            StageId::Elevation => "elevation",
            StageId::Procedural => "procedural",
            StageId::Decompose => "decompose",
            StageId::Markers => "markers",
            StageId::ReverseTerraform => "reverse_terraform",
        }
    }
}

/// Errors raised inside a stage. The orchestrator converts these into
/// warnings and never returns them to the caller.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
}

impl PipelineError {
    pub fn stage_failed(stage: StageId, reason: impl std::fmt::Display) -> Self {
        PipelineError::StageFailed(stage.name().to_string(), reason.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_id_name() {
        assert_eq!(StageId::Parse.name(), "parse");
        assert_eq!(StageId::ReverseTerraform.name(), "reverse_terraform");
    }

    #[test]
    fn stage_failure_message_names_stage() {
        let err = PipelineError::stage_failed(StageId::Decompose, "dimension mismatch");
        assert_eq!(err.to_string(), "Stage 'decompose' failed: dimension mismatch");
    }
}
