//! End-to-end ingestion: source map to layered terrain.

use std::path::{Path, PathBuf};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::earth::{self, IngestedMap, EARTH_BIOSPHERE_DENSITY, EARTH_WATER_COVERAGE};
use super::procedural;
use super::{PipelineConfig, PipelineError, StageId};
use crate::biomes::{BiomeCounts, ClassifiedGrid, TerrainClassifier};
use crate::elevation::{ElevationGrid, ElevationSynthesizer};
use crate::layers::{overlays_from_source, CellOverlay, LayerDecomposer, LayerInputs, LayerSet};
use crate::markers::{ResourceSummary, StrategicMarkers};
use crate::source::{parse_file, ParseError, RawMapData, SourceFormat};
use crate::terraform::{
    BarrenTerrain, GridHydrosphereAnalyzer, HydrosphereAnalyzer, PlanetClassification,
    PlanetDescriptor, ReverseTerraformMapper,
};
use crate::terrain::Grid;

/// A map given to the pipeline, either on disk or already parsed.
#[derive(Debug, Clone)]
pub enum MapSource {
    Path(PathBuf),
    Parsed(RawMapData),
}

impl From<PathBuf> for MapSource {
    fn from(path: PathBuf) -> Self {
        MapSource::Path(path)
    }
}

impl From<&Path> for MapSource {
    fn from(path: &Path) -> Self {
        MapSource::Path(path.to_path_buf())
    }
}

impl From<RawMapData> for MapSource {
    fn from(data: RawMapData) -> Self {
        MapSource::Parsed(data)
    }
}

/// Everything one pipeline run needs besides configuration.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub primary: Option<MapSource>,
    /// Second map, only used on the Earth path.
    pub secondary: Option<MapSource>,
    pub planet: PlanetDescriptor,
    pub reverse_terraform: bool,
}

impl PipelineInput {
    pub fn new(planet: PlanetDescriptor) -> Self {
        Self {
            primary: None,
            secondary: None,
            planet,
            reverse_terraform: false,
        }
    }

    pub fn with_source(mut self, source: impl Into<MapSource>) -> Self {
        self.primary = Some(source.into());
        self
    }

    pub fn with_secondary(mut self, source: impl Into<MapSource>) -> Self {
        self.secondary = Some(source.into());
        self
    }

    pub fn with_reverse_terraform(mut self) -> Self {
        self.reverse_terraform = true;
        self
    }
}

/// Present-day surface state of the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceState {
    pub water_coverage: f32,
    pub biosphere_density: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderingMode {
    /// Habitable surface as the map shows it.
    FullHabitable,
    /// Terrain only; water and life start empty.
    BareTerrain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionQuality {
    /// Generated without a source map.
    Synthetic,
    /// Single-character biome codes.
    Medium,
    /// Explicit plots with levels, features and bonuses.
    High,
}

impl ExtractionQuality {
    pub fn of(format: SourceFormat) -> Self {
        match format {
            SourceFormat::WorldBuilder => ExtractionQuality::High,
            SourceFormat::Scenario => ExtractionQuality::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    /// Format of the map that fixed the output grid; `None` when procedural.
    pub format: Option<SourceFormat>,
    pub extraction_quality: ExtractionQuality,
    pub source_file: Option<PathBuf>,
    pub rendering_mode: RenderingMode,
    pub sources_used: Vec<SourceFormat>,
    pub planet_classification: PlanetClassification,
    /// Seed of the run RNG; rerunning with it reproduces the output.
    pub seed: u64,
}

/// Result of a pipeline run. Always structurally valid: every grid shares
/// the same dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub layers: LayerSet,
    pub elevation: ElevationGrid,
    pub classified: ClassifiedGrid,
    pub biome_counts: BiomeCounts,
    pub markers: StrategicMarkers,
    pub resources: ResourceSummary,
    pub surface: SurfaceState,
    pub metadata: PipelineMetadata,
    pub barren: Option<BarrenTerrain>,
    /// Human-readable reasons for fallbacks and skipped steps.
    pub warnings: Vec<String>,
}

impl PipelineOutput {
    pub fn dimensions(&self) -> (u32, u32) {
        self.classified.dimensions()
    }

    /// True when the run fell back to procedural generation.
    pub fn is_procedural(&self) -> bool {
        self.metadata.format.is_none()
    }
}

/// Grids assembled by one of the three paths, before decomposition.
struct Assembled {
    classified: ClassifiedGrid,
    elevation: ElevationGrid,
    overlays: Option<Grid<CellOverlay>>,
    potential: Option<Grid<f32>>,
    markers: StrategicMarkers,
    resources: ResourceSummary,
    surface: SurfaceState,
    format: Option<SourceFormat>,
    extraction_quality: ExtractionQuality,
    source_file: Option<PathBuf>,
    rendering_mode: RenderingMode,
    sources_used: Vec<SourceFormat>,
}

/// Stage bookkeeping for progress callbacks.
struct Progress<F1, F2> {
    on_start: F1,
    on_complete: F2,
    index: usize,
    total: usize,
}

impl<F1, F2> Progress<F1, F2>
where
    F1: FnMut(&str, usize, usize),
    F2: FnMut(&str, usize, usize),
{
    fn stage<T>(&mut self, id: StageId, f: impl FnOnce() -> T) -> T {
        (self.on_start)(id.name(), self.index, self.total);
        log::debug!("Stage {} started", id.name());
        let out = f();
        (self.on_complete)(id.name(), self.index, self.total);
        self.index += 1;
        out
    }
}

/// Runs the full ingestion pipeline.
///
/// Never fails: unusable sources become warnings and the procedural
/// generator fills in.
pub struct PipelineOrchestrator<A: HydrosphereAnalyzer = GridHydrosphereAnalyzer> {
    config: PipelineConfig,
    classifier: TerrainClassifier,
    decomposer: LayerDecomposer,
    mapper: ReverseTerraformMapper<A>,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_analyzer(config, GridHydrosphereAnalyzer)
    }
}

impl Default for PipelineOrchestrator {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<A: HydrosphereAnalyzer> PipelineOrchestrator<A> {
    /// Creates an orchestrator with a custom hydrosphere analyzer.
    pub fn with_analyzer(config: PipelineConfig, analyzer: A) -> Self {
        Self {
            classifier: TerrainClassifier::new(config.classifier.clone()),
            decomposer: LayerDecomposer::new(config.layers.clone()),
            mapper: ReverseTerraformMapper::new(analyzer),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Executes all stages.
    pub fn run(&self, input: &PipelineInput) -> PipelineOutput {
        self.run_with_callbacks(input, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `input` - Sources, target body and options
    /// * `on_stage_start` - Called with (stage name, index, planned total)
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        input: &PipelineInput,
        on_stage_start: F1,
        on_stage_complete: F2,
    ) -> PipelineOutput
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut warnings = Vec::new();

        let is_earth = input.planet.is_earth();
        let classification = input.planet.classify();
        log::info!(
            "Ingesting terrain for {} ({}, seed {})",
            input.planet.name,
            classification.name(),
            seed
        );

        let water_fraction = match self.config.water_fraction {
            Some(p) if !(0.0..=1.0).contains(&p) => {
                log::warn!("Ignoring water fraction {} outside [0, 1]", p);
                warnings.push(format!("water fraction {} outside [0, 1] ignored", p));
                None
            }
            other => other,
        };

        let mut sources: Vec<&MapSource> = input.primary.iter().collect();
        if is_earth {
            sources.extend(input.secondary.iter());
        } else if input.secondary.is_some() {
            warnings.push("secondary source ignored: only used for Earth".to_string());
        }

        let extra = usize::from(input.reverse_terraform);
        let mut progress = Progress {
            on_start: on_stage_start,
            on_complete: on_stage_complete,
            index: 0,
            total: if sources.is_empty() { 3 + extra } else { 5 + extra },
        };

        let ingested = if sources.is_empty() {
            warnings.push("no source map given; generated procedurally".to_string());
            Vec::new()
        } else {
            self.ingest(&sources, &mut progress, &mut rng, &mut warnings)
        };

        let assembled = if ingested.is_empty() {
            if !sources.is_empty() {
                // Parse already ran; procedural, decompose and markers remain.
                progress.total = progress.index + 3 + extra;
                log::warn!("No usable source map; falling back to procedural generation");
            }
            progress.stage(StageId::Procedural, || {
                self.assemble_procedural(&input.planet, is_earth, water_fraction, &mut rng)
            })
        } else if is_earth {
            match self.assemble_earth(&ingested) {
                Ok(a) => a,
                Err(e) => {
                    log::warn!("Earth merge failed: {}", e);
                    warnings.push(e.to_string());
                    self.assemble_standard(&ingested[0], water_fraction)
                }
            }
        } else {
            self.assemble_standard(&ingested[0], water_fraction)
        };

        let layers = progress.stage(StageId::Decompose, || {
            self.decompose(&assembled, water_fraction, &mut warnings)
        });

        let Assembled {
            classified,
            elevation,
            markers,
            resources,
            surface,
            format,
            extraction_quality,
            source_file,
            rendering_mode,
            sources_used,
            ..
        } = assembled;

        let markers = progress.stage(StageId::Markers, || {
            log::info!(
                "Markers: {} deposits, {} settlement sites, {} strategic locations",
                markers.resource_deposits.len(),
                markers.settlement_sites.len(),
                markers.strategic_locations.len()
            );
            markers
        });

        let barren = if input.reverse_terraform {
            progress.stage(StageId::ReverseTerraform, || {
                match self.mapper.reverse_terraform(&classified, &input.planet.characteristics()) {
                    Ok(barren) => Some(barren),
                    Err(e) => {
                        let err = PipelineError::stage_failed(StageId::ReverseTerraform, e);
                        log::warn!("{}", err);
                        warnings.push(err.to_string());
                        None
                    }
                }
            })
        } else {
            None
        };

        PipelineOutput {
            biome_counts: BiomeCounts::from_grid(&classified),
            layers,
            elevation,
            classified,
            markers,
            resources,
            surface,
            metadata: PipelineMetadata {
                format,
                extraction_quality,
                source_file,
                rendering_mode,
                sources_used,
                planet_classification: classification,
                seed,
            },
            barren,
            warnings,
        }
    }

    /// Parse, classify and elevation stages for every source.
    ///
    /// Sources that fail to parse are dropped with a warning.
    fn ingest<F1, F2, R>(
        &self,
        sources: &[&MapSource],
        progress: &mut Progress<F1, F2>,
        rng: &mut R,
        warnings: &mut Vec<String>,
    ) -> Vec<IngestedMap>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
        R: Rng,
    {
        let parsed: Vec<(RawMapData, Option<PathBuf>)> = progress.stage(StageId::Parse, || {
            sources
                .iter()
                .filter_map(|source| match self.parse_source(source) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        let err = PipelineError::stage_failed(StageId::Parse, e);
                        log::warn!("{}", err);
                        warnings.push(err.to_string());
                        None
                    }
                })
                .collect()
        });
        if parsed.is_empty() {
            return Vec::new();
        }

        let classified: Vec<_> = progress.stage(StageId::Classify, || {
            parsed
                .into_iter()
                .map(|(data, path)| {
                    let classification = self.classifier.classify_map(&data);
                    (data, path, classification)
                })
                .collect()
        });

        progress.stage(StageId::Elevation, || {
            classified
                .into_iter()
                .map(|(data, source_file, classification)| {
                    let synthesizer =
                        ElevationSynthesizer::new(self.config.elevation_for(data.format).clone());
                    let elevation = synthesizer.synthesize(&data, &classification.grid, rng);
                    IngestedMap {
                        data,
                        source_file,
                        classification,
                        elevation,
                    }
                })
                .collect()
        })
    }

    fn parse_source(
        &self,
        source: &MapSource,
    ) -> Result<(RawMapData, Option<PathBuf>), ParseError> {
        match source {
            MapSource::Path(path) => {
                let data = parse_file(path, &self.config.scenario)?;
                Ok((data, Some(path.clone())))
            }
            MapSource::Parsed(data) => Ok((data.clone().validated()?, None)),
        }
    }

    fn assemble_standard(&self, map: &IngestedMap, water_fraction: Option<f32>) -> Assembled {
        let format = map.format();
        log::info!("Bare-terrain path from {} source", format.name());
        let classified = map.classification.grid.clone();
        let elevation = map.elevation.clone();
        Assembled {
            overlays: overlays_from_source(&map.data),
            potential: None,
            markers: StrategicMarkers::extract(&map.data, &classified, Some(&elevation)),
            resources: ResourceSummary::from_source(&map.data),
            surface: SurfaceState {
                water_coverage: water_fraction.unwrap_or(0.0),
                biosphere_density: 0.0,
            },
            format: Some(format),
            extraction_quality: ExtractionQuality::of(format),
            source_file: map.source_file.clone(),
            rendering_mode: RenderingMode::BareTerrain,
            sources_used: vec![format],
            classified,
            elevation,
        }
    }

    fn assemble_earth(&self, maps: &[IngestedMap]) -> Result<Assembled, PipelineError> {
        let (structure, detail) = earth::assign_roles(maps)
            .ok_or_else(|| PipelineError::stage_failed(StageId::Parse, "no Earth source"))?;
        log::info!(
            "Full-habitable Earth path: structure from {}, detail from {}",
            structure.format().name(),
            detail.map_or("structure", |d| d.format().name())
        );
        let sea_level = self.config.elevation_for(structure.format()).sea_level;
        let composite = earth::merge(structure, detail, &self.decomposer, sea_level)?;

        // Markers need plots aligned with the output grid.
        let marker_source = detail
            .filter(|d| d.dimensions() == structure.dimensions())
            .unwrap_or(structure);
        let markers = StrategicMarkers::extract(
            &marker_source.data,
            &composite.classified,
            Some(&composite.elevation),
        );
        let resources = ResourceSummary::from_source(&marker_source.data);

        let mut sources_used = vec![structure.format()];
        sources_used.extend(detail.map(IngestedMap::format));
        let extraction_quality = sources_used
            .iter()
            .map(|&f| ExtractionQuality::of(f))
            .max()
            .unwrap_or(ExtractionQuality::Medium);

        Ok(Assembled {
            overlays: overlays_from_source(&structure.data),
            potential: composite.potential,
            markers,
            resources,
            surface: SurfaceState {
                water_coverage: EARTH_WATER_COVERAGE,
                biosphere_density: EARTH_BIOSPHERE_DENSITY,
            },
            format: Some(structure.format()),
            extraction_quality,
            source_file: structure.source_file.clone(),
            rendering_mode: RenderingMode::FullHabitable,
            sources_used,
            classified: composite.classified,
            elevation: composite.elevation,
        })
    }

    fn assemble_procedural<R: Rng>(
        &self,
        planet: &PlanetDescriptor,
        is_earth: bool,
        water_fraction: Option<f32>,
        rng: &mut R,
    ) -> Assembled {
        let terrain = procedural::generate(&self.config.procedural, planet, water_fraction, rng);
        let (w, h) = terrain.classified.dimensions();
        let surface = if is_earth {
            SurfaceState {
                water_coverage: EARTH_WATER_COVERAGE,
                biosphere_density: EARTH_BIOSPHERE_DENSITY,
            }
        } else {
            SurfaceState {
                water_coverage: water_fraction.unwrap_or(0.0),
                biosphere_density: 0.0,
            }
        };
        Assembled {
            markers: StrategicMarkers::from_biomes(&terrain.classified, Some(&terrain.elevation)),
            resources: ResourceSummary::empty(w, h),
            overlays: None,
            potential: Some(terrain.potential),
            surface,
            format: None,
            extraction_quality: ExtractionQuality::Synthetic,
            source_file: None,
            rendering_mode: if is_earth {
                RenderingMode::FullHabitable
            } else {
                RenderingMode::BareTerrain
            },
            sources_used: Vec::new(),
            classified: terrain.classified,
            elevation: terrain.elevation,
        }
    }

    fn decompose(
        &self,
        assembled: &Assembled,
        water_fraction: Option<f32>,
        warnings: &mut Vec<String>,
    ) -> LayerSet {
        let inputs = LayerInputs {
            elevation: Some(&assembled.elevation),
            overlays: assembled.overlays.as_ref(),
            water_fraction,
        };
        let mut layers = match self.decomposer.decompose(&assembled.classified, inputs) {
            Ok(layers) => layers,
            Err(e) => {
                let err = PipelineError::stage_failed(StageId::Decompose, e);
                log::warn!("{}; using biome-only layers", err);
                warnings.push(err.to_string());
                self.decomposer.decompose_biomes(&assembled.classified)
            }
        };
        if let Some(potential) = &assembled.potential {
            if potential.same_dimensions(&layers.biological) {
                layers.biological = potential.clone();
            }
        }
        layers
    }
}
