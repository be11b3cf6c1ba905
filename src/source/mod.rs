//! Save-file ingestion.
//!
//! Two line-oriented legacy formats are supported:
//! - WorldBuilder text saves (`BeginMap` header plus one `BeginPlot` block per cell)
//! - Scenario saves (`t<row>="<payload>"` lines, one character per cell)
//!
//! Both parsers produce [`RawMapData`]. Source codes are mapped to exact
//! enumerated values once here, so later stages never inspect raw strings.

mod scenario;
mod worldbuilder;

pub use scenario::{ScenarioConfig, ScenarioParser, SCENARIO_CODES};
pub use worldbuilder::WorldBuilderParser;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::terrain::Grid;

/// Errors that can occur while reading or parsing a save file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    FileNotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Map dimensions were never declared")]
    MissingDimensions,
    #[error("No cell data found")]
    NoCellData,
    #[error("Inconsistent grid: row {row} has {found} cells, expected {expected}")]
    InconsistentGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Declared size {declared:?} does not match the {found:?} code grid")]
    GridSizeMismatch {
        declared: (u32, u32),
        found: (u32, u32),
    },
    #[error("Terrain row {0} is missing")]
    MissingRow(usize),
    #[error("Unrecognized save format: {}", .0.display())]
    UnknownFormat(PathBuf),
}

/// Source save-file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// WorldBuilder text save (plot blocks).
    WorldBuilder,
    /// Scenario save (character rows).
    Scenario,
}

/// File extensions that identify WorldBuilder saves (compared case-insensitively).
const WORLDBUILDER_EXTENSIONS: [&str; 3] = [
    "civ4worldbuildersave",
    "civbeyondswordwbsave",
    "civwarlordswbsave",
];

impl SourceFormat {
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::WorldBuilder => "worldbuilder",
            SourceFormat::Scenario => "scenario",
        }
    }

    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if ext == "sav" {
            Some(SourceFormat::Scenario)
        } else if WORLDBUILDER_EXTENSIONS.contains(&ext.as_str()) {
            Some(SourceFormat::WorldBuilder)
        } else {
            None
        }
    }

    /// Detects the format from file content.
    pub fn sniff(text: &str) -> Option<Self> {
        for line in text.lines() {
            let line = line.trim();
            if line == "BeginMap" {
                return Some(SourceFormat::WorldBuilder);
            }
            if scenario::is_row_line(line) {
                return Some(SourceFormat::Scenario);
            }
        }
        None
    }
}

/// WorldBuilder plot level. The value 3 is overloaded: water on most maps,
/// peaks on others, and must be disambiguated by terrain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotLevel {
    Flat = 0,
    Coastal = 1,
    Hills = 2,
    WaterOrPeak = 3,
}

impl PlotLevel {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PlotLevel::Flat),
            1 => Some(PlotLevel::Coastal),
            2 => Some(PlotLevel::Hills),
            3 => Some(PlotLevel::WaterOrPeak),
            _ => None,
        }
    }
}

/// WorldBuilder terrain type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainCode {
    Grass,
    Plains,
    Desert,
    Tundra,
    Snow,
    Coast,
    Ocean,
    Other(String),
}

impl TerrainCode {
    /// Parses an exact `TERRAIN_*` code.
    pub fn parse(code: &str) -> Self {
        match code {
            "TERRAIN_GRASS" => TerrainCode::Grass,
            "TERRAIN_PLAINS" => TerrainCode::Plains,
            "TERRAIN_DESERT" => TerrainCode::Desert,
            "TERRAIN_TUNDRA" => TerrainCode::Tundra,
            "TERRAIN_SNOW" => TerrainCode::Snow,
            "TERRAIN_COAST" => TerrainCode::Coast,
            "TERRAIN_OCEAN" => TerrainCode::Ocean,
            other => TerrainCode::Other(other.to_string()),
        }
    }

    /// Explicit water terrain (ocean or coast).
    pub fn is_water(&self) -> bool {
        matches!(self, TerrainCode::Ocean | TerrainCode::Coast)
    }
}

/// WorldBuilder feature type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureCode {
    Forest,
    Jungle,
    Ice,
    Fallout,
    Oasis,
    FloodPlains,
    Other(String),
}

impl FeatureCode {
    /// Parses an exact `FEATURE_*` code.
    pub fn parse(code: &str) -> Self {
        match code {
            "FEATURE_FOREST" => FeatureCode::Forest,
            "FEATURE_JUNGLE" => FeatureCode::Jungle,
            "FEATURE_ICE" => FeatureCode::Ice,
            "FEATURE_FALLOUT" => FeatureCode::Fallout,
            "FEATURE_OASIS" => FeatureCode::Oasis,
            "FEATURE_FLOOD_PLAINS" => FeatureCode::FloodPlains,
            other => FeatureCode::Other(other.to_string()),
        }
    }
}

/// A single WorldBuilder plot. Coordinates are always inside the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    pub x: u32,
    pub y: u32,
    pub plot_level: Option<PlotLevel>,
    pub terrain: Option<TerrainCode>,
    pub feature: Option<FeatureCode>,
    /// Raw `BONUS_*` code, resolved to a resource category by the marker stage.
    pub bonus: Option<String>,
    pub has_river: bool,
}

impl RawCell {
    /// Creates a bare cell at `(x, y)` with no attributes.
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            plot_level: None,
            terrain: None,
            feature: None,
            bonus: None,
            has_river: false,
        }
    }

    pub fn with_plot(mut self, level: PlotLevel) -> Self {
        self.plot_level = Some(level);
        self
    }

    pub fn with_terrain(mut self, terrain: TerrainCode) -> Self {
        self.terrain = Some(terrain);
        self
    }

    pub fn with_feature(mut self, feature: FeatureCode) -> Self {
        self.feature = Some(feature);
        self
    }

    pub fn with_bonus(mut self, bonus: &str) -> Self {
        self.bonus = Some(bonus.to_string());
        self
    }

    pub fn with_river(mut self) -> Self {
        self.has_river = true;
        self
    }

    pub fn is_hills(&self) -> bool {
        self.plot_level == Some(PlotLevel::Hills)
    }

    pub fn is_water_plot(&self) -> bool {
        self.plot_level == Some(PlotLevel::WaterOrPeak)
    }
}

/// Parsed cell content, shaped by the source format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawContent {
    /// Sparse plot list (WorldBuilder). Missing plots are default-filled later.
    Plots(Vec<RawCell>),
    /// Dense character grid (Scenario).
    Codes(Grid<char>),
}

/// Output of a save-format parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMapData {
    pub format: SourceFormat,
    pub width: u32,
    pub height: u32,
    pub content: RawContent,
}

impl RawMapData {
    /// Number of cells carried by the source (plots or characters).
    pub fn cell_count(&self) -> usize {
        match &self.content {
            RawContent::Plots(cells) => cells.len(),
            RawContent::Codes(grid) => grid.len(),
        }
    }

    /// Returns true if `(x, y)` lies inside the declared map size.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Checks data built outside the parsers against the same rules they
    /// enforce. Out-of-bounds plots are dropped; a code grid that disagrees
    /// with the declared size is rejected.
    pub fn validated(mut self) -> Result<Self, ParseError> {
        if self.width == 0 || self.height == 0 {
            return Err(ParseError::MissingDimensions);
        }
        let (width, height) = (self.width, self.height);
        match &mut self.content {
            RawContent::Plots(cells) => {
                cells.retain(|cell| {
                    let inside = cell.x < width && cell.y < height;
                    if !inside {
                        log::debug!("Dropping out-of-bounds plot ({}, {})", cell.x, cell.y);
                    }
                    inside
                });
            }
            RawContent::Codes(grid) => {
                if grid.dimensions() != (width, height) {
                    return Err(ParseError::GridSizeMismatch {
                        declared: (width, height),
                        found: grid.dimensions(),
                    });
                }
            }
        }
        if self.cell_count() == 0 {
            return Err(ParseError::NoCellData);
        }
        Ok(self)
    }

    /// Plot list, if this is WorldBuilder data.
    pub fn plots(&self) -> Option<&[RawCell]> {
        match &self.content {
            RawContent::Plots(cells) => Some(cells),
            RawContent::Codes(_) => None,
        }
    }

    /// Plots indexed by position. Later duplicates win.
    pub fn plot_grid(&self) -> Option<Grid<Option<&RawCell>>> {
        let cells = self.plots()?;
        let mut grid = Grid::filled(self.width, self.height, None);
        for cell in cells.iter().filter(|c| self.contains(c.x, c.y)) {
            grid.set(cell.x, cell.y, Some(cell));
        }
        Some(grid)
    }
}

/// Common interface for the save-format parsers.
pub trait SaveFormatParser {
    /// The format this parser reads.
    fn format(&self) -> SourceFormat;

    /// Parses the full text of a save file.
    fn parse_str(&self, text: &str) -> Result<RawMapData, ParseError>;

    /// Reads and parses a save file from disk.
    fn parse_file(&self, path: &Path) -> Result<RawMapData, ParseError> {
        let text = read_source(path)?;
        self.parse_str(&text)
    }
}

/// Reads a save file fully into memory.
///
/// Legacy saves are frequently Latin-1, so invalid UTF-8 is replaced lossily
/// rather than rejected.
pub fn read_source(path: &Path) -> Result<String, ParseError> {
    if !path.exists() {
        return Err(ParseError::FileNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| ParseError::FileNotReadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads a save file, detects its format and parses it.
///
/// Detection uses the file extension first and falls back to sniffing the
/// content.
pub fn parse_file(path: &Path, scenario: &ScenarioConfig) -> Result<RawMapData, ParseError> {
    let text = read_source(path)?;
    let format = SourceFormat::from_path(path)
        .or_else(|| SourceFormat::sniff(&text))
        .ok_or_else(|| ParseError::UnknownFormat(path.to_path_buf()))?;

    log::info!("Parsing {} as {} save", path.display(), format.name());
    match format {
        SourceFormat::WorldBuilder => WorldBuilderParser.parse_str(&text),
        SourceFormat::Scenario => ScenarioParser::new(scenario.clone()).parse_str(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("earth.sav")),
            Some(SourceFormat::Scenario)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("Earth.CivBeyondSwordWBSave")),
            Some(SourceFormat::WorldBuilder)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("map.civ4worldbuildersave")),
            Some(SourceFormat::WorldBuilder)
        );
        assert_eq!(SourceFormat::from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn format_from_content() {
        assert_eq!(
            SourceFormat::sniff("Version=11\nBeginMap\n\tgrid width=2\nEndMap\n"),
            Some(SourceFormat::WorldBuilder)
        );
        assert_eq!(
            SourceFormat::sniff("[map]\nt0000=\"aa\"\n"),
            Some(SourceFormat::Scenario)
        );
        assert_eq!(SourceFormat::sniff("hello"), None);
    }

    #[test]
    fn terrain_codes_are_exact() {
        assert_eq!(TerrainCode::parse("TERRAIN_SNOW"), TerrainCode::Snow);
        // Similar-looking codes must not collapse into known variants.
        assert_eq!(
            TerrainCode::parse("TERRAIN_SNOWY_PEAK"),
            TerrainCode::Other("TERRAIN_SNOWY_PEAK".to_string())
        );
        assert_eq!(FeatureCode::parse("FEATURE_FLOOD_PLAINS"), FeatureCode::FloodPlains);
        assert!(TerrainCode::Coast.is_water());
        assert!(!TerrainCode::Grass.is_water());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.sav");
        let err = parse_file(&path, &ScenarioConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::FileNotFound(_)));
    }

    #[test]
    fn unknown_format_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "nothing to see here").unwrap();

        let err = parse_file(&path, &ScenarioConfig::default()).unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat(_)));
    }

    #[test]
    fn parse_file_dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.sav");
        fs::write(&path, "[map]\nt0000=\"ag\"\nt0001=\"gg\"\n").unwrap();

        let data = parse_file(&path, &ScenarioConfig::default()).unwrap();
        assert_eq!(data.format, SourceFormat::Scenario);
        assert_eq!((data.width, data.height), (2, 2));
    }

    #[test]
    fn latin1_bytes_are_read_lossily() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"BeginMap\n\xe9\nEndMap\n").unwrap();
        let text = read_source(&path).unwrap();
        assert!(text.contains("BeginMap"));
    }

    #[test]
    fn plot_grid_keeps_later_duplicates() {
        let data = RawMapData {
            format: SourceFormat::WorldBuilder,
            width: 2,
            height: 1,
            content: RawContent::Plots(vec![
                RawCell::new(0, 0).with_terrain(TerrainCode::Grass),
                RawCell::new(0, 0).with_terrain(TerrainCode::Desert),
            ]),
        };
        let grid = data.plot_grid().unwrap();
        assert_eq!(
            grid.get(0, 0).and_then(|c| c.terrain.clone()),
            Some(TerrainCode::Desert)
        );
        assert!(grid.get(1, 0).is_none());
    }

    #[test]
    fn plot_grid_skips_cells_outside_the_map() {
        let data = RawMapData {
            format: SourceFormat::WorldBuilder,
            width: 2,
            height: 2,
            content: RawContent::Plots(vec![
                RawCell::new(1, 1).with_terrain(TerrainCode::Grass),
                RawCell::new(3, 0).with_terrain(TerrainCode::Desert),
                RawCell::new(7, 9),
            ]),
        };
        let grid = data.plot_grid().unwrap();
        assert_eq!(
            grid.get(1, 1).and_then(|c| c.terrain.clone()),
            Some(TerrainCode::Grass)
        );
        assert_eq!(grid.cells().iter().flatten().count(), 1);
    }

    #[test]
    fn validated_drops_out_of_bounds_plots() {
        let data = RawMapData {
            format: SourceFormat::WorldBuilder,
            width: 2,
            height: 2,
            content: RawContent::Plots(vec![RawCell::new(0, 0), RawCell::new(7, 9)]),
        };
        let data = data.validated().unwrap();
        assert_eq!(data.cell_count(), 1);
    }

    #[test]
    fn validated_rejects_only_out_of_bounds_plots() {
        let data = RawMapData {
            format: SourceFormat::WorldBuilder,
            width: 2,
            height: 2,
            content: RawContent::Plots(vec![RawCell::new(2, 0)]),
        };
        assert!(matches!(data.validated(), Err(ParseError::NoCellData)));
    }

    #[test]
    fn validated_rejects_mismatched_code_grid() {
        let data = RawMapData {
            format: SourceFormat::Scenario,
            width: 5,
            height: 5,
            content: RawContent::Codes(Grid::filled(3, 3, 'g')),
        };
        assert!(matches!(
            data.validated(),
            Err(ParseError::GridSizeMismatch {
                declared: (5, 5),
                found: (3, 3)
            })
        ));
    }
}
