//! WorldBuilder text save parser.
//!
//! The format is line oriented:
//!
//! ```text
//! BeginMap
//!     grid width=124
//!     grid height=68
//! EndMap
//! BeginPlot
//!     x=0,y=0
//!     isNOfRiver
//!     FeatureType=FEATURE_ICE, FeatureVariety=0
//!     TerrainType=TERRAIN_COAST
//!     PlotType=3
//! EndPlot
//! ```
//!
//! A plot block ends at `EndPlot`, at the next `BeginPlot`, or at end of input.

use super::{
    FeatureCode, ParseError, PlotLevel, RawCell, RawContent, RawMapData, SaveFormatParser,
    SourceFormat, TerrainCode,
};

/// Parser position within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    OutsideMap,
    MapHeader,
    PlotBlock,
}

/// Attributes collected for the plot currently being read.
#[derive(Debug, Default)]
struct PlotAccumulator {
    x: Option<i64>,
    y: Option<i64>,
    plot_level: Option<PlotLevel>,
    terrain: Option<TerrainCode>,
    feature: Option<FeatureCode>,
    bonus: Option<String>,
    has_river: bool,
}

impl PlotAccumulator {
    /// Applies one plot-block line.
    fn read_line(&mut self, line: &str) {
        if line.starts_with("x=") || line.starts_with("y=") {
            for part in line.split(',') {
                match part.trim().split_once('=') {
                    Some(("x", v)) => self.x = v.trim().parse().ok(),
                    Some(("y", v)) => self.y = v.trim().parse().ok(),
                    _ => {}
                }
            }
        } else if let Some(v) = line.strip_prefix("PlotType=") {
            self.plot_level = v.trim().parse::<i64>().ok().and_then(|code| {
                let level = PlotLevel::from_code(code);
                if level.is_none() {
                    log::debug!("Unknown plot type {}", code);
                }
                level
            });
        } else if let Some(v) = line.strip_prefix("TerrainType=") {
            self.terrain = Some(TerrainCode::parse(leading_code(v)));
        } else if let Some(v) = line.strip_prefix("FeatureType=") {
            self.feature = Some(FeatureCode::parse(leading_code(v)));
        } else if let Some(v) = line.strip_prefix("BonusType=") {
            self.bonus = Some(leading_code(v).to_string());
        } else if line.contains("River") {
            self.has_river = true;
        }
    }

    /// Converts into a cell if the coordinates are present and inside the map.
    fn into_cell(self, width: u32, height: u32) -> Option<RawCell> {
        let (x, y) = match (self.x, self.y) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                log::debug!("Dropping plot without coordinates");
                return None;
            }
        };
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            log::debug!("Dropping out-of-bounds plot ({}, {})", x, y);
            return None;
        }
        Some(RawCell {
            x: x as u32,
            y: y as u32,
            plot_level: self.plot_level,
            terrain: self.terrain,
            feature: self.feature,
            bonus: self.bonus,
            has_river: self.has_river,
        })
    }
}

/// Strips trailing `, Modifier=...` tokens from a code value.
fn leading_code(value: &str) -> &str {
    value.split(',').next().unwrap_or(value).trim()
}

/// Reads a header dimension. Accepts both `grid width=N` and `width=N`.
fn header_dimension(line: &str, key: &str) -> Option<u32> {
    let rest = line.strip_prefix("grid ").unwrap_or(line);
    let value = rest.strip_prefix(key)?.strip_prefix('=')?;
    value.trim().parse().ok()
}

/// Parser for WorldBuilder text saves.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBuilderParser;

impl SaveFormatParser for WorldBuilderParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::WorldBuilder
    }

    fn parse_str(&self, text: &str) -> Result<RawMapData, ParseError> {
        let mut state = ParseState::OutsideMap;
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;
        let mut current: Option<PlotAccumulator> = None;
        let mut pending: Vec<PlotAccumulator> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            match line {
                "BeginMap" => {
                    pending.extend(current.take());
                    state = ParseState::MapHeader;
                }
                "EndMap" => state = ParseState::OutsideMap,
                "BeginPlot" => {
                    pending.extend(current.take());
                    current = Some(PlotAccumulator::default());
                    state = ParseState::PlotBlock;
                }
                "EndPlot" => {
                    pending.extend(current.take());
                    state = ParseState::OutsideMap;
                }
                _ => match state {
                    ParseState::MapHeader => {
                        if let Some(w) = header_dimension(line, "width") {
                            width = Some(w);
                        } else if let Some(h) = header_dimension(line, "height") {
                            height = Some(h);
                        }
                    }
                    ParseState::PlotBlock => {
                        if let Some(acc) = current.as_mut() {
                            acc.read_line(line);
                        }
                    }
                    ParseState::OutsideMap => {}
                },
            }
        }
        pending.extend(current.take());

        let (width, height) = match (width, height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => return Err(ParseError::MissingDimensions),
        };

        let total = pending.len();
        let cells: Vec<RawCell> = pending
            .into_iter()
            .filter_map(|acc| acc.into_cell(width, height))
            .collect();

        if cells.is_empty() {
            return Err(ParseError::NoCellData);
        }
        if cells.len() < total {
            log::debug!("Dropped {} of {} plots", total - cells.len(), total);
        }
        log::info!(
            "Parsed WorldBuilder map {}x{} with {} plots",
            width,
            height,
            cells.len()
        );

        Ok(RawMapData {
            format: SourceFormat::WorldBuilder,
            width,
            height,
            content: RawContent::Plots(cells),
        })
    }
}
