//! Scenario save parser.
//!
//! Terrain rows are stored as `t0000="  aagg::"` with one character per
//! cell. A physical line ending in `\` continues on the next line.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ParseError, RawContent, RawMapData, SaveFormatParser, SourceFormat};
use crate::terrain::Grid;

/// Terrain characters recognized by the scenario format.
pub const SCENARIO_CODES: &[char] = &[
    'a', 'd', 'f', 'g', 'h', 'j', 'm', 'p', 's', 't', ' ', '+', ':', '-', 'o',
];

/// Configuration for scenario parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Code substituted for unrecognized terrain characters.
    pub default_code: char,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self { default_code: 'p' }
    }
}

/// Parser for scenario saves.
#[derive(Debug, Clone, Default)]
pub struct ScenarioParser {
    pub config: ScenarioConfig,
}

impl ScenarioParser {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    fn map_code(&self, c: char) -> char {
        if SCENARIO_CODES.contains(&c) {
            c
        } else {
            log::debug!("Unknown terrain code {:?}, using {:?}", c, self.config.default_code);
            self.config.default_code
        }
    }
}

/// Joins backslash-continued physical lines into logical lines.
fn logical_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = String::new();
    for line in text.lines() {
        match line.strip_suffix('\\') {
            Some(head) => pending.push_str(head),
            None => {
                pending.push_str(line);
                out.push(std::mem::take(&mut pending));
            }
        }
    }
    if !pending.is_empty() {
        out.push(pending);
    }
    out
}

/// Splits a `t<index>="<payload>"` line into its row index and payload.
fn split_row_line(line: &str) -> Option<(usize, &str)> {
    let rest = line.trim().strip_prefix('t')?;
    let (index, value) = rest.split_once('=')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let payload = value.strip_prefix('"')?.strip_suffix('"')?;
    Some((index.parse().ok()?, payload))
}

pub(super) fn is_row_line(line: &str) -> bool {
    split_row_line(line).is_some()
}

impl SaveFormatParser for ScenarioParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::Scenario
    }

    fn parse_str(&self, text: &str) -> Result<RawMapData, ParseError> {
        let mut rows: BTreeMap<usize, Vec<char>> = BTreeMap::new();

        for line in logical_lines(text) {
            let Some((index, payload)) = split_row_line(&line) else {
                continue;
            };
            let row: Vec<char> = payload.chars().map(|c| self.map_code(c)).collect();
            if rows.insert(index, row).is_some() {
                log::debug!("Terrain row {} declared twice, keeping the later one", index);
            }
        }

        if rows.is_empty() {
            return Err(ParseError::NoCellData);
        }
        if let Some(missing) = (0..rows.len()).find(|i| !rows.contains_key(i)) {
            return Err(ParseError::MissingRow(missing));
        }

        let expected = rows.get(&0).map(Vec::len).unwrap_or(0);
        for (&row, cells) in &rows {
            if cells.len() != expected {
                return Err(ParseError::InconsistentGrid {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        if expected == 0 {
            return Err(ParseError::NoCellData);
        }

        let width = expected as u32;
        let height = rows.len() as u32;
        let flat: Vec<char> = rows.into_values().flatten().collect();
        let grid = Grid::from_vec(width, height, flat).ok_or(ParseError::NoCellData)?;

        log::info!("Parsed scenario map {}x{}", width, height);
        Ok(RawMapData {
            format: SourceFormat::Scenario,
            width,
            height,
            content: RawContent::Codes(grid),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(data: &RawMapData) -> &Grid<char> {
        match &data.content {
            RawContent::Codes(grid) => grid,
            RawContent::Plots(_) => panic!("expected character grid"),
        }
    }

    #[test]
    fn parses_equal_rows() {
        let text = "[map]\nt0000=\"aa\"\nt0001=\"gg\"\n";
        let data = ScenarioParser::default().parse_str(text).unwrap();
        assert_eq!((data.width, data.height), (2, 2));
        let grid = codes(&data);
        assert_eq!(grid.cells(), &['a', 'a', 'g', 'g']);
    }

    #[test]
    fn unknown_characters_use_default_code() {
        let text = "t0000=\"aZ\"\nt0001=\"?g\"\n";
        let data = ScenarioParser::default().parse_str(text).unwrap();
        assert_eq!(codes(&data).cells(), &['a', 'p', 'p', 'g']);

        let parser = ScenarioParser::new(ScenarioConfig { default_code: 'd' });
        let data = parser.parse_str(text).unwrap();
        assert_eq!(codes(&data).cells(), &['a', 'd', 'd', 'g']);
    }

    #[test]
    fn continuation_lines_are_merged() {
        let text = "t0000=\"aa\\\ngg\"\nt0001=\"pppp\"\n";
        let data = ScenarioParser::default().parse_str(text).unwrap();
        assert_eq!((data.width, data.height), (4, 2));
        assert_eq!(*codes(&data).get(3, 0), 'g');
    }

    #[test]
    fn leading_spaces_are_ocean_cells() {
        let text = "t0000=\"  a\"\n";
        let data = ScenarioParser::default().parse_str(text).unwrap();
        assert_eq!(codes(&data).cells(), &[' ', ' ', 'a']);
    }

    #[test]
    fn ragged_rows_fail() {
        let text = "t0000=\"aaa\"\nt0001=\"gg\"\n";
        let err = ScenarioParser::default().parse_str(text).unwrap_err();
        match err {
            ParseError::InconsistentGrid { row, expected, found } => {
                assert_eq!((row, expected, found), (1, 3, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn gaps_and_empty_input_fail() {
        let err = ScenarioParser::default()
            .parse_str("t0000=\"aa\"\nt0002=\"aa\"\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingRow(1)));

        let err = ScenarioParser::default().parse_str("[map]\n").unwrap_err();
        assert!(matches!(err, ParseError::NoCellData));
    }

    #[test]
    fn non_terrain_keys_are_ignored() {
        let text = "team_no=1\nturn=5\nt0000=\"ff\"\nb00_0000=\"0\"\n";
        let data = ScenarioParser::default().parse_str(text).unwrap();
        assert_eq!((data.width, data.height), (2, 1));
    }
}
