//! Terrain classification: source codes to canonical biomes.

use log::debug;

use super::{Biome, BiomeCounts, ClassifiedGrid, ClassifierConfig};
use crate::source::{FeatureCode, RawCell, RawContent, RawMapData, TerrainCode};
use crate::terrain::Grid;

/// Result of classifying a full map.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub grid: ClassifiedGrid,
    pub counts: BiomeCounts,
}

/// Resolves ambiguous source codes into canonical biomes.
///
/// Classification is a pure function of the cell; the same input always
/// yields the same biome.
#[derive(Debug, Clone, Default)]
pub struct TerrainClassifier {
    pub config: ClassifierConfig,
}

impl TerrainClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classifies a single WorldBuilder plot.
    ///
    /// Precedence, first match wins:
    /// 1. plot level 3 is water, sub-classified by terrain
    /// 2. a known feature overlays the base terrain
    /// 3. base terrain, shifted on hills
    /// 4. the configured default biome
    pub fn classify(&self, cell: &RawCell) -> Biome {
        if cell.is_water_plot() {
            return water_biome(cell);
        }
        if let Some(biome) = feature_overlay(cell) {
            return biome;
        }
        match cell.terrain.as_ref().and_then(base_terrain) {
            Some(base) if cell.is_hills() => hills_variant(base),
            Some(base) => base,
            None => {
                if let Some(TerrainCode::Other(code)) = &cell.terrain {
                    debug!("Unmapped terrain {} at ({}, {})", code, cell.x, cell.y);
                }
                self.config.default_biome
            }
        }
    }

    /// Classifies a scenario terrain character.
    pub fn classify_code(&self, code: char) -> Biome {
        match code {
            'a' => Biome::Arctic,
            'd' => Biome::Desert,
            'f' => Biome::Forest,
            'g' => Biome::Grasslands,
            'h' | 'm' => Biome::Rocky,
            'j' => Biome::Jungle,
            'p' => Biome::Plains,
            's' => Biome::Swamp,
            't' => Biome::Tundra,
            ' ' | '+' | 'o' => Biome::Ocean,
            ':' | '-' => Biome::DeepSea,
            _ => self.config.default_biome,
        }
    }

    /// Classifies every cell of a parsed map.
    ///
    /// Positions with no source plot receive the default biome. When two
    /// plots share a position the later one wins.
    pub fn classify_map(&self, data: &RawMapData) -> Classification {
        let grid = match &data.content {
            RawContent::Plots(cells) => {
                let mut grid = Grid::filled(data.width, data.height, self.config.default_biome);
                for cell in cells {
                    if cell.x < data.width && cell.y < data.height {
                        grid.set(cell.x, cell.y, self.classify(cell));
                    }
                }
                grid
            }
            RawContent::Codes(codes) => codes.map(|&c| self.classify_code(c)),
        };
        let counts = BiomeCounts::from_grid(&grid);
        log::info!(
            "Classified {}x{} map: {} water cells",
            grid.width(),
            grid.height(),
            counts.water()
        );
        Classification { grid, counts }
    }
}

fn has_ice(cell: &RawCell) -> bool {
    cell.feature == Some(FeatureCode::Ice)
}

fn water_biome(cell: &RawCell) -> Biome {
    match cell.terrain {
        Some(TerrainCode::Ocean) if has_ice(cell) => Biome::Arctic,
        Some(TerrainCode::Ocean) => Biome::DeepSea,
        Some(TerrainCode::Coast) if has_ice(cell) => Biome::Arctic,
        Some(TerrainCode::Coast) => Biome::Ocean,
        _ => Biome::Ocean,
    }
}

fn feature_overlay(cell: &RawCell) -> Option<Biome> {
    let biome = match cell.feature.as_ref()? {
        FeatureCode::Forest => {
            if cell.terrain == Some(TerrainCode::Tundra) || cell.is_hills() {
                Biome::Boreal
            } else {
                Biome::Forest
            }
        }
        FeatureCode::Jungle => Biome::Jungle,
        FeatureCode::Ice => Biome::Arctic,
        FeatureCode::Fallout => Biome::Rocky,
        FeatureCode::Oasis => Biome::Swamp,
        FeatureCode::FloodPlains | FeatureCode::Other(_) => return None,
    };
    Some(biome)
}

fn base_terrain(terrain: &TerrainCode) -> Option<Biome> {
    match terrain {
        TerrainCode::Grass => Some(Biome::Grasslands),
        TerrainCode::Plains => Some(Biome::Plains),
        TerrainCode::Desert => Some(Biome::Desert),
        TerrainCode::Tundra => Some(Biome::Tundra),
        TerrainCode::Snow => Some(Biome::Arctic),
        TerrainCode::Coast => Some(Biome::Ocean),
        TerrainCode::Ocean => Some(Biome::DeepSea),
        TerrainCode::Other(_) => None,
    }
}

/// Hills turn vegetated lowland into forested uplift and bare terrain into rock.
fn hills_variant(base: Biome) -> Biome {
    match base {
        Biome::Grasslands | Biome::Plains | Biome::Tundra => Biome::Boreal,
        Biome::Desert | Biome::Arctic => Biome::Rocky,
        other => other,
    }
}
