//! Strategic marker extraction.
//!
//! Derives points of interest (resource deposits, settlement candidates and
//! strategic locations) for downstream game systems. WorldBuilder maps carry
//! explicit bonuses and plot levels; scenario maps only carry biomes, so
//! their markers are inferred with lower confidence.

mod resources;

pub use resources::{bonus_profile, DepositSize, Quality, ResourceCategory, ResourceSummary};

use serde::{Deserialize, Serialize};

use crate::biomes::{Biome, ClassifiedGrid};
use crate::elevation::ElevationGrid;
use crate::source::{PlotLevel, RawCell, RawMapData, TerrainCode};
use crate::terrain::Grid;

/// Confidence of markers read directly from source bonuses.
const SOURCE_CONFIDENCE: f32 = 0.9;
/// Confidence of markers inferred from biomes alone.
const INFERRED_CONFIDENCE: f32 = 0.6;

const QUALITIES: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];
const SIZES: [DepositSize; 3] = [DepositSize::Small, DepositSize::Medium, DepositSize::Large];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDeposit {
    pub location: (u32, u32),
    pub category: ResourceCategory,
    /// Specific resource name, e.g. `iron_ore`.
    pub resource: String,
    pub quality: Quality,
    pub size: DepositSize,
    pub confidence: f32,
    pub elevation: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteAdvantage {
    WaterAccess,
    Resources,
    River,
    FertileLand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSite {
    pub location: (u32, u32),
    pub biome: Biome,
    pub advantages: Vec<SiteAdvantage>,
    /// Higher is better; one point per advantage.
    pub priority: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicKind {
    MountainPass,
    RiverCrossing,
    Coastal,
    Highland,
}

impl StrategicKind {
    pub fn value(self) -> u8 {
        match self {
            StrategicKind::MountainPass => 3,
            StrategicKind::RiverCrossing => 2,
            StrategicKind::Highland => 2,
            StrategicKind::Coastal => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicLocation {
    pub location: (u32, u32),
    pub kind: StrategicKind,
    pub value: u8,
}

/// Derived points of interest for a map. Read-only output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategicMarkers {
    pub resource_deposits: Vec<ResourceDeposit>,
    pub settlement_sites: Vec<SettlementSite>,
    pub strategic_locations: Vec<StrategicLocation>,
}

impl StrategicMarkers {
    pub fn is_empty(&self) -> bool {
        self.resource_deposits.is_empty()
            && self.settlement_sites.is_empty()
            && self.strategic_locations.is_empty()
    }

    /// Extracts markers for any parsed map.
    ///
    /// Plot data is used when present; otherwise markers are inferred from
    /// the classified biomes.
    pub fn extract(
        data: &RawMapData,
        biomes: &ClassifiedGrid,
        elevation: Option<&ElevationGrid>,
    ) -> Self {
        match data.plot_grid() {
            Some(plots) => Self::from_plots(&plots, biomes, elevation),
            None => Self::from_biomes(biomes, elevation),
        }
    }

    /// Markers from WorldBuilder plots.
    pub fn from_plots(
        plots: &Grid<Option<&RawCell>>,
        biomes: &ClassifiedGrid,
        elevation: Option<&ElevationGrid>,
    ) -> Self {
        let mut out = Self::default();
        for (x, y, cell) in plots.iter() {
            let Some(cell) = cell else { continue };
            let biome = *biomes.get(x, y);
            let elev = elevation.map(|e| *e.get(x, y));

            if let Some(code) = &cell.bonus {
                let category = ResourceCategory::from_bonus(code);
                let (resource, quality, size) = bonus_profile(code)
                    .unwrap_or((category.name(), Quality::Medium, DepositSize::Medium));
                out.resource_deposits.push(ResourceDeposit {
                    location: (x, y),
                    category,
                    resource: resource.to_string(),
                    quality,
                    size,
                    confidence: SOURCE_CONFIDENCE,
                    elevation: elev,
                });
            }

            if cell.is_water_plot() || biome.is_water() {
                continue;
            }

            let water_access =
                cell.plot_level == Some(PlotLevel::Coastal) || touches_water(biomes, x, y);
            let has_resources = cell.bonus.is_some();
            let good_terrain =
                !matches!(cell.terrain, Some(TerrainCode::Desert) | Some(TerrainCode::Snow));
            if water_access && (has_resources || good_terrain) && !cell.is_hills() {
                let mut advantages = vec![SiteAdvantage::WaterAccess];
                if has_resources {
                    advantages.push(SiteAdvantage::Resources);
                }
                if cell.has_river {
                    advantages.push(SiteAdvantage::River);
                }
                if good_terrain {
                    advantages.push(SiteAdvantage::FertileLand);
                }
                out.settlement_sites.push(SettlementSite {
                    location: (x, y),
                    biome,
                    priority: advantages.len() as u8,
                    advantages,
                });
            }

            let kind = if cell.is_hills() && touches_lowland(plots, x, y) {
                Some(StrategicKind::MountainPass)
            } else if cell.has_river {
                Some(StrategicKind::RiverCrossing)
            } else if cell.plot_level == Some(PlotLevel::Coastal) {
                Some(StrategicKind::Coastal)
            } else {
                None
            };
            if let Some(kind) = kind {
                out.strategic_locations.push(StrategicLocation {
                    location: (x, y),
                    kind,
                    value: kind.value(),
                });
            }
        }
        out
    }

    /// Markers inferred from biomes only.
    pub fn from_biomes(biomes: &ClassifiedGrid, elevation: Option<&ElevationGrid>) -> Self {
        let mut out = Self::default();
        for (x, y, &biome) in biomes.iter() {
            if let Some(candidates) = biome_resources(biome) {
                let h = cell_hash(x, y);
                let (category, resource) = candidates[h as usize % candidates.len()];
                out.resource_deposits.push(ResourceDeposit {
                    location: (x, y),
                    category,
                    resource: resource.to_string(),
                    quality: QUALITIES[(h >> 8) as usize % 3],
                    size: SIZES[(h >> 16) as usize % 3],
                    confidence: INFERRED_CONFIDENCE,
                    elevation: elevation.map(|e| *e.get(x, y)),
                });
            }

            if matches!(biome, Biome::Grasslands | Biome::Plains | Biome::Forest) {
                let mut advantages = vec![SiteAdvantage::FertileLand];
                if touches_water(biomes, x, y) {
                    advantages.push(SiteAdvantage::WaterAccess);
                }
                out.settlement_sites.push(SettlementSite {
                    location: (x, y),
                    biome,
                    priority: advantages.len() as u8,
                    advantages,
                });
            }

            let kind = if biome == Biome::Rocky {
                Some(StrategicKind::Highland)
            } else if !biome.is_water() && touches_water(biomes, x, y) {
                Some(StrategicKind::Coastal)
            } else {
                None
            };
            if let Some(kind) = kind {
                out.strategic_locations.push(StrategicLocation {
                    location: (x, y),
                    kind,
                    value: kind.value(),
                });
            }
        }
        out
    }
}

/// Plausible resources for biomes that tend to host deposits.
fn biome_resources(biome: Biome) -> Option<&'static [(ResourceCategory, &'static str)]> {
    let list: &'static [(ResourceCategory, &'static str)] = match biome {
        Biome::Rocky => &[
            (ResourceCategory::MetalOre, "iron_ore"),
            (ResourceCategory::MetalOre, "copper_ore"),
            (ResourceCategory::MetalOre, "aluminum_ore"),
        ],
        Biome::Desert => &[
            (ResourceCategory::RareEarth, "rare_earth_elements"),
            (ResourceCategory::Radioactive, "radioactive_materials"),
        ],
        Biome::Tundra => &[
            (ResourceCategory::PreciousMetal, "precious_metals"),
            (ResourceCategory::Hydrocarbons, "hydrocarbons"),
        ],
        Biome::Arctic => &[
            (ResourceCategory::WaterIce, "water_ice"),
            (ResourceCategory::Hydrocarbons, "methane_deposits"),
        ],
        _ => return None,
    };
    Some(list)
}

/// Stable per-cell hash used for deterministic choices.
fn cell_hash(x: u32, y: u32) -> u32 {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    h ^ (h >> 13)
}

fn touches_water(biomes: &ClassifiedGrid, x: u32, y: u32) -> bool {
    biomes.neighbors_8(x, y).any(|(nx, ny)| biomes.get(nx, ny).is_water())
}

fn touches_lowland(plots: &Grid<Option<&RawCell>>, x: u32, y: u32) -> bool {
    plots.neighbors_8(x, y).any(|(nx, ny)| {
        plots
            .get(nx, ny)
            .is_some_and(|c| {
                matches!(c.plot_level, Some(PlotLevel::Flat) | Some(PlotLevel::Coastal))
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::TerrainClassifier;
    use crate::source::{RawContent, SourceFormat};

    fn coastal_map() -> RawMapData {
        // Row 0: water. Row 1: coastal grass with iron, hills next to flat plains with a river.
        let cells = vec![
            RawCell::new(0, 0).with_plot(PlotLevel::WaterOrPeak).with_terrain(TerrainCode::Coast),
            RawCell::new(1, 0).with_plot(PlotLevel::WaterOrPeak).with_terrain(TerrainCode::Coast),
            RawCell::new(2, 0).with_plot(PlotLevel::WaterOrPeak).with_terrain(TerrainCode::Ocean),
            RawCell::new(0, 1)
                .with_plot(PlotLevel::Coastal)
                .with_terrain(TerrainCode::Grass)
                .with_bonus("BONUS_IRON"),
            RawCell::new(1, 1).with_plot(PlotLevel::Hills).with_terrain(TerrainCode::Plains),
            RawCell::new(2, 1)
                .with_plot(PlotLevel::Flat)
                .with_terrain(TerrainCode::Desert)
                .with_river(),
        ];
        RawMapData {
            format: SourceFormat::WorldBuilder,
            width: 3,
            height: 2,
            content: RawContent::Plots(cells),
        }
    }

    #[test]
    fn plot_markers_use_bonuses_and_plot_levels() {
        let data = coastal_map();
        let biomes = TerrainClassifier::default().classify_map(&data).grid;
        let markers = StrategicMarkers::extract(&data, &biomes, None);

        assert_eq!(markers.resource_deposits.len(), 1);
        let iron = &markers.resource_deposits[0];
        assert_eq!(iron.location, (0, 1));
        assert_eq!(iron.resource, "iron_ore");
        assert_eq!(iron.category, ResourceCategory::MetalOre);

        // Coastal grass with iron is a settlement site; hills never are.
        let sites: Vec<_> = markers.settlement_sites.iter().map(|s| s.location).collect();
        assert!(sites.contains(&(0, 1)));
        assert!(!sites.contains(&(1, 1)));
        // Desert next to water still qualifies only through resources, which it lacks.
        assert!(!sites.contains(&(2, 1)));

        let kinds: Vec<_> = markers
            .strategic_locations
            .iter()
            .map(|s| (s.location, s.kind))
            .collect();
        assert!(kinds.contains(&((1, 1), StrategicKind::MountainPass)));
        assert!(kinds.contains(&((2, 1), StrategicKind::RiverCrossing)));
        assert!(kinds.contains(&((0, 1), StrategicKind::Coastal)));
    }

    #[test]
    fn biome_markers_are_deterministic() {
        let biomes = ClassifiedGrid::from_vec(
            4,
            1,
            vec![Biome::Ocean, Biome::Grasslands, Biome::Rocky, Biome::Arctic],
        )
        .unwrap();
        let a = StrategicMarkers::from_biomes(&biomes, None);
        let b = StrategicMarkers::from_biomes(&biomes, None);
        assert_eq!(a, b);

        assert_eq!(a.resource_deposits.len(), 2);
        assert!(a.resource_deposits.iter().all(|d| d.confidence < SOURCE_CONFIDENCE));
        assert_eq!(a.settlement_sites.len(), 1);
        assert!(a.settlement_sites[0].advantages.contains(&SiteAdvantage::WaterAccess));
        assert!(a
            .strategic_locations
            .iter()
            .any(|s| s.location == (2, 0) && s.kind == StrategicKind::Highland));
    }

    #[test]
    fn water_cells_are_never_settled() {
        let biomes = ClassifiedGrid::filled(3, 3, Biome::Ocean);
        let markers = StrategicMarkers::from_biomes(&biomes, None);
        assert!(markers.is_empty());
    }
}
