//! Hydrosphere analysis of a barren baseline grid.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::{PlanetCharacteristics, PlanetClassification};
use crate::biomes::{Biome, ClassifiedGrid};

/// Contract for analyzing where water can exist on a barren grid.
pub trait HydrosphereAnalyzer {
    fn analyze(
        &self,
        grid: &ClassifiedGrid,
        planet: &PlanetCharacteristics,
    ) -> HydrosphereAnalysis;
}

/// Connected region of surface water cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterZone {
    pub biome: Biome,
    pub cells: Vec<(u32, u32)>,
}

impl WaterZone {
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Desert or rocky cell that may hold groundwater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AquiferSite {
    pub location: (u32, u32),
    pub biome: Biome,
    /// Normalized potential in `[0, 1]`.
    pub potential: f32,
    /// Estimated depth range in meters.
    pub depth_m: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceDeposit {
    pub location: (u32, u32),
    pub biome: Biome,
    /// `1.0` is fully stable; each adjacent rocky cell subtracts `0.1`.
    pub stability: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMethod {
    IceMining,
    AquiferDrilling,
    SurfaceCollection,
    IceHarvesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldPotential {
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Surface,
    Subsurface,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSite {
    pub location: (u32, u32),
    pub method: CollectionMethod,
    pub yield_potential: YieldPotential,
    pub accessibility: Accessibility,
    pub zone_size: Option<usize>,
    pub depth_m: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterAvailability {
    None,
    Scarce,
    Limited,
    Moderate,
    Abundant,
}

impl WaterAvailability {
    /// Rates availability by the share of sites with high or very high yield.
    pub fn from_sites(sites: &[CollectionSite]) -> Self {
        if sites.is_empty() {
            return WaterAvailability::None;
        }
        let high = sites
            .iter()
            .filter(|s| s.yield_potential >= YieldPotential::High)
            .count();
        let ratio = high as f32 / sites.len() as f32;
        if ratio > 0.7 {
            WaterAvailability::Abundant
        } else if ratio > 0.4 {
            WaterAvailability::Moderate
        } else if ratio > 0.1 {
            WaterAvailability::Limited
        } else {
            WaterAvailability::Scarce
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrosphereSummary {
    pub surface_water_cells: usize,
    pub subsurface_sites: usize,
    pub ice_deposits: usize,
    pub collection_sites: usize,
    pub classification: PlanetClassification,
    pub availability: WaterAvailability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrosphereAnalysis {
    pub surface_water_zones: Vec<WaterZone>,
    pub subsurface_potential: Vec<AquiferSite>,
    pub ice_distribution: Vec<IceDeposit>,
    pub collection_sites: Vec<CollectionSite>,
    pub summary: HydrosphereSummary,
}

/// Radius, in cells, scanned around an aquifer candidate.
const AQUIFER_RADIUS: i64 = 2;
const AQUIFER_NORMALIZER: f32 = 10.0;
const AQUIFER_MIN_POTENTIAL: f32 = 0.3;

/// Grid-based analyzer using flood fill and neighbourhood scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridHydrosphereAnalyzer;

impl GridHydrosphereAnalyzer {
    fn is_ice(biome: Biome) -> bool {
        matches!(biome, Biome::Arctic | Biome::Tundra)
    }

    /// 4-connected water regions, largest first.
    pub fn surface_water_zones(grid: &ClassifiedGrid) -> Vec<WaterZone> {
        let w = grid.width();
        let mut visited = vec![false; grid.len()];
        let mut zones = Vec::new();

        for (x, y, biome) in grid.iter() {
            let idx = (y * w + x) as usize;
            if visited[idx] || !biome.is_water() {
                continue;
            }
            visited[idx] = true;
            let mut cells = Vec::new();
            let mut queue = VecDeque::from([(x, y)]);
            while let Some((cx, cy)) = queue.pop_front() {
                cells.push((cx, cy));
                for (nx, ny) in grid.neighbors_4(cx, cy) {
                    let n = (ny * w + nx) as usize;
                    if !visited[n] && grid.get(nx, ny).is_water() {
                        visited[n] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
            zones.push(WaterZone {
                biome: *biome,
                cells,
            });
        }

        // Stable sort keeps scan order among equal sizes.
        zones.sort_by(|a, b| b.size().cmp(&a.size()));
        zones
    }

    /// Desert and rocky cells scored by nearby water and ice.
    pub fn subsurface_potential(grid: &ClassifiedGrid) -> Vec<AquiferSite> {
        let mut sites = Vec::new();
        for (x, y, biome) in grid.iter() {
            let depth_m = match biome {
                Biome::Desert => (50, 200),
                Biome::Rocky => (100, 500),
                _ => continue,
            };
            let mut score = 0.0f32;
            for dy in -AQUIFER_RADIUS..=AQUIFER_RADIUS {
                for dx in -AQUIFER_RADIUS..=AQUIFER_RADIUS {
                    let (nx, ny) = (x as i64 + dx, y as i64 + dy);
                    if !grid.in_bounds(nx, ny) {
                        continue;
                    }
                    let dist = ((dx * dx + dy * dy) as f32).sqrt();
                    if dist > AQUIFER_RADIUS as f32 {
                        continue;
                    }
                    let neighbor = *grid.get(nx as u32, ny as u32);
                    if neighbor.is_water() {
                        score += 1.0 / (dist + 1.0);
                    } else if Self::is_ice(neighbor) {
                        score += 0.5 / (dist + 1.0);
                    }
                }
            }
            let potential = (score / AQUIFER_NORMALIZER).min(1.0);
            if potential > AQUIFER_MIN_POTENTIAL {
                sites.push(AquiferSite {
                    location: (x, y),
                    biome: *biome,
                    potential,
                    depth_m,
                });
            }
        }
        sites.sort_by(|a, b| b.potential.total_cmp(&a.potential));
        sites
    }

    /// Arctic and tundra cells with a stability score.
    pub fn ice_distribution(grid: &ClassifiedGrid) -> Vec<IceDeposit> {
        grid.iter()
            .filter(|(_, _, biome)| Self::is_ice(**biome))
            .map(|(x, y, biome)| {
                let rocky = grid
                    .neighbors_8(x, y)
                    .filter(|&(nx, ny)| *grid.get(nx, ny) == Biome::Rocky)
                    .count();
                IceDeposit {
                    location: (x, y),
                    biome: *biome,
                    stability: (1.0 - 0.1 * rocky as f32).max(0.0),
                }
            })
            .collect()
    }

    fn collection_sites(
        class: PlanetClassification,
        zones: &[WaterZone],
        aquifers: &[AquiferSite],
        ice: &[IceDeposit],
    ) -> Vec<CollectionSite> {
        let surface = |min_size: usize, yield_potential: YieldPotential| {
            zones
                .iter()
                .filter(|z| z.size() > min_size)
                .filter_map(|z| z.cells.first().map(|&loc| (loc, z.size())))
                .map(|(location, size)| CollectionSite {
                    location,
                    method: CollectionMethod::SurfaceCollection,
                    yield_potential,
                    accessibility: Accessibility::Surface,
                    zone_size: Some(size),
                    depth_m: None,
                })
                .collect::<Vec<_>>()
        };
        let ice_site = |deposit: &IceDeposit, method, yield_potential| CollectionSite {
            location: deposit.location,
            method,
            yield_potential,
            accessibility: Accessibility::Surface,
            zone_size: None,
            depth_m: None,
        };

        match class {
            PlanetClassification::Arid => {
                let mut sites: Vec<CollectionSite> = ice
                    .iter()
                    .filter(|d| d.stability > 0.7)
                    .map(|d| ice_site(d, CollectionMethod::IceMining, YieldPotential::High))
                    .collect();
                sites.extend(aquifers.iter().filter(|a| a.potential > 0.5).map(|a| {
                    CollectionSite {
                        location: a.location,
                        method: CollectionMethod::AquiferDrilling,
                        yield_potential: YieldPotential::Medium,
                        accessibility: Accessibility::Subsurface,
                        zone_size: None,
                        depth_m: Some(a.depth_m),
                    }
                }));
                sites
            }
            PlanetClassification::Oceanic | PlanetClassification::Temperate => {
                surface(10, YieldPotential::VeryHigh)
            }
            PlanetClassification::IceWorld => ice
                .iter()
                .map(|d| {
                    let yield_potential = if d.stability > 0.8 {
                        YieldPotential::High
                    } else {
                        YieldPotential::Medium
                    };
                    ice_site(d, CollectionMethod::IceHarvesting, yield_potential)
                })
                .collect(),
            PlanetClassification::Default => {
                let sites = surface(5, YieldPotential::High);
                if !sites.is_empty() {
                    return sites;
                }
                ice.iter()
                    .take(5)
                    .map(|d| ice_site(d, CollectionMethod::IceMining, YieldPotential::Medium))
                    .collect()
            }
        }
    }
}

impl HydrosphereAnalyzer for GridHydrosphereAnalyzer {
    fn analyze(
        &self,
        grid: &ClassifiedGrid,
        planet: &PlanetCharacteristics,
    ) -> HydrosphereAnalysis {
        let zones = Self::surface_water_zones(grid);
        let aquifers = Self::subsurface_potential(grid);
        let ice = Self::ice_distribution(grid);
        let sites = Self::collection_sites(planet.classification, &zones, &aquifers, &ice);

        let summary = HydrosphereSummary {
            surface_water_cells: zones.iter().map(WaterZone::size).sum(),
            subsurface_sites: aquifers.len(),
            ice_deposits: ice.len(),
            collection_sites: sites.len(),
            classification: planet.classification,
            availability: WaterAvailability::from_sites(&sites),
        };
        log::debug!(
            "Hydrosphere: {} water zones, {} aquifers, {} ice cells, availability {:?}",
            zones.len(),
            summary.subsurface_sites,
            summary.ice_deposits,
            summary.availability
        );

        HydrosphereAnalysis {
            surface_water_zones: zones,
            subsurface_potential: aquifers,
            ice_distribution: ice,
            collection_sites: sites,
            summary,
        }
    }
}
