//! Resource categories and the per-cell resource layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::RawMapData;
use crate::terrain::Grid;

/// Broad resource category of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    MetalOre,
    Carbon,
    Hydrocarbons,
    PreciousMetal,
    Radioactive,
    RareEarth,
    Organic,
    Construction,
    Chemical,
    WaterIce,
    Unknown,
}

impl ResourceCategory {
    pub fn name(self) -> &'static str {
        match self {
            ResourceCategory::MetalOre => "metal_ore",
            ResourceCategory::Carbon => "carbon",
            ResourceCategory::Hydrocarbons => "hydrocarbons",
            ResourceCategory::PreciousMetal => "precious_metal",
            ResourceCategory::Radioactive => "radioactive",
            ResourceCategory::RareEarth => "rare_earth",
            ResourceCategory::Organic => "organic",
            ResourceCategory::Construction => "construction",
            ResourceCategory::Chemical => "chemical",
            ResourceCategory::WaterIce => "water_ice",
            ResourceCategory::Unknown => "unknown",
        }
    }

    /// Category of a WorldBuilder `BONUS_*` code. Unlisted codes are `Unknown`.
    pub fn from_bonus(code: &str) -> Self {
        match code {
            "BONUS_IRON" | "BONUS_ALUMINUM" | "BONUS_COPPER" => ResourceCategory::MetalOre,
            "BONUS_COAL" => ResourceCategory::Carbon,
            "BONUS_OIL" => ResourceCategory::Hydrocarbons,
            "BONUS_SILVER" | "BONUS_GOLD" => ResourceCategory::PreciousMetal,
            "BONUS_URANIUM" => ResourceCategory::Radioactive,
            "BONUS_GEMS" => ResourceCategory::RareEarth,
            "BONUS_HORSE" | "BONUS_COW" | "BONUS_CORN" | "BONUS_WHALE" | "BONUS_PIG"
            | "BONUS_FISH" | "BONUS_CLAM" | "BONUS_CRAB" | "BONUS_RICE" | "BONUS_WHEAT"
            | "BONUS_DYE" | "BONUS_FUR" | "BONUS_IVORY" | "BONUS_SILK" | "BONUS_SPICE"
            | "BONUS_SUGAR" | "BONUS_TEA" | "BONUS_TOBACCO" | "BONUS_WINE" | "BONUS_INCENSE"
            | "BONUS_BANANA" | "BONUS_DEER" | "BONUS_SHEEP" => ResourceCategory::Organic,
            "BONUS_MARBLE" | "BONUS_STONE" => ResourceCategory::Construction,
            "BONUS_SALT" => ResourceCategory::Chemical,
            _ => ResourceCategory::Unknown,
        }
    }
}

/// Assessed deposit quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    Medium,
    High,
    Exotic,
}

/// Assessed deposit size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositSize {
    Small,
    Medium,
    Large,
}

/// Detailed profile for the strategic bonuses: resource name, quality, size.
pub fn bonus_profile(code: &str) -> Option<(&'static str, Quality, DepositSize)> {
    let profile = match code {
        "BONUS_IRON" => ("iron_ore", Quality::High, DepositSize::Large),
        "BONUS_COPPER" => ("copper_ore", Quality::Medium, DepositSize::Medium),
        "BONUS_GOLD" => ("precious_metals", Quality::High, DepositSize::Small),
        "BONUS_SILVER" => ("precious_metals", Quality::Medium, DepositSize::Small),
        "BONUS_GEMS" => ("rare_earth_elements", Quality::Exotic, DepositSize::Small),
        "BONUS_OIL" => ("hydrocarbons", Quality::High, DepositSize::Large),
        "BONUS_COAL" => ("carbon_deposits", Quality::Medium, DepositSize::Large),
        "BONUS_URANIUM" => ("radioactive_materials", Quality::Exotic, DepositSize::Medium),
        "BONUS_ALUMINUM" => ("lightweight_metals", Quality::High, DepositSize::Medium),
        _ => return None,
    };
    Some(profile)
}

/// Resource category per cell plus per-category totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub grid: Grid<Option<ResourceCategory>>,
    pub counts: BTreeMap<ResourceCategory, usize>,
}

impl ResourceSummary {
    /// Builds the resource layer from WorldBuilder bonuses. Scenario maps
    /// carry no bonuses and produce an empty layer.
    pub fn from_source(data: &RawMapData) -> Self {
        let mut grid = Grid::filled(data.width, data.height, None);
        let plots = data.plots().unwrap_or(&[]);
        for cell in plots.iter().filter(|c| data.contains(c.x, c.y)) {
            if let Some(code) = &cell.bonus {
                let category = ResourceCategory::from_bonus(code);
                if category == ResourceCategory::Unknown {
                    log::debug!("Unrecognized bonus {} at ({}, {})", code, cell.x, cell.y);
                }
                grid.set(cell.x, cell.y, Some(category));
            }
        }
        let mut counts = BTreeMap::new();
        for category in grid.cells().iter().flatten() {
            *counts.entry(*category).or_insert(0) += 1;
        }
        Self { grid, counts }
    }

    /// A resource layer with no deposits.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            grid: Grid::filled(width, height, None),
            counts: BTreeMap::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
