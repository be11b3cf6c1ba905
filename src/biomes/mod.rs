//! Canonical biome model and terrain classification.
//!
//! Every source format is reduced to the same closed [`Biome`] set:
//! - per-cell static properties (water flag, vegetation weight, elevation hint)
//! - [`TerrainClassifier`] resolving WorldBuilder plots and scenario codes
//! - climate-driven classification for procedural maps
//! - [`BiomeCounts`] for reporting

mod classify;
mod config;
mod whittaker;

pub use classify::{Classification, TerrainClassifier};
pub use config::ClassifierConfig;
pub use whittaker::{classify_whittaker_like, vegetation_potential};

use serde::{Deserialize, Serialize};

use crate::terrain::Grid;

/// One biome per cell, same dimensions as the source map.
pub type ClassifiedGrid = Grid<Biome>;

/// Canonical biome. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Ocean = 0,
    DeepSea = 1,
    Grasslands = 2,
    Plains = 3,
    Desert = 4,
    Tundra = 5,
    Arctic = 6,
    Forest = 7,
    Jungle = 8,
    Swamp = 9,
    Boreal = 10,
    Rocky = 11,
    Wetlands = 12,
}

impl Biome {
    pub const COUNT: usize = 13;

    /// All biomes in `as_u8()` order.
    pub const ALL: [Biome; Biome::COUNT] = [
        Biome::Ocean,
        Biome::DeepSea,
        Biome::Grasslands,
        Biome::Plains,
        Biome::Desert,
        Biome::Tundra,
        Biome::Arctic,
        Biome::Forest,
        Biome::Jungle,
        Biome::Swamp,
        Biome::Boreal,
        Biome::Rocky,
        Biome::Wetlands,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "ocean",
            Biome::DeepSea => "deep_sea",
            Biome::Grasslands => "grasslands",
            Biome::Plains => "plains",
            Biome::Desert => "desert",
            Biome::Tundra => "tundra",
            Biome::Arctic => "arctic",
            Biome::Forest => "forest",
            Biome::Jungle => "jungle",
            Biome::Swamp => "swamp",
            Biome::Boreal => "boreal",
            Biome::Rocky => "rocky",
            Biome::Wetlands => "wetlands",
        }
    }

    /// Open water. Land-floor rules never apply to these.
    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::DeepSea)
    }

    /// Base vegetation potential for this biome (0..1).
    pub fn base_veg(self) -> f32 {
        match self {
            Biome::Ocean | Biome::DeepSea => 0.0,
            Biome::Grasslands => 0.60,
            Biome::Plains => 0.45,
            Biome::Desert => 0.05,
            Biome::Tundra => 0.15,
            Biome::Arctic => 0.0,
            Biome::Forest => 0.80,
            Biome::Jungle => 0.95,
            Biome::Swamp => 0.70,
            Biome::Boreal => 0.65,
            Biome::Rocky => 0.05,
            Biome::Wetlands => 0.75,
        }
    }

    /// Typical normalized elevation for this biome, used when the source
    /// carries no elevation information.
    pub fn elevation_hint(self) -> f32 {
        match self {
            Biome::Ocean => 0.10,
            Biome::DeepSea => 0.05,
            Biome::Swamp => 0.30,
            Biome::Wetlands => 0.30,
            Biome::Grasslands => 0.45,
            Biome::Plains => 0.45,
            Biome::Desert => 0.50,
            Biome::Forest => 0.55,
            Biome::Jungle => 0.40,
            Biome::Tundra => 0.65,
            Biome::Boreal => 0.70,
            Biome::Arctic => 0.75,
            Biome::Rocky => 0.80,
        }
    }

    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::Ocean => [30, 80, 160],
            Biome::DeepSea => [15, 40, 90],
            Biome::Grasslands => [130, 180, 90],
            Biome::Plains => [190, 190, 95],
            Biome::Desert => [220, 205, 140],
            Biome::Tundra => [170, 190, 170],
            Biome::Arctic => [240, 248, 255],
            Biome::Forest => [40, 120, 60],
            Biome::Jungle => [20, 140, 55],
            Biome::Swamp => [70, 100, 70],
            Biome::Boreal => [30, 80, 40],
            Biome::Rocky => [140, 140, 140],
            Biome::Wetlands => [90, 140, 110],
        }
    }
}

/// Per-biome cell counts. Reporting only; never feeds back into classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeCounts {
    counts: [usize; Biome::COUNT],
}

impl BiomeCounts {
    /// Counts every cell of a classified grid.
    pub fn from_grid(grid: &ClassifiedGrid) -> Self {
        let mut out = Self::default();
        for &biome in grid.cells() {
            out.counts[biome.as_u8() as usize] += 1;
        }
        out
    }

    pub fn get(&self, biome: Biome) -> usize {
        self.counts[biome.as_u8() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Number of water cells.
    pub fn water(&self) -> usize {
        Biome::ALL
            .iter()
            .filter(|b| b.is_water())
            .map(|&b| self.get(b))
            .sum()
    }

    /// Non-zero `(biome, count)` pairs in biome order.
    pub fn iter(&self) -> impl Iterator<Item = (Biome, usize)> + '_ {
        Biome::ALL
            .iter()
            .map(move |&b| (b, self.get(b)))
            .filter(|&(_, n)| n > 0)
    }
}

pub(crate) fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
