//! Per-class reverse-terraform tables.

use super::PlanetClassification;
use crate::biomes::Biome;

/// Barren baseline of a lush biome for the given planet class.
///
/// Biomes a table does not list pass through unchanged, so every
/// `(biome, class)` pair has a defined result.
pub fn reverse_biome(class: PlanetClassification, biome: Biome) -> Biome {
    match class {
        PlanetClassification::Oceanic
        | PlanetClassification::Temperate
        | PlanetClassification::Default => match biome {
            Biome::Ocean => Biome::DeepSea,
            Biome::DeepSea => Biome::Rocky,
            Biome::Grasslands | Biome::Plains => Biome::Desert,
            Biome::Forest => Biome::Rocky,
            Biome::Jungle => Biome::Swamp,
            Biome::Boreal => Biome::Tundra,
            other => other,
        },
        PlanetClassification::Arid => match biome {
            Biome::Ocean | Biome::DeepSea => Biome::Arctic,
            Biome::Grasslands | Biome::Plains | Biome::Swamp => Biome::Desert,
            Biome::Forest | Biome::Jungle | Biome::Boreal => Biome::Rocky,
            Biome::Tundra => Biome::Arctic,
            other => other,
        },
        PlanetClassification::IceWorld => match biome {
            Biome::Ocean
            | Biome::DeepSea
            | Biome::Forest
            | Biome::Jungle
            | Biome::Swamp
            | Biome::Boreal
            | Biome::Tundra => Biome::Arctic,
            Biome::Grasslands | Biome::Plains | Biome::Desert => Biome::Tundra,
            other => other,
        },
    }
}

/// Original biomes that survive terraforming as permanent landmasses.
pub fn is_permanent_landmass(biome: Biome) -> bool {
    matches!(biome, Biome::Boreal | Biome::Rocky)
}

/// Barren biomes that act as resource-node sources for the class.
pub fn resource_sources(class: PlanetClassification) -> &'static [Biome] {
    match class {
        PlanetClassification::Default => &[Biome::Arctic, Biome::Tundra, Biome::DeepSea],
        PlanetClassification::IceWorld => &[Biome::Arctic, Biome::Tundra],
        PlanetClassification::Arid => &[Biome::Arctic, Biome::Rocky],
        PlanetClassification::Oceanic => &[Biome::Rocky],
        PlanetClassification::Temperate => &[Biome::Tundra, Biome::Rocky],
    }
}
