//! Reverse terraforming: regress a lush classified grid to a barren baseline.

mod hydrosphere;
mod planet;
mod tables;

pub use hydrosphere::{
    Accessibility, AquiferSite, CollectionMethod, CollectionSite, GridHydrosphereAnalyzer,
    HydrosphereAnalysis, HydrosphereAnalyzer, HydrosphereSummary, IceDeposit, WaterAvailability,
    WaterZone, YieldPotential,
};
pub use planet::{PlanetCharacteristics, PlanetClassification, PlanetDescriptor};
pub use tables::{is_permanent_landmass, resource_sources, reverse_biome};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biomes::{Biome, BiomeCounts, ClassifiedGrid};

#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("Cannot reverse-terraform an empty grid")]
    EmptyGrid,
}

/// Cells of interest recorded while building the barren grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerraformMarkers {
    /// Original boreal or rocky cells.
    pub permanent_landmasses: Vec<(u32, u32)>,
    /// Barren cells whose biome is a resource source for the class.
    pub resource_nodes: Vec<(u32, u32)>,
    /// Original ocean cells on classes that keep surface water.
    pub water_collection_zones: Vec<(u32, u32)>,
}

/// Result of reverse terraforming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrenTerrain {
    pub classification: PlanetClassification,
    pub grid: ClassifiedGrid,
    pub counts: BiomeCounts,
    pub markers: TerraformMarkers,
    pub hydrosphere: HydrosphereAnalysis,
}

/// Maps classified terrain to a barren baseline using per-class tables.
pub struct ReverseTerraformMapper<A: HydrosphereAnalyzer = GridHydrosphereAnalyzer> {
    analyzer: A,
}

impl Default for ReverseTerraformMapper {
    fn default() -> Self {
        Self::new(GridHydrosphereAnalyzer)
    }
}

impl<A: HydrosphereAnalyzer> ReverseTerraformMapper<A> {
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Reverse-terraforms `grid` for a planet.
    ///
    /// # Arguments
    /// * `grid` - Lush classified grid
    /// * `planet` - Target body signals; the classification selects the tables
    ///
    /// # Returns
    /// Barren grid of the same dimensions, recomputed counts, markers and the
    /// hydrosphere analysis of the barren grid.
    pub fn reverse_terraform(
        &self,
        grid: &ClassifiedGrid,
        planet: &PlanetCharacteristics,
    ) -> Result<BarrenTerrain, TerraformError> {
        if grid.is_empty() {
            return Err(TerraformError::EmptyGrid);
        }
        let class = planet.classification;
        log::info!(
            "Reverse terraforming {}x{} grid as {}",
            grid.width(),
            grid.height(),
            class.name()
        );

        let sources = resource_sources(class);
        let keeps_water = class.retains_surface_water();
        let mut markers = TerraformMarkers::default();

        let barren = grid.map_with_coords(|x, y, &original| {
            let reversed = reverse_biome(class, original);
            if is_permanent_landmass(original) {
                markers.permanent_landmasses.push((x, y));
            }
            if sources.contains(&reversed) {
                markers.resource_nodes.push((x, y));
            }
            if keeps_water && matches!(original, Biome::Ocean | Biome::DeepSea) {
                markers.water_collection_zones.push((x, y));
            }
            reversed
        });

        let counts = BiomeCounts::from_grid(&barren);
        let hydrosphere = self.analyzer.analyze(&barren, planet);
        log::debug!(
            "Barren grid: {} landmass, {} resource, {} water-collection markers",
            markers.permanent_landmasses.len(),
            markers.resource_nodes.len(),
            markers.water_collection_zones.len()
        );

        Ok(BarrenTerrain {
            classification: class,
            grid: barren,
            counts,
            markers,
            hydrosphere,
        })
    }

    /// Convenience wrapper deriving characteristics from a descriptor.
    pub fn reverse_terraform_for(
        &self,
        grid: &ClassifiedGrid,
        planet: &PlanetDescriptor,
    ) -> Result<BarrenTerrain, TerraformError> {
        self.reverse_terraform(grid, &planet.characteristics())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Grid;

    struct CountingAnalyzer(std::cell::Cell<usize>);

    impl HydrosphereAnalyzer for CountingAnalyzer {
        fn analyze(
            &self,
            grid: &ClassifiedGrid,
            planet: &PlanetCharacteristics,
        ) -> HydrosphereAnalysis {
            self.0.set(self.0.get() + 1);
            GridHydrosphereAnalyzer.analyze(grid, planet)
        }
    }

    #[test]
    fn oceanic_grasslands_and_ocean() {
        let grid = Grid::from_vec(2, 1, vec![Biome::Grasslands, Biome::Ocean]).unwrap();
        let planet = PlanetCharacteristics::of_class(PlanetClassification::Oceanic);
        let barren = ReverseTerraformMapper::default()
            .reverse_terraform(&grid, &planet)
            .unwrap();

        assert_eq!(*barren.grid.get(0, 0), Biome::Desert);
        assert_eq!(*barren.grid.get(1, 0), Biome::DeepSea);
        assert!(barren.markers.permanent_landmasses.is_empty());
        assert_eq!(barren.markers.water_collection_zones, vec![(1, 0)]);
        assert_eq!(barren.counts.get(Biome::Desert), 1);
        assert_eq!(barren.counts.get(Biome::DeepSea), 1);
    }

    #[test]
    fn every_biome_and_class_maps() {
        let grid = Grid::from_vec(Biome::COUNT as u32, 1, Biome::ALL.to_vec()).unwrap();
        let mapper = ReverseTerraformMapper::default();
        for class in PlanetClassification::ALL {
            let barren = mapper
                .reverse_terraform(&grid, &PlanetCharacteristics::of_class(class))
                .unwrap();
            assert!(barren.grid.same_dimensions(&grid));
            assert_eq!(barren.counts.total(), Biome::COUNT);
            assert_eq!(barren.markers.permanent_landmasses, vec![(10, 0), (11, 0)]);
        }
    }

    #[test]
    fn water_zones_only_on_wet_classes() {
        let grid = Grid::filled(3, 3, Biome::Ocean);
        let mapper = ReverseTerraformMapper::default();
        for class in PlanetClassification::ALL {
            let barren = mapper
                .reverse_terraform(&grid, &PlanetCharacteristics::of_class(class))
                .unwrap();
            let expected = if class.retains_surface_water() { 9 } else { 0 };
            assert_eq!(barren.markers.water_collection_zones.len(), expected);
        }
    }

    #[test]
    fn resource_nodes_follow_barren_biome() {
        // Arid forest becomes rocky, which is an arid resource source.
        let grid = Grid::filled(2, 2, Biome::Forest);
        let barren = ReverseTerraformMapper::default()
            .reverse_terraform(&grid, &PlanetCharacteristics::of_class(PlanetClassification::Arid))
            .unwrap();
        assert_eq!(barren.markers.resource_nodes.len(), 4);
    }

    #[test]
    fn analyzer_runs_once_on_barren_grid() {
        let grid = Grid::filled(4, 4, Biome::Jungle);
        let mapper = ReverseTerraformMapper::new(CountingAnalyzer(std::cell::Cell::new(0)));
        let barren = mapper
            .reverse_terraform_for(&grid, &PlanetDescriptor::earth())
            .unwrap();
        assert_eq!(mapper.analyzer.0.get(), 1);
        assert_eq!(barren.classification, PlanetClassification::Oceanic);
        assert_eq!(barren.counts.get(Biome::Swamp), 16);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let grid: ClassifiedGrid = Grid::filled(0, 0, Biome::Ocean);
        let result = ReverseTerraformMapper::default()
            .reverse_terraform(&grid, &PlanetCharacteristics::of_class(PlanetClassification::Arid));
        assert!(matches!(result, Err(TerraformError::EmptyGrid)));
    }
}
