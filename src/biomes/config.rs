//! Terrain classifier configuration.

use serde::{Deserialize, Serialize};

use super::Biome;

/// Configuration for [`super::TerrainClassifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Biome used for unmapped terrain codes and cells with no source plot.
    pub default_biome: Biome,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_biome: Biome::Rocky,
        }
    }
}
