//! Target-body description and planet classification.

use serde::{Deserialize, Serialize};

/// Hydrosphere regime of a planet, used to pick reverse-terraform tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetClassification {
    Oceanic,
    Temperate,
    Arid,
    IceWorld,
    Default,
}

impl PlanetClassification {
    pub const ALL: [PlanetClassification; 5] = [
        PlanetClassification::Oceanic,
        PlanetClassification::Temperate,
        PlanetClassification::Arid,
        PlanetClassification::IceWorld,
        PlanetClassification::Default,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlanetClassification::Oceanic => "oceanic",
            PlanetClassification::Temperate => "temperate",
            PlanetClassification::Arid => "arid",
            PlanetClassification::IceWorld => "ice_world",
            PlanetClassification::Default => "default",
        }
    }

    /// Classes whose barren baseline can still hold surface water.
    pub fn retains_surface_water(self) -> bool {
        matches!(
            self,
            PlanetClassification::Oceanic
                | PlanetClassification::Temperate
                | PlanetClassification::Default
        )
    }
}

/// Freezing point of water in kelvin.
const FREEZING_K: f32 = 273.0;

/// Physical description of the body a map is being ingested for.
///
/// Classification is derived from these signals, never from the name. The
/// name is only used to recognize Earth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetDescriptor {
    pub name: String,
    /// Explicit classification, overriding every other signal.
    #[serde(default)]
    pub classification: Option<PlanetClassification>,
    /// Declared body category, e.g. `ice_world` or `terrestrial_planet`.
    #[serde(default)]
    pub body_category: Option<String>,
    #[serde(default)]
    pub surface_temperature_k: Option<f32>,
    /// Atmospheric constituents by name, e.g. `water_vapor`.
    #[serde(default)]
    pub atmosphere: Vec<String>,
    /// Named surface water bodies.
    #[serde(default)]
    pub water_bodies: Vec<String>,
}

impl PlanetDescriptor {
    /// Creates a descriptor with only a name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Earth with oceans and a water-bearing atmosphere.
    pub fn earth() -> Self {
        Self {
            name: "Earth".to_string(),
            body_category: Some("terrestrial_planet".to_string()),
            surface_temperature_k: Some(288.0),
            atmosphere: vec!["nitrogen".into(), "oxygen".into(), "water_vapor".into()],
            water_bodies: vec!["Pacific Ocean".into(), "Atlantic Ocean".into()],
            ..Default::default()
        }
    }

    /// A cold, dry, thin-atmosphere world.
    pub fn mars() -> Self {
        Self {
            name: "Mars".to_string(),
            body_category: Some("terrestrial_planet".to_string()),
            surface_temperature_k: Some(210.0),
            atmosphere: vec!["carbon_dioxide".into(), "nitrogen".into(), "argon".into()],
            ..Default::default()
        }
    }

    pub fn has_water_vapor(&self) -> bool {
        self.atmosphere
            .iter()
            .any(|gas| gas.eq_ignore_ascii_case("water_vapor") || gas.eq_ignore_ascii_case("h2o"))
    }

    pub fn has_surface_water(&self) -> bool {
        !self.water_bodies.is_empty()
    }

    /// True for the one body that takes the full-habitability merge path.
    pub fn is_earth(&self) -> bool {
        self.name.to_ascii_lowercase().contains("earth")
    }

    /// Derives the planet classification.
    ///
    /// Priority: explicit override, then ice world (declared, or below
    /// freezing without surface water), then arid (no vapor and no surface
    /// water), then oceanic (both), otherwise temperate.
    pub fn classify(&self) -> PlanetClassification {
        if let Some(explicit) = self.classification {
            return explicit;
        }
        let vapor = self.has_water_vapor();
        let surface = self.has_surface_water();
        let very_cold = self.surface_temperature_k.is_some_and(|t| t < FREEZING_K);
        let declared_ice = self
            .body_category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("ice_world"));

        if declared_ice || (very_cold && !surface) {
            PlanetClassification::IceWorld
        } else if !vapor && !surface {
            PlanetClassification::Arid
        } else if vapor && surface {
            PlanetClassification::Oceanic
        } else {
            PlanetClassification::Temperate
        }
    }

    pub fn characteristics(&self) -> PlanetCharacteristics {
        PlanetCharacteristics {
            classification: self.classify(),
            surface_temperature_k: self.surface_temperature_k,
            has_water_vapor: self.has_water_vapor(),
            has_surface_water: self.has_surface_water(),
        }
    }
}

/// Planet signals handed to the hydrosphere analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetCharacteristics {
    pub classification: PlanetClassification,
    pub surface_temperature_k: Option<f32>,
    pub has_water_vapor: bool,
    pub has_surface_water: bool,
}

impl PlanetCharacteristics {
    /// Characteristics carrying only a classification.
    pub fn of_class(classification: PlanetClassification) -> Self {
        Self {
            classification,
            surface_temperature_k: None,
            has_water_vapor: false,
            has_surface_water: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_is_oceanic() {
        let earth = PlanetDescriptor::earth();
        assert!(earth.is_earth());
        assert_eq!(earth.classify(), PlanetClassification::Oceanic);
    }

    #[test]
    fn cold_dry_world_is_ice_world() {
        // Very cold without surface water wins over the arid rule.
        assert_eq!(PlanetDescriptor::mars().classify(), PlanetClassification::IceWorld);
    }

    #[test]
    fn warm_dry_world_is_arid() {
        let mut p = PlanetDescriptor::mars();
        p.surface_temperature_k = Some(300.0);
        assert_eq!(p.classify(), PlanetClassification::Arid);
    }

    #[test]
    fn partial_water_signals_are_temperate() {
        let p = PlanetDescriptor {
            name: "Kepler".into(),
            atmosphere: vec!["water_vapor".into()],
            ..Default::default()
        };
        assert_eq!(p.classify(), PlanetClassification::Temperate);
    }

    #[test]
    fn declared_category_and_override_take_priority() {
        let mut p = PlanetDescriptor::earth();
        p.body_category = Some("ice_world".into());
        assert_eq!(p.classify(), PlanetClassification::IceWorld);

        p.classification = Some(PlanetClassification::Arid);
        assert_eq!(p.classify(), PlanetClassification::Arid);
    }

    #[test]
    fn classification_ignores_name() {
        let p = PlanetDescriptor::named("Earth-like Ice Moon");
        assert!(p.is_earth());
        assert_eq!(p.classify(), PlanetClassification::Arid);
    }

    #[test]
    fn descriptor_deserializes_with_defaults() {
        let json = r#"{"name": "Europa", "body_category": "ice_world"}"#;
        let p: PlanetDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(p.classify(), PlanetClassification::IceWorld);
        assert!(p.atmosphere.is_empty());

        let json = r#"{"name": "Titan", "classification": "oceanic"}"#;
        let p: PlanetDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(p.classify(), PlanetClassification::Oceanic);
    }
}
