#![deny(warnings)]

//! Core domain models and invariants for Emergency Tycoon.
//!
//! This crate defines the serializable game-state records, the static
//! building/vehicle catalog and validation helpers that guard the invariants
//! shared by the persistence layer and the runtime store.

pub mod catalog;
pub mod config;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use catalog::{Catalog, CatalogEntry, VehicleType};
pub use config::{ConfigError, GameConfig};

/// Budget every new game starts with unless configured otherwise.
pub const DEFAULT_INITIAL_BUDGET: u64 = 1_000_000;

/// Emergency-service building kinds that can be placed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingTypeId {
    /// Police station.
    Police,
    /// Fire station.
    Fire,
    /// Hospital.
    Hospital,
}

impl BuildingTypeId {
    /// Every building kind, in catalog order.
    pub const ALL: [BuildingTypeId; 3] = [
        BuildingTypeId::Police,
        BuildingTypeId::Fire,
        BuildingTypeId::Hospital,
    ];

    /// Stable identifier used in saves and commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingTypeId::Police => "police",
            BuildingTypeId::Fire => "fire",
            BuildingTypeId::Hospital => "hospital",
        }
    }

    /// Glyph drawn for this building's map marker.
    pub fn marker_icon(&self) -> &'static str {
        match self {
            BuildingTypeId::Police => "\u{1F693}",
            BuildingTypeId::Fire => "\u{1F692}",
            BuildingTypeId::Hospital => "\u{1F3E5}",
        }
    }
}

impl fmt::Display for BuildingTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingTypeId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildingTypeId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::NotFound(s.to_string()))
    }
}

/// Purchasable vehicle kinds. Serialized by display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    #[serde(rename = "Police Car")]
    PoliceCar,
    #[serde(rename = "SWAT Van")]
    SwatVan,
    #[serde(rename = "Fire Truck")]
    FireTruck,
    #[serde(rename = "Ladder Truck")]
    LadderTruck,
    #[serde(rename = "Ambulance")]
    Ambulance,
    #[serde(rename = "Medical Helicopter")]
    MedicalHelicopter,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 6] = [
        VehicleKind::PoliceCar,
        VehicleKind::SwatVan,
        VehicleKind::FireTruck,
        VehicleKind::LadderTruck,
        VehicleKind::Ambulance,
        VehicleKind::MedicalHelicopter,
    ];

    /// Human-readable name, identical to the persisted form.
    pub fn name(&self) -> &'static str {
        match self {
            VehicleKind::PoliceCar => "Police Car",
            VehicleKind::SwatVan => "SWAT Van",
            VehicleKind::FireTruck => "Fire Truck",
            VehicleKind::LadderTruck => "Ladder Truck",
            VehicleKind::Ambulance => "Ambulance",
            VehicleKind::MedicalHelicopter => "Medical Helicopter",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VehicleKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::NotFound(s.to_string()))
    }
}

/// Geographic position of a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// A building placed on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingInstance {
    /// Catalog entry this building was bought from.
    #[serde(rename = "type")]
    pub kind: BuildingTypeId,
    /// Where the building stands.
    pub position: Position,
    /// Vehicle references. Purchases do not populate this list.
    #[serde(default)]
    pub vehicles: Vec<VehicleKind>,
}

impl BuildingInstance {
    pub fn new(kind: BuildingTypeId, position: Position) -> Self {
        Self {
            kind,
            position,
            vehicles: Vec::new(),
        }
    }
}

/// Lifecycle state of a purchased vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Parked at its building and available.
    #[default]
    Ready,
}

/// A purchased vehicle. Building type and position are copied from the
/// owning building rather than linked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleInstance {
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    #[serde(rename = "buildingType")]
    pub building_type: BuildingTypeId,
    pub position: Position,
    #[serde(default)]
    pub status: VehicleStatus,
}

/// The single mutable aggregate: budget plus everything bought so far.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Money left to spend.
    pub budget: u64,
    /// Buildings in placement order.
    #[serde(default)]
    pub buildings: Vec<BuildingInstance>,
    /// Vehicles in purchase order.
    #[serde(default)]
    pub vehicles: Vec<VehicleInstance>,
}

impl GameState {
    /// Fresh state with the given budget and nothing owned.
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            buildings: Vec::new(),
            vehicles: Vec::new(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_BUDGET)
    }
}

/// Catalog lookup failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// Identifier outside the known building or vehicle set.
    #[error("unknown catalog identifier: {0}")]
    NotFound(String),
    /// Vehicle exists but the building type does not sell it.
    #[error("{building} does not offer {vehicle}")]
    NotOffered {
        building: BuildingTypeId,
        vehicle: VehicleKind,
    },
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Prices must be strictly positive.
    #[error("price of {0} must be > 0")]
    NonPositivePrice(String),
    /// Speed must be finite and strictly positive.
    #[error("speed of {0} must be finite and > 0")]
    InvalidSpeed(String),
    /// Display names must not be blank.
    #[error("catalog entry for {0} has an empty name")]
    EmptyName(BuildingTypeId),
    /// A building type appears twice in the catalog.
    #[error("building type {0} defined more than once")]
    DuplicateBuildingType(BuildingTypeId),
    /// A building type is absent from the catalog.
    #[error("building type {0} missing from catalog")]
    MissingBuildingType(BuildingTypeId),
    /// A building offers the same vehicle twice.
    #[error("{building} offers {vehicle} more than once")]
    DuplicateVehicle {
        building: BuildingTypeId,
        vehicle: VehicleKind,
    },
    /// Coordinates must be finite.
    #[error("non-finite position {lat}, {lng}")]
    NonFinitePosition { lat: f64, lng: f64 },
}

/// Validate a map position.
pub fn validate_position(p: &Position) -> Result<(), ValidationError> {
    if !(p.lat.is_finite() && p.lng.is_finite()) {
        return Err(ValidationError::NonFinitePosition {
            lat: p.lat,
            lng: p.lng,
        });
    }
    Ok(())
}

/// Validate a game state loaded from an untrusted source.
pub fn validate_state(state: &GameState) -> Result<(), ValidationError> {
    for b in &state.buildings {
        validate_position(&b.position)?;
    }
    for v in &state.vehicles {
        validate_position(&v.position)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_state() -> GameState {
        let position = Position::new(40.7128, -74.006);
        GameState {
            budget: 650_000,
            buildings: vec![BuildingInstance::new(BuildingTypeId::Police, position)],
            vehicles: vec![VehicleInstance {
                kind: VehicleKind::SwatVan,
                building_type: BuildingTypeId::Police,
                position,
                status: VehicleStatus::Ready,
            }],
        }
    }

    #[test]
    fn default_state_has_starting_budget() {
        let state = GameState::default();
        assert_eq!(state.budget, 1_000_000);
        assert!(state.buildings.is_empty());
        assert!(state.vehicles.is_empty());
    }

    #[test]
    fn persisted_field_names_match_save_layout() {
        let value = serde_json::to_value(sample_state()).unwrap();
        assert_eq!(value["budget"], 650_000);
        assert_eq!(value["buildings"][0]["type"], "police");
        assert_eq!(value["buildings"][0]["position"]["lat"], 40.7128);
        assert!(value["buildings"][0]["vehicles"].as_array().unwrap().is_empty());
        assert_eq!(value["vehicles"][0]["type"], "SWAT Van");
        assert_eq!(value["vehicles"][0]["buildingType"], "police");
        assert_eq!(value["vehicles"][0]["status"], "ready");
    }

    #[test]
    fn reads_snapshot_written_by_browser_build() {
        let text = r#"{"budget":750000,"buildings":[{"type":"fire","position":{"lat":40.7,"lng":-74.0},"vehicles":[]}],"vehicles":[]}"#;
        let state: GameState = serde_json::from_str(text).unwrap();
        assert_eq!(state.budget, 750_000);
        assert_eq!(state.buildings[0].kind, BuildingTypeId::Fire);
    }

    #[test]
    fn negative_budget_is_rejected_by_decoder() {
        let text = r#"{"budget":-5,"buildings":[],"vehicles":[]}"#;
        assert!(serde_json::from_str::<GameState>(text).is_err());
    }

    #[test]
    fn building_ids_parse_case_insensitively() {
        assert_eq!("Police".parse::<BuildingTypeId>(), Ok(BuildingTypeId::Police));
        assert_eq!(" hospital ".parse::<BuildingTypeId>(), Ok(BuildingTypeId::Hospital));
        assert_eq!(
            "airport".parse::<BuildingTypeId>(),
            Err(CatalogError::NotFound("airport".into()))
        );
    }

    #[test]
    fn vehicle_kinds_parse_by_display_name() {
        assert_eq!("swat van".parse::<VehicleKind>(), Ok(VehicleKind::SwatVan));
        assert!("Tank".parse::<VehicleKind>().is_err());
        for kind in VehicleKind::ALL {
            assert_eq!(kind.name().parse::<VehicleKind>(), Ok(kind));
        }
    }

    #[test]
    fn non_finite_positions_fail_validation() {
        let mut state = sample_state();
        validate_state(&state).unwrap();
        state.vehicles[0].position.lng = f64::NAN;
        assert!(matches!(
            validate_state(&state),
            Err(ValidationError::NonFinitePosition { .. })
        ));
    }

    proptest! {
        #[test]
        fn finite_positions_validate(lat in -90.0f64..90.0, lng in -180.0f64..180.0) {
            prop_assert!(validate_position(&Position::new(lat, lng)).is_ok());
        }
    }
}
