//! Static building and vehicle price list.

use crate::{BuildingTypeId, CatalogError, ValidationError, VehicleKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A vehicle a building can buy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleType {
    pub kind: VehicleKind,
    /// Purchase price (> 0).
    pub price: u64,
    /// Top speed in km/h. Shown to the player only.
    pub speed_kmh: f32,
}

/// One purchasable building type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: BuildingTypeId,
    /// Display name, e.g. "Police Station".
    pub name: String,
    /// Purchase price (> 0).
    pub price: u64,
    /// Vehicles offered, in display order.
    pub vehicles: Vec<VehicleType>,
}

impl CatalogEntry {
    /// Find a vehicle offered by this building.
    pub fn vehicle(&self, kind: VehicleKind) -> Option<&VehicleType> {
        self.vehicles.iter().find(|v| v.kind == kind)
    }
}

/// Read-only catalog shared by the store and the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from custom entries, enforcing [`validate_catalog`].
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ValidationError> {
        validate_catalog(&entries)?;
        Ok(Self { entries })
    }

    /// The stock price list.
    pub fn standard() -> Self {
        Self {
            entries: standard_entries(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up a building type.
    pub fn lookup(&self, id: BuildingTypeId) -> Result<&CatalogEntry, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Look up a building type by its textual identifier.
    pub fn lookup_str(&self, id: &str) -> Result<&CatalogEntry, CatalogError> {
        self.lookup(id.parse()?)
    }

    /// Look up a vehicle as sold by a particular building type.
    pub fn vehicle(
        &self,
        building: BuildingTypeId,
        kind: VehicleKind,
    ) -> Result<&VehicleType, CatalogError> {
        self.lookup(building)?
            .vehicle(kind)
            .ok_or(CatalogError::NotOffered {
                building,
                vehicle: kind,
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn vehicle(kind: VehicleKind, price: u64, speed_kmh: f32) -> VehicleType {
    VehicleType {
        kind,
        price,
        speed_kmh,
    }
}

fn standard_entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            id: BuildingTypeId::Police,
            name: "Police Station".to_string(),
            price: 250_000,
            vehicles: vec![
                vehicle(VehicleKind::PoliceCar, 50_000, 120.0),
                vehicle(VehicleKind::SwatVan, 100_000, 90.0),
            ],
        },
        CatalogEntry {
            id: BuildingTypeId::Fire,
            name: "Fire Station".to_string(),
            price: 300_000,
            vehicles: vec![
                vehicle(VehicleKind::FireTruck, 75_000, 80.0),
                vehicle(VehicleKind::LadderTruck, 120_000, 70.0),
            ],
        },
        CatalogEntry {
            id: BuildingTypeId::Hospital,
            name: "Hospital".to_string(),
            price: 400_000,
            vehicles: vec![
                vehicle(VehicleKind::Ambulance, 60_000, 100.0),
                vehicle(VehicleKind::MedicalHelicopter, 200_000, 250.0),
            ],
        },
    ]
}

/// Validate catalog entries: positive prices and speeds, unique names, and
/// every building type present exactly once.
pub fn validate_catalog(entries: &[CatalogEntry]) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<BuildingTypeId> = BTreeSet::new();
    for e in entries {
        if !seen.insert(e.id) {
            return Err(ValidationError::DuplicateBuildingType(e.id));
        }
        if e.name.trim().is_empty() {
            return Err(ValidationError::EmptyName(e.id));
        }
        if e.price == 0 {
            return Err(ValidationError::NonPositivePrice(e.id.to_string()));
        }
        let mut offered: BTreeSet<VehicleKind> = BTreeSet::new();
        for v in &e.vehicles {
            if !offered.insert(v.kind) {
                return Err(ValidationError::DuplicateVehicle {
                    building: e.id,
                    vehicle: v.kind,
                });
            }
            if v.price == 0 {
                return Err(ValidationError::NonPositivePrice(v.kind.to_string()));
            }
            if !v.speed_kmh.is_finite() || v.speed_kmh <= 0.0 {
                return Err(ValidationError::InvalidSpeed(v.kind.to_string()));
            }
        }
    }
    for id in BuildingTypeId::ALL {
        if !seen.contains(&id) {
            return Err(ValidationError::MissingBuildingType(id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        validate_catalog(Catalog::standard().entries()).unwrap();
    }

    #[test]
    fn lookup_returns_prices() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.lookup(BuildingTypeId::Police).unwrap().price, 250_000);
        assert_eq!(catalog.lookup(BuildingTypeId::Fire).unwrap().price, 300_000);
        let hospital = catalog.lookup_str("hospital").unwrap();
        assert_eq!(hospital.name, "Hospital");
        assert_eq!(hospital.price, 400_000);
    }

    #[test]
    fn lookup_unknown_identifier_is_not_found() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.lookup_str("bakery"),
            Err(CatalogError::NotFound("bakery".into()))
        );
    }

    #[test]
    fn vehicles_keep_display_order() {
        let catalog = Catalog::standard();
        let kinds: Vec<_> = catalog
            .lookup(BuildingTypeId::Hospital)
            .unwrap()
            .vehicles
            .iter()
            .map(|v| v.kind)
            .collect();
        assert_eq!(kinds, vec![VehicleKind::Ambulance, VehicleKind::MedicalHelicopter]);
    }

    #[test]
    fn vehicle_lookup_checks_offering() {
        let catalog = Catalog::standard();
        let van = catalog
            .vehicle(BuildingTypeId::Police, VehicleKind::SwatVan)
            .unwrap();
        assert_eq!(van.price, 100_000);
        assert_eq!(van.speed_kmh, 90.0);
        assert_eq!(
            catalog.vehicle(BuildingTypeId::Fire, VehicleKind::SwatVan),
            Err(CatalogError::NotOffered {
                building: BuildingTypeId::Fire,
                vehicle: VehicleKind::SwatVan,
            })
        );
    }

    #[test]
    fn rejects_incomplete_or_broken_catalogs() {
        let mut entries = standard_entries();
        entries.pop();
        assert_eq!(
            Catalog::new(entries).unwrap_err(),
            ValidationError::MissingBuildingType(BuildingTypeId::Hospital)
        );

        let mut entries = standard_entries();
        entries[0].vehicles[1].price = 0;
        assert!(matches!(
            validate_catalog(&entries),
            Err(ValidationError::NonPositivePrice(_))
        ));

        let mut entries = standard_entries();
        entries[1].vehicles[0].speed_kmh = f32::NAN;
        assert!(matches!(
            validate_catalog(&entries),
            Err(ValidationError::InvalidSpeed(_))
        ));

        let mut entries = standard_entries();
        let dup = entries[2].clone();
        entries.push(dup);
        assert_eq!(
            validate_catalog(&entries),
            Err(ValidationError::DuplicateBuildingType(BuildingTypeId::Hospital))
        );
    }
}
