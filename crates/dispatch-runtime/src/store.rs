//! Game State Store: the only place the game state is mutated.

use dispatch_core::{
    validate_position, BuildingInstance, BuildingTypeId, Catalog, CatalogError, GameConfig,
    GameState, Position, ValidationError, VehicleInstance, VehicleKind, VehicleStatus,
};
use persistence::{KeyValueStore, PersistenceAdapter};
use thiserror::Error;
use tracing::{info, warn};

/// Reasons a store mutation is rejected. State is unchanged in every case.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreOpError {
    /// Price exceeds the remaining budget.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// No building of that type stands at that position.
    #[error("no {building} building at {position}")]
    UnknownBuilding {
        building: BuildingTypeId,
        position: Position,
    },
    #[error("invalid position: {0}")]
    InvalidPosition(ValidationError),
}

/// Outcome of a committed purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Amount deducted from the budget.
    pub spent: u64,
    /// Budget after the purchase.
    pub remaining: u64,
    /// Whether the snapshot write succeeded. The purchase stands either way.
    pub persisted: bool,
}

/// Owns the [`GameState`] and saves it after every committed mutation.
#[derive(Debug)]
pub struct GameStore<S> {
    catalog: Catalog,
    state: GameState,
    persistence: PersistenceAdapter<S>,
}

impl<S: KeyValueStore> GameStore<S> {
    /// Resume the saved game, or start a fresh one per `config`.
    pub fn open(catalog: Catalog, persistence: PersistenceAdapter<S>, config: &GameConfig) -> Self {
        let state = persistence.load_or_default(config);
        info!(
            budget = state.budget,
            buildings = state.buildings.len(),
            vehicles = state.vehicles.len(),
            "game state ready"
        );
        Self::from_state(catalog, persistence, state)
    }

    /// Wrap an existing state without touching storage.
    pub fn from_state(
        catalog: Catalog,
        persistence: PersistenceAdapter<S>,
        state: GameState,
    ) -> Self {
        Self {
            catalog,
            state,
            persistence,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn budget(&self) -> u64 {
        self.state.budget
    }

    pub fn buildings(&self) -> &[BuildingInstance] {
        &self.state.buildings
    }

    pub fn vehicles(&self) -> &[VehicleInstance] {
        &self.state.vehicles
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Catalog value of everything owned, saturating at `u64::MAX`. Records
    /// the catalog no longer prices count as zero.
    pub fn total_spent(&self) -> u64 {
        let buildings = self
            .state
            .buildings
            .iter()
            .filter_map(|b| self.catalog.lookup(b.kind).ok())
            .map(|e| e.price);
        let vehicles = self
            .state
            .vehicles
            .iter()
            .filter_map(|v| self.catalog.vehicle(v.building_type, v.kind).ok())
            .map(|v| v.price);
        buildings
            .chain(vehicles)
            .fold(0u64, |acc, price| acc.saturating_add(price))
    }

    /// Budget the game started with: what is left plus what was spent.
    /// `None` when a loaded save holds more than `u64::MAX` in total.
    pub fn initial_budget(&self) -> Option<u64> {
        self.state.budget.checked_add(self.total_spent())
    }

    /// Buy a building of type `kind` and place it at `position`.
    pub fn place_building(
        &mut self,
        kind: BuildingTypeId,
        position: Position,
    ) -> Result<Receipt, StoreOpError> {
        validate_position(&position).map_err(StoreOpError::InvalidPosition)?;
        let price = self.catalog.lookup(kind)?.price;
        self.charge(price)?;
        self.state
            .buildings
            .push(BuildingInstance::new(kind, position));
        info!(%kind, %position, price, budget = self.state.budget, "building placed");
        Ok(self.commit(price))
    }

    /// Buy `vehicle` for the `building_type` building standing at `position`.
    ///
    /// The building must exist and its type must offer the vehicle; the
    /// price comes from the catalog.
    pub fn purchase_vehicle(
        &mut self,
        building_type: BuildingTypeId,
        position: Position,
        vehicle: VehicleKind,
    ) -> Result<Receipt, StoreOpError> {
        let price = self.catalog.vehicle(building_type, vehicle)?.price;
        let exists = self
            .state
            .buildings
            .iter()
            .any(|b| b.kind == building_type && b.position == position);
        if !exists {
            return Err(StoreOpError::UnknownBuilding {
                building: building_type,
                position,
            });
        }
        self.charge(price)?;
        self.state.vehicles.push(VehicleInstance {
            kind: vehicle,
            building_type,
            position,
            status: VehicleStatus::Ready,
        });
        info!(%vehicle, %building_type, %position, price, budget = self.state.budget, "vehicle purchased");
        Ok(self.commit(price))
    }

    fn charge(&mut self, price: u64) -> Result<(), StoreOpError> {
        let available = self.state.budget;
        self.state.budget = available
            .checked_sub(price)
            .ok_or(StoreOpError::InsufficientFunds {
                needed: price,
                available,
            })?;
        Ok(())
    }

    fn commit(&mut self, spent: u64) -> Receipt {
        let persisted = match self.persistence.save(&self.state) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "game state not saved");
                false
            }
        };
        Receipt {
            spent,
            remaining: self.state.budget,
            persisted,
        }
    }
}
