//! Placement/purchase orchestrator.
//!
//! Turns discrete UI events (building selected, map clicked, marker clicked,
//! vehicle bought) into store mutations. Placement takes two events: a
//! selection arms the map for one click, and that click commits the
//! building. Purchases commit immediately.

use crate::store::{GameStore, Receipt, StoreOpError};
use dispatch_core::{BuildingTypeId, CatalogEntry, Position, VehicleKind};
use persistence::KeyValueStore;
use tracing::debug;

/// Map widget capabilities the orchestrator drives.
pub trait MapSurface {
    /// Deliver the next surface click to [`Orchestrator::handle_surface_click`].
    fn arm_surface_click(&mut self);
    /// Stop waiting for a surface click.
    fn disarm_surface_click(&mut self);
    /// Draw a building marker. Clicking it should reach
    /// [`Orchestrator::open_building`].
    fn place_marker(&mut self, kind: BuildingTypeId, position: Position, icon: &str);
}

/// User-facing messages.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    InsufficientFunds { needed: u64, available: u64 },
    BuildingPlaced { kind: BuildingTypeId, position: Position },
    VehiclePurchased { kind: VehicleKind },
    /// Request rejected for a reason other than funds.
    Rejected(String),
    /// Purchase committed but the save failed.
    SaveFailed,
}

/// Modal/HUD capabilities the orchestrator drives.
pub trait DisplaySurface {
    fn show_budget(&mut self, budget: u64);
    /// Show what a placed building can buy.
    fn show_offerings(&mut self, entry: &CatalogEntry, position: Position, budget: u64);
    fn notify(&mut self, notice: Notice);
}

/// Placement interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlacementState {
    #[default]
    Idle,
    AwaitingPlacementClick { kind: BuildingTypeId, price: u64 },
}

pub struct Orchestrator<S, M, D> {
    store: GameStore<S>,
    map: M,
    display: D,
    placement: PlacementState,
}

impl<S, M, D> Orchestrator<S, M, D>
where
    S: KeyValueStore,
    M: MapSurface,
    D: DisplaySurface,
{
    pub fn new(store: GameStore<S>, map: M, display: D) -> Self {
        Self {
            store,
            map,
            display,
            placement: PlacementState::Idle,
        }
    }

    pub fn store(&self) -> &GameStore<S> {
        &self.store
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn placement(&self) -> PlacementState {
        self.placement
    }

    /// Redraw markers for every saved building and show the budget.
    pub fn restore(&mut self) {
        for b in self.store.buildings() {
            self.map
                .place_marker(b.kind, b.position, b.kind.marker_icon());
        }
        self.display.show_budget(self.store.budget());
    }

    /// The player picked a building type to place. A pending selection is
    /// replaced.
    pub fn select_building(&mut self, kind: BuildingTypeId) -> Result<(), StoreOpError> {
        let price = match self.store.catalog().lookup(kind) {
            Ok(entry) => entry.price,
            Err(err) => {
                self.display.notify(Notice::Rejected(err.to_string()));
                return Err(err.into());
            }
        };
        let available = self.store.budget();
        if available < price {
            self.display.notify(Notice::InsufficientFunds {
                needed: price,
                available,
            });
            return Err(StoreOpError::InsufficientFunds {
                needed: price,
                available,
            });
        }
        match self.placement {
            PlacementState::Idle => self.map.arm_surface_click(),
            PlacementState::AwaitingPlacementClick { kind: pending, .. } => {
                debug!(%pending, %kind, "replacing pending placement");
            }
        }
        self.placement = PlacementState::AwaitingPlacementClick { kind, price };
        debug!(%kind, price, "awaiting placement click");
        Ok(())
    }

    /// Drop a pending selection. Returns whether one was pending.
    pub fn cancel_placement(&mut self) -> bool {
        match std::mem::take(&mut self.placement) {
            PlacementState::Idle => false,
            PlacementState::AwaitingPlacementClick { kind, .. } => {
                self.map.disarm_surface_click();
                debug!(%kind, "placement cancelled");
                true
            }
        }
    }

    /// A click on the bare map. Commits a pending placement; ignored when
    /// idle. The orchestrator is idle afterwards whatever the outcome.
    pub fn handle_surface_click(
        &mut self,
        position: Position,
    ) -> Option<Result<Receipt, StoreOpError>> {
        let PlacementState::AwaitingPlacementClick { kind, .. } =
            std::mem::take(&mut self.placement)
        else {
            debug!(%position, "surface click ignored");
            return None;
        };
        let result = self.store.place_building(kind, position);
        match &result {
            Ok(receipt) => {
                self.map.place_marker(kind, position, kind.marker_icon());
                self.display.show_budget(receipt.remaining);
                self.display
                    .notify(Notice::BuildingPlaced { kind, position });
                if !receipt.persisted {
                    self.display.notify(Notice::SaveFailed);
                }
            }
            Err(err) => self.report(err),
        }
        Some(result)
    }

    /// A click on a building marker: show its vehicle offerings.
    pub fn open_building(
        &mut self,
        kind: BuildingTypeId,
        position: Position,
    ) -> Result<(), StoreOpError> {
        let entry = self.store.catalog().lookup(kind)?;
        self.display
            .show_offerings(entry, position, self.store.budget());
        Ok(())
    }

    /// Buy a vehicle for the building at `position`.
    pub fn purchase(
        &mut self,
        building: BuildingTypeId,
        position: Position,
        vehicle: VehicleKind,
    ) -> Result<Receipt, StoreOpError> {
        let result = self.store.purchase_vehicle(building, position, vehicle);
        match &result {
            Ok(receipt) => {
                self.display.show_budget(receipt.remaining);
                self.display
                    .notify(Notice::VehiclePurchased { kind: vehicle });
                if !receipt.persisted {
                    self.display.notify(Notice::SaveFailed);
                }
            }
            Err(err) => self.report(err),
        }
        result
    }

    fn report(&mut self, err: &StoreOpError) {
        let notice = match err {
            StoreOpError::InsufficientFunds { needed, available } => Notice::InsufficientFunds {
                needed: *needed,
                available: *available,
            },
            other => Notice::Rejected(other.to_string()),
        };
        self.display.notify(notice);
    }
}
