//! Text stand-ins for the map widget and the building modal.

use dispatch_core::{BuildingTypeId, CatalogEntry, Position};
use dispatch_runtime::{DisplaySurface, MapSurface, Notice};
use tracing::debug;

#[derive(Debug, Default)]
pub struct ConsoleMap {
    armed: bool,
}

impl MapSurface for ConsoleMap {
    fn arm_surface_click(&mut self) {
        self.armed = true;
        println!("click the map to place the building");
    }

    fn disarm_surface_click(&mut self) {
        if self.armed {
            debug!("surface click disarmed");
        }
        self.armed = false;
    }

    fn place_marker(&mut self, kind: BuildingTypeId, position: Position, icon: &str) {
        self.armed = false;
        println!("[map] {icon} {kind} at {position}");
    }
}

#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl DisplaySurface for ConsoleDisplay {
    fn show_budget(&mut self, budget: u64) {
        println!("budget: ${budget}");
    }

    fn show_offerings(&mut self, entry: &CatalogEntry, position: Position, budget: u64) {
        println!("== {} at {position} (budget ${budget}) ==", entry.name);
        for v in &entry.vehicles {
            println!("  {:<20} ${:>8}  {} km/h", v.kind.name(), v.price, v.speed_kmh);
        }
    }

    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::InsufficientFunds { needed, available } => {
                println!("insufficient funds: need ${needed}, have ${available}")
            }
            Notice::BuildingPlaced { kind, position } => println!("placed {kind} at {position}"),
            Notice::VehiclePurchased { kind } => println!("successfully purchased {kind}!"),
            Notice::Rejected(reason) => println!("rejected: {reason}"),
            Notice::SaveFailed => println!("warning: progress could not be saved"),
        }
    }
}
