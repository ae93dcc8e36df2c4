#![deny(warnings)]

//! Game runtime: the state store and the interaction orchestrator.
//!
//! Everything here is synchronous and single-threaded. Map and modal
//! rendering are reached only through [`MapSurface`] and [`DisplaySurface`],
//! so the whole flow runs headless.

pub mod orchestrator;
pub mod store;

pub use orchestrator::{DisplaySurface, MapSurface, Notice, Orchestrator, PlacementState};
pub use store::{GameStore, Receipt, StoreOpError};
