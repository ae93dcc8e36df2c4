#![deny(warnings)]

//! Persistence layer: key-value stores and game-state snapshots.
//!
//! A snapshot is the whole [`GameState`] serialized as one JSON blob under a
//! fixed key. Every save fully overwrites the previous blob.

mod file_store;

pub use file_store::FileStore;

use dispatch_core::{validate_state, GameConfig, GameState};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by a backing key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The store refused the write (quota, read-only medium, ...).
    #[error("store rejected write: {0}")]
    Rejected(String),
    /// The key cannot be stored by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Snapshot load/save failures.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The stored blob could not be decoded into a valid game state.
    #[error("corrupt saved state: {0}")]
    CorruptState(String),
    /// The snapshot could not be written.
    #[error("failed to write saved state: {0}")]
    WriteError(String),
    /// The store could not be read.
    #[error("failed to read saved state: {0}")]
    Read(String),
}

/// Minimal string key-value storage, modelled on browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Volatile store used by tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves [`GameState`] snapshots under a fixed key.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Adapter using the configured storage key.
    pub fn with_config(store: S, config: &GameConfig) -> Self {
        Self::new(store, config.storage_key.clone())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the saved snapshot. `Ok(None)` when nothing was saved yet.
    pub fn load(&self) -> Result<Option<GameState>, PersistenceError> {
        let Some(text) = self
            .store
            .get(&self.key)
            .map_err(|e| PersistenceError::Read(e.to_string()))?
        else {
            debug!(key = %self.key, "no saved state");
            return Ok(None);
        };
        let state: GameState = serde_json::from_str(&text)
            .map_err(|e| PersistenceError::CorruptState(e.to_string()))?;
        validate_state(&state).map_err(|e| PersistenceError::CorruptState(e.to_string()))?;
        debug!(
            key = %self.key,
            budget = state.budget,
            buildings = state.buildings.len(),
            vehicles = state.vehicles.len(),
            "loaded saved state"
        );
        Ok(Some(state))
    }

    /// Read the saved snapshot, falling back to a fresh game when it is
    /// missing, unreadable or corrupt.
    pub fn load_or_default(&self, config: &GameConfig) -> GameState {
        match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => GameState::new(config.initial_budget),
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding saved state, starting fresh");
                GameState::new(config.initial_budget)
            }
        }
    }

    /// Overwrite the snapshot with `state`.
    pub fn save(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(state)
            .map_err(|e| PersistenceError::WriteError(e.to_string()))?;
        self.store
            .set(&self.key, &text)
            .map_err(|e| PersistenceError::WriteError(e.to_string()))?;
        debug!(key = %self.key, bytes = text.len(), "saved state");
        Ok(())
    }
}
