//! Game configuration loaded from YAML.

use crate::DEFAULT_INITIAL_BUDGET;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Key the browser build stored its snapshot under.
pub const DEFAULT_STORAGE_KEY: &str = "911SimulatorState";

/// Settings for a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Budget of a brand-new game (> 0).
    pub initial_budget: u64,
    /// Key the snapshot is saved under.
    pub storage_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_budget: DEFAULT_INITIAL_BUDGET,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("config validation error: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl GameConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading game config");
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_budget == 0 {
            return Err(ConfigError::Invalid(
                "initial_budget must be greater than zero".into(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_browser_build() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.initial_budget, 1_000_000);
        assert_eq!(cfg.storage_key, "911SimulatorState");
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = GameConfig::from_yaml_str("initial_budget: 500000\n").unwrap();
        assert_eq!(cfg.initial_budget, 500_000);
        assert_eq!(cfg.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn zero_budget_is_invalid() {
        let err = GameConfig::from_yaml_str("initial_budget: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = GameConfig::from_yaml_str("initial_budget: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load_from_path(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.yaml");
        fs::write(&path, "storage_key: slot-2\n").unwrap();
        let cfg = GameConfig::load_from_path(&path).unwrap();
        assert_eq!(cfg.storage_key, "slot-2");
        assert_eq!(cfg.initial_budget, DEFAULT_INITIAL_BUDGET);
    }
}
