//! Game configuration
//!
//! Read from a JSON file; every field is optional and falls back to its
//! default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Runtime configuration for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Play field ===
    /// Field width in world units
    pub width: f32,
    /// Field height in world units (below the score bar)
    pub height: f32,

    // === Loop ===
    /// Time between ticks when running in real time
    pub tick_interval_ms: u64,
    /// Headless runs stop after this many ticks
    pub max_ticks: u64,
    /// Let the loop steer the paddle itself
    pub autopilot: bool,

    // === Generated stages ===
    /// Seed used when no stage file is given
    pub seed: u64,
    pub generated_rows: usize,
    pub generated_cols: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,

            tick_interval_ms: TICK_INTERVAL_MS,
            max_ticks: DEFAULT_MAX_TICKS,
            autopilot: true,

            seed: 42,
            generated_rows: 6,
            generated_cols: 10,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid("field dimensions must be positive"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick interval must be non-zero"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
