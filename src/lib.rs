//! Brick Breaker - a single-ball brick breaker simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vectors, collisions, entities, tick loop)
//! - `stage`: Stage blueprints, file parsing and seeded generation
//! - `render`: Rendering surface interface and world-to-surface sync
//! - `config`: Runtime configuration

pub mod config;
pub mod error;
pub mod render;
pub mod sim;
pub mod stage;

pub use config::GameConfig;
pub use error::{ConfigError, StageError};
pub use stage::{BlockCatalog, Stage};

/// Game configuration constants
pub mod consts {
    /// Default play field size (a 1280x720 window minus the score bar)
    pub const DEFAULT_FIELD_WIDTH: f32 = 1280.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 648.0;

    /// Tick interval for real-time runs
    pub const TICK_INTERVAL_MS: u64 = 10;
    /// Safety cap for headless runs
    pub const DEFAULT_MAX_TICKS: u64 = 500_000;

    /// Gap between the field's top-left corner and the block grid
    pub const BLOCK_MARGIN: f32 = 2.0;
    /// Hits a hard block takes
    pub const HARD_BLOCK_DURABILITY: i32 = 2;
    /// Scale applied by the extend/shorten and speed-up/slow-down blocks
    pub const EFFECT_FACTOR: f32 = 1.5;
}
