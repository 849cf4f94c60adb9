//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Stable iteration order (registration order per category)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod line;
pub mod state;
pub mod tick;
pub mod vector;
pub mod world;

pub use collision::{
    CollisionResult, ball_boundary_collision, ball_line_collision, ball_rect_collision,
    bounce_velocity,
};
pub use line::Line2D;
pub use state::{
    Ball, Block, BlockKind, Category, Entity, EntityId, GameEvent, GamePhase, Paddle, Rect, Wall,
    WallKind,
};
pub use tick::{Simulation, TickInput, autopilot_input, build_world};
pub use vector::VectorExt;
pub use world::World;
