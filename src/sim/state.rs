//! Entity types and core simulation state
//!
//! Every live object in a game is one of the [`Entity`] variants below and is
//! owned by the [`World`](super::world::World) registry.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::collision::bounce_velocity;
use super::line::Line2D;
use crate::consts::*;

new_key_type! {
    /// Stable handle of an entity inside the world
    pub struct EntityId;
}

/// Current phase of the simulation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World built, loop not yet running
    NotStarted,
    /// Ticking
    Running,
    /// Every block destroyed
    Cleared,
    /// Every ball lost
    Over,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Cleared | GamePhase::Over)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not started",
            GamePhase::Running => "running",
            GamePhase::Cleared => "cleared",
            GamePhase::Over => "over",
        }
    }
}

/// Registry groupings. An entity is listed under each category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Every entity; drives the per-tick update sweep
    GameObject,
    Wall,
    /// The floor wall that swallows balls
    Bottom,
    Ball,
    /// Paddle and blocks, everything a ball can bounce off as a box
    Rectangle,
    Paddle,
    Block,
}

impl Category {
    pub const COUNT: usize = 7;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Wall behaviour on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    /// Bounces the ball back into the field
    Side,
    /// Destroys the ball
    Bottom,
}

/// A static boundary of the play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub line: Line2D,
    pub kind: WallKind,
}

impl Wall {
    pub fn new(anchor: Vec2, direction: Vec2) -> Self {
        Self {
            line: Line2D::new(anchor, direction),
            kind: WallKind::Side,
        }
    }

    /// The floor `y = height`. Its outside (`direction.normal()`) is `+y`,
    /// below the field.
    pub fn bottom(height: f32) -> Self {
        Self {
            line: Line2D::new(Vec2::new(0.0, height), Vec2::X),
            kind: WallKind::Bottom,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub center: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// False while the ball rides on the paddle waiting for launch
    pub released: bool,
}

impl Ball {
    /// A held ball
    pub fn new(center: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            center,
            velocity,
            radius,
            released: false,
        }
    }

    /// A ball already in flight
    pub fn in_flight(center: Vec2, radius: f32, velocity: Vec2) -> Self {
        Self {
            released: true,
            ..Self::new(center, radius, velocity)
        }
    }

    /// Launch the ball; it takes its first step immediately
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.move_by(self.velocity);
    }

    #[inline]
    pub fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Elastic bounce off a surface, see [`bounce_velocity`] for the sign
    /// convention of `direction`.
    pub fn bounce(&mut self, direction: Vec2) {
        self.velocity = bounce_velocity(self.velocity, direction);
    }

    pub fn scale_speed(&mut self, factor: f32) {
        self.velocity *= factor;
    }
}

/// Axis-aligned box shared by the paddle and the blocks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
    /// Set while a ball overlaps this box so the hit fires only once
    #[serde(default)]
    pub in_contact: bool,
}

impl Rect {
    pub fn new(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            center,
            half_width,
            half_height,
            in_contact: false,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }

    #[inline]
    pub fn left_edge_x(&self) -> f32 {
        self.center.x - self.half_width
    }

    #[inline]
    pub fn right_edge_x(&self) -> f32 {
        self.center.x + self.half_width
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal distance covered per tick while steered
    pub speed: f32,
    /// -1 left, 0 idle, 1 right. Cleared after every tick.
    pub direction: i8,
}

impl Paddle {
    pub fn new(center: Vec2, half_width: f32, half_height: f32, speed: f32) -> Self {
        Self {
            rect: Rect::new(center, half_width, half_height),
            speed,
            direction: 0,
        }
    }

    /// Request movement for the current tick
    pub fn steer(&mut self, direction: i8) {
        self.direction = direction.signum();
    }

    /// Apply this tick's movement inside `[0, field_width]` and return the
    /// displacement. A move starting at or beyond a field edge toward that
    /// edge is dropped entirely.
    pub fn step(&mut self, field_width: f32) -> Vec2 {
        let delta = Vec2::new(f32::from(self.direction) * self.speed, 0.0);
        self.direction = 0;

        let right_most = self.rect.right_edge_x() >= field_width && delta.x >= 0.0;
        let left_most = self.rect.left_edge_x() <= 0.0 && delta.x <= 0.0;
        if right_most || left_most {
            return Vec2::ZERO;
        }
        self.rect.center += delta;
        delta
    }
}

/// Block types. Each kind is the effect strategy of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Basic,
    /// Takes two hits, cracks on the first
    Hard,
    /// Spawns a mirrored ball
    Split,
    /// Widens the paddle
    Extend,
    /// Narrows the paddle
    Shorten,
    /// Speeds the ball up
    SpeedUp,
    /// Slows the ball down
    SlowDown,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Basic,
        BlockKind::Hard,
        BlockKind::Split,
        BlockKind::Extend,
        BlockKind::Shorten,
        BlockKind::SpeedUp,
        BlockKind::SlowDown,
    ];

    pub fn initial_durability(&self) -> i32 {
        match self {
            BlockKind::Hard => HARD_BLOCK_DURABILITY,
            _ => 1,
        }
    }

    /// Name used in block catalogs and sprite file names
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Basic => "Block",
            BlockKind::Hard => "HardBlock",
            BlockKind::Split => "SplitBlock",
            BlockKind::Extend => "ExtendBlock",
            BlockKind::Shorten => "ShortenBlock",
            BlockKind::SpeedUp => "SpeedUpBlock",
            BlockKind::SlowDown => "SlowDownBlock",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

/// A destructible block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub kind: BlockKind,
    /// Remaining hits
    pub durable: i32,
    /// Hard blocks switch to a cracked sprite after their first hit
    #[serde(default)]
    pub cracked: bool,
}

impl Block {
    pub fn new(kind: BlockKind, center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            rect: Rect::new(center, half_width, half_height),
            kind,
            durable: kind.initial_durability(),
            cracked: false,
        }
    }

    /// Take one hit. Returns true once the block is worn out.
    pub fn take_hit(&mut self) -> bool {
        self.durable -= 1;
        self.is_broken()
    }

    #[inline]
    pub fn is_broken(&self) -> bool {
        self.durable <= 0
    }
}

/// Any object living in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity {
    Wall(Wall),
    Paddle(Paddle),
    Ball(Ball),
    Block(Block),
}

impl Entity {
    /// Every registry category this entity is listed under
    pub fn categories(&self) -> &'static [Category] {
        match self {
            Entity::Wall(Wall {
                kind: WallKind::Side,
                ..
            }) => &[Category::Wall, Category::GameObject],
            Entity::Wall(Wall {
                kind: WallKind::Bottom,
                ..
            }) => &[Category::Bottom, Category::Wall, Category::GameObject],
            Entity::Paddle(_) => &[Category::Paddle, Category::Rectangle, Category::GameObject],
            Entity::Ball(_) => &[Category::Ball, Category::GameObject],
            Entity::Block(_) => &[Category::Block, Category::Rectangle, Category::GameObject],
        }
    }

    pub fn rect(&self) -> Option<&Rect> {
        match self {
            Entity::Paddle(paddle) => Some(&paddle.rect),
            Entity::Block(block) => Some(&block.rect),
            _ => None,
        }
    }

    pub fn rect_mut(&mut self) -> Option<&mut Rect> {
        match self {
            Entity::Paddle(paddle) => Some(&mut paddle.rect),
            Entity::Block(block) => Some(&mut block.rect),
            _ => None,
        }
    }
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball bounced off a side wall
    WallBounce { ball: EntityId },
    /// Ball bounced off the paddle or a block
    RectBounce { ball: EntityId, rect: EntityId },
    /// Block took a hit and survived
    BlockHit { block: EntityId, remaining: i32 },
    /// Hard block switched to its cracked sprite
    BlockCracked { block: EntityId },
    /// Block worn out and removed; the score went up by one
    BlockDestroyed { block: EntityId, kind: BlockKind },
    /// New ball from a split block
    BallSpawned { ball: EntityId },
    /// Ball fell through the floor
    BallLost { ball: EntityId },
    /// Paddle half-width changed
    PaddleResized { half_width: f32 },
    /// Loop moved to a new phase
    PhaseChanged { phase: GamePhase },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paddle_blocked_at_right_edge() {
        let mut paddle = Paddle::new(Vec2::new(180.0, 190.0), 20.0, 4.0, 10.0);
        paddle.steer(1);
        assert_eq!(paddle.step(200.0), Vec2::ZERO);
        assert_eq!(paddle.rect.center, Vec2::new(180.0, 190.0));
        assert_eq!(paddle.direction, 0);
    }

    #[test]
    fn test_paddle_leaves_edge_in_other_direction() {
        let mut paddle = Paddle::new(Vec2::new(180.0, 190.0), 20.0, 4.0, 10.0);
        paddle.steer(-1);
        assert_eq!(paddle.step(200.0), Vec2::new(-10.0, 0.0));
        assert_eq!(paddle.rect.center.x, 170.0);
    }

    #[test]
    fn test_paddle_move_is_not_partially_clamped() {
        // Right edge at 195: the full step is taken even though it overshoots
        let mut paddle = Paddle::new(Vec2::new(175.0, 190.0), 20.0, 4.0, 10.0);
        paddle.steer(1);
        paddle.step(200.0);
        assert_eq!(paddle.rect.right_edge_x(), 205.0);
    }

    #[test]
    fn test_direction_resets_every_step() {
        let mut paddle = Paddle::new(Vec2::new(100.0, 190.0), 20.0, 4.0, 10.0);
        paddle.steer(1);
        paddle.step(200.0);
        assert_eq!(paddle.step(200.0), Vec2::ZERO);
        assert_eq!(paddle.rect.center.x, 110.0);
    }

    #[test]
    fn test_release_moves_once() {
        let mut ball = Ball::new(Vec2::new(10.0, 10.0), 3.0, Vec2::new(2.0, -2.0));
        ball.release();
        ball.release();
        assert!(ball.released);
        assert_eq!(ball.center, Vec2::new(12.0, 8.0));
    }

    #[test]
    fn test_block_durability() {
        let mut hard = Block::new(BlockKind::Hard, Vec2::ZERO, 10.0, 5.0);
        assert!(!hard.take_hit());
        assert!(hard.take_hit());

        let mut basic = Block::new(BlockKind::Basic, Vec2::ZERO, 10.0, 5.0);
        assert!(basic.take_hit());
    }

    #[test]
    fn test_block_type_names_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(BlockKind::from_type_name("Brick"), None);
    }

    #[test]
    fn test_bottom_wall_categories() {
        let bottom = Entity::Wall(Wall::bottom(100.0));
        assert!(bottom.categories().contains(&Category::Bottom));
        assert!(bottom.categories().contains(&Category::Wall));
        let side = Entity::Wall(Wall::new(Vec2::ZERO, Vec2::Y));
        assert!(!side.categories().contains(&Category::Bottom));
    }
}
