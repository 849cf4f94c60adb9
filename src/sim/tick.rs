//! Fixed-tick simulation loop
//!
//! The loop does not own a timer. An external scheduler calls
//! [`Simulation::tick`] every interval until the phase is terminal.

use glam::Vec2;

use super::state::{Ball, Block, Category, GameEvent, GamePhase, Paddle, Wall};
use super::world::World;
use crate::consts::*;
use crate::stage::Stage;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move the paddle left this tick
    pub move_left: bool,
    /// Move the paddle right this tick
    pub move_right: bool,
    /// Launch held balls
    pub release: bool,
    /// Demo mode: the loop steers the paddle itself
    pub autopilot: bool,
}

/// One game session: the world plus the loop state machine
#[derive(Debug, Clone)]
pub struct Simulation {
    world: World,
    phase: GamePhase,
    ticks: u64,
}

impl Simulation {
    /// Build a fresh world for `stage` on a `width` x `height` field
    pub fn new(stage: &Stage, width: f32, height: f32) -> Self {
        Self::with_world(build_world(stage, width, height))
    }

    /// Wrap an already populated world
    pub fn with_world(world: World) -> Self {
        Self {
            world,
            phase: GamePhase::NotStarted,
            ticks: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of ticks that ran entity updates or ended the game
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.drain_events()
    }

    /// Begin ticking. Has no effect once started.
    pub fn start(&mut self) {
        if self.phase == GamePhase::NotStarted {
            self.set_phase(GamePhase::Running);
        }
    }

    /// Stop early (restart, window closed). The current tick, if any, has
    /// already completed since ticks never suspend.
    ///
    /// A stopped game is `Over`, the same phase as losing the last ball.
    /// Callers that need to tell the two apart track the stop themselves.
    pub fn stop(&mut self) {
        if self.phase == GamePhase::Running {
            self.set_phase(GamePhase::Over);
        }
    }

    /// Advance one tick.
    ///
    /// End conditions are checked first, so a tick that empties the block or
    /// ball category ends the game at the start of the next tick, before any
    /// further update. Otherwise input is applied and every entity updated
    /// once, in registration order.
    pub fn tick(&mut self, input: &TickInput) -> GamePhase {
        if self.phase != GamePhase::Running {
            return self.phase;
        }
        self.ticks += 1;

        if self.world.is_empty(Category::Block) {
            self.set_phase(GamePhase::Cleared);
            return self.phase;
        }
        if self.world.is_empty(Category::Ball) {
            self.set_phase(GamePhase::Over);
            return self.phase;
        }

        let input = if input.autopilot {
            autopilot_input(&self.world)
        } else {
            *input
        };
        self.apply_input(&input);

        // Snapshot: removals skip, spawns wait for the next sweep
        let sweep = self.world.ids(Category::GameObject).to_vec();
        for id in sweep {
            self.world.update_entity(id);
        }

        self.phase
    }

    fn apply_input(&mut self, input: &TickInput) {
        let direction = i8::from(input.move_right) - i8::from(input.move_left);
        if direction != 0 {
            if let Some(paddle) = self.world.paddle_mut() {
                paddle.steer(direction);
            }
        }

        if input.release {
            let ball_ids = self.world.ids(Category::Ball).to_vec();
            for id in ball_ids {
                if let Some(ball) = self.world.ball_mut(id) {
                    ball.release();
                }
            }
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::info!(
            "Game {} after {} ticks (score {})",
            phase.as_str(),
            self.ticks,
            self.world.score
        );
        self.phase = phase;
        self.world.push_event(GameEvent::PhaseChanged { phase });
    }
}

/// Demo steering: launch held balls, then chase the released ball that is
/// lowest on the field.
pub fn autopilot_input(world: &World) -> TickInput {
    let mut input = TickInput::default();

    let balls: Vec<&Ball> = world
        .ids(Category::Ball)
        .iter()
        .filter_map(|&id| world.ball(id))
        .collect();

    if balls.iter().any(|ball| !ball.released) {
        input.release = true;
        return input;
    }

    let Some((_, paddle)) = world.paddle() else {
        return input;
    };
    let target = balls
        .iter()
        .max_by(|a, b| {
            a.center
                .y
                .partial_cmp(&b.center.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|ball| ball.center.x);

    if let Some(target_x) = target {
        // Dead zone keeps the paddle from jittering around the target
        let offset = target_x - paddle.rect.center.x;
        if offset > paddle.speed / 2.0 {
            input.move_right = true;
        } else if offset < -paddle.speed / 2.0 {
            input.move_left = true;
        }
    }
    input
}

/// Populate a world from a stage: paddle, ball, blocks, then walls
pub fn build_world(stage: &Stage, width: f32, height: f32) -> World {
    let mut world = World::new(width, height);

    let paddle = Paddle::new(
        Vec2::new(width / 2.0, (height * 15.0 / 16.0).floor()),
        (width / 13.0).floor(),
        (height / 60.0).floor(),
        (width / 50.0).floor(),
    );
    world.spawn_paddle(paddle);

    let radius = (height / 48.0).floor();
    let speed = (height / 300.0).floor();
    let ball_center = Vec2::new(
        paddle.rect.center.x,
        paddle.rect.center.y - paddle.rect.half_height - radius,
    );
    world.spawn_ball(Ball::new(ball_center, radius, Vec2::new(speed, -speed)));

    if stage.rows > 0 && stage.cols > 0 {
        let cell_w = ((width - BLOCK_MARGIN) / stage.cols as f32).floor();
        let cell_h = (height / 2.0 / stage.rows as f32).floor();
        for (row, col, kind) in stage.cells() {
            let center = Vec2::new(
                BLOCK_MARGIN + cell_w / 2.0 + cell_w * col as f32,
                BLOCK_MARGIN + cell_h / 2.0 + cell_h * row as f32,
            );
            world.spawn_block(Block::new(kind, center, cell_w / 2.0, cell_h / 2.0));
        }
    }

    world.spawn_wall(Wall::bottom(height));
    world.spawn_wall(Wall::new(Vec2::ZERO, Vec2::Y));
    world.spawn_wall(Wall::new(Vec2::new(width, 0.0), Vec2::Y));
    world.spawn_wall(Wall::new(Vec2::ZERO, Vec2::X));

    log::info!(
        "Built stage {} on {}x{} field: {} blocks",
        stage.name,
        width,
        height,
        world.count(Category::Block)
    );
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BlockKind, Entity};

    /// Field with walls and a paddle but no balls or blocks
    fn bare_world() -> World {
        let mut world = World::new(200.0, 200.0);
        world.spawn_paddle(Paddle::new(Vec2::new(100.0, 187.0), 20.0, 3.0, 4.0));
        world.spawn_wall(Wall::bottom(200.0));
        world.spawn_wall(Wall::new(Vec2::ZERO, Vec2::Y));
        world.spawn_wall(Wall::new(Vec2::new(200.0, 0.0), Vec2::Y));
        world.spawn_wall(Wall::new(Vec2::ZERO, Vec2::X));
        world
    }

    fn running(world: World) -> Simulation {
        let mut sim = Simulation::with_world(world);
        sim.start();
        sim
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut sim = Simulation::new(&Stage::generate("g", 1, 2, 2), 600.0, 432.0);
        let before = sim.world().paddle_center();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        assert_eq!(sim.tick(&input), GamePhase::NotStarted);
        assert_eq!(sim.world().paddle_center(), before);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_single_block_stage_clears() {
        let mut world = bare_world();
        let block = world.spawn_block(Block::new(
            BlockKind::Basic,
            Vec2::new(100.0, 50.0),
            20.0,
            10.0,
        ));
        world.spawn_ball(Ball::in_flight(Vec2::new(100.0, 64.0), 5.0, Vec2::new(0.0, -2.0)));
        let mut sim = running(world);

        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Running);
        assert!(!sim.world().contains(block));
        assert!(sim.world().is_empty(Category::Block));
        assert_eq!(sim.score(), 1);

        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Cleared);
        assert!(
            sim.drain_events()
                .contains(&GameEvent::PhaseChanged { phase: GamePhase::Cleared })
        );
    }

    #[test]
    fn test_empty_stage_clears_before_any_update() {
        let mut sim = Simulation::new(&Stage::empty("void"), 600.0, 432.0);
        sim.start();
        let paddle_before = sim.world().paddle_center();
        let input = TickInput {
            move_left: true,
            release: true,
            ..Default::default()
        };

        assert_eq!(sim.tick(&input), GamePhase::Cleared);
        assert_eq!(sim.world().paddle_center(), paddle_before);
        let ball_id = sim.world().ids(Category::Ball)[0];
        assert!(!sim.world().ball(ball_id).unwrap().released);

        // Terminal phases stay put
        assert_eq!(sim.tick(&input), GamePhase::Cleared);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_losing_last_ball_ends_game() {
        let mut world = bare_world();
        world.spawn_block(Block::new(BlockKind::Basic, Vec2::new(100.0, 50.0), 20.0, 10.0));
        let ball = world.spawn_ball(Ball::in_flight(
            Vec2::new(30.0, 196.0),
            5.0,
            Vec2::new(0.0, 2.0),
        ));
        let mut sim = running(world);

        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Running);
        assert!(!sim.world().contains(ball));
        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Over);
    }

    #[test]
    fn test_losing_one_of_two_balls_continues() {
        let mut world = bare_world();
        world.spawn_block(Block::new(BlockKind::Basic, Vec2::new(100.0, 50.0), 20.0, 10.0));
        world.spawn_ball(Ball::in_flight(Vec2::new(30.0, 196.0), 5.0, Vec2::new(0.0, 2.0)));
        world.spawn_ball(Ball::in_flight(Vec2::new(150.0, 120.0), 5.0, Vec2::new(0.0, 2.0)));
        let mut sim = running(world);

        sim.tick(&TickInput::default());
        assert_eq!(sim.world().count(Category::Ball), 1);
        // Destroying the first ball mid-sweep neither skips nor repeats the second
        let survivor = sim.world().ids(Category::Ball)[0];
        assert_eq!(sim.world().ball(survivor).unwrap().center, Vec2::new(150.0, 122.0));

        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Running);
        assert_eq!(sim.world().count(Category::Ball), 1);
    }

    #[test]
    fn test_fast_ball_past_floor_is_lost() {
        let mut world = bare_world();
        world.spawn_block(Block::new(BlockKind::Basic, Vec2::new(100.0, 50.0), 20.0, 10.0));
        let ball = world.spawn_ball(Ball::in_flight(
            Vec2::new(150.0, 180.0),
            5.0,
            Vec2::new(0.0, 30.0),
        ));
        let mut sim = running(world);

        // Jumps from 180 to 210, over the contact band of the floor
        sim.tick(&TickInput::default());
        assert_eq!(sim.world().ball(ball).unwrap().center, Vec2::new(150.0, 210.0));

        sim.tick(&TickInput::default());
        assert!(!sim.world().contains(ball));
        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Over);
    }

    #[test]
    fn test_split_ball_waits_for_next_sweep() {
        let mut world = bare_world();
        world.spawn_block(Block::new(BlockKind::Split, Vec2::new(100.0, 50.0), 20.0, 10.0));
        world.spawn_block(Block::new(BlockKind::Basic, Vec2::new(20.0, 20.0), 10.0, 5.0));
        world.spawn_ball(Ball::in_flight(Vec2::new(100.0, 64.0), 5.0, Vec2::new(0.0, -2.0)));
        let mut sim = running(world);

        sim.tick(&TickInput::default());
        let twin_id = sim.world().ids(Category::Ball)[1];
        assert_eq!(sim.world().ball(twin_id).unwrap().center, Vec2::new(100.0, 64.0));

        sim.tick(&TickInput::default());
        assert_eq!(sim.world().ball(twin_id).unwrap().center, Vec2::new(100.0, 62.0));
    }

    #[test]
    fn test_input_moves_paddle_and_releases_ball() {
        let mut sim = Simulation::new(&Stage::generate("g", 3, 2, 4), 600.0, 432.0);
        sim.start();
        let paddle_x = sim.world().paddle_center().unwrap().x;
        let speed = sim.world().paddle().unwrap().1.speed;

        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        sim.tick(&input);
        assert_eq!(sim.world().paddle_center().unwrap().x, paddle_x + speed);

        // Held ball rides along with the paddle
        let ball_id = sim.world().ids(Category::Ball)[0];
        assert_eq!(sim.world().ball(ball_id).unwrap().center.x, paddle_x + speed);

        let input = TickInput {
            release: true,
            ..Default::default()
        };
        sim.tick(&input);
        assert!(sim.world().ball(ball_id).unwrap().released);
    }

    #[test]
    fn test_build_world_layout() {
        let stage = Stage::from_grid(
            "layout",
            vec![
                vec![Some(BlockKind::Basic), None],
                vec![Some(BlockKind::Hard), Some(BlockKind::Split)],
            ],
        );
        let world = build_world(&stage, 600.0, 432.0);

        assert_eq!(world.count(Category::Block), 3);
        assert_eq!(world.count(Category::Wall), 4);
        assert_eq!(world.count(Category::Bottom), 1);

        // Cells are 299 x 108
        let first = world.ids(Category::Block)[0];
        let block = world.block(first).unwrap();
        assert_eq!(block.rect.center, Vec2::new(151.5, 56.0));
        assert_eq!(block.rect.half_extents(), Vec2::new(149.5, 54.0));

        let (_, paddle) = world.paddle().unwrap();
        assert_eq!(paddle.rect.center, Vec2::new(300.0, 405.0));
        assert_eq!(paddle.rect.half_extents(), Vec2::new(46.0, 7.0));
        assert_eq!(paddle.speed, 12.0);

        // Sweep order: paddle, ball, blocks, walls
        let sweep = world.ids(Category::GameObject);
        assert!(matches!(world.get(sweep[0]), Some(Entity::Paddle(_))));
        assert!(matches!(world.get(sweep[1]), Some(Entity::Ball(_))));
        assert!(matches!(world.get(sweep[2]), Some(Entity::Block(_))));
        assert!(matches!(world.get(sweep[5]), Some(Entity::Wall(_))));

        let ball = world.ball(sweep[1]).unwrap();
        assert_eq!(ball.radius, 9.0);
        assert_eq!(ball.center, Vec2::new(300.0, 389.0));
        assert_eq!(ball.velocity, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_autopilot_releases_then_tracks() {
        let mut world = bare_world();
        world.spawn_ball(Ball::new(Vec2::new(100.0, 179.0), 5.0, Vec2::new(2.0, -2.0)));
        assert!(autopilot_input(&world).release);

        let mut world = bare_world();
        world.spawn_ball(Ball::in_flight(Vec2::new(160.0, 100.0), 5.0, Vec2::new(2.0, 2.0)));
        world.spawn_ball(Ball::in_flight(Vec2::new(20.0, 40.0), 5.0, Vec2::new(2.0, 2.0)));
        let input = autopilot_input(&world);
        assert!(input.move_right && !input.move_left && !input.release);
    }

    #[test]
    fn test_autopilot_game_terminates() {
        let stage = Stage::generate("auto", 99, 3, 6);
        let mut sim = Simulation::new(&stage, 600.0, 432.0);
        sim.start();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..200_000 {
            if sim.tick(&input).is_terminal() {
                break;
            }
        }
        // Either outcome is fine; it must not stall mid-sweep
        assert!(sim.ticks() > 0);
        assert_eq!(sim.world().count(Category::Wall), 4);
    }

    #[test]
    fn test_stop_is_a_phase_change() {
        let mut sim = Simulation::new(&Stage::generate("g", 5, 2, 2), 600.0, 432.0);
        sim.start();
        sim.tick(&TickInput::default());
        sim.stop();
        assert_eq!(sim.phase(), GamePhase::Over);
        assert_eq!(sim.tick(&TickInput::default()), GamePhase::Over);
    }
}
