//! Per-entity update and collision handlers
//!
//! Walls and blocks are static and do nothing on their own update. The
//! paddle moves by its steering input. A released ball checks walls, then
//! rectangles, then moves.

use glam::Vec2;

use super::collision::{ball_boundary_collision, ball_line_collision, ball_rect_collision};
use super::state::{Ball, BlockKind, Category, Entity, EntityId, GameEvent, WallKind};
use super::world::World;
use crate::consts::EFFECT_FACTOR;

impl World {
    /// Run one entity's per-tick update. Ids that no longer exist are ignored.
    pub fn update_entity(&mut self, id: EntityId) {
        match self.get(id) {
            Some(Entity::Ball(_)) => self.update_ball(id),
            Some(Entity::Paddle(_)) => self.update_paddle(id),
            Some(Entity::Wall(_)) | Some(Entity::Block(_)) | None => {}
        }
    }

    fn update_paddle(&mut self, id: EntityId) {
        let width = self.width;
        if let Some(Entity::Paddle(paddle)) = self.get_mut(id) {
            paddle.step(width);
        }
    }

    fn update_ball(&mut self, id: EntityId) {
        let Some(mut ball) = self.ball(id).copied() else {
            return;
        };

        if !ball.released {
            if let Some(paddle_center) = self.paddle_center() {
                ball.move_by(Vec2::new(paddle_center.x - ball.center.x, 0.0));
            }
        } else {
            if !self.check_walls(id, &mut ball) {
                // Fell through the floor
                return;
            }
            self.check_rectangles(id, &mut ball);
            ball.move_by(ball.velocity);
        }

        if let Some(slot) = self.ball_mut(id) {
            *slot = ball;
        }
    }

    /// Handle at most one wall contact. Returns false if the ball was destroyed.
    fn check_walls(&mut self, id: EntityId, ball: &mut Ball) -> bool {
        let contact = self.iter(Category::Wall).find_map(|(_, entity)| match entity {
            Entity::Wall(wall) => {
                let result = match wall.kind {
                    WallKind::Bottom => {
                        ball_boundary_collision(ball.center, ball.radius, &wall.line)
                    }
                    WallKind::Side => ball_line_collision(ball.center, ball.radius, &wall.line),
                };
                result.hit.then_some((wall.kind, result.separation))
            }
            _ => None,
        });

        match contact {
            Some((WallKind::Bottom, _)) => {
                self.destroy(id);
                self.push_event(GameEvent::BallLost { ball: id });
                log::debug!("ball {id:?} lost");
                false
            }
            Some((WallKind::Side, direction)) => {
                ball.bounce(direction);
                self.push_event(GameEvent::WallBounce { ball: id });
                true
            }
            None => true,
        }
    }

    /// Scan rectangles in order; the first overlapping one ends the scan and
    /// fires its handler unless it is still marked from an earlier tick.
    fn check_rectangles(&mut self, id: EntityId, ball: &mut Ball) {
        let rect_ids = self.ids(Category::Rectangle).to_vec();
        for rect_id in rect_ids {
            let Some(rect) = self.get_mut(rect_id).and_then(Entity::rect_mut) else {
                continue;
            };
            let result = ball_rect_collision(
                ball.center,
                ball.velocity,
                ball.radius,
                rect.center,
                rect.half_extents(),
            );
            if !result.hit {
                rect.in_contact = false;
                continue;
            }
            if !rect.in_contact {
                rect.in_contact = true;
                self.on_rect_collision(rect_id, id, ball, result.separation);
            }
            return;
        }
    }

    /// Ball struck the paddle or a block
    fn on_rect_collision(
        &mut self,
        rect_id: EntityId,
        ball_id: EntityId,
        ball: &mut Ball,
        separation: Vec2,
    ) {
        ball.bounce(separation);
        self.push_event(GameEvent::RectBounce {
            ball: ball_id,
            rect: rect_id,
        });

        let Some(block) = self.block_mut(rect_id) else {
            return;
        };
        let broken = block.take_hit();
        let kind = block.kind;
        let remaining = block.durable;

        self.apply_block_effect(kind, rect_id, ball);

        if broken {
            self.destroy_block(rect_id, kind);
        } else {
            self.push_event(GameEvent::BlockHit {
                block: rect_id,
                remaining,
            });
        }
    }

    /// Score the block, then remove it
    fn destroy_block(&mut self, id: EntityId, kind: BlockKind) {
        self.score += 1;
        self.destroy(id);
        self.push_event(GameEvent::BlockDestroyed { block: id, kind });
        log::debug!("{} destroyed, score {}", kind.type_name(), self.score);
    }

    /// Block effect, applied once per hit after the durability decrement
    fn apply_block_effect(&mut self, kind: BlockKind, block_id: EntityId, ball: &mut Ball) {
        match kind {
            BlockKind::Basic => {}
            BlockKind::Hard => {
                let newly_cracked = self
                    .block_mut(block_id)
                    .is_some_and(|block| !std::mem::replace(&mut block.cracked, true));
                if newly_cracked {
                    self.push_event(GameEvent::BlockCracked { block: block_id });
                }
            }
            BlockKind::Split => {
                let twin = Ball::in_flight(ball.center, ball.radius, -ball.velocity);
                let twin_id = self.spawn_ball(twin);
                self.push_event(GameEvent::BallSpawned { ball: twin_id });
            }
            BlockKind::Extend => self.resize_paddle(EFFECT_FACTOR),
            BlockKind::Shorten => self.resize_paddle(1.0 / EFFECT_FACTOR),
            BlockKind::SpeedUp => ball.scale_speed(EFFECT_FACTOR),
            BlockKind::SlowDown => ball.scale_speed(1.0 / EFFECT_FACTOR),
        }
    }

    fn resize_paddle(&mut self, factor: f32) {
        let Some(paddle) = self.paddle_mut() else {
            log::warn!("no paddle to resize");
            return;
        };
        paddle.rect.half_width *= factor;
        let half_width = paddle.rect.half_width;
        self.push_event(GameEvent::PaddleResized { half_width });
    }
}
