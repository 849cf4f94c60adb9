//! Mirror the world onto a [`Surface`]

use std::collections::HashMap;

use super::surface::{Geometry, ShapeHandle, Style, Surface};
use crate::sim::{BlockKind, Category, Entity, EntityId, World};

const BALL_COLOR: &str = "#636e72";
const PADDLE_COLOR: &str = "#0984e3";

/// Sprite file for a block, switching to the cracked variant once cracked
pub fn sprite_path(kind: BlockKind, cracked: bool) -> String {
    if cracked {
        format!("image/{}_crack.png", kind.type_name())
    } else {
        format!("image/{}.png", kind.type_name())
    }
}

/// How an entity is drawn. Walls are invisible.
pub fn appearance(entity: &Entity) -> Option<(Geometry, Style)> {
    match entity {
        Entity::Wall(_) => None,
        Entity::Ball(ball) => Some((
            Geometry::Oval {
                center: ball.center,
                radius: ball.radius,
            },
            Style {
                fill: Some(BALL_COLOR),
            },
        )),
        Entity::Paddle(paddle) => Some((
            Geometry::Rectangle {
                center: paddle.rect.center,
                half_extents: paddle.rect.half_extents(),
            },
            Style {
                fill: Some(PADDLE_COLOR),
            },
        )),
        Entity::Block(block) => Some((
            Geometry::Image {
                center: block.rect.center,
                half_extents: block.rect.half_extents(),
                path: sprite_path(block.kind, block.cracked),
            },
            Style::default(),
        )),
    }
}

/// Tracks which shape draws which entity
#[derive(Debug, Default)]
pub struct SurfaceSync {
    drawn: HashMap<EntityId, (ShapeHandle, Geometry)>,
}

impl SurfaceSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape currently drawing `id`
    pub fn handle(&self, id: EntityId) -> Option<ShapeHandle> {
        self.drawn.get(&id).map(|(handle, _)| *handle)
    }

    /// Delete shapes of destroyed entities, create shapes for new ones,
    /// move shapes that only translated and redraw the rest that changed.
    pub fn sync(&mut self, world: &World, surface: &mut dyn Surface) {
        self.drawn.retain(|&id, (handle, _)| {
            let alive = world.contains(id);
            if !alive {
                surface.delete(*handle);
            }
            alive
        });

        for (id, entity) in world.iter(Category::GameObject) {
            let Some((geometry, style)) = appearance(entity) else {
                continue;
            };
            match self.drawn.get_mut(&id) {
                None => {
                    let handle = surface.create_shape(&geometry, &style);
                    self.drawn.insert(id, (handle, geometry));
                }
                Some((handle, drawn)) => {
                    if *drawn == geometry {
                        continue;
                    }
                    if drawn.with_center(geometry.center()) == geometry {
                        let delta = geometry.center() - drawn.center();
                        surface.move_shape(*handle, delta.x, delta.y);
                    } else {
                        surface.redraw(*handle, &geometry);
                    }
                    *drawn = geometry;
                }
            }
        }
    }

    /// Delete every shape, e.g. before a restart
    pub fn clear(&mut self, surface: &mut dyn Surface) {
        for (_, (handle, _)) in self.drawn.drain() {
            surface.delete(handle);
        }
    }
}
