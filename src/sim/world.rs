//! Entity registry for one game session
//!
//! Entities live in a slot map keyed by [`EntityId`]. Each [`Category`] keeps
//! the ids of its members in registration order, which is the order every
//! sweep and collision scan follows.

use glam::Vec2;
use slotmap::SlotMap;

use super::state::{Ball, Block, Category, Entity, EntityId, GameEvent, Paddle, Wall};

/// All live entities plus the per-session counters
#[derive(Debug, Clone)]
pub struct World {
    /// Play field width (left wall at x = 0, right wall at x = width)
    pub width: f32,
    /// Play field height (top wall at y = 0, floor at y = height)
    pub height: f32,
    /// Blocks destroyed so far
    pub score: u64,
    entities: SlotMap<EntityId, Entity>,
    categories: [Vec<EntityId>; Category::COUNT],
    events: Vec<GameEvent>,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            score: 0,
            entities: SlotMap::with_key(),
            categories: Default::default(),
            events: Vec::new(),
        }
    }

    /// Register an entity under all of its categories
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let categories = entity.categories();
        let id = self.entities.insert(entity);
        for category in categories {
            self.categories[category.index()].push(id);
        }
        id
    }

    pub fn spawn_wall(&mut self, wall: Wall) -> EntityId {
        self.spawn(Entity::Wall(wall))
    }

    pub fn spawn_paddle(&mut self, paddle: Paddle) -> EntityId {
        self.spawn(Entity::Paddle(paddle))
    }

    pub fn spawn_ball(&mut self, ball: Ball) -> EntityId {
        self.spawn(Entity::Ball(ball))
    }

    pub fn spawn_block(&mut self, block: Block) -> EntityId {
        self.spawn(Entity::Block(block))
    }

    /// Unregister an entity from every category and drop it.
    /// Returns the removed entity, or `None` if it was already gone.
    pub fn destroy(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        for category in entity.categories() {
            self.categories[category.index()].retain(|&other| other != id);
        }
        Some(entity)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Ids of a category in registration order
    pub fn ids(&self, category: Category) -> &[EntityId] {
        &self.categories[category.index()]
    }

    pub fn count(&self, category: Category) -> usize {
        self.categories[category.index()].len()
    }

    pub fn is_empty(&self, category: Category) -> bool {
        self.categories[category.index()].is_empty()
    }

    /// Entities of a category in registration order
    pub fn iter(&self, category: Category) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.ids(category)
            .iter()
            .filter_map(|&id| self.entities.get(id).map(|entity| (id, entity)))
    }

    pub fn ball(&self, id: EntityId) -> Option<&Ball> {
        match self.entities.get(id)? {
            Entity::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn ball_mut(&mut self, id: EntityId) -> Option<&mut Ball> {
        match self.entities.get_mut(id)? {
            Entity::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn block(&self, id: EntityId) -> Option<&Block> {
        match self.entities.get(id)? {
            Entity::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn block_mut(&mut self, id: EntityId) -> Option<&mut Block> {
        match self.entities.get_mut(id)? {
            Entity::Block(block) => Some(block),
            _ => None,
        }
    }

    /// The first registered paddle
    pub fn paddle(&self) -> Option<(EntityId, &Paddle)> {
        self.iter(Category::Paddle).find_map(|(id, entity)| match entity {
            Entity::Paddle(paddle) => Some((id, paddle)),
            _ => None,
        })
    }

    pub fn paddle_mut(&mut self) -> Option<&mut Paddle> {
        let id = *self.ids(Category::Paddle).first()?;
        match self.entities.get_mut(id)? {
            Entity::Paddle(paddle) => Some(paddle),
            _ => None,
        }
    }

    pub fn paddle_center(&self) -> Option<Vec2> {
        self.paddle().map(|(_, paddle)| paddle.rect.center)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BlockKind;

    fn block_at(x: f32) -> Block {
        Block::new(BlockKind::Basic, Vec2::new(x, 20.0), 10.0, 5.0)
    }

    #[test]
    fn test_spawn_registers_every_category() {
        let mut world = World::new(200.0, 200.0);
        let block = world.spawn_block(block_at(20.0));
        let floor = world.spawn_wall(Wall::bottom(200.0));

        assert_eq!(world.ids(Category::Block), &[block]);
        assert_eq!(world.ids(Category::Rectangle), &[block]);
        assert_eq!(world.ids(Category::Wall), &[floor]);
        assert_eq!(world.ids(Category::Bottom), &[floor]);
        assert_eq!(world.ids(Category::GameObject), &[block, floor]);
        assert!(world.is_empty(Category::Ball));
    }

    #[test]
    fn test_destroy_strips_all_categories() {
        let mut world = World::new(200.0, 200.0);
        let first = world.spawn_block(block_at(20.0));
        let second = world.spawn_block(block_at(60.0));

        assert!(matches!(world.destroy(first), Some(Entity::Block(_))));
        assert!(!world.contains(first));
        assert_eq!(world.ids(Category::Block), &[second]);
        assert_eq!(world.ids(Category::Rectangle), &[second]);
        assert_eq!(world.ids(Category::GameObject), &[second]);

        assert!(world.destroy(first).is_none());
    }

    #[test]
    fn test_registration_order_is_kept() {
        let mut world = World::new(200.0, 200.0);
        let ids: Vec<_> = (0..5).map(|i| world.spawn_block(block_at(i as f32 * 30.0))).collect();
        world.destroy(ids[2]);
        let expected = [ids[0], ids[1], ids[3], ids[4]];
        assert_eq!(world.ids(Category::Block), &expected);
    }

    #[test]
    fn test_typed_accessors() {
        let mut world = World::new(200.0, 200.0);
        assert!(world.paddle().is_none());
        let paddle = world.spawn_paddle(Paddle::new(Vec2::new(100.0, 180.0), 20.0, 4.0, 5.0));
        let ball = world.spawn_ball(Ball::new(Vec2::new(100.0, 170.0), 5.0, Vec2::ONE));

        assert_eq!(world.paddle().map(|(id, _)| id), Some(paddle));
        assert_eq!(world.paddle_center(), Some(Vec2::new(100.0, 180.0)));
        assert!(world.ball(ball).is_some());
        assert!(world.ball(paddle).is_none());
        assert!(world.block(ball).is_none());
    }
}
