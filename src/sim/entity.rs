//! The closed set of things that can live in the arena
//!
//! One enum, one kind tag, pattern-match dispatch. The kind drives the
//! collision-exemption rule: explosions and bonuses never block anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::render::Surface;
use crate::sim::SimError;
use crate::sim::block::Block;
use crate::sim::bullet::Bullet;
use crate::sim::effects::{Bonus, Explosion};
use crate::sim::rect::Rect;
use crate::sim::tank::Tank;
use crate::sim::tick::TickCtx;

/// Registry-unique entity handle. Cross-references (a bullet's owner,
/// collision partners) are these, never aliasing pointers; lookups through
/// a stale handle simply find nothing.
pub type EntityId = u32;

/// One of the four cardinal directions a tank can face or a bullet fly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// Unit step in screen coordinates (y grows downward)
    pub fn delta(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Right => Vec2::new(1.0, 0.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
        }
    }

    /// Clockwise quarter turns from `Up`; how far a renderer rotates sprites
    pub fn quarter_turns(self) -> u8 {
        match self {
            Facing::Up => 0,
            Facing::Right => 1,
            Facing::Down => 2,
            Facing::Left => 3,
        }
    }
}

/// Tag distinguishing entity variants without borrowing their payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Tank,
    Bullet,
    Block,
    Explosion,
    Bonus,
}

/// A live game object
#[derive(Debug, Clone)]
pub enum Entity {
    Tank(Tank),
    Bullet(Bullet),
    Block(Block),
    Explosion(Explosion),
    Bonus(Bonus),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Tank(t) => t.id,
            Entity::Bullet(b) => b.id,
            Entity::Block(b) => b.id,
            Entity::Explosion(e) => e.id,
            Entity::Bonus(b) => b.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Tank(_) => EntityKind::Tank,
            Entity::Bullet(_) => EntityKind::Bullet,
            Entity::Block(_) => EntityKind::Block,
            Entity::Explosion(_) => EntityKind::Explosion,
            Entity::Bonus(_) => EntityKind::Bonus,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Entity::Tank(t) => t.bounds,
            Entity::Bullet(b) => b.bounds,
            Entity::Block(b) => b.bounds,
            Entity::Explosion(e) => e.bounds,
            Entity::Bonus(b) => b.bounds,
        }
    }

    /// Whether this entity stops tanks and bullets. Explosions and bonuses
    /// are decoration as far as collisions go.
    pub fn blocks_movement(&self) -> bool {
        !matches!(self.kind(), EntityKind::Explosion | EntityKind::Bonus)
    }

    /// Advance one tick. Blocks are static and have nothing to do.
    pub fn update(&mut self, ctx: &mut TickCtx) -> Result<(), SimError> {
        match self {
            Entity::Tank(t) => t.update(ctx),
            Entity::Bullet(b) => b.update(ctx),
            Entity::Block(_) => Ok(()),
            Entity::Explosion(e) => {
                e.update(ctx);
                Ok(())
            }
            Entity::Bonus(b) => {
                b.update(ctx);
                Ok(())
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        match self {
            Entity::Tank(t) => t.draw(surface),
            Entity::Bullet(b) => b.draw(surface),
            Entity::Block(b) => b.draw(surface),
            Entity::Explosion(e) => e.draw(surface),
            Entity::Bonus(b) => b.draw(surface),
        }
    }
}
