//! Projectiles
//!
//! A bullet owns its velocity and nothing else; the tank that fired it is
//! referenced by handle only, and may well be gone (or respawned across
//! the map) by the time the bullet lands.

use glam::Vec2;

use crate::consts::{BULLET_HIT_POINTS, BULLET_SIZE};
use crate::render::Surface;
use crate::sim::SimError;
use crate::sim::effects::Explosion;
use crate::sim::entity::{Entity, EntityId};
use crate::sim::rect::Rect;
use crate::sim::tick::{Hit, TickCtx};

#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: EntityId,
    /// Firing tank; never hit by its own bullets
    pub owner: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
    pub hit_points: i32,
    pub bounds: Rect,
}

impl Bullet {
    pub fn new(id: EntityId, owner: EntityId, pos: Vec2, vel: Vec2, damage: i32) -> Self {
        Self {
            id,
            owner,
            pos,
            vel,
            damage,
            hit_points: BULLET_HIT_POINTS,
            bounds: Rect::centered(pos, BULLET_SIZE, BULLET_SIZE),
        }
    }

    /// Fly one tick, then resolve what we ran into.
    ///
    /// Leaving the arena removes the bullet quietly. Otherwise the first
    /// intersecting entity that is not the owner and not decoration takes
    /// the hit, the bullet dies, and an explosion marks the spot. One hit
    /// per bullet; there is no pass-through.
    pub fn update(&mut self, ctx: &mut TickCtx) -> Result<(), SimError> {
        self.pos += self.vel;
        self.bounds = Rect::centered(self.pos, BULLET_SIZE, BULLET_SIZE);

        let out_of_bounds = self.pos.x < 0.0
            || self.pos.x > ctx.config.screen_width
            || self.pos.y < 0.0
            || self.pos.y > ctx.config.screen_height;
        if out_of_bounds {
            ctx.remove(self.id);
            return Ok(());
        }

        let target = ctx
            .registry
            .iter_live()
            .find(|e| {
                e.id() != self.owner && e.blocks_movement() && e.bounds().intersects(&self.bounds)
            })
            .map(|e| e.id());

        if let Some(target) = target {
            // Armor gating uses the owner's rank as of impact; a dead
            // owner gates as rank 0.
            let attacker_rank = match ctx.registry.get(self.owner) {
                Some(Entity::Tank(t)) => t.rank,
                _ => 0,
            };
            ctx.deal_damage(
                target,
                Hit {
                    amount: self.damage,
                    attacker_rank: Some(attacker_rank),
                },
            )?;
            ctx.remove(self.id);
            let explosion_id = ctx.registry.allocate_id();
            ctx.registry.add(Entity::Explosion(Explosion::new(
                explosion_id,
                self.pos,
                ctx.config.cell_size,
                ctx.assets,
            )));
        }
        Ok(())
    }

    /// Bullets die to any positive damage (bullet-on-bullet collisions)
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        self.hit_points -= amount;
        self.hit_points <= 0
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.circle(self.pos, 2.0);
    }
}
