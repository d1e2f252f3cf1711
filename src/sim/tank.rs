//! Player tanks
//!
//! The richest entity: input-driven movement with atomic accept/reject
//! collision, a shooting cooldown, an upgrade ladder (rank), and a
//! damage/respawn state machine that burns lives instead of removing the
//! tank from the registry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::consts::{
    BASE_SHOOT_COOLDOWN, BULLET_DAMAGE, BULLET_SPEED, MAX_RANK, MIN_SHOOT_COOLDOWN,
    RANK_COOLDOWN_STEP, RANK_SPEED_STEP,
};
use crate::input::KeyBindings;
use crate::render::{Assets, SpriteId, Surface, TANK_RANKS};
use crate::settings::ArenaConfig;
use crate::sim::SimError;
use crate::sim::bullet::Bullet;
use crate::sim::entity::{Entity, EntityId, Facing};
use crate::sim::rect::Rect;
use crate::sim::spawn;
use crate::sim::tick::{Hit, TickCtx};

/// Team identity; also decides who won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TankColor {
    Red,
    Blue,
}

impl TankColor {
    pub fn label(self) -> &'static str {
        match self {
            TankColor::Red => "red",
            TankColor::Blue => "blue",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tank {
    pub id: EntityId,
    pub color: TankColor,
    /// Collision geometry; always a full grid cell, whatever the sprite does
    pub bounds: Rect,
    pub facing: Facing,
    /// Upgrade tier 0..=3; raises speed and fire rate
    pub rank: u8,
    pub speed: f32,
    pub hit_points: i32,
    pub lives: u32,
    pub bindings: KeyBindings,
    /// Ticks until the next shot is allowed
    pub shoot_timer: u32,
    /// Cooldown period re-armed after each shot
    pub shoot_delay: u32,
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    /// Cosmetic sprite scale derived from rank; collisions ignore it
    pub visual_scale: f32,
    skin: [SpriteId; TANK_RANKS],
}

impl Tank {
    pub fn new(
        id: EntityId,
        color: TankColor,
        spawn: Vec2,
        facing: Facing,
        bindings: KeyBindings,
        config: &ArenaConfig,
        assets: &Assets,
    ) -> Self {
        let mut tank = Self {
            id,
            color,
            bounds: Rect::new(spawn.x, spawn.y, config.cell_size, config.cell_size),
            facing,
            rank: 0,
            speed: config.speed,
            hit_points: config.hit_points,
            lives: config.lives,
            bindings,
            shoot_timer: 0,
            shoot_delay: BASE_SHOOT_COOLDOWN,
            bullet_speed: BULLET_SPEED,
            bullet_damage: BULLET_DAMAGE,
            visual_scale: 1.0,
            skin: assets.tank_skin(color),
        };
        tank.refresh_appearance();
        tank
    }

    pub fn update(&mut self, ctx: &mut TickCtx) -> Result<(), SimError> {
        self.refresh_appearance();
        self.apply_movement(ctx);
        self.handle_shooting(ctx);
        Ok(())
    }

    /// Recompute the sprite scale from the current rank. Purely visual.
    fn refresh_appearance(&mut self) {
        self.visual_scale = (self.bounds.w - 5.0 + f32::from(self.rank)) / self.bounds.w;
    }

    /// One axis per tick, first pressed binding wins
    /// (left > right > up > down). The move is atomic: clamp to the arena
    /// and the reserved top band, then either keep the whole step or revert
    /// to where we started. Facing tracks the attempt either way.
    fn apply_movement(&mut self, ctx: &mut TickCtx) {
        let prev = self.bounds.top_left();
        let moved = if ctx.input.is_key_down(self.bindings.left) {
            self.bounds.x -= self.speed;
            self.facing = Facing::Left;
            true
        } else if ctx.input.is_key_down(self.bindings.right) {
            self.bounds.x += self.speed;
            self.facing = Facing::Right;
            true
        } else if ctx.input.is_key_down(self.bindings.up) {
            self.bounds.y -= self.speed;
            self.facing = Facing::Up;
            true
        } else if ctx.input.is_key_down(self.bindings.down) {
            self.bounds.y += self.speed;
            self.facing = Facing::Down;
            true
        } else {
            false
        };
        if !moved {
            return;
        }

        let config = ctx.config;
        self.bounds.x = self
            .bounds
            .x
            .clamp(0.0, config.screen_width - self.bounds.w);
        self.bounds.y = self
            .bounds
            .y
            .clamp(config.reserved_band(), config.screen_height - 2.0 - self.bounds.h);

        let blocked = ctx
            .registry
            .iter_live()
            .any(|e| e.blocks_movement() && e.bounds().intersects(&self.bounds));
        if blocked {
            self.bounds.x = prev.x;
            self.bounds.y = prev.y;
        }
    }

    /// Fire from the tank's center along its facing, then re-arm the
    /// cooldown. The timer counts down every tick once armed, shoot key
    /// held or not.
    fn handle_shooting(&mut self, ctx: &mut TickCtx) {
        if ctx.input.is_key_down(self.bindings.shoot) && self.shoot_timer == 0 {
            let vel = self.facing.delta() * self.bullet_speed;
            let bullet_id = ctx.registry.allocate_id();
            ctx.registry.add(Entity::Bullet(Bullet::new(
                bullet_id,
                self.id,
                self.bounds.center(),
                vel,
                self.bullet_damage,
            )));
            self.shoot_timer = self.shoot_delay;
            ctx.play(SoundEffect::Shoot);
        }
        if self.shoot_timer > 0 {
            self.shoot_timer -= 1;
        }
    }

    /// Take a hit. Survivors lose a rank step (rubber-band balancing);
    /// a destroyed tank burns a life and respawns with base stats at a
    /// fresh non-colliding cell, or stays down when its lives run out and
    /// leaves the round to the frame loop to finish.
    pub fn apply_damage(&mut self, hit: &Hit, ctx: &mut TickCtx) -> Result<(), SimError> {
        self.hit_points -= hit.amount;
        ctx.play(SoundEffect::TankHit);
        if self.hit_points <= 0 {
            ctx.play(SoundEffect::TankDestroyed);
            self.lives = self.lives.saturating_sub(1);
            if self.lives > 0 {
                self.reset(ctx)?;
            } else {
                log::info!("{} tank is out of lives", self.color.label());
            }
        } else if self.rank > 0 {
            self.demote();
        }
        Ok(())
    }

    /// Back to base stats at a random free cell; costs nothing here, the
    /// life was already spent by the caller.
    fn reset(&mut self, ctx: &mut TickCtx) -> Result<(), SimError> {
        let cell = spawn::random_free_cell(ctx.registry, ctx.config, ctx.rng)?;
        self.bounds = Rect::new(cell.x, cell.y, ctx.config.cell_size, ctx.config.cell_size);
        self.rank = 0;
        self.speed = ctx.config.speed;
        self.hit_points = ctx.config.hit_points;
        self.shoot_timer = 0;
        self.shoot_delay = BASE_SHOOT_COOLDOWN;
        self.bullet_speed = BULLET_SPEED;
        self.bullet_damage = BULLET_DAMAGE;
        log::debug!(
            "{} tank respawned at ({}, {}), {} lives left",
            self.color.label(),
            self.bounds.x,
            self.bounds.y,
            self.lives
        );
        Ok(())
    }

    /// Climb one rank: faster, shorter cooldown (floored), bigger sprite
    pub fn promote(&mut self) {
        if self.rank < MAX_RANK {
            self.rank += 1;
            self.speed += RANK_SPEED_STEP;
            self.shoot_delay = self
                .shoot_delay
                .saturating_sub(RANK_COOLDOWN_STEP)
                .max(MIN_SHOOT_COOLDOWN);
        }
    }

    /// Drop one rank after a survivable hit
    pub fn demote(&mut self) {
        if self.rank > 0 {
            self.rank -= 1;
            self.speed -= RANK_SPEED_STEP;
            self.shoot_delay += RANK_COOLDOWN_STEP;
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let dst = self.bounds.scaled(self.visual_scale);
        surface.blit(self.skin[self.rank as usize], dst, self.facing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> Tank {
        let config = ArenaConfig::default();
        let assets = Assets::placeholder();
        Tank::new(
            0,
            TankColor::Red,
            config.player_one_spawn(),
            Facing::Up,
            KeyBindings::player_one(),
            &config,
            &assets,
        )
    }

    #[test]
    fn test_promote_steps_stats() {
        let mut t = tank();
        t.promote();
        assert_eq!(t.rank, 1);
        assert!((t.speed - 2.3).abs() < 0.0001);
        assert_eq!(t.shoot_delay, 80);
    }

    #[test]
    fn test_promote_caps_at_max_rank() {
        let mut t = tank();
        for _ in 0..10 {
            t.promote();
        }
        assert_eq!(t.rank, MAX_RANK);
        assert_eq!(t.shoot_delay, 60);
    }

    #[test]
    fn test_demote_reverses_promote() {
        let mut t = tank();
        t.promote();
        t.demote();
        assert_eq!(t.rank, 0);
        assert!((t.speed - 2.0).abs() < 0.0001);
        assert_eq!(t.shoot_delay, BASE_SHOOT_COOLDOWN);
    }

    #[test]
    fn test_demote_at_rank_zero_is_noop() {
        let mut t = tank();
        t.demote();
        assert_eq!(t.rank, 0);
        assert_eq!(t.speed, 2.0);
    }

    #[test]
    fn test_bounds_are_one_cell_despite_scale() {
        let t = tank();
        assert_eq!(t.bounds.w, 32.0);
        assert_eq!(t.bounds.h, 32.0);
        assert!(t.visual_scale < 1.0);
    }
}
