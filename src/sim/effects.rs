//! Transient effects: explosions and bonuses
//!
//! Both live on timers, neither takes damage, neither blocks anything.
//! A bonus additionally watches for a tank driving over it and hands out
//! its effect exactly once before vanishing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::consts::{
    BONUS_BLINK_PERIOD, BONUS_TTL_TICKS, EXPLOSION_FRAME_STEP, EXPLOSION_FRAMES, MAX_HIT_POINTS,
    MAX_LIVES,
};
use crate::render::{Assets, SpriteId, Surface};
use crate::sim::entity::{Entity, EntityId, EntityKind, Facing};
use crate::sim::rect::Rect;
use crate::sim::tick::TickCtx;

/// Short blast animation left behind by a bullet impact
#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: EntityId,
    pub pos: Vec2,
    /// Fractional animation cursor; truncates to the frame index
    pub frame: f32,
    pub bounds: Rect,
    frames: [SpriteId; EXPLOSION_FRAMES as usize],
}

impl Explosion {
    pub fn new(id: EntityId, pos: Vec2, size: f32, assets: &Assets) -> Self {
        Self {
            id,
            pos,
            frame: 0.0,
            bounds: Rect::centered(pos, size, size),
            frames: assets.explosion_frames(),
        }
    }

    pub fn update(&mut self, ctx: &mut TickCtx) {
        self.frame += EXPLOSION_FRAME_STEP;
        if self.frame >= f32::from(EXPLOSION_FRAMES) {
            ctx.remove(self.id);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let index = (self.frame as usize).min(self.frames.len() - 1);
        surface.blit(self.frames[index], self.bounds, Facing::Up);
    }
}

/// What a pickup does to the tank that claims it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    /// Rank up: faster, shorter cooldown
    RankUp,
    /// One more life, capped
    ExtraLife,
    /// One hit point back, capped
    Heal,
}

/// Timed pickup; first tank to touch it takes the effect
#[derive(Debug, Clone)]
pub struct Bonus {
    pub id: EntityId,
    pub kind: BonusKind,
    pub bounds: Rect,
    pub ttl: u32,
    icon: SpriteId,
}

impl Bonus {
    pub fn new(id: EntityId, center: Vec2, kind: BonusKind, size: f32, assets: &Assets) -> Self {
        Self {
            id,
            kind,
            bounds: Rect::centered(center, size, size),
            ttl: BONUS_TTL_TICKS,
            icon: assets.bonus_icon(kind),
        }
    }

    /// Count down, then look for a claimant. Effect application and
    /// self-removal happen in the same tick, so a bonus overlapping two
    /// tanks at once still pays out exactly once, to the earlier one in
    /// registry order.
    pub fn update(&mut self, ctx: &mut TickCtx) {
        self.ttl = self.ttl.saturating_sub(1);
        if self.ttl == 0 {
            ctx.remove(self.id);
            return;
        }

        let claimant = ctx
            .registry
            .iter_live()
            .find(|e| e.kind() == EntityKind::Tank && e.bounds().intersects(&self.bounds))
            .map(|e| e.id());
        if let Some(claimant) = claimant {
            if let Some(Entity::Tank(tank)) = ctx.registry.get_mut(claimant) {
                match self.kind {
                    BonusKind::RankUp => tank.promote(),
                    BonusKind::ExtraLife => {
                        if tank.lives < MAX_LIVES {
                            tank.lives += 1;
                        }
                    }
                    BonusKind::Heal => {
                        if tank.hit_points < MAX_HIT_POINTS {
                            tank.hit_points += 1;
                        }
                    }
                }
            }
            ctx.play(SoundEffect::BonusCollected);
            ctx.remove(self.id);
        }
    }

    /// Blinks while waiting so players notice it
    pub fn draw(&self, surface: &mut dyn Surface) {
        if self.ttl % BONUS_BLINK_PERIOD < BONUS_BLINK_PERIOD / 2 {
            surface.blit(self.icon, self.bounds, Facing::Up);
        }
    }
}
