//! Draw surface and asset lookup abstractions
//!
//! Entities hold opaque `SpriteId` handles picked up at construction and
//! issue draw calls against a `Surface`. What a handle maps to (a texture,
//! a glyph, nothing at all) is the shell's business.

use glam::Vec2;

use crate::consts::EXPLOSION_FRAMES;
use crate::sim::block::BlockKind;
use crate::sim::effects::BonusKind;
use crate::sim::entity::Facing;
use crate::sim::rect::Rect;
use crate::sim::tank::TankColor;

/// Number of tank skins, one per rank
pub const TANK_RANKS: usize = crate::consts::MAX_RANK as usize + 1;

/// Opaque handle into the shell's sprite store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteId(pub u16);

/// Sprite lookup table, filled in by the shell at startup
#[derive(Debug, Clone)]
pub struct Assets {
    pub tank_red: [SpriteId; TANK_RANKS],
    pub tank_blue: [SpriteId; TANK_RANKS],
    pub brick: SpriteId,
    pub armor: SpriteId,
    pub bang: [SpriteId; EXPLOSION_FRAMES as usize],
    pub bonus_star: SpriteId,
    pub bonus_tank: SpriteId,
    pub bonus_helmet: SpriteId,
}

impl Assets {
    /// Sequentially numbered handles; enough for headless runs and tests
    pub fn placeholder() -> Self {
        let mut next = 0u16;
        let mut id = || {
            next += 1;
            SpriteId(next - 1)
        };
        Self {
            tank_red: [id(), id(), id(), id()],
            tank_blue: [id(), id(), id(), id()],
            brick: id(),
            armor: id(),
            bang: [id(), id(), id()],
            bonus_star: id(),
            bonus_tank: id(),
            bonus_helmet: id(),
        }
    }

    /// Per-rank skin set for one side
    pub fn tank_skin(&self, color: TankColor) -> [SpriteId; TANK_RANKS] {
        match color {
            TankColor::Red => self.tank_red,
            TankColor::Blue => self.tank_blue,
        }
    }

    pub fn block_sprite(&self, kind: BlockKind) -> SpriteId {
        match kind {
            BlockKind::Brick => self.brick,
            BlockKind::Armor => self.armor,
        }
    }

    pub fn explosion_frames(&self) -> [SpriteId; EXPLOSION_FRAMES as usize] {
        self.bang
    }

    pub fn bonus_icon(&self, kind: BonusKind) -> SpriteId {
        match kind {
            BonusKind::RankUp => self.bonus_star,
            BonusKind::ExtraLife => self.bonus_tank,
            BonusKind::Heal => self.bonus_helmet,
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// One draw call per entity per frame goes through this
pub trait Surface {
    /// Draw a sprite into `dst`, rotated to face `facing`
    fn blit(&mut self, sprite: SpriteId, dst: Rect, facing: Facing);
    /// Draw a filled circle (bullets)
    fn circle(&mut self, center: Vec2, radius: f32);
}

/// Surface that only counts draw calls
#[derive(Debug, Default)]
pub struct NullSurface {
    pub blits: usize,
    pub circles: usize,
}

impl Surface for NullSurface {
    fn blit(&mut self, _sprite: SpriteId, _dst: Rect, _facing: Facing) {
        self.blits += 1;
    }

    fn circle(&mut self, _center: Vec2, _radius: f32) {
        self.circles += 1;
    }
}
