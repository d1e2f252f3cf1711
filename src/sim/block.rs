//! Static obstacles
//!
//! One struct for both block flavors; `BlockKind` is the damage policy.
//! Armor blocks shrug off anything fired by a tank below the rank
//! threshold, brick blocks crumble to whatever hits them.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::ARMOR_RANK_THRESHOLD;
use crate::render::{Assets, SpriteId, Surface};
use crate::settings::ArenaConfig;
use crate::sim::SimError;
use crate::sim::entity::{Entity, EntityId, Facing};
use crate::sim::rect::Rect;
use crate::sim::registry::Registry;
use crate::sim::spawn;
use crate::sim::tick::Hit;

/// Block flavors; the damage policy, not a subclass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Brick,
    Armor,
}

/// A one-cell obstacle
#[derive(Debug, Clone)]
pub struct Block {
    pub id: EntityId,
    pub kind: BlockKind,
    pub bounds: Rect,
    pub hit_points: i32,
    sprite: SpriteId,
}

impl Block {
    pub fn new(id: EntityId, kind: BlockKind, bounds: Rect, assets: &Assets) -> Self {
        Self {
            id,
            kind,
            bounds,
            hit_points: 1,
            sprite: assets.block_sprite(kind),
        }
    }

    /// Apply a hit, honoring the armor gate. Returns true once destroyed.
    ///
    /// Armor gating needs the attacker's rank; a hit that reaches an armor
    /// block without one is a bug in the caller, not a gameplay situation,
    /// and fails fast.
    pub fn apply_damage(&mut self, hit: &Hit) -> bool {
        match self.kind {
            BlockKind::Brick => {
                self.hit_points -= hit.amount;
            }
            BlockKind::Armor => {
                let rank = hit
                    .attacker_rank
                    .expect("armor block damaged without attacker rank");
                if rank >= ARMOR_RANK_THRESHOLD {
                    self.hit_points -= hit.amount;
                }
            }
        }
        self.hit_points <= 0
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.blit(self.sprite, self.bounds, Facing::Up);
    }

    /// Place a new block on a random free grid cell and register it.
    /// Fails with `SimError::PlacementExhausted` if the arena is too
    /// crowded to fit one.
    pub fn spawn_non_colliding(
        registry: &mut Registry,
        config: &ArenaConfig,
        rng: &mut Pcg32,
        assets: &Assets,
    ) -> Result<EntityId, SimError> {
        let kind = if rng.random_bool(config.armor_probability) {
            BlockKind::Armor
        } else {
            BlockKind::Brick
        };
        let cell = spawn::random_free_cell(registry, config, rng)?;
        let id = registry.allocate_id();
        let bounds = Rect::new(cell.x, cell.y, config.cell_size, config.cell_size);
        Ok(registry.add(Entity::Block(Block::new(id, kind, bounds, assets))))
    }
}
