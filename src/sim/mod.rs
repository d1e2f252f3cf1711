//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - No rendering or platform dependencies

use std::fmt;

pub mod block;
pub mod bullet;
pub mod effects;
pub mod entity;
pub mod rect;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tank;
pub mod tick;

pub use block::{Block, BlockKind};
pub use bullet::Bullet;
pub use effects::{Bonus, BonusKind, Explosion};
pub use entity::{Entity, EntityId, EntityKind, Facing};
pub use rect::Rect;
pub use registry::Registry;
pub use state::{GamePhase, GameState};
pub use tank::{Tank, TankColor};
pub use tick::{Hit, TickCtx, draw, tick};

/// Fatal simulation errors. There is no retry: a real-time loop with no
/// persistent state either runs or stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// The bounded non-colliding placement search ran out of attempts;
    /// the arena is too crowded for the configuration.
    PlacementExhausted { attempts: u32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::PlacementExhausted { attempts } => write!(
                f,
                "no free cell found after {attempts} attempts; arena too crowded"
            ),
        }
    }
}

impl std::error::Error for SimError {}
