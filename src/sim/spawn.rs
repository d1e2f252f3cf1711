//! Random non-colliding placement
//!
//! Shared by world generation, the block replacement cycle, and tank
//! respawns. The search is bounded: a full arena is a configuration
//! problem and surfaces as an error instead of an infinite loop.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::MAX_PLACEMENT_ATTEMPTS;
use crate::settings::ArenaConfig;
use crate::sim::SimError;
use crate::sim::rect::Rect;
use crate::sim::registry::Registry;

/// Sample random grid cells below the reserved top band until one is free
/// of every live entity's bounds. Returns the cell's top-left corner.
pub fn random_free_cell(
    registry: &Registry,
    config: &ArenaConfig,
    rng: &mut Pcg32,
) -> Result<Vec2, SimError> {
    let cell = config.cell_size;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let gx = rng.random_range(0..config.grid_width());
        let gy = rng.random_range(config.reserved_rows..config.grid_height());
        let candidate = Rect::new(gx as f32 * cell, gy as f32 * cell, cell, cell);
        if registry
            .iter_live()
            .all(|e| !e.bounds().intersects(&candidate))
        {
            return Ok(candidate.top_left());
        }
    }
    Err(SimError::PlacementExhausted {
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}
