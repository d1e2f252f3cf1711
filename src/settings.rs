//! Arena configuration
//!
//! Every piece of geometry and every timer in the simulation derives from
//! this struct, so a match is fully described by a config + RNG seed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Static configuration for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Arena width in pixels
    pub screen_width: f32,
    /// Arena height in pixels
    pub screen_height: f32,
    /// Grid cell size; tanks and blocks occupy one cell
    pub cell_size: f32,
    /// Target simulation/display rate
    pub fps: u32,
    /// Hit points a tank starts (and respawns) with
    pub hit_points: i32,
    /// Lives per tank; the round ends when one side runs out
    pub lives: u32,
    /// Base movement speed in pixels per tick
    pub speed: f32,
    /// Number of blocks placed at world generation
    pub block_count: usize,
    /// Chance that a spawned block is armored
    pub armor_probability: f64,
    /// Ticks between block replacement spawns
    pub block_cycle_ticks: u32,
    /// Grid rows at the top reserved for the HUD; no entity spawns there
    /// and tanks cannot enter
    pub reserved_rows: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 602.0,
            cell_size: 32.0,
            fps: 60,
            hit_points: 5,
            lives: 3,
            speed: 2.0,
            block_count: 150,
            armor_probability: 0.2,
            block_cycle_ticks: 600,
            reserved_rows: 2,
        }
    }
}

impl ArenaConfig {
    /// Grid columns that fit in the arena
    pub fn grid_width(&self) -> u32 {
        (self.screen_width / self.cell_size) as u32
    }

    /// Grid rows that fit in the arena
    pub fn grid_height(&self) -> u32 {
        (self.screen_height / self.cell_size) as u32
    }

    /// Height of the reserved top band in pixels
    pub fn reserved_band(&self) -> f32 {
        self.reserved_rows as f32 * self.cell_size
    }

    /// Fixed spawn point for player one (left side of the arena)
    pub fn player_one_spawn(&self) -> Vec2 {
        Vec2::new(
            (self.screen_width * 0.1).round(),
            (self.screen_height / 1.7).floor(),
        )
    }

    /// Fixed spawn point for player two (right side of the arena)
    pub fn player_two_spawn(&self) -> Vec2 {
        Vec2::new(
            (self.screen_width * 0.9).round(),
            (self.screen_height / 2.3).floor(),
        )
    }

    /// Parse a config from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the config to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = ArenaConfig::default();
        assert_eq!(config.grid_width(), 25);
        assert_eq!(config.grid_height(), 18);
        assert_eq!(config.reserved_band(), 64.0);
        assert_eq!(config.player_one_spawn(), Vec2::new(80.0, 354.0));
        assert_eq!(config.player_two_spawn(), Vec2::new(720.0, 261.0));
    }

    #[test]
    fn test_json_round_trip() {
        let config = ArenaConfig {
            block_count: 12,
            armor_probability: 0.5,
            ..Default::default()
        };
        let parsed = ArenaConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed, config);
    }
}
