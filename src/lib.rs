//! Tank Duel - a two-player grid-arena tank game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `input`: Logical key snapshot consumed by the simulation
//! - `render`: Sprite handles and the draw surface abstraction
//! - `audio`: Sound effect events and the playback abstraction
//! - `settings`: Data-driven arena configuration

pub mod audio;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::ArenaConfig;
pub use sim::{GamePhase, GameState, SimError};

/// Game configuration constants
pub mod consts {
    /// Bullet bounding box is a small square centered on its position
    pub const BULLET_SIZE: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 5.0;
    pub const BULLET_DAMAGE: i32 = 1;
    pub const BULLET_HIT_POINTS: i32 = 1;

    /// Highest tank upgrade tier
    pub const MAX_RANK: u8 = 3;
    /// Armor blocks only yield to tanks at or above this rank
    pub const ARMOR_RANK_THRESHOLD: u8 = 3;
    /// Speed gained/lost per rank step
    pub const RANK_SPEED_STEP: f32 = 0.3;
    /// Cooldown ticks gained/lost per rank step
    pub const RANK_COOLDOWN_STEP: u32 = 10;
    /// Ticks between shots at rank 0
    pub const BASE_SHOOT_COOLDOWN: u32 = 90;
    /// Cooldown never drops below this, whatever the rank
    pub const MIN_SHOOT_COOLDOWN: u32 = 30;

    /// Explosion animation advance per tick
    pub const EXPLOSION_FRAME_STEP: f32 = 0.3;
    /// Number of explosion animation frames
    pub const EXPLOSION_FRAMES: u8 = 3;

    /// Ticks a bonus stays on the field before despawning
    pub const BONUS_TTL_TICKS: u32 = 400;
    /// Bonus blink cycle length while waiting to be picked up
    pub const BONUS_BLINK_PERIOD: u32 = 30;
    /// Randomized delay range between bonus spawns
    pub const BONUS_DELAY_MIN: u32 = 120;
    pub const BONUS_DELAY_MAX: u32 = 240;
    /// Extra-life bonus stops working at this many lives
    pub const MAX_LIVES: u32 = 6;
    /// Heal bonus stops working at this many hit points
    pub const MAX_HIT_POINTS: i32 = 9;

    /// Non-colliding placement search gives up after this many samples
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;
}
