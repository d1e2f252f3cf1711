//! Game state
//!
//! A match is a config, a seed, and the registry. `GameState::new` builds
//! the whole arena; everything after that happens through `tick`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::SoundEffect;
use crate::consts::{BONUS_DELAY_MAX, BONUS_DELAY_MIN};
use crate::input::KeyBindings;
use crate::render::Assets;
use crate::settings::ArenaConfig;
use crate::sim::SimError;
use crate::sim::block::Block;
use crate::sim::entity::{Entity, Facing};
use crate::sim::registry::Registry;
use crate::sim::tank::{Tank, TankColor};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Tanks are fighting
    Playing,
    /// One side ran out of lives. `winner` is `None` when both tanks died
    /// in the same frame.
    GameOver { winner: Option<TankColor> },
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the match was built from; same seed + same inputs, same game
    pub seed: u64,
    pub config: ArenaConfig,
    pub assets: Assets,
    pub registry: Registry,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    /// Ticks until the next bonus appears
    pub(crate) bonus_timer: u32,
    /// Ticks until the block replacement cycle fires
    pub(crate) block_timer: u32,
    pub(crate) audio_events: Vec<SoundEffect>,
}

impl GameState {
    /// Build the arena: both tanks at their fixed spawn points, then the
    /// configured number of blocks scattered over free cells.
    pub fn new(config: ArenaConfig, assets: Assets, seed: u64) -> Result<Self, SimError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut registry = Registry::new();

        let id = registry.allocate_id();
        registry.add(Entity::Tank(Tank::new(
            id,
            TankColor::Red,
            config.player_one_spawn(),
            Facing::Up,
            KeyBindings::player_one(),
            &config,
            &assets,
        )));
        let id = registry.allocate_id();
        registry.add(Entity::Tank(Tank::new(
            id,
            TankColor::Blue,
            config.player_two_spawn(),
            Facing::Up,
            KeyBindings::player_two(),
            &config,
            &assets,
        )));

        for _ in 0..config.block_count {
            Block::spawn_non_colliding(&mut registry, &config, &mut rng, &assets)?;
        }
        log::info!(
            "arena ready: {} blocks on a {}x{} grid, seed {}",
            config.block_count,
            config.grid_width(),
            config.grid_height(),
            seed
        );

        let bonus_timer = rng.random_range(BONUS_DELAY_MIN..=BONUS_DELAY_MAX);
        let block_timer = config.block_cycle_ticks;
        Ok(Self {
            seed,
            config,
            assets,
            registry,
            phase: GamePhase::Playing,
            time_ticks: 0,
            rng,
            bonus_timer,
            block_timer,
            audio_events: Vec::new(),
        })
    }

    /// Take this frame's sound events for the shell to forward
    pub fn drain_audio(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.audio_events)
    }

    /// Both tanks, registry order (red first)
    pub fn tanks(&self) -> impl Iterator<Item = &Tank> {
        self.registry.tanks()
    }
}
