//! Native shell: a self-driving demo round
//!
//! Everything interesting lives in the library. This binary wires the sim
//! to stand-in collaborators (null surface, null audio), paces frames to
//! the configured rate, and drives both tanks with a deterministic demo
//! input source until one side wins.

use std::error::Error;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tank_duel::audio::{AudioSink, NullAudio};
use tank_duel::input::{InputSnapshot, Key};
use tank_duel::render::{Assets, NullSurface};
use tank_duel::sim::{self, GamePhase};
use tank_duel::{ArenaConfig, GameState};

fn main() {
    env_logger::init();
    log::info!("Tank Duel starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("failed to load config: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Optional first argument: path to an `ArenaConfig` JSON file
fn load_config() -> Result<ArenaConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let config = ArenaConfig::from_json(&json)?;
            log::info!("loaded config from {path}");
            Ok(config)
        }
        None => Ok(ArenaConfig::default()),
    }
}

fn run(config: ArenaConfig) -> Result<(), Box<dyn Error>> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(42);
    log::info!("demo round with seed {seed}");

    let frame = Duration::from_secs_f64(1.0 / f64::from(config.fps));
    let mut state = GameState::new(config, Assets::placeholder(), seed)?;
    let mut surface = NullSurface::default();
    let mut audio = NullAudio;
    let mut next_frame = Instant::now() + frame;

    loop {
        let input = demo_input(state.time_ticks);
        sim::tick(&mut state, &input)?;
        for effect in state.drain_audio() {
            audio.play(effect);
        }
        sim::draw(&state, &mut surface);

        if let GamePhase::GameOver { winner } = state.phase {
            match winner {
                Some(color) => log::info!("{} tank wins the demo round", color.label()),
                None => log::info!("the demo round is a draw"),
            }
            break;
        }
        // Demo rounds do not run forever
        if state.time_ticks > 60 * u64::from(state.config.fps) {
            log::info!("demo time limit reached");
            break;
        }

        let now = Instant::now();
        if next_frame > now {
            std::thread::sleep(next_frame - now);
        }
        next_frame += frame;
    }
    Ok(())
}

/// Deterministic stand-in for two keyboards: each tank holds a hashed
/// direction for half a second at a time and never lets go of the trigger.
fn demo_input(ticks: u64) -> InputSnapshot {
    const P1_MOVES: [Key; 4] = [Key::A, Key::D, Key::W, Key::S];
    const P2_MOVES: [Key; 4] = [Key::Left, Key::Right, Key::Up, Key::Down];

    let mut input = InputSnapshot::new();
    let phase = (ticks / 30) as u32;
    let p1 = phase.wrapping_mul(2654435761) % 4;
    let p2 = phase.wrapping_mul(7919).wrapping_add(1) % 4;
    input.press(P1_MOVES[p1 as usize]);
    input.press(P2_MOVES[p2 as usize]);
    input.press(Key::Space);
    input.press(Key::Return);
    input
}
