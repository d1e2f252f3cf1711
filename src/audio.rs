//! Sound effect events
//!
//! The simulation emits `SoundEffect`s as gameplay happens; the shell
//! drains them each frame and forwards to whatever `AudioSink` it has.
//! Playback is fire-and-forget: a sink that cannot play simply doesn't.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A tank fired a bullet
    Shoot,
    /// A bullet struck a block (armored blocks clang even when unharmed)
    BlockHit,
    /// A tank took a hit and survived
    TankHit,
    /// A tank's hit points ran out
    TankDestroyed,
    /// A tank drove over a bonus
    BonusCollected,
}

/// Best-effort playback target
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Sink that swallows every effect; used headless and in tests
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("audio: {effect:?}");
    }
}
