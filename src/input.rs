//! Per-tick input snapshot
//!
//! The simulation never polls the keyboard; the shell captures whatever
//! backend it has into an `InputSnapshot` once per tick and hands it in.

use serde::{Deserialize, Serialize};

/// Logical keys the game recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Up,
    Down,
    Left,
    Right,
    Return,
}

pub const KEY_COUNT: usize = 10;

impl Key {
    fn index(self) -> usize {
        match self {
            Key::W => 0,
            Key::A => 1,
            Key::S => 2,
            Key::D => 3,
            Key::Space => 4,
            Key::Up => 5,
            Key::Down => 6,
            Key::Left => 7,
            Key::Right => 8,
            Key::Return => 9,
        }
    }
}

/// Movement and fire bindings for one tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Key,
    pub right: Key,
    pub up: Key,
    pub down: Key,
    pub shoot: Key,
}

impl KeyBindings {
    /// WASD + space, the left-side player
    pub fn player_one() -> Self {
        Self {
            left: Key::A,
            right: Key::D,
            up: Key::W,
            down: Key::S,
            shoot: Key::Space,
        }
    }

    /// Arrow keys + return, the right-side player
    pub fn player_two() -> Self {
        Self {
            left: Key::Left,
            right: Key::Right,
            up: Key::Up,
            down: Key::Down,
            shoot: Key::Return,
        }
    }
}

/// Key state for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pressed: [bool; KEY_COUNT],
    /// Window close / quit request
    pub quit: bool,
    /// Any key went down this tick; used for screen transitions
    pub any_key: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.pressed[key.index()] = true;
        self.any_key = true;
    }

    pub fn release(&mut self, key: Key) {
        self.pressed[key.index()] = false;
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }
}
