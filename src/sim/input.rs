//! Input signals
//!
//! The host delivers a flat set of named key states every tick. The
//! simulation folds aliases (arrows / WASD) and keeps the previous tick's
//! jump and attack signals for rising-edge detection.

use serde::{Deserialize, Serialize};

/// Named key signals, matching browser `KeyboardEvent.code` names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSignal {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    Space,
}

impl InputSignal {
    pub const ALL: [InputSignal; 9] = [
        InputSignal::ArrowUp,
        InputSignal::ArrowDown,
        InputSignal::ArrowLeft,
        InputSignal::ArrowRight,
        InputSignal::KeyW,
        InputSignal::KeyA,
        InputSignal::KeyS,
        InputSignal::KeyD,
        InputSignal::Space,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            InputSignal::ArrowUp => "ArrowUp",
            InputSignal::ArrowDown => "ArrowDown",
            InputSignal::ArrowLeft => "ArrowLeft",
            InputSignal::ArrowRight => "ArrowRight",
            InputSignal::KeyW => "KeyW",
            InputSignal::KeyA => "KeyA",
            InputSignal::KeyS => "KeyS",
            InputSignal::KeyD => "KeyD",
            InputSignal::Space => "Space",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Current pressed state of every signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pressed: [bool; 9],
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder helper: this set with `signal` held
    pub fn with(mut self, signal: InputSignal) -> Self {
        self.set(signal, true);
        self
    }

    pub fn set(&mut self, signal: InputSignal, pressed: bool) {
        self.pressed[signal.index()] = pressed;
    }

    pub fn is_pressed(&self, signal: InputSignal) -> bool {
        self.pressed[signal.index()]
    }

    /// Apply a raw key event. Returns false for codes the game ignores, so
    /// the host knows whether to swallow the event.
    pub fn apply_code(&mut self, code: &str, pressed: bool) -> bool {
        match InputSignal::from_code(code) {
            Some(signal) => {
                self.set(signal, pressed);
                true
            }
            None => false,
        }
    }

    pub fn up(&self) -> bool {
        self.is_pressed(InputSignal::ArrowUp) || self.is_pressed(InputSignal::KeyW)
    }

    pub fn down(&self) -> bool {
        self.is_pressed(InputSignal::ArrowDown) || self.is_pressed(InputSignal::KeyS)
    }

    pub fn left(&self) -> bool {
        self.is_pressed(InputSignal::ArrowLeft) || self.is_pressed(InputSignal::KeyA)
    }

    pub fn right(&self) -> bool {
        self.is_pressed(InputSignal::ArrowRight) || self.is_pressed(InputSignal::KeyD)
    }

    pub fn attack(&self) -> bool {
        self.is_pressed(InputSignal::Space)
    }

    /// Horizontal intent: -1, 0 or 1. Right wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.right() {
            1.0
        } else if self.left() {
            -1.0
        } else {
            0.0
        }
    }
}

/// Signals remembered from the previous tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevKeys {
    pub jump: bool,
    pub attack: bool,
}

impl PrevKeys {
    pub fn record(&mut self, keys: &KeySet) {
        self.jump = keys.up();
        self.attack = keys.attack();
    }

    /// Jump pressed this tick but not last tick
    pub fn jump_edge(&self, keys: &KeySet) -> bool {
        keys.up() && !self.jump
    }

    /// Attack pressed this tick but not last tick
    pub fn attack_edge(&self, keys: &KeySet) -> bool {
        keys.attack() && !self.attack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_fold() {
        let keys = KeySet::new().with(InputSignal::KeyW).with(InputSignal::KeyA);
        assert!(keys.up());
        assert!(keys.left());
        assert!(!keys.down());
        assert_eq!(keys.horizontal(), -1.0);
        assert_eq!(keys.with(InputSignal::ArrowRight).horizontal(), 1.0);
    }

    #[test]
    fn test_apply_code() {
        let mut keys = KeySet::new();
        assert!(keys.apply_code("Space", true));
        assert!(keys.attack());
        assert!(!keys.apply_code("Escape", true));
        assert!(keys.apply_code("Space", false));
        assert!(!keys.attack());
    }

    #[test]
    fn test_edges() {
        let mut prev = PrevKeys::default();
        let held = KeySet::new().with(InputSignal::ArrowUp).with(InputSignal::Space);
        assert!(prev.jump_edge(&held));
        assert!(prev.attack_edge(&held));
        prev.record(&held);
        assert!(!prev.jump_edge(&held));
        assert!(!prev.attack_edge(&held));
        prev.record(&KeySet::new());
        assert!(prev.jump_edge(&held));
    }

    #[test]
    fn test_codes_round_trip() {
        for s in InputSignal::ALL {
            assert_eq!(InputSignal::from_code(s.code()), Some(s));
        }
    }
}
