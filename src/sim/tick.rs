//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use serde::{Deserialize, Serialize};

use super::fly::update_flies;
use super::frog::update_frog;
use super::input::KeySet;
use super::lifecycle::{Command, apply_command, run_scheduled};
use super::lily_pad::update_lily_pads;
use super::particle::update_particles;
use super::state::{GamePhase, GameState};
use super::tongue::update_tongue;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Key state sampled at the start of the tick
    pub keys: KeySet,
    /// Start/restart button, applied before anything else
    pub command: Option<Command>,
}

impl TickInput {
    pub fn keys(keys: KeySet) -> Self {
        Self {
            keys,
            command: None,
        }
    }

    pub fn command(command: Command) -> Self {
        Self {
            keys: KeySet::default(),
            command: Some(command),
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if let Some(command) = input.command {
        apply_command(state, command);
    }

    // Start and game-over screens: nothing moves, but keep edge detection
    // current so a key held across the transition does not fire
    if state.phase != GamePhase::Playing {
        state.prev_keys.record(&input.keys);
        return;
    }

    state.time_ticks += 1;

    update_particles(&mut state.particles, state.tuning.particles.drag);
    update_lily_pads(state);
    update_flies(state);
    update_frog(state, &input.keys);
    update_tongue(state, &input.keys);
    state.prev_keys.record(&input.keys);

    run_scheduled(state);
}
