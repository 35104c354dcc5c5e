//! Demo controller
//!
//! Plays the game by producing the same key signals a player would. Used by
//! the headless runner and as an attract mode; it only reads the state.

use crate::sim::{GamePhase, GameState, InputSignal, KeySet, LilyPad};

/// Stop walking right past this fraction of the canvas
const MAX_ADVANCE: f32 = 0.6;
/// Horizontal dead zone when steering mid-air
const STEER_DEADZONE: f32 = 8.0;

/// Closest pad starting to the right of `x`
fn next_pad(state: &GameState, x: f32) -> Option<&LilyPad> {
    state
        .pads
        .iter()
        .filter(|p| p.pos.x > x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
}

/// Keys to hold this tick
pub fn drive(state: &GameState) -> KeySet {
    let mut keys = KeySet::new();
    if state.phase != GamePhase::Playing || state.frog.dead {
        return keys;
    }
    let frog = &state.frog;
    let center = frog.center();
    let front = frog.pos.x + frog.width;

    // Tongue: tap whenever something is in reach
    if !state.tongue.is_active() && !state.prev_keys.attack {
        let range = state.tuning.tongue.max_length;
        if state
            .flies
            .iter()
            .any(|f| !f.collected && f.pos.distance(center) < range)
        {
            keys.set(InputSignal::Space, true);
        }
    }

    if frog.grounded {
        let Some(pad) = frog.pad.and_then(|id| state.pad(id)) else {
            return keys;
        };
        if center.x < state.bounds.width * MAX_ADVANCE {
            keys.set(InputSignal::ArrowRight, true);
        }

        let near_edge = front >= pad.right() - frog.width * 0.25;
        let has_next = next_pad(state, pad.right()).is_some();
        // Our pad is about to carry us off the left edge
        let stranded = pad.right() < frog.width * 2.0;
        if near_edge && !has_next {
            // Wait for the field to top up instead of walking off
            keys.set(InputSignal::ArrowRight, false);
        }
        if ((near_edge && has_next) || stranded) && !state.prev_keys.jump {
            keys.set(InputSignal::ArrowUp, true);
        }
    } else {
        // Steer toward the nearest pad that is still below us
        let bottom = frog.pos.y + frog.height;
        let landing = state
            .pads
            .iter()
            .filter(|p| p.pos.y >= bottom - state.tuning.frog.pad_sink && p.right() > frog.pos.x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
        if let Some(pad) = landing {
            let target = pad.pos.x + pad.width / 2.0;
            if target > center.x + STEER_DEADZONE {
                keys.set(InputSignal::ArrowRight, true);
            } else if target < center.x - STEER_DEADZONE {
                keys.set(InputSignal::ArrowLeft, true);
            }
        }
    }

    keys
}
