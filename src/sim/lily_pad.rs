//! Lily pad field
//!
//! A scrolling chain of pads. Pads that leave the screen on the left are
//! recycled past the rightmost pad, and the field is topped up whenever too
//! few pads are near the screen. The global scroll speed ramps up here.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::random_span;
use super::state::{Bounds, GameState, PadId};
use crate::tuning::PadTuning;

/// A lily pad platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LilyPad {
    pub id: PadId,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity, always leftward
    pub vel_x: f32,
}

impl LilyPad {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// Keep a pad inside the safe vertical band
fn clamp_pad_y(y: f32, bounds: &Bounds, tuning: &PadTuning) -> f32 {
    let lowest = bounds.height - tuning.bottom_clearance;
    // On a short canvas the band collapses to `min_y`
    y.min(lowest).max(tuning.min_y)
}

/// Leftward velocity for a pad at the current scroll speed
fn roll_velocity(state: &mut GameState, jitter: f32) -> f32 {
    -(state.scroll_speed + random_span(&mut state.rng, 0.0, jitter))
}

/// Position and velocity for a pad that follows `prev` (x, y, width)
fn roll_follower(state: &mut GameState, prev: (f32, f32, f32)) -> (Vec2, f32) {
    let (prev_x, prev_y, prev_width) = prev;
    let t = &state.tuning.pads;
    let (min_gap, max_gap, jitter, speed_jitter) =
        (t.min_gap, t.max_gap, t.vertical_jitter, t.speed_jitter);

    let gap = random_span(&mut state.rng, min_gap, max_gap);
    let dy = if jitter > 0.0 {
        state.rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    let y = clamp_pad_y(prev_y + dy, &state.bounds, &state.tuning.pads);
    let vel_x = roll_velocity(state, speed_jitter);
    (Vec2::new(prev_x + prev_width + gap, y), vel_x)
}

/// Index of the pad with the largest x, optionally ignoring one index
fn rightmost_index(pads: &[LilyPad], skip: Option<usize>) -> Option<usize> {
    pads.iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .max_by(|(_, a), (_, b)| a.pos.x.total_cmp(&b.pos.x))
        .map(|(i, _)| i)
}

/// Build the initial run of pads: a wide start pad near the bottom centre,
/// then a chain of reachable pads to the right
pub fn generate_initial_pads(state: &mut GameState) {
    state.pads.clear();

    let t = &state.tuning.pads;
    let (start_width, height, start_offset, count) =
        (t.start_width, t.height, t.start_bottom_offset, t.initial_count);
    let start = LilyPad {
        id: PadId(state.next_entity_id()),
        pos: Vec2::new(
            state.bounds.width / 2.0 - start_width / 2.0,
            state.bounds.height - start_offset,
        ),
        width: start_width,
        height,
        vel_x: -state.scroll_speed,
    };
    state.pads.push(start);

    for _ in 1..count {
        append_pad(state);
    }

    log::info!("Lily pads initialized: {}", state.pads.len());
}

/// Append a new pad after the rightmost one (or just off the right edge if
/// the field is empty)
pub fn append_pad(state: &mut GameState) -> PadId {
    let t = &state.tuning.pads;
    let (height, min_w, max_w, jitter) = (t.height, t.min_width, t.max_width, t.speed_jitter);
    let (pos, vel_x) = match rightmost_index(&state.pads, None) {
        Some(i) => {
            let prev = &state.pads[i];
            let prev = (prev.pos.x, prev.pos.y, prev.width);
            roll_follower(state, prev)
        }
        None => {
            let pos = Vec2::new(
                state.bounds.width + 50.0,
                state.bounds.height - state.tuning.pads.bottom_clearance,
            );
            (pos, roll_velocity(state, jitter))
        }
    };
    // Width is rolled once per pad and kept through recycling
    let width = random_span(&mut state.rng, min_w, max_w);

    let id = PadId(state.next_entity_id());
    state.pads.push(LilyPad {
        id,
        pos,
        width,
        height,
        vel_x,
    });
    id
}

/// Per-tick platform field update: scroll, recycle, top up, ramp difficulty
pub fn update_lily_pads(state: &mut GameState) {
    for pad in &mut state.pads {
        pad.pos.x += pad.vel_x;
    }

    // Recycle pads that scrolled off the left edge
    let recycle_x = state.tuning.pads.recycle_x;
    for i in 0..state.pads.len() {
        if state.pads[i].right() >= recycle_x {
            continue;
        }
        let anchor = rightmost_index(&state.pads, Some(i)).unwrap_or(i);
        let prev = &state.pads[anchor];
        let prev = (prev.pos.x, prev.pos.y, prev.width);
        let (pos, vel_x) = roll_follower(state, prev);
        let pad = &mut state.pads[i];
        log::debug!(
            "Recycling pad {:?} from x={:.1} to x={:.1}",
            pad.id,
            pad.pos.x,
            pos.x
        );
        pad.pos = pos;
        pad.vel_x = vel_x;
    }

    // Keep enough pads near the screen, but only grow the field while its
    // rightmost pad can still reach the window
    let t = &state.tuning.pads;
    let (left, right, min_visible) = (
        t.window_left,
        state.bounds.width + t.window_right,
        t.min_visible,
    );
    let visible = state
        .pads
        .iter()
        .filter(|p| p.pos.x > left && p.pos.x < right)
        .count();
    let frontier_inside = rightmost_index(&state.pads, None)
        .is_none_or(|i| state.pads[i].right() < right);
    if visible < min_visible && frontier_inside {
        append_pad(state);
    }

    // Difficulty ramp
    let s = &state.tuning.scroll;
    state.scroll_speed = (state.scroll_speed + s.ramp_per_tick).min(s.max_speed);

    let jitter = state.tuning.pads.tick_speed_jitter;
    for i in 0..state.pads.len() {
        let vel_x = roll_velocity(state, jitter);
        state.pads[i].vel_x = vel_x;
    }
}
