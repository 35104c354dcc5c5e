//! The frog (player entity)
//!
//! Grounding against the lily pads, walk/jump/drop intent, gravity, the water
//! hazard and the animation state machine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::input::KeySet;
use super::lifecycle::frog_die;
use super::lily_pad::LilyPad;
use super::state::{GameState, PadId};
use crate::tuning::FrogTuning;

/// Animation state, exactly one active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimState {
    Idle,
    Walking,
    Jumping,
    Falling,
    Attacking,
}

impl AnimState {
    /// Sprite sheet name for renderers
    pub fn sprite(&self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::Walking => "walking",
            AnimState::Jumping => "jumping",
            AnimState::Falling => "falling",
            AnimState::Attacking => "attack",
        }
    }

    /// Frame index for the ticks spent in this state
    pub fn frame(&self, timer: u32) -> u32 {
        match self {
            AnimState::Walking => (timer / 8) % 4,
            AnimState::Attacking => (timer / 3).min(3),
            AnimState::Jumping => (timer / 2).min(2),
            AnimState::Idle | AnimState::Falling => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frog {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub grounded: bool,
    /// Pad supporting the frog this tick
    pub pad: Option<PadId>,
    pub dead: bool,
    pub invulnerable: bool,
    pub invulnerable_ticks: u32,
    pub anim: AnimState,
    pub anim_frame: u32,
    /// Ticks spent in the current animation state
    pub anim_timer: u32,
    pub facing: Facing,
}

impl Frog {
    pub fn new(tuning: &FrogTuning, center: Vec2) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        Self {
            pos: center - size * 0.5,
            vel: Vec2::ZERO,
            width: tuning.width,
            height: tuning.height,
            grounded: false,
            pad: None,
            dead: false,
            invulnerable: false,
            invulnerable_ticks: 0,
            anim: AnimState::Idle,
            anim_frame: 0,
            anim_timer: 0,
            facing: Facing::Right,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Tongue anchor point
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn center_at(&mut self, center: Vec2) {
        self.pos = center - Vec2::new(self.width, self.height) * 0.5;
    }

    /// Stand centred on a pad, sunk `sink` into it
    pub fn place_on_pad(&mut self, pad: &LilyPad, sink: f32) {
        self.pos.x = pad.pos.x + pad.width / 2.0 - self.width / 2.0;
        self.pos.y = pad.pos.y - self.height + sink;
        self.vel = Vec2::ZERO;
    }

    /// Enter `next`; the frame and timer only reset on a real transition
    pub fn set_anim(&mut self, next: AnimState) {
        if self.anim != next {
            self.anim = next;
            self.anim_frame = 0;
            self.anim_timer = 0;
        }
    }

    /// Back to the pristine state used by a new game
    pub fn reset(&mut self, tuning: &FrogTuning, center: Vec2) {
        *self = Frog::new(tuning, center);
    }

    /// Whether a renderer should draw the frog faded this tick
    pub fn blink(&self) -> bool {
        self.invulnerable && (self.invulnerable_ticks / 5) % 2 == 0
    }
}

/// Per-tick player update
pub fn update_frog(state: &mut GameState, keys: &KeySet) {
    if state.frog.dead {
        return;
    }
    let t = state.tuning.frog.clone();
    let tongue_active = state.tongue.is_active();
    let jump_edge = state.prev_keys.jump_edge(keys);
    let bounds = state.bounds;

    let frog = &mut state.frog;
    if frog.invulnerable {
        frog.invulnerable_ticks = frog.invulnerable_ticks.saturating_sub(1);
        if frog.invulnerable_ticks == 0 {
            frog.invulnerable = false;
        }
    }

    // Grounding, first overlapping pad wins
    frog.grounded = false;
    frog.pad = None;
    for pad in &state.pads {
        if frog.rect().overlaps(&pad.rect()) {
            frog.grounded = true;
            frog.pad = Some(pad.id);
            frog.pos.y = pad.pos.y - frog.height + t.pad_sink;
            frog.pos.x += pad.vel_x;
            break;
        }
    }

    let move_x = keys.horizontal();
    frog.vel.x = move_x * t.speed;

    if frog.grounded {
        if jump_edge {
            frog.vel.y = t.jump_impulse;
        }
        if keys.down() {
            frog.vel.y = t.speed;
        }
    } else {
        frog.vel.y = (frog.vel.y + t.gravity).min(t.terminal_velocity);
    }

    frog.pos += frog.vel;
    frog.pos.x = frog.pos.x.clamp(0.0, (bounds.width - frog.width).max(0.0));
    if !frog.pos.is_finite() || !frog.vel.is_finite() {
        log::warn!("Frog had a non-finite state, recentring");
        frog.center_at(bounds.center());
        frog.vel = Vec2::ZERO;
    }

    let in_water = frog.pos.y > bounds.height - t.water_margin && !frog.grounded;
    let below_floor = frog.pos.y > bounds.height + t.floor_margin;
    let hazard = (in_water || below_floor) && !frog.invulnerable;

    if move_x > 0.0 {
        frog.facing = Facing::Right;
    } else if move_x < 0.0 {
        frog.facing = Facing::Left;
    }

    frog.anim_timer += 1;
    let next = if tongue_active {
        AnimState::Attacking
    } else if !frog.grounded {
        if frog.vel.y < 0.0 {
            AnimState::Jumping
        } else {
            AnimState::Falling
        }
    } else if move_x != 0.0 {
        AnimState::Walking
    } else {
        AnimState::Idle
    };
    frog.set_anim(next);
    frog.anim_frame = frog.anim.frame(frog.anim_timer);

    state.tongue.anchor = state.frog.center();

    if hazard {
        frog_die(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::input::InputSignal;
    use crate::sim::state::GamePhase;

    /// A playing state with one wide, stationary pad under the frog
    fn grounded_state(pad_y: f32) -> GameState {
        let mut state = GameState::new(5, Tuning::default());
        state.set_bounds(800.0, 600.0);
        state.phase = GamePhase::Playing;
        let id = PadId(state.next_entity_id());
        state.pads.push(LilyPad {
            id,
            pos: Vec2::new(300.0, pad_y),
            width: 200.0,
            height: 20.0,
            vel_x: 0.0,
        });
        let pad = state.pads[0].clone();
        state.frog.place_on_pad(&pad, 5.0);
        state
    }

    fn step(state: &mut GameState, keys: KeySet) {
        update_frog(state, &keys);
        state.prev_keys.record(&keys);
    }

    #[test]
    fn test_grounding_snaps_to_pad() {
        let mut state = grounded_state(400.0);
        state.frog.pos.y += 3.0;
        step(&mut state, KeySet::new());
        assert!(state.frog.grounded);
        assert_eq!(state.frog.pad, Some(state.pads[0].id));
        assert_eq!(state.frog.pos.y, 400.0 - 40.0 + 5.0);
        assert_eq!(state.frog.anim, AnimState::Idle);
    }

    #[test]
    fn test_frog_rides_its_pad() {
        let mut state = grounded_state(400.0);
        state.pads[0].vel_x = -3.0;
        let x = state.frog.pos.x;
        step(&mut state, KeySet::new());
        assert_eq!(state.frog.pos.x, x - 3.0);
    }

    #[test]
    fn test_jump_then_gravity() {
        // Pad at y=560 sits inside the water band; grounded frogs are safe
        let mut state = grounded_state(560.0);
        step(&mut state, KeySet::new().with(InputSignal::ArrowUp));
        assert_eq!(state.frog.vel.y, -22.0);
        assert!(state.frog.grounded);

        step(&mut state, KeySet::new());
        assert!(!state.frog.grounded);
        assert_eq!(state.frog.vel.y, -20.5);
        assert_eq!(state.frog.anim, AnimState::Jumping);

        step(&mut state, KeySet::new());
        assert_eq!(state.frog.vel.y, -19.0);
        assert!(!state.frog.dead);
    }

    #[test]
    fn test_held_jump_fires_once() {
        let mut state = grounded_state(400.0);
        let held = KeySet::new().with(InputSignal::KeyW);
        let mut impulses = 0;
        for _ in 0..60 {
            let before = state.frog.vel.y;
            step(&mut state, held);
            if state.frog.vel.y == -22.0 && before != -22.0 {
                impulses += 1;
            }
        }
        assert_eq!(impulses, 1);
    }

    #[test]
    fn test_no_horizontal_inertia_and_clamp() {
        let mut state = grounded_state(400.0);
        step(&mut state, KeySet::new().with(InputSignal::ArrowLeft));
        assert_eq!(state.frog.vel.x, -5.0);
        assert_eq!(state.frog.facing, Facing::Left);
        assert_eq!(state.frog.anim, AnimState::Walking);
        step(&mut state, KeySet::new());
        assert_eq!(state.frog.vel.x, 0.0);
        assert_eq!(state.frog.facing, Facing::Left);

        state.frog.pos.x = 2.0;
        state.pads.clear();
        step(&mut state, KeySet::new().with(InputSignal::ArrowLeft));
        assert_eq!(state.frog.pos.x, 0.0);
        state.frog.pos.x = 790.0;
        step(&mut state, KeySet::new().with(InputSignal::ArrowRight));
        assert_eq!(state.frog.pos.x, 750.0);
    }

    #[test]
    fn test_down_drops_off_pad() {
        let mut state = grounded_state(400.0);
        step(&mut state, KeySet::new().with(InputSignal::ArrowDown));
        assert_eq!(state.frog.vel.y, 5.0);
    }

    #[test]
    fn test_water_kills_airborne_frog() {
        let mut state = grounded_state(400.0);
        state.pads.clear();
        state.frog.pos.y = 555.0;
        step(&mut state, KeySet::new());
        assert!(state.frog.dead);
        assert_eq!(state.lives, 2);

        // Dead frogs ignore input
        let pos = state.frog.pos;
        step(&mut state, KeySet::new().with(InputSignal::ArrowLeft));
        assert_eq!(state.frog.pos, pos);
    }

    #[test]
    fn test_invulnerable_frog_survives_water() {
        let mut state = grounded_state(400.0);
        state.pads.clear();
        state.frog.invulnerable = true;
        state.frog.invulnerable_ticks = 10;
        state.frog.pos.y = 555.0;
        step(&mut state, KeySet::new());
        assert!(!state.frog.dead);
        assert_eq!(state.frog.invulnerable_ticks, 9);
    }

    #[test]
    fn test_invulnerability_expires() {
        let mut state = grounded_state(400.0);
        state.frog.invulnerable = true;
        state.frog.invulnerable_ticks = 2;
        step(&mut state, KeySet::new());
        assert!(state.frog.invulnerable);
        step(&mut state, KeySet::new());
        assert!(!state.frog.invulnerable);
    }

    #[test]
    fn test_anim_frames() {
        assert_eq!(AnimState::Walking.frame(33), 0);
        assert_eq!(AnimState::Walking.frame(15), 1);
        assert_eq!(AnimState::Attacking.frame(100), 3);
        assert_eq!(AnimState::Jumping.frame(3), 1);
        assert_eq!(AnimState::Jumping.frame(30), 2);
        assert_eq!(AnimState::Falling.frame(30), 0);
    }

    #[test]
    fn test_same_state_keeps_timer() {
        let mut state = grounded_state(400.0);
        let walk = KeySet::new().with(InputSignal::ArrowRight);
        for _ in 0..10 {
            step(&mut state, walk);
        }
        assert_eq!(state.frog.anim, AnimState::Walking);
        assert_eq!(state.frog.anim_timer, 9);
        assert_eq!(state.frog.anim_frame, 1);

        step(&mut state, KeySet::new());
        assert_eq!(state.frog.anim, AnimState::Idle);
        assert_eq!(state.frog.anim_timer, 0);
    }

    #[test]
    fn test_anchor_tracks_center() {
        let mut state = grounded_state(400.0);
        step(&mut state, KeySet::new().with(InputSignal::ArrowRight));
        assert_eq!(state.tongue.anchor, state.frog.center());
    }
}
