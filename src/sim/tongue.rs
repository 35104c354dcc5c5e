//! The tongue (attack mechanism)
//!
//! A beam rigidly attached to the frog's centre. It locks onto the nearest
//! fly in range when fired, extends until it reaches the fly (or its full
//! length), then retracts faster, reeling any catch in toward the frog.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{point_in_circle, step_toward};
use super::input::KeySet;
use super::particle::spawn_burst;
use super::state::{FlyId, GameEvent, GameState};
use crate::{angle_between, direction};

/// Aim used until the tongue has been aimed at something
pub const DEFAULT_AIM: f32 = -std::f32::consts::FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TongueState {
    None,
    Extending,
    Retracting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tongue {
    pub state: TongueState,
    /// Always in `[0, max_length]`, zero exactly when retracted
    pub length: f32,
    /// Base of the beam, the frog's centre
    pub anchor: Vec2,
    /// Direction angle in radians (screen space)
    pub angle: f32,
    /// Fly locked when the tongue was fired
    pub target: Option<FlyId>,
    /// Fly being reeled in, at most one
    pub caught: Option<FlyId>,
}

impl Tongue {
    pub fn new(anchor: Vec2) -> Self {
        Self {
            state: TongueState::None,
            length: 0.0,
            anchor,
            angle: DEFAULT_AIM,
            target: None,
            caught: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != TongueState::None
    }

    /// End point of the beam
    pub fn tip(&self) -> Vec2 {
        self.anchor + direction(self.angle) * self.length
    }

    /// Pull the tongue all the way in, dropping references. The aim is kept.
    pub fn retract_fully(&mut self) {
        self.state = TongueState::None;
        self.length = 0.0;
        self.target = None;
        self.caught = None;
    }
}

/// Nearest roaming fly strictly within `range` of `from`; the first one wins
/// a tie
fn nearest_fly(state: &GameState, from: Vec2, range: f32) -> Option<(FlyId, Vec2)> {
    let mut best: Option<(FlyId, Vec2, f32)> = None;
    for fly in state.flies.iter().filter(|f| !f.collected) {
        let dist = from.distance(fly.pos);
        if dist < range && best.is_none_or(|(_, _, d)| dist < d) {
            best = Some((fly.id, fly.pos, dist));
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}

/// Fire the tongue from the frog's current centre
fn fire(state: &mut GameState) {
    let anchor = state.frog.center();
    let locked = nearest_fly(state, anchor, state.tuning.tongue.max_length);

    let tongue = &mut state.tongue;
    tongue.state = TongueState::Extending;
    tongue.length = 0.0;
    tongue.anchor = anchor;
    tongue.caught = None;
    tongue.target = locked.map(|(id, _)| id);
    if let Some((id, pos)) = locked {
        tongue.angle = angle_between(anchor, pos);
        log::debug!("Tongue locked on fly {:?}", id);
    }
}

/// Mark a fly as caught and start reeling it in
fn capture(state: &mut GameState, id: FlyId) {
    if let Some(fly) = state.fly_mut(id) {
        fly.collected = true;
    }
    state.tongue.caught = Some(id);
    state.tongue.state = TongueState::Retracting;
    log::debug!("Tongue caught fly {:?}", id);
}

fn extend(state: &mut GameState) {
    let t = &state.tuning.tongue;
    let (speed, max_length, tolerance, margin) =
        (t.extension_speed, t.max_length, t.target_tolerance, t.tip_margin);

    let tongue = &mut state.tongue;
    tongue.length = (tongue.length + speed).min(max_length);

    // A target that vanished or was caught otherwise counts as no target
    let target = tongue
        .target
        .and_then(|id| state.flies.iter().find(|f| f.id == id && !f.collected));
    match target {
        Some(fly) => {
            if tongue.length >= tongue.anchor.distance(fly.pos) - tolerance {
                let id = fly.id;
                capture(state, id);
            }
        }
        None => {
            tongue.target = None;
            let tip = tongue.tip();
            let hit = state
                .flies
                .iter()
                .find(|f| !f.collected && point_in_circle(tip, f.pos, f.radius + margin))
                .map(|f| f.id);
            if let Some(id) = hit {
                capture(state, id);
            }
        }
    }

    let tongue = &mut state.tongue;
    if tongue.length >= max_length || tongue.caught.is_some() {
        tongue.state = TongueState::Retracting;
    }
}

fn retract(state: &mut GameState) {
    let t = &state.tuning.tongue;
    let (speed, pull, deliver, points) =
        (t.retraction_speed, t.pull_speed, t.deliver_radius, t.points_per_fly);

    state.tongue.length = (state.tongue.length - speed).max(0.0);
    let anchor = state.tongue.anchor;

    if let Some(id) = state.tongue.caught {
        match state.fly_mut(id) {
            Some(fly) => {
                // Pull first, then test delivery
                let (pos, dir) = step_toward(fly.pos, anchor, pull);
                fly.pos = pos;
                fly.vel = dir * pull;
                if fly.pos.distance(anchor) < deliver {
                    let color = fly.color;
                    state.remove_fly(id);
                    state.tongue.caught = None;
                    state.add_score(points);
                    spawn_burst(
                        &mut state.particles,
                        &mut state.rng,
                        &state.tuning.particles,
                        anchor,
                        color,
                        state.tuning.particles.capture_burst,
                    );
                    state.emit(GameEvent::FlyCaught { fly: id, points });
                    log::debug!("Ate fly {:?}, score {}", id, state.score);
                }
            }
            None => state.tongue.caught = None,
        }
    }

    if state.tongue.length <= 0.0 {
        if let Some(id) = state.tongue.caught {
            state.remove_fly(id);
            state.emit(GameEvent::FlyDropped { fly: id });
            log::debug!("Dropped fly {:?}", id);
        }
        state.tongue.retract_fully();
    }
}

/// Per-tick attack update. Runs after the frog so the anchor is current.
pub fn update_tongue(state: &mut GameState, keys: &KeySet) {
    state.tongue.anchor = state.frog.center();

    if state.tongue.state == TongueState::None
        && !state.frog.dead
        && state.prev_keys.attack_edge(keys)
    {
        fire(state);
    }

    if state.tongue.state == TongueState::Extending {
        extend(state);
    }
    if state.tongue.state == TongueState::Retracting {
        retract(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::sim::fly::Fly;
    use crate::sim::input::InputSignal;
    use crate::sim::state::GamePhase;

    fn attack() -> KeySet {
        KeySet::new().with(InputSignal::Space)
    }

    /// Frog hanging at the canvas centre with no pads; only the tongue runs
    fn state() -> GameState {
        let mut state = GameState::new(11, Tuning::default());
        state.set_bounds(800.0, 600.0);
        state.phase = GamePhase::Playing;
        state
    }

    fn add_fly(state: &mut GameState, offset: Vec2) -> FlyId {
        let id = FlyId(state.next_entity_id());
        let pos = state.frog.center() + offset;
        state.flies.push(Fly {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: 8.0,
            color: 0xFFD700,
            buzz_phase: 0.0,
            collected: false,
        });
        id
    }

    fn step(state: &mut GameState, keys: KeySet) {
        update_tongue(state, &keys);
        state.prev_keys.record(&keys);
    }

    #[test]
    fn test_locks_nearest_fly_and_captures() {
        let mut state = state();
        let far = add_fly(&mut state, Vec2::new(-120.0, 0.0));
        let near = add_fly(&mut state, Vec2::new(50.0, 0.0));

        step(&mut state, attack());
        assert_eq!(state.tongue.target, Some(near));
        assert_eq!(state.tongue.state, TongueState::Extending);
        assert_eq!(state.tongue.length, 12.0);

        for _ in 0..4 {
            step(&mut state, KeySet::new());
        }
        assert_eq!(state.tongue.state, TongueState::Retracting);
        assert_eq!(state.tongue.caught, Some(near));
        assert!(state.fly(near).unwrap().collected);
        assert!(!state.fly(far).unwrap().collected);
    }

    #[test]
    fn test_catch_is_delivered_and_scored() {
        let mut state = state();
        let id = add_fly(&mut state, Vec2::new(0.0, -50.0));
        step(&mut state, attack());
        for _ in 0..10 {
            step(&mut state, KeySet::new());
        }
        assert!(state.fly(id).is_none());
        assert_eq!(state.score, 10);
        assert_eq!(state.particles.len(), 15);
        assert_eq!(state.tongue.state, TongueState::None);
        assert_eq!(state.tongue.length, 0.0);
        assert!(state.events.contains(&GameEvent::FlyCaught { fly: id, points: 10 }));
        assert!(state.events.contains(&GameEvent::ScoreChanged { score: 10 }));
    }

    #[test]
    fn test_fly_locked_at_fifty_is_eaten_not_dropped() {
        let mut state = state();
        let id = add_fly(&mut state, Vec2::new(50.0, 0.0));
        step(&mut state, attack());
        let mut dropped = false;
        for _ in 0..10 {
            step(&mut state, KeySet::new());
            dropped |= state.events.contains(&GameEvent::FlyDropped { fly: id });
        }
        assert!(!dropped);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_no_fly_in_range_fires_straight_up() {
        let mut state = state();
        add_fly(&mut state, Vec2::new(250.0, 0.0));
        step(&mut state, attack());
        assert_eq!(state.tongue.target, None);
        assert_eq!(state.tongue.angle, DEFAULT_AIM);
        assert_eq!(state.tongue.state, TongueState::Extending);
    }

    #[test]
    fn test_misses_reach_max_length_then_retract() {
        let mut state = state();
        step(&mut state, attack());
        let mut flipped_at = None;
        for _ in 0..40 {
            let was = state.tongue.state;
            step(&mut state, KeySet::new());
            if was == TongueState::Extending && state.tongue.state == TongueState::Retracting {
                flipped_at = Some(state.tongue.length);
            }
            assert!(state.tongue.length >= 0.0 && state.tongue.length <= 200.0);
            assert_eq!(state.tongue.length == 0.0, state.tongue.state == TongueState::None);
        }
        // Clamped to 200, then the first retraction runs the same tick
        assert_eq!(flipped_at, Some(182.0));
        assert_eq!(state.tongue.state, TongueState::None);
    }

    #[test]
    fn test_tip_catches_unlocked_fly() {
        let mut state = state();
        step(&mut state, attack());
        assert_eq!(state.tongue.target, None);
        // A fly drifting onto the beam path after firing
        let id = add_fly(&mut state, Vec2::new(3.0, -40.0));
        for _ in 0..2 {
            step(&mut state, KeySet::new());
        }
        assert_eq!(state.tongue.caught, Some(id));
        assert!(state.fly(id).unwrap().collected);
    }

    #[test]
    fn test_undelivered_fly_is_dropped() {
        let mut state = state();
        state.tuning.tongue.pull_speed = 0.1;
        let id = add_fly(&mut state, Vec2::new(0.0, -100.0));
        step(&mut state, attack());
        for _ in 0..30 {
            step(&mut state, KeySet::new());
        }
        assert!(state.fly(id).is_none());
        assert_eq!(state.score, 0);
        assert_eq!(state.tongue.caught, None);
        assert!(state.events.contains(&GameEvent::FlyDropped { fly: id }));
    }

    #[test]
    fn test_held_attack_does_not_refire() {
        let mut state = state();
        for _ in 0..40 {
            step(&mut state, attack());
        }
        assert_eq!(state.tongue.state, TongueState::None);
        step(&mut state, KeySet::new());
        step(&mut state, attack());
        assert_eq!(state.tongue.state, TongueState::Extending);
    }

    #[test]
    fn test_anchor_follows_frog_mid_extension() {
        let mut state = state();
        step(&mut state, attack());
        state.frog.pos.x += 30.0;
        step(&mut state, KeySet::new());
        assert_eq!(state.tongue.anchor, state.frog.center());
    }

    #[test]
    fn test_dead_frog_cannot_fire() {
        let mut state = state();
        state.frog.dead = true;
        step(&mut state, attack());
        assert_eq!(state.tongue.state, TongueState::None);
    }
}
