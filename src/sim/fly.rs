//! Flies
//!
//! Spawned at random with a population cap that grows with scroll speed.
//! Roaming flies buzz around and bounce off the canvas edges; they are only
//! ever removed by the tongue (eaten or dropped), or when a caught fly ends up
//! off-screen or orphaned.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::random_span;
use super::state::{FlyId, GameState};

/// A fly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fly {
    pub id: FlyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// Wing animation phase (cosmetic)
    pub buzz_phase: f32,
    /// Caught by the tongue; no longer roams
    pub collected: bool,
}

impl Fly {
    /// Wing flap offset for renderers
    pub fn wing_offset(&self) -> f32 {
        self.buzz_phase.sin() * 3.0
    }
}

/// Number of flies still roaming
pub fn active_fly_count(flies: &[Fly]) -> usize {
    flies.iter().filter(|f| !f.collected).count()
}

/// Roll for a new fly. Suppressed when the roaming population is at the cap,
/// whatever the roll.
pub fn try_spawn_fly(state: &mut GameState) -> Option<FlyId> {
    let cap = state.tuning.fly_cap(state.scroll_speed);
    if active_fly_count(&state.flies) >= cap {
        return None;
    }
    let chance = state.tuning.fly_spawn_chance(state.scroll_speed);
    if state.rng.random::<f32>() >= chance {
        return None;
    }

    let t = &state.tuning.flies;
    let (margin, bottom, speed, radius, color) = (
        t.spawn_margin,
        t.spawn_bottom_margin,
        t.initial_speed,
        t.radius,
        t.color,
    );
    let b = state.bounds;
    let pos = Vec2::new(
        random_span(&mut state.rng, margin, b.width - margin),
        random_span(&mut state.rng, margin, b.height - bottom),
    );
    let vel = Vec2::new(
        random_span(&mut state.rng, -speed, speed),
        random_span(&mut state.rng, -speed, speed),
    );
    let buzz_phase = random_span(&mut state.rng, 0.0, std::f32::consts::TAU);

    let id = FlyId(state.next_entity_id());
    state.flies.push(Fly {
        id,
        pos,
        vel,
        radius,
        color,
        buzz_phase,
        collected: false,
    });
    log::debug!("Spawned fly {:?} at ({:.0}, {:.0})", id, pos.x, pos.y);
    Some(id)
}

/// Per-tick collectible field update
pub fn update_flies(state: &mut GameState) {
    try_spawn_fly(state);

    let t = &state.tuning.flies;
    let (buzz_rate, wander, max_speed, offscreen) =
        (t.buzz_rate, t.wander, t.max_speed, t.offscreen_margin);
    let bounds = state.bounds;

    for fly in &mut state.flies {
        fly.buzz_phase = (fly.buzz_phase + buzz_rate) % std::f32::consts::TAU;
        if fly.collected {
            continue;
        }

        fly.pos += fly.vel;

        // Bounce back toward the interior
        if fly.pos.x < fly.radius {
            fly.vel.x = fly.vel.x.abs();
        } else if fly.pos.x > bounds.width - fly.radius {
            fly.vel.x = -fly.vel.x.abs();
        }
        if fly.pos.y < fly.radius {
            fly.vel.y = fly.vel.y.abs();
        } else if fly.pos.y > bounds.height - fly.radius {
            fly.vel.y = -fly.vel.y.abs();
        }

        if wander > 0.0 {
            fly.vel += Vec2::new(
                state.rng.random_range(-wander..=wander),
                state.rng.random_range(-wander..=wander),
            );
        }
        fly.vel = fly.vel.clamp_length_max(max_speed);

        if !fly.pos.is_finite() || !fly.vel.is_finite() {
            log::warn!("Fly {:?} had a non-finite state, recentring", fly.id);
            fly.pos = bounds.center();
            fly.vel = Vec2::ZERO;
        }
    }

    // A collected fly only survives while it is the tongue's catch and on screen
    let caught = state.tongue.caught;
    state.flies.retain(|fly| {
        if !fly.collected {
            return true;
        }
        let on_screen = fly.pos.x >= -offscreen && fly.pos.x <= bounds.width + offscreen;
        caught == Some(fly.id) && on_screen
    });
    if caught.is_some_and(|id| state.fly(id).is_none()) {
        log::debug!("Caught fly {:?} left the screen", caught);
        state.tongue.caught = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;

    fn state_with(tuning: Tuning) -> GameState {
        let mut state = GameState::new(9, tuning);
        state.set_bounds(800.0, 600.0);
        state
    }

    fn always_spawn() -> Tuning {
        let mut t = Tuning::default();
        t.flies.spawn_chance_base = 1.0;
        t.flies.spawn_chance_max = 1.0;
        t
    }

    #[test]
    fn test_spawn_inside_safe_box() {
        let mut state = state_with(always_spawn());
        let id = try_spawn_fly(&mut state).unwrap();
        let fly = state.fly(id).unwrap();
        assert!(fly.pos.x >= 50.0 && fly.pos.x < 750.0);
        assert!(fly.pos.y >= 50.0 && fly.pos.y < 450.0);
        assert!(!fly.collected);
        assert_eq!(fly.color, 0xFFD700);
    }

    #[test]
    fn test_spawn_suppressed_at_cap() {
        let mut state = state_with(always_spawn());
        let cap = state.tuning.fly_cap(state.scroll_speed);
        for _ in 0..cap {
            assert!(try_spawn_fly(&mut state).is_some());
        }
        assert_eq!(active_fly_count(&state.flies), cap);
        assert!(try_spawn_fly(&mut state).is_none());
        assert_eq!(state.flies.len(), cap);
    }

    #[test]
    fn test_collected_flies_do_not_count_toward_cap() {
        let mut state = state_with(always_spawn());
        let cap = state.tuning.fly_cap(state.scroll_speed);
        for _ in 0..cap {
            try_spawn_fly(&mut state);
        }
        state.flies[0].collected = true;
        assert!(try_spawn_fly(&mut state).is_some());
    }

    #[test]
    fn test_roaming_flies_stay_in_bounds_and_under_speed() {
        let mut state = state_with(always_spawn());
        for _ in 0..600 {
            update_flies(&mut state);
        }
        assert!(!state.flies.is_empty());
        for fly in &state.flies {
            assert!(fly.vel.length() <= 3.0 + 1e-4);
            assert!(fly.pos.x > -10.0 && fly.pos.x < 810.0);
            assert!(fly.pos.y > -10.0 && fly.pos.y < 610.0);
        }
    }

    #[test]
    fn test_orphaned_collected_fly_is_removed() {
        let mut state = state_with(Tuning::default());
        state.tuning.flies.spawn_chance_max = 0.0;
        let id = FlyId(state.next_entity_id());
        state.flies.push(Fly {
            id,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            radius: 8.0,
            color: 0xFFD700,
            buzz_phase: 0.0,
            collected: true,
        });
        update_flies(&mut state);
        assert!(state.fly(id).is_none());
    }

    #[test]
    fn test_caught_fly_off_screen_is_removed() {
        let mut state = state_with(Tuning::default());
        state.tuning.flies.spawn_chance_max = 0.0;
        let id = FlyId(state.next_entity_id());
        state.flies.push(Fly {
            id,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            radius: 8.0,
            color: 0xFFD700,
            buzz_phase: 0.0,
            collected: true,
        });
        state.tongue.caught = Some(id);

        update_flies(&mut state);
        assert!(state.fly(id).is_some());

        state.fly_mut(id).unwrap().pos.x = -60.0;
        update_flies(&mut state);
        assert!(state.fly(id).is_none());
        assert_eq!(state.tongue.caught, None);
    }

    #[test]
    fn test_roaming_fly_off_screen_is_kept() {
        let mut state = state_with(Tuning::default());
        state.tuning.flies.spawn_chance_max = 0.0;
        let id = FlyId(state.next_entity_id());
        state.flies.push(Fly {
            id,
            pos: Vec2::new(-80.0, 100.0),
            vel: Vec2::ZERO,
            radius: 8.0,
            color: 0xFFD700,
            buzz_phase: 0.0,
            collected: false,
        });
        update_flies(&mut state);
        assert!(state.fly(id).is_some());
    }
}
