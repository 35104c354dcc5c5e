//! Game lifecycle
//!
//! Start / restart commands, death, deferred respawn and game over. Deferred
//! transitions are plain [`ScheduledEvent`] values stamped with the state's
//! generation, so a reset silently invalidates any pending death sequence.

use serde::{Deserialize, Serialize};

use super::lily_pad::generate_initial_pads;
use super::particle::spawn_burst;
use super::state::{DeferredAction, GameEvent, GamePhase, GameState, ScheduledEvent};
use super::tongue::Tongue;

/// External lifecycle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Leave the start screen
    Start,
    /// Full reset, from any phase
    Restart,
}

/// Apply a lifecycle command. Returns false if it was ignored.
pub fn apply_command(state: &mut GameState, command: Command) -> bool {
    match (command, state.phase) {
        (Command::Start, GamePhase::Start) | (Command::Restart, _) => {
            reset_game(state);
            true
        }
        (Command::Start, phase) => {
            log::warn!("Ignoring start command in phase {:?}", phase);
            false
        }
    }
}

/// Queue a deferred transition for the current game
fn schedule(state: &mut GameState, delay: u64, action: DeferredAction) {
    state.scheduled.push(ScheduledEvent {
        fire_at: state.time_ticks + delay,
        action,
        generation: state.generation,
    });
}

/// Kill the frog. No-op while already dead or invulnerable.
pub fn frog_die(state: &mut GameState) {
    if state.frog.dead || state.frog.invulnerable {
        return;
    }
    state.frog.dead = true;
    state.lives = state.lives.saturating_sub(1);
    let lives = state.lives;
    log::info!("Frog died, {} lives left", lives);
    state.emit(GameEvent::LivesChanged { lives });
    state.emit(GameEvent::FrogDied { lives_left: lives });

    let p = &state.tuning.particles;
    let (color, count) = (p.death_color, p.death_burst);
    let at = state.frog.center();
    spawn_burst(
        &mut state.particles,
        &mut state.rng,
        &state.tuning.particles,
        at,
        color,
        count,
    );

    let l = &state.tuning.lifecycle;
    if lives == 0 {
        let delay = l.game_over_delay_ticks;
        schedule(state, delay, DeferredAction::GameOver);
    } else {
        let delay = l.respawn_delay_ticks;
        schedule(state, delay, DeferredAction::Respawn);
    }
}

/// Bring the frog back on the first safe pad (or the canvas centre)
pub fn respawn_frog(state: &mut GameState) {
    let f = &state.tuning.frog;
    let (invulnerable_ticks, sink) = (f.invulnerable_ticks, f.pad_sink);
    let l = &state.tuning.lifecycle;
    let (margin, clearance) = (l.respawn_window_margin, l.respawn_bottom_clearance);
    let b = state.bounds;

    let frog = &mut state.frog;
    frog.dead = false;
    frog.invulnerable = invulnerable_ticks > 0;
    frog.invulnerable_ticks = invulnerable_ticks;

    let safe = state.pads.iter().find(|p| {
        p.pos.x > -margin && p.pos.x < b.width + margin && p.pos.y < b.height - clearance
    });
    match safe {
        Some(pad) => frog.place_on_pad(pad, sink),
        None => {
            log::warn!("No safe lily pad for respawn, using canvas centre");
            frog.center_at(b.center());
        }
    }
    frog.pos.x = frog.pos.x.clamp(0.0, (b.width - frog.width).max(0.0));
    frog.vel = glam::Vec2::ZERO;

    state.tongue.retract_fully();
    state.tongue.anchor = state.frog.center();

    let p = &state.tuning.particles;
    let (color, count) = (p.respawn_color, p.respawn_burst);
    let at = state.frog.center();
    spawn_burst(
        &mut state.particles,
        &mut state.rng,
        &state.tuning.particles,
        at,
        color,
        count,
    );
    state.emit(GameEvent::FrogRespawned);
    log::info!("Frog respawned at ({:.0}, {:.0})", at.x, at.y);
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.scheduled.clear();
    state.emit(GameEvent::GameOver {
        final_score: state.score,
    });
    log::info!("Game over, final score {}", state.score);
}

/// Start a fresh game: counters, difficulty, frog, tongue and all fields
pub fn reset_game(state: &mut GameState) {
    state.generation = state.generation.wrapping_add(1);
    state.scheduled.clear();
    state.phase = GamePhase::Playing;
    state.score = 0;
    state.lives = state.tuning.lifecycle.lives;
    state.scroll_speed = state.tuning.scroll.base_speed;
    state.time_ticks = 0;

    let center = state.bounds.center();
    state.frog.reset(&state.tuning.frog, center);
    state.tongue = Tongue::new(state.frog.center());

    state.pads.clear();
    state.flies.clear();
    state.particles.clear();
    generate_initial_pads(state);

    let sink = state.tuning.frog.pad_sink;
    if let Some(start) = state.pads.first() {
        state.frog.place_on_pad(start, sink);
        state.frog.grounded = true;
        state.frog.pad = Some(start.id);
    }
    state.tongue.anchor = state.frog.center();

    state.emit(GameEvent::GameStarted);
    state.emit(GameEvent::ScoreChanged { score: 0 });
    state.emit(GameEvent::LivesChanged { lives: state.lives });
    log::info!("Game started (generation {})", state.generation);
}

/// Fire every deferred transition that is due. Stale ones (from an earlier
/// generation, or arriving outside play) are dropped.
pub fn run_scheduled(state: &mut GameState) {
    let now = state.time_ticks;
    let (due, pending): (Vec<_>, Vec<_>) = state
        .scheduled
        .drain(..)
        .partition(|e| e.fire_at <= now);
    state.scheduled = pending;

    for event in due {
        if event.generation != state.generation || state.phase != GamePhase::Playing {
            log::debug!("Dropping stale {:?}", event.action);
            continue;
        }
        match event.action {
            DeferredAction::Respawn => respawn_frog(state),
            DeferredAction::GameOver => game_over(state),
        }
    }
}
