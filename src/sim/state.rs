//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: every subsystem update takes
//! it explicitly, there is no process-wide state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fly::Fly;
use super::frog::Frog;
use super::input::PrevKeys;
use super::lily_pad::LilyPad;
use super::particle::Particle;
use super::tongue::Tongue;
use crate::Tuning;
use crate::consts::*;

/// Stable handle to a lily pad. A lookup miss means the reference is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PadId(pub u32);

/// Stable handle to a fly. A lookup miss means the reference is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlyId(pub u32);

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start command
    Start,
    /// Active gameplay
    Playing,
    /// Out of lives, waiting for restart
    GameOver,
}

/// World bounds (the canvas), origin top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl Bounds {
    /// Build bounds, clamping sizes too small for the field generators
    pub fn new(width: f32, height: f32) -> Self {
        let fix = |v: f32, min: f32, name: &str| {
            if v.is_finite() && v >= min {
                v
            } else {
                log::warn!("Canvas {} {} is unusable, clamping to {}", name, v, min);
                min
            }
        };
        Self {
            width: fix(width, MIN_CANVAS_WIDTH, "width"),
            height: fix(height, MIN_CANVAS_HEIGHT, "height"),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// What a deferred transition does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    Respawn,
    GameOver,
}

/// A transition scheduled for a future tick
///
/// Only valid while `generation` matches the state's generation; every reset
/// bumps the generation so stale death sequences never fire into a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub fire_at: u64,
    pub action: DeferredAction,
    pub generation: u32,
}

/// Things that happened during a tick, for HUD/audio collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    ScoreChanged { score: u64 },
    LivesChanged { lives: u8 },
    FlyCaught { fly: FlyId, points: u64 },
    /// Tongue fully retracted before the caught fly reached the frog
    FlyDropped { fly: FlyId },
    FrogDied { lives_left: u8 },
    FrogRespawned,
    GameOver { final_score: u64 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance table in effect for this run
    pub tuning: Tuning,
    /// Canvas bounds; all spawn and clamp math is relative to these
    pub bounds: Bounds,
    bounds_ready: bool,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Global leftward scroll baseline, ramps up every tick
    pub scroll_speed: f32,
    /// Playing ticks since the last reset
    pub time_ticks: u64,
    /// Bumped on every reset to invalidate scheduled events
    pub generation: u32,
    pub frog: Frog,
    pub tongue: Tongue,
    /// Lily pads in creation order
    pub pads: Vec<LilyPad>,
    pub flies: Vec<Fly>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Pending deferred transitions
    pub scheduled: Vec<ScheduledEvent>,
    /// Previous tick's edge-detected signals
    pub prev_keys: PrevKeys,
    /// Events emitted during the current tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed. The game starts in
    /// [`GamePhase::Start`] with an empty world.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let bounds = Bounds::default();
        let frog = Frog::new(&tuning.frog, bounds.center());
        let tongue = Tongue::new(frog.center());
        Self {
            seed,
            scroll_speed: tuning.scroll.base_speed,
            lives: tuning.lifecycle.lives,
            tuning,
            bounds,
            bounds_ready: false,
            phase: GamePhase::Start,
            score: 0,
            time_ticks: 0,
            generation: 0,
            frog,
            tongue,
            pads: Vec::new(),
            flies: Vec::new(),
            particles: Vec::new(),
            scheduled: Vec::new(),
            prev_keys: PrevKeys::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Canvas-ready hook: store bounds and recentre the frog
    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        self.bounds_ready = true;
        self.frog.center_at(self.bounds.center());
        self.tongue.anchor = self.frog.center();
        log::info!(
            "Canvas initialized: {} x {}",
            self.bounds.width,
            self.bounds.height
        );
    }

    /// Whether the host has reported real canvas bounds yet
    pub fn is_ready(&self) -> bool {
        self.bounds_ready
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events emitted so far this tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pad(&self, id: PadId) -> Option<&LilyPad> {
        self.pads.iter().find(|p| p.id == id)
    }

    pub fn fly(&self, id: FlyId) -> Option<&Fly> {
        self.flies.iter().find(|f| f.id == id)
    }

    pub fn fly_mut(&mut self, id: FlyId) -> Option<&mut Fly> {
        self.flies.iter_mut().find(|f| f.id == id)
    }

    /// Remove a fly from the world, returning it if it existed
    pub fn remove_fly(&mut self, id: FlyId) -> Option<Fly> {
        let idx = self.flies.iter().position(|f| f.id == id)?;
        Some(self.flies.remove(idx))
    }

    /// Add to the score (never decreases during play)
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.emit(GameEvent::ScoreChanged { score: self.score });
    }
}
