//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod fly;
pub mod frog;
pub mod input;
pub mod lifecycle;
pub mod lily_pad;
pub mod particle;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod tongue;

pub use collision::Rect;
pub use fly::Fly;
pub use frog::{AnimState, Facing, Frog};
pub use input::{InputSignal, KeySet, PrevKeys};
pub use lifecycle::{Command, apply_command, frog_die, reset_game, respawn_frog};
pub use lily_pad::LilyPad;
pub use particle::Particle;
pub use snapshot::RenderSnapshot;
pub use state::{
    Bounds, DeferredAction, FlyId, GameEvent, GamePhase, GameState, PadId, ScheduledEvent,
};
pub use tick::{TickInput, tick};
pub use tongue::{Tongue, TongueState};

use rand::Rng;
use rand_pcg::Pcg32;

/// Uniform sample from `[lo, hi)`, or `lo` when the range is empty
pub(crate) fn random_span(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
