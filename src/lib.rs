//! Frog Leap - a scrolling river arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (frog, tongue, lily pads, flies, lifecycle)
//! - `clock`: Fixed timestep accumulator for hosts
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences
//! - `autopilot`: Demo controller used by the headless runner

pub mod autopilot;
pub mod clock;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use clock::FrameClock;
pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate. All per-tick tuning values assume this rate.
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Canvas size used until the host reports real bounds
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
    /// Smallest canvas the field generators can work with
    pub const MIN_CANVAS_WIDTH: f32 = 320.0;
    pub const MIN_CANVAS_HEIGHT: f32 = 320.0;

    /// Lives at the start of a game
    pub const STARTING_LIVES: u8 = 3;
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction for an angle in screen space (y grows downward)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Parse a `#RRGGBB` colour into packed `0xRRGGBB`
pub fn parse_hex_color(s: &str) -> Option<u32> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
