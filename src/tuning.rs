//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be rebalanced from JSON
//! without touching the simulation. All speeds are per tick at
//! [`TICKS_PER_SECOND`](crate::consts::TICKS_PER_SECOND).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Serialize packed `0xRRGGBB` colours as `"#RRGGBB"` strings
mod hex_color {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(color: &u32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("#{:06X}", color & 0xFF_FFFF))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let raw = String::deserialize(d)?;
        crate::parse_hex_color(&raw)
            .ok_or_else(|| D::Error::custom(format!("expected #RRGGBB colour, got {raw:?}")))
    }
}

/// Frog movement and hazard tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrogTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal walk speed (also the "drop" push when pressing down)
    pub speed: f32,
    /// Vertical velocity set on jump (negative is up)
    pub jump_impulse: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    /// How far the frog sinks into a pad when standing on it
    pub pad_sink: f32,
    /// Distance above the canvas bottom where the water starts
    pub water_margin: f32,
    /// Distance below the canvas bottom that kills even a grounded frog
    pub floor_margin: f32,
    pub invulnerable_ticks: u32,
}

impl Default for FrogTuning {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 40.0,
            speed: 5.0,
            jump_impulse: -22.0,
            gravity: 1.5,
            terminal_velocity: 15.0,
            pad_sink: 5.0,
            water_margin: 50.0,
            floor_margin: 50.0,
            invulnerable_ticks: 120,
        }
    }
}

/// Tongue tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TongueTuning {
    /// Maximum length, also the target acquisition radius
    pub max_length: f32,
    pub extension_speed: f32,
    pub retraction_speed: f32,
    /// Speed a caught fly is reeled toward the frog
    pub pull_speed: f32,
    /// A caught fly this close to the mouth is eaten
    pub deliver_radius: f32,
    /// Slack allowed when the tongue reaches a locked target
    pub target_tolerance: f32,
    /// Extra reach of the tongue tip when nothing is locked
    pub tip_margin: f32,
    pub points_per_fly: u64,
}

impl Default for TongueTuning {
    fn default() -> Self {
        Self {
            max_length: 200.0,
            extension_speed: 12.0,
            retraction_speed: 18.0,
            pull_speed: 12.0,
            deliver_radius: 25.0,
            target_tolerance: 5.0,
            tip_margin: 8.0,
            points_per_fly: 10,
        }
    }
}

/// Lily pad field tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadTuning {
    pub start_width: f32,
    pub height: f32,
    /// Start pad sits this far above the canvas bottom
    pub start_bottom_offset: f32,
    /// Pads generated on reset (start pad included)
    pub initial_count: usize,
    pub min_width: f32,
    pub max_width: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Max vertical change from the previous pad (either direction)
    pub vertical_jitter: f32,
    pub min_y: f32,
    /// Lowest pad y, measured up from the canvas bottom
    pub bottom_clearance: f32,
    /// Extra leftward speed on create/recycle
    pub speed_jitter: f32,
    /// Extra leftward speed re-rolled every tick
    pub tick_speed_jitter: f32,
    /// A pad whose right edge passes this x is recycled
    pub recycle_x: f32,
    /// Visible window used for top-up counting: (left, width + right)
    pub window_left: f32,
    pub window_right: f32,
    pub min_visible: usize,
}

impl Default for PadTuning {
    fn default() -> Self {
        Self {
            start_width: 120.0,
            height: 20.0,
            start_bottom_offset: 100.0,
            initial_count: 15,
            min_width: 80.0,
            max_width: 120.0,
            min_gap: 80.0,
            max_gap: 160.0,
            vertical_jitter: 75.0,
            min_y: 100.0,
            bottom_clearance: 150.0,
            speed_jitter: 0.5,
            tick_speed_jitter: 0.3,
            recycle_x: -50.0,
            window_left: -100.0,
            window_right: 200.0,
            min_visible: 8,
        }
    }
}

/// Difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollTuning {
    pub base_speed: f32,
    pub ramp_per_tick: f32,
    pub max_speed: f32,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            ramp_per_tick: 0.0005,
            max_speed: 8.0,
        }
    }
}

/// Fly spawning and movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyTuning {
    pub radius: f32,
    #[serde(with = "hex_color")]
    pub color: u32,
    pub spawn_chance_base: f32,
    /// Added per unit of scroll speed above base
    pub spawn_chance_per_speed: f32,
    pub spawn_chance_max: f32,
    pub cap_base: u32,
    pub cap_per_speed: f32,
    pub cap_max: u32,
    /// Spawn box inset from the canvas edges (left/right/top)
    pub spawn_margin: f32,
    /// Spawn box inset from the canvas bottom
    pub spawn_bottom_margin: f32,
    pub initial_speed: f32,
    pub wander: f32,
    pub max_speed: f32,
    pub buzz_rate: f32,
    /// A collected fly this far past a side edge is dropped
    pub offscreen_margin: f32,
}

impl Default for FlyTuning {
    fn default() -> Self {
        Self {
            radius: 8.0,
            color: 0xFFD700,
            spawn_chance_base: 0.03,
            spawn_chance_per_speed: 0.005,
            spawn_chance_max: 0.08,
            cap_base: 3,
            cap_per_speed: 0.5,
            cap_max: 8,
            spawn_margin: 50.0,
            spawn_bottom_margin: 150.0,
            initial_speed: 1.0,
            wander: 0.1,
            max_speed: 3.0,
            buzz_rate: 0.1,
            offscreen_margin: 50.0,
        }
    }
}

/// Particle bursts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_decay: f32,
    pub max_decay: f32,
    pub drag: f32,
    pub max_particles: usize,
    pub capture_burst: usize,
    pub death_burst: usize,
    #[serde(with = "hex_color")]
    pub death_color: u32,
    pub respawn_burst: usize,
    #[serde(with = "hex_color")]
    pub respawn_color: u32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            min_radius: 2.0,
            max_radius: 5.0,
            min_decay: 0.02,
            max_decay: 0.04,
            drag: 0.98,
            max_particles: 512,
            capture_burst: 15,
            death_burst: 30,
            death_color: 0xFF6B6B,
            respawn_burst: 20,
            respawn_color: 0x7CB342,
        }
    }
}

/// Lives and deferred transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleTuning {
    pub lives: u8,
    pub respawn_delay_ticks: u64,
    pub game_over_delay_ticks: u64,
    /// Respawn pads must sit this far above the canvas bottom
    pub respawn_bottom_clearance: f32,
    /// Respawn pads must be within this margin of the screen horizontally
    pub respawn_window_margin: f32,
}

impl Default for LifecycleTuning {
    fn default() -> Self {
        Self {
            lives: crate::consts::STARTING_LIVES,
            respawn_delay_ticks: 48,
            game_over_delay_ticks: 60,
            respawn_bottom_clearance: 100.0,
            respawn_window_margin: 100.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub frog: FrogTuning,
    pub tongue: TongueTuning,
    pub pads: PadTuning,
    pub scroll: ScrollTuning,
    pub flies: FlyTuning,
    pub particles: ParticleTuning,
    pub lifecycle: LifecycleTuning,
}

/// Clamp a value to at least `min`, warning when it had to change
fn at_least(name: &str, value: &mut f32, min: f32) {
    if !(*value >= min) {
        log::warn!("tuning: {name} = {value} is out of range, clamping to {min}");
        *value = min;
    }
}

/// Swap a min/max pair that arrived reversed
fn ordered(name: &str, lo: &mut f32, hi: &mut f32) {
    if *lo > *hi {
        log::warn!("tuning: {name} range [{lo}, {hi}) is reversed, swapping");
        std::mem::swap(lo, hi);
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load a tuning table from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Correct values that would break the simulation (zero sizes, reversed
    /// ranges, non-positive speeds). Never fails.
    pub fn sanitized(mut self) -> Self {
        let f = &mut self.frog;
        at_least("frog.width", &mut f.width, 1.0);
        at_least("frog.height", &mut f.height, 1.0);
        at_least("frog.speed", &mut f.speed, 0.0);
        at_least("frog.gravity", &mut f.gravity, 0.0);
        at_least("frog.terminal_velocity", &mut f.terminal_velocity, 0.0);
        if !(f.jump_impulse <= 0.0) {
            log::warn!("tuning: frog.jump_impulse must point up, negating");
            f.jump_impulse = -f.jump_impulse.abs();
            if f.jump_impulse.is_nan() {
                f.jump_impulse = FrogTuning::default().jump_impulse;
            }
        }

        let t = &mut self.tongue;
        at_least("tongue.max_length", &mut t.max_length, 1.0);
        at_least("tongue.extension_speed", &mut t.extension_speed, 0.1);
        at_least("tongue.retraction_speed", &mut t.retraction_speed, 0.1);
        at_least("tongue.pull_speed", &mut t.pull_speed, 0.1);
        at_least("tongue.deliver_radius", &mut t.deliver_radius, 0.0);
        at_least("tongue.target_tolerance", &mut t.target_tolerance, 0.0);
        at_least("tongue.tip_margin", &mut t.tip_margin, 0.0);

        let p = &mut self.pads;
        at_least("pads.start_width", &mut p.start_width, 1.0);
        at_least("pads.height", &mut p.height, 1.0);
        at_least("pads.min_width", &mut p.min_width, 1.0);
        at_least("pads.max_width", &mut p.max_width, 1.0);
        ordered("pads.width", &mut p.min_width, &mut p.max_width);
        at_least("pads.min_gap", &mut p.min_gap, 0.0);
        at_least("pads.max_gap", &mut p.max_gap, 0.0);
        ordered("pads.gap", &mut p.min_gap, &mut p.max_gap);
        at_least("pads.vertical_jitter", &mut p.vertical_jitter, 0.0);
        at_least("pads.speed_jitter", &mut p.speed_jitter, 0.0);
        at_least("pads.tick_speed_jitter", &mut p.tick_speed_jitter, 0.0);
        p.initial_count = p.initial_count.max(1);

        let s = &mut self.scroll;
        at_least("scroll.base_speed", &mut s.base_speed, 0.0);
        at_least("scroll.ramp_per_tick", &mut s.ramp_per_tick, 0.0);
        at_least("scroll.max_speed", &mut s.max_speed, s.base_speed);

        let fl = &mut self.flies;
        at_least("flies.radius", &mut fl.radius, 1.0);
        at_least("flies.spawn_chance_base", &mut fl.spawn_chance_base, 0.0);
        at_least("flies.spawn_chance_max", &mut fl.spawn_chance_max, 0.0);
        fl.spawn_chance_max = fl.spawn_chance_max.min(1.0);
        at_least("flies.max_speed", &mut fl.max_speed, 0.0);
        at_least("flies.wander", &mut fl.wander, 0.0);

        let pt = &mut self.particles;
        at_least("particles.max_speed", &mut pt.max_speed, 0.0);
        at_least("particles.min_radius", &mut pt.min_radius, 0.1);
        at_least("particles.max_radius", &mut pt.max_radius, 0.1);
        ordered("particles.radius", &mut pt.min_radius, &mut pt.max_radius);
        at_least("particles.min_decay", &mut pt.min_decay, 0.001);
        at_least("particles.max_decay", &mut pt.max_decay, 0.001);
        ordered("particles.decay", &mut pt.min_decay, &mut pt.max_decay);
        pt.drag = pt.drag.clamp(0.0, 1.0);

        if self.lifecycle.lives == 0 {
            log::warn!("tuning: lifecycle.lives = 0, using 1");
            self.lifecycle.lives = 1;
        }

        self
    }

    /// Chance per tick that a fly spawns at the given scroll speed
    pub fn fly_spawn_chance(&self, scroll_speed: f32) -> f32 {
        let f = &self.flies;
        let over = (scroll_speed - self.scroll.base_speed).max(0.0);
        (f.spawn_chance_base + over * f.spawn_chance_per_speed).min(f.spawn_chance_max)
    }

    /// Maximum number of roaming flies at the given scroll speed
    pub fn fly_cap(&self, scroll_speed: f32) -> usize {
        let f = &self.flies;
        let over = (scroll_speed - self.scroll.base_speed).max(0.0);
        let extra = (over * f.cap_per_speed).floor() as u32;
        f.cap_base.saturating_add(extra).min(f.cap_max) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "tongue": { "max_length": 250.0 } }"#).unwrap();
        assert_eq!(t.tongue.max_length, 250.0);
        assert_eq!(t.tongue.extension_speed, 12.0);
        assert_eq!(t.frog, FrogTuning::default());
    }

    #[test]
    fn test_colors_round_trip_as_hex() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        assert!(json.contains("\"#FFD700\""));
        assert!(Tuning::from_json(r#"{ "flies": { "color": "gold" } }"#).is_err());
    }

    #[test]
    fn test_sanitize_fixes_reversed_and_zero_values() {
        let mut t = Tuning::default();
        t.pads.min_gap = 200.0;
        t.pads.max_gap = 100.0;
        t.tongue.extension_speed = 0.0;
        t.frog.jump_impulse = 22.0;
        t.lifecycle.lives = 0;
        let t = t.sanitized();
        assert_eq!((t.pads.min_gap, t.pads.max_gap), (100.0, 200.0));
        assert!(t.tongue.extension_speed > 0.0);
        assert_eq!(t.frog.jump_impulse, -22.0);
        assert_eq!(t.lifecycle.lives, 1);
    }

    #[test]
    fn test_fly_spawn_scaling() {
        let t = Tuning::default();
        assert!((t.fly_spawn_chance(2.0) - 0.03).abs() < 1e-6);
        assert!((t.fly_spawn_chance(8.0) - 0.06).abs() < 1e-6);
        assert!((t.fly_spawn_chance(100.0) - 0.08).abs() < 1e-6);
        assert_eq!(t.fly_cap(2.0), 3);
        assert_eq!(t.fly_cap(4.0), 4);
        assert_eq!(t.fly_cap(8.0), 6);
        assert_eq!(t.fly_cap(100.0), 8);
    }

    #[test]
    fn test_huge_fly_cap_saturates() {
        let t = Tuning::from_json(
            r#"{ "flies": { "cap_base": 4294967295, "cap_per_speed": 1e30, "cap_max": 4294967295 } }"#,
        )
        .unwrap();
        assert_eq!(t.fly_cap(8.0), u32::MAX as usize);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Tuning::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
