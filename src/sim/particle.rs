//! Decorative particles
//!
//! Bursts spawned by captures, deaths and respawns. They drift, slow down
//! and fade; nothing else reads them.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::ParticleTuning;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// 1.0 at spawn, removed once it reaches 0
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
}

impl Particle {
    /// Advance one tick. Returns false once the particle has expired.
    pub fn update(&mut self, drag: f32) -> bool {
        self.pos += self.vel;
        self.life -= self.decay;
        self.vel *= drag;
        self.life > 0.0
    }
}

/// Spawn `count` particles at `at`, stopping at the configured cap
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    tuning: &ParticleTuning,
    at: Vec2,
    color: u32,
    count: usize,
) {
    let room = tuning.max_particles.saturating_sub(particles.len());
    let count = count.min(room);
    for _ in 0..count {
        let vel = Vec2::new(
            rng.random_range(-tuning.max_speed..=tuning.max_speed),
            rng.random_range(-tuning.max_speed..=tuning.max_speed),
        );
        particles.push(Particle {
            pos: at,
            vel,
            radius: rng.random_range(tuning.min_radius..=tuning.max_radius),
            color,
            life: 1.0,
            decay: rng.random_range(tuning.min_decay..=tuning.max_decay),
        });
    }
}

/// Move, fade and cull all particles
pub fn update_particles(particles: &mut Vec<Particle>, drag: f32) {
    particles.retain_mut(|p| p.update(drag));
}
