//! Fixed timestep accumulator
//!
//! Hosts call [`FrameClock::advance`] once per display frame with the wall
//! time since the previous frame and run that many simulation ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame gap we try to catch up on (e.g. after a tab switch)
const MAX_FRAME_TIME: f32 = 0.25;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Ticks dropped because a frame needed more than `MAX_SUBSTEPS`
    dropped_ticks: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed elapsed wall time (seconds) and get the number of ticks to run
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = if elapsed.is_finite() { elapsed.clamp(0.0, MAX_FRAME_TIME) } else { 0.0 };
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }

        // Spiral of death guard: drop whatever we could not simulate
        if self.accumulator >= SIM_DT {
            let behind = (self.accumulator / SIM_DT) as u64;
            self.dropped_ticks += behind;
            log::debug!("FrameClock dropping {} ticks", behind);
            self.accumulator %= SIM_DT;
        }

        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }

    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }
}
