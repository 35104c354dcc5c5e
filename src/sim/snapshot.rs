//! Read-only view of a tick for renderers and the HUD
//!
//! Everything a drawing collaborator needs, already flattened: no handles to
//! resolve and nothing that can mutate the simulation.

use glam::Vec2;
use serde::Serialize;

use super::frog::{AnimState, Facing};
use super::state::{GamePhase, GameState};
use super::tongue::TongueState;

/// Pads further than this outside the canvas are not worth drawing
const PAD_DRAW_MARGIN: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrogView {
    pub pos: Vec2,
    pub size: Vec2,
    pub anim: AnimState,
    pub sprite: &'static str,
    pub frame: u32,
    pub facing: Facing,
    /// Draw at half alpha (invulnerability blink)
    pub faded: bool,
    pub dead: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PadView {
    pub pos: Vec2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlyView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub wing_offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TongueView {
    pub base: Vec2,
    pub tip: Vec2,
    pub state: TongueState,
}

/// Everything drawn for one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub width: f32,
    pub height: f32,
    pub frog: FrogView,
    pub pads: Vec<PadView>,
    /// Roaming flies only
    pub flies: Vec<FlyView>,
    /// The fly on the end of the tongue, drawn with the beam
    pub caught_fly: Option<FlyView>,
    pub particles: Vec<ParticleView>,
    /// Present while the tongue is out
    pub tongue: Option<TongueView>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let b = state.bounds;
        let frog = &state.frog;
        let fly_view = |f: &super::fly::Fly| FlyView {
            pos: f.pos,
            radius: f.radius,
            color: f.color,
            wing_offset: f.wing_offset(),
        };

        let tongue = &state.tongue;
        let tongue_view = (tongue.is_active() && tongue.length > 0.0).then(|| TongueView {
            base: tongue.anchor,
            tip: tongue.tip(),
            state: tongue.state,
        });

        Self {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            width: b.width,
            height: b.height,
            frog: FrogView {
                pos: frog.pos,
                size: Vec2::new(frog.width, frog.height),
                anim: frog.anim,
                sprite: frog.anim.sprite(),
                frame: frog.anim_frame,
                facing: frog.facing,
                faded: frog.blink(),
                dead: frog.dead,
            },
            pads: state
                .pads
                .iter()
                .filter(|p| p.right() >= -PAD_DRAW_MARGIN && p.pos.x <= b.width + PAD_DRAW_MARGIN)
                .map(|p| PadView {
                    pos: p.pos,
                    size: Vec2::new(p.width, p.height),
                })
                .collect(),
            flies: state
                .flies
                .iter()
                .filter(|f| !f.collected)
                .map(fly_view)
                .collect(),
            caught_fly: tongue.caught.and_then(|id| state.fly(id)).map(fly_view),
            particles: state
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    radius: p.radius,
                    color: p.color,
                    alpha: p.life.clamp(0.0, 1.0),
                })
                .collect(),
            tongue: tongue_view,
        }
    }
}
