//! Collision helpers
//!
//! Everything in this game is either an axis-aligned box (frog, lily pads) or
//! a circle (flies, tongue tip reach), so the tests stay simple.

use glam::Vec2;

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: boxes that only touch edges do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Check if a point lies strictly inside a circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Move `pos` toward `target` by at most `step`, never overshooting.
/// Returns the new position and the unit direction travelled.
pub fn step_toward(pos: Vec2, target: Vec2, step: f32) -> (Vec2, Vec2) {
    let to_target = target - pos;
    let dist = to_target.length();
    if dist <= f32::EPSILON {
        return (target, Vec2::ZERO);
    }
    let dir = to_target / dist;
    (pos + dir * step.min(dist), dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 40.0);
        let b = Rect::new(40.0, 35.0, 100.0, 20.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_rect_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 50.0, 40.0);
        let below = Rect::new(0.0, 40.0, 50.0, 20.0);
        let beside = Rect::new(50.0, 0.0, 50.0, 40.0);
        assert!(!a.overlaps(&below));
        assert!(!a.overlaps(&beside));
    }

    #[test]
    fn test_point_in_circle() {
        let c = Vec2::new(10.0, 10.0);
        assert!(point_in_circle(Vec2::new(12.0, 12.0), c, 8.0));
        assert!(!point_in_circle(Vec2::new(18.0, 10.0), c, 8.0));
    }

    #[test]
    fn test_step_toward_does_not_overshoot() {
        let (p, dir) = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0);
        assert_eq!(p, Vec2::new(4.0, 0.0));
        assert_eq!(dir, Vec2::new(1.0, 0.0));
        let (p, _) = step_toward(Vec2::ZERO, Vec2::new(3.0, 0.0), 4.0);
        assert_eq!(p, Vec2::new(3.0, 0.0));
        let (p, dir) = step_toward(Vec2::ONE, Vec2::ONE, 4.0);
        assert_eq!(p, Vec2::ONE);
        assert_eq!(dir, Vec2::ZERO);
    }
}
