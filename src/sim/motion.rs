//! Rope and claw kinematics
//!
//! Position is derived analytically from `(angle, length)` every tick rather
//! than integrated, so the drawn claw and the physics sensor never drift apart.
//!
//! Coordinates are relative to the rope pivot with y up: angle 0 hangs straight
//! down and increasing angle swings toward +x.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_CHASE_DT;

/// Swing angle for the given oscillator phase
#[inline]
pub fn swing_angle(clock: f32, speed: f32, range: f32) -> f32 {
    (clock * speed).sin() * range
}

/// Claw position for a rope of `length` at `angle`
#[inline]
pub fn endpoint(angle: f32, length: f32) -> Vec2 {
    Vec2::new(angle.sin() * length, -angle.cos() * length)
}

/// Sprite orientation for a claw at `endpoint`
#[inline]
pub fn facing_angle_degrees(endpoint: Vec2, offset_degrees: f32) -> f32 {
    endpoint.y.atan2(endpoint.x).to_degrees() + offset_degrees
}

/// Velocity that moves a body from `current` to `target` in one step
///
/// `dt` is clamped to `MIN_CHASE_DT` so tiny frame times don't blow up.
#[inline]
pub fn chase_velocity(current: Vec2, target: Vec2, dt: f32) -> Vec2 {
    (target - current) / dt.max(MIN_CHASE_DT)
}

/// Rope segment for the rendering backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeGeometry {
    /// Pivot, always the local origin
    pub origin: Vec2,
    /// Claw end of the rope
    pub endpoint: Vec2,
    pub width: f32,
    /// Length trimmed off the claw end when drawing
    pub hide_at_claw: f32,
}

impl RopeGeometry {
    pub fn new(endpoint: Vec2, width: f32, hide_at_claw: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            endpoint,
            width,
            hide_at_claw,
        }
    }

    /// Drawn end of the rope, pulled back by `hide_at_claw`
    ///
    /// At least one unit of rope is always left visible.
    pub fn visible_end(&self) -> Vec2 {
        let span = self.endpoint - self.origin;
        let len = span.length();
        if self.hide_at_claw <= 0.0 || len <= 0.0 {
            return self.endpoint;
        }
        let cut = self.hide_at_claw.min((len - 1.0).max(0.0));
        self.endpoint - span / len * cut
    }

    /// Corners of the rope drawn as a filled quad
    ///
    /// Returned in winding order: origin side, then claw side. Empty when the
    /// rope has no length.
    pub fn quad(&self) -> Option<[Vec2; 4]> {
        let end = self.visible_end();
        let dir = (end - self.origin).normalize_or_zero();
        if dir == Vec2::ZERO {
            return None;
        }
        let half = Vec2::new(-dir.y, dir.x) * self.width.max(1.0) * 0.5;
        Some([
            self.origin + half,
            self.origin - half,
            end - half,
            end + half,
        ])
    }
}

/// Claw placement for the rendering or physics backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClawPose {
    pub position: Vec2,
    pub angle_degrees: f32,
}

impl ClawPose {
    /// Linear velocity for a kinematic body last placed at `previous`
    pub fn chase_velocity(&self, previous: Vec2, dt: f32) -> Vec2 {
        chase_velocity(previous, self.position, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_swing_angle_bounded() {
        for i in 0..200 {
            let a = swing_angle(i as f32 * 0.05, 1.5, 0.5);
            assert!(a.abs() <= 0.5 + 1e-6);
        }
        assert_eq!(swing_angle(0.0, 1.5, 0.5), 0.0);
    }

    #[test]
    fn test_endpoint_hangs_down_at_zero() {
        assert!(approx(endpoint(0.0, 70.0), Vec2::new(0.0, -70.0)));
        assert!(approx(endpoint(FRAC_PI_2, 10.0), Vec2::new(10.0, 0.0)));
        assert!((endpoint(0.3, 120.0).length() - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_facing_angle() {
        // Hanging straight down with the default offset rests at -36 degrees
        let a = facing_angle_degrees(endpoint(0.0, 70.0), 54.0);
        assert!((a + 36.0).abs() < 1e-3);

        let a = facing_angle_degrees(Vec2::new(1.0, 0.0), 0.0);
        assert!(a.abs() < 1e-5);
        let a = facing_angle_degrees(Vec2::new(-1.0, 0.0), 0.0);
        assert!((a - PI.to_degrees()).abs() < 1e-3);
    }

    #[test]
    fn test_chase_velocity_clamps_dt() {
        let v = chase_velocity(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0 / 60.0);
        assert!((v.x - 60.0).abs() < 1e-3);

        // Tiny dt is clamped to 1/120
        let v = chase_velocity(Vec2::ZERO, Vec2::new(1.0, 0.0), 1e-6);
        assert!((v.x - 120.0).abs() < 1e-2);

        let v = chase_velocity(Vec2::ONE, Vec2::ONE, 0.0);
        assert_eq!(v, Vec2::ZERO);
    }

    #[test]
    fn test_visible_end_trims_claw_stub() {
        let rope = RopeGeometry::new(Vec2::new(0.0, -100.0), 2.0, 10.0);
        assert!(approx(rope.visible_end(), Vec2::new(0.0, -90.0)));

        // Never trims past one unit of rope
        let rope = RopeGeometry::new(Vec2::new(0.0, -5.0), 2.0, 10.0);
        assert!(approx(rope.visible_end(), Vec2::new(0.0, -1.0)));

        let rope = RopeGeometry::new(Vec2::new(0.0, -5.0), 2.0, 0.0);
        assert_eq!(rope.visible_end(), rope.endpoint);
    }

    #[test]
    fn test_quad_corners() {
        let rope = RopeGeometry::new(Vec2::new(0.0, -100.0), 4.0, 0.0);
        let quad = rope.quad().unwrap();
        // Rope points down, so the half-width runs along x
        assert!(approx(quad[0], Vec2::new(2.0, 0.0)));
        assert!(approx(quad[1], Vec2::new(-2.0, 0.0)));
        assert!(approx(quad[2], Vec2::new(-2.0, -100.0)));
        assert!(approx(quad[3], Vec2::new(2.0, -100.0)));

        assert!(RopeGeometry::new(Vec2::ZERO, 2.0, 0.0).quad().is_none());
    }
}
