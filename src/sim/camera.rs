//! Smoothed side-scrolling camera
//!
//! The camera chases a target placed half a viewport behind the player,
//! shifted ahead in the direction of travel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Logical (CSS-pixel) size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Camera position in world units (top-left of the view)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

impl Camera {
    /// Horizontal look-ahead for a given player velocity
    ///
    /// Scales with speed normalized against top run speed; a small dead band
    /// keeps the view steady while the player is nearly still.
    pub fn lead_for(vel_x: f32) -> f32 {
        if vel_x.abs() < CAMERA_LEAD_DEADBAND {
            return 0.0;
        }
        let top_speed = BASE_SPEED * RUN_MULTIPLIER;
        CAMERA_MAX_LEAD * (vel_x / top_speed).clamp(-1.0, 1.0)
    }

    /// Desired camera x for a player at `player_x` moving at `vel_x`
    pub fn target_x(player_x: f32, vel_x: f32, viewport: Viewport) -> f32 {
        player_x - viewport.width / 2.0 + Self::lead_for(vel_x)
    }

    /// Move x a fixed fraction of the way toward `target_x`, floored to whole units
    pub fn smooth_toward(&mut self, target_x: f32) {
        let x = self.pos.x + (target_x - self.pos.x) * CAMERA_SMOOTHING;
        self.pos.x = x.floor().max(0.0);
    }

    /// One follow step: smooth x toward the lead target, snap y to the player
    pub fn follow(&mut self, player_pos: Vec2, player_vel: Vec2, viewport: Viewport) {
        self.smooth_toward(Self::target_x(player_pos.x, player_vel.x, viewport));
        self.pos.y = (player_pos.y - viewport.height / 2.0).floor().max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothing_step() {
        let mut camera = Camera::default();
        camera.smooth_toward(1000.0);
        assert_eq!(camera.pos.x, 150.0);
        camera.smooth_toward(1000.0);
        // 150 + 850 * 0.15 = 277.5 -> floored
        assert_eq!(camera.pos.x, 277.0);
    }

    #[test]
    fn test_lead_dead_band() {
        assert_eq!(Camera::lead_for(0.0), 0.0);
        assert_eq!(Camera::lead_for(19.9), 0.0);
        assert_eq!(Camera::lead_for(-19.9), 0.0);
        assert!(Camera::lead_for(20.0) > 0.0);
        assert!(Camera::lead_for(-20.0) < 0.0);
    }

    #[test]
    fn test_lead_saturates() {
        let top = BASE_SPEED * RUN_MULTIPLIER;
        assert_eq!(Camera::lead_for(top), CAMERA_MAX_LEAD);
        assert_eq!(Camera::lead_for(top * 3.0), CAMERA_MAX_LEAD);
        assert_eq!(Camera::lead_for(-top * 3.0), -CAMERA_MAX_LEAD);
        assert!((Camera::lead_for(top / 2.0) - CAMERA_MAX_LEAD / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamped_at_origin() {
        let mut camera = Camera::default();
        let viewport = Viewport::new(960.0, 540.0);
        camera.follow(Vec2::new(40.0, 100.0), Vec2::new(-300.0, 0.0), viewport);
        assert_eq!(camera.pos, Vec2::ZERO);
    }

    #[test]
    fn test_vertical_follow() {
        let mut camera = Camera::default();
        let viewport = Viewport::new(800.0, 400.0);
        camera.follow(Vec2::new(0.0, 500.5), Vec2::ZERO, viewport);
        assert_eq!(camera.pos.y, 300.0);
    }
}
