//! Player body state
//!
//! Mirror of the host's dynamic body. The host writes its integrated state in
//! before a tick and reads the controller's changes back out afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::BodyHandle;
use crate::consts::FORCE_STEP_SCALE;

/// The player's rigid body as seen by the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub body: BodyHandle,
    /// Centre position (y down)
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Unwrapped rotation (radians, clockwise)
    pub rotation: f32,
    /// Radians per tick
    pub angular_vel: f32,
    pub mass: f32,
    pub size: Vec2,
    /// Force accumulated this tick, handed to the host integrator
    force: Vec2,
}

impl PlayerBody {
    pub fn new(body: BodyHandle, pos: Vec2, size: Vec2, mass: f32) -> Self {
        Self {
            body,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            mass,
            size,
            force: Vec2::ZERO,
        }
    }

    /// Accumulate a force for the next integration step
    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    /// Force accumulated so far this tick
    pub fn pending_force(&self) -> Vec2 {
        self.force
    }

    /// Hand the accumulated force to the host and clear it
    pub fn take_force(&mut self) -> Vec2 {
        std::mem::take(&mut self.force)
    }

    /// Turn the accumulated force into a velocity change, as the host does
    /// during its step
    pub fn resolve_force(&mut self) {
        let force = self.take_force();
        self.vel += force / self.mass * FORCE_STEP_SCALE;
    }

    /// Overwrite kinematic state with what the host integrated
    pub fn sync_from_host(&mut self, pos: Vec2, vel: Vec2, rotation: f32, angular_vel: f32) {
        self.pos = pos;
        self.vel = vel;
        self.rotation = rotation;
        self.angular_vel = angular_vel;
    }

    /// Put the body back at `spawn`, at rest and upright
    pub fn reset_to(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.angular_vel = 0.0;
        self.force = Vec2::ZERO;
    }

    /// Lowest point of the body, ignoring rotation
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forces_accumulate_and_resolve() {
        let mut player = PlayerBody::new(BodyHandle(0), Vec2::ZERO, Vec2::splat(10.0), 10.0);
        player.apply_force(Vec2::new(0.01, 0.0));
        player.apply_force(Vec2::new(0.01, -0.02));
        assert_eq!(player.pending_force(), Vec2::new(0.02, -0.02));

        player.resolve_force();
        assert_eq!(player.pending_force(), Vec2::ZERO);
        let expected = 0.02 / 10.0 * FORCE_STEP_SCALE;
        assert!((player.vel.x - expected).abs() < 1e-4);
        assert!((player.vel.y + expected).abs() < 1e-4);
    }

    #[test]
    fn test_reset_to_spawn() {
        let mut player = PlayerBody::new(BodyHandle(0), Vec2::ZERO, Vec2::splat(10.0), 10.0);
        player.sync_from_host(Vec2::new(5.0, 900.0), Vec2::new(3.0, 9.0), 2.0, 0.4);
        player.apply_force(Vec2::ONE);
        player.reset_to(Vec2::new(100.0, 420.0));
        assert_eq!(player.pos, Vec2::new(100.0, 420.0));
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.rotation, 0.0);
        assert_eq!(player.angular_vel, 0.0);
        assert_eq!(player.pending_force(), Vec2::ZERO);
    }
}
