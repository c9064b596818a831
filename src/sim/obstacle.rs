//! Moving obstacles
//!
//! Kinematic boxes that patrol back and forth around the point they were
//! spawned at.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::BodyHandle;
use super::terrain::Terrain;

/// A patrolling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: BodyHandle,
    /// Centre position
    pub pos: Vec2,
    pub size: Vec2,
    /// Patrol anchor
    pub initial_x: f32,
    /// Half-width of the patrol span
    pub range: f32,
    /// +1.0 moving right, -1.0 moving left
    pub direction: f32,
    /// Pixels per tick
    pub speed: f32,
}

impl Obstacle {
    pub fn new(body: BodyHandle, pos: Vec2, size: Vec2, range: f32, direction: f32, speed: f32) -> Self {
        Self {
            body,
            pos,
            size,
            initial_x: pos.x,
            range,
            direction: direction.signum(),
            speed,
        }
    }

    /// Advance one tick, turning around once past either end of the patrol
    pub fn step(&mut self) {
        self.pos.x += self.direction * self.speed;

        if self.pos.x > self.initial_x + self.range {
            self.direction = -1.0;
        }
        if self.pos.x < self.initial_x - self.range {
            self.direction = 1.0;
        }
    }

    /// Rest on the terrain under the current x. Left alone over gaps.
    pub fn snap_to_terrain(&mut self, terrain: &Terrain, clearance: f32) {
        if let Some(surface) = terrain.height_at(self.pos.x) {
            self.pos.y = surface - self.size.y / 2.0 - clearance;
        }
    }

    /// Patrol bounds (min x, max x)
    pub fn bounds(&self) -> (f32, f32) {
        (self.initial_x - self.range, self.initial_x + self.range)
    }
}
