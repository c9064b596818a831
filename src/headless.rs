//! Stand-in physics for running without a host engine
//!
//! Integrates the player body the way the host does (force against the
//! squared step, constant gravity, air friction) and derives ground contacts
//! from the terrain profile directly under the player. Obstacles are not
//! collided. Good enough for the native runner and integration tests; the
//! real game relies on the host's solver.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{BodyHandle, CollisionEvent, CollisionPair, World};

/// How far above the surface the body may hover and still count as resting
const SNAP_TOLERANCE: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct HeadlessPhysics {
    /// Velocity added per step
    gravity: Vec2,
    /// Segment currently under the player
    support: Option<BodyHandle>,
}

impl Default for HeadlessPhysics {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, GRAVITY_SCALE * FORCE_STEP_SCALE),
            support: None,
        }
    }
}

impl HeadlessPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate one step and return the collision events it produced
    pub fn step(&mut self, world: &mut World) -> Vec<CollisionEvent> {
        let player = &mut world.player;
        player.resolve_force();
        player.vel += self.gravity;
        player.vel *= 1.0 - PLAYER_AIR_FRICTION;
        player.angular_vel *= 1.0 - PLAYER_AIR_FRICTION;
        player.pos += player.vel;
        player.rotation += player.angular_vel;

        let mut support = None;
        if let Some(segment) = world.terrain.segment_at(player.pos.x)
            && player.vel.y >= 0.0
            && let Some(surface) = segment.height_at(player.pos.x)
            && player.bottom() >= surface - SNAP_TOLERANCE
        {
            player.pos.y = surface - player.size.y / 2.0;
            player.vel.y = 0.0;
            let angle = segment.angle();
            support = Some((segment.body, Vec2::new(angle.sin(), -angle.cos())));
        }

        let mut events = Vec::new();
        let player_body = player.body;
        let new_support = support.map(|(body, _)| body);
        if new_support != self.support {
            if let Some(old) = self.support {
                events.push(CollisionEvent::End(CollisionPair::new(
                    player_body,
                    old,
                    Vec2::NEG_Y,
                )));
            }
            if let Some((body, normal)) = support {
                events.push(CollisionEvent::Start(CollisionPair::new(
                    player_body,
                    body,
                    normal,
                )));
            }
            self.support = new_support;
        }
        events
    }

    /// Forget the current support (after a respawn)
    pub fn reset(&mut self) {
        self.support = None;
    }
}
