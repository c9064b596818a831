//! World state and core simulation types
//!
//! Everything a session needs to replay deterministically lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::contact::GroundContactTracker;
use super::locomotion::{AnimationState, LocomotionController};
use super::obstacle::Obstacle;
use super::physics::{BodyHandle, BodyKind, ColliderDesc, CollisionEvent, PhysicsHost};
use super::player::PlayerBody;
use super::terrain::{Terrain, generate_terrain};
use crate::consts::*;
use crate::tuning::Tuning;

/// Gameplay events surfaced to the host (audio, effects, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    SpinStarted,
    SpinCompleted,
    Landed,
    Respawned,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Obstacle position for redraw
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleFrame {
    pub body: BodyHandle,
    pub pos: Vec2,
}

/// What the renderer needs each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub player_pos: Vec2,
    pub player_rotation: f32,
    pub animation: AnimationState,
    pub obstacles: Vec<ObstacleFrame>,
}

/// Complete world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub terrain: Terrain,
    /// Obstacles in creation order
    pub obstacles: Vec<Obstacle>,
    pub player: PlayerBody,
    pub contacts: GroundContactTracker,
    pub controller: LocomotionController,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl World {
    /// Generate a world, registering every collider with `host`.
    ///
    /// Terrain bodies are created first, then obstacles, then the player.
    /// `tuning` is expected to have passed [`Tuning::validate`].
    pub fn generate<H: PhysicsHost>(tuning: Tuning, seed: u64, host: &mut H) -> Self {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();

        let (terrain, obstacles) = generate_terrain(
            &tuning.world,
            &tuning.terrain,
            &tuning.obstacles,
            &mut rng,
            host,
        );

        let size = Vec2::splat(tuning.world.player_size);
        let body = host.create_body(&ColliderDesc {
            friction: 0.0,
            air_friction: PLAYER_AIR_FRICTION,
            restitution: PLAYER_BOUNCE,
            mass: Some(tuning.world.player_mass),
            label: "player",
            ..ColliderDesc::rect(BodyKind::Dynamic, tuning.world.spawn, size.x, size.y)
        });
        let player = PlayerBody::new(body, tuning.world.spawn, size, tuning.world.player_mass);

        log::info!(
            "World generated with seed {}: player {:?} at ({:.0}, {:.0})",
            seed,
            body,
            tuning.world.spawn.x,
            tuning.world.spawn.y
        );

        Self {
            seed,
            rng_state,
            contacts: GroundContactTracker::new(body),
            controller: LocomotionController::new(tuning.locomotion.clone()),
            tuning,
            terrain,
            obstacles,
            player,
            time_ticks: 0,
        }
    }

    /// Feed a host collision event to the contact tracker.
    ///
    /// Call for every event of a physics step before that frame's tick.
    pub fn handle_collision(&mut self, event: &CollisionEvent) {
        match event {
            CollisionEvent::Start(pair) => {
                self.contacts.on_collision_start(pair);
            }
            CollisionEvent::End(pair) => self.contacts.on_collision_end(pair),
        }
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> FrameOutput {
        FrameOutput {
            player_pos: self.player.pos,
            player_rotation: self.player.rotation,
            animation: self.controller.animation(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleFrame {
                    body: o.body,
                    pos: o.pos,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::{ColliderRegistry, CollisionPair};

    #[test]
    fn test_player_body_is_created_last() {
        let mut host = ColliderRegistry::new();
        let world = World::generate(Tuning::default(), 5, &mut host);

        let (last, desc) = host.bodies().last().unwrap();
        assert_eq!(*last, world.player.body);
        assert_eq!(desc.kind, BodyKind::Dynamic);
        assert_eq!(desc.mass, Some(PLAYER_MASS));
        assert_eq!(world.contacts.player(), world.player.body);
        assert_eq!(world.player.pos, world.tuning.world.spawn);
    }

    #[test]
    fn test_collision_events_reach_tracker() {
        let mut host = ColliderRegistry::new();
        let mut world = World::generate(Tuning::default(), 5, &mut host);
        let ground = world.terrain.segments().next().unwrap().body;
        let pair = CollisionPair::new(world.player.body, ground, Vec2::NEG_Y);

        world.handle_collision(&CollisionEvent::Start(pair));
        assert!(world.contacts.on_ground());
        world.handle_collision(&CollisionEvent::End(pair));
        assert!(!world.contacts.on_ground());
    }

    #[test]
    fn test_frame_lists_every_obstacle() {
        let mut host = ColliderRegistry::new();
        let world = World::generate(Tuning::default(), 9, &mut host);
        let frame = world.frame();
        assert_eq!(frame.obstacles.len(), world.obstacles.len());
        assert_eq!(frame.player_pos, world.player.pos);
        assert_eq!(frame.animation, AnimationState::Idle);
    }

    #[test]
    fn test_frame_json_uses_lowercase_animation_labels() {
        let world = World::generate(Tuning::default(), 9, &mut ColliderRegistry::new());
        let json = serde_json::to_value(world.frame()).unwrap();
        assert_eq!(json["animation"], "idle");
        assert_eq!(
            serde_json::to_value(AnimationState::Airborne).unwrap(),
            "airborne"
        );
    }
}
