//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod contact;
pub mod locomotion;
pub mod obstacle;
pub mod physics;
pub mod player;
pub mod state;
pub mod terrain;
pub mod tick;

pub use contact::GroundContactTracker;
pub use locomotion::{AirState, AnimationState, LocomotionController, Stance};
pub use obstacle::Obstacle;
pub use physics::{
    BodyHandle, BodyKind, ColliderDesc, ColliderRegistry, CollisionEvent, CollisionPair,
    PhysicsHost,
};
pub use player::PlayerBody;
pub use state::{FrameOutput, GameEvent, ObstacleFrame, World};
pub use terrain::{Gap, Terrain, TerrainPiece, TerrainSegment, generate_terrain};
pub use tick::{TickInput, tick};
