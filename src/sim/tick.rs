//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically. The host runs
//! its physics step, forwards that step's collision events through
//! [`World::handle_collision`], then calls [`tick`] once.

use super::state::{GameEvent, World};

/// Input held during a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump key state; the controller detects the press edge itself
    pub jump: bool,
    /// Both trick keys must be held to start a spin
    pub trick_a: bool,
    pub trick_b: bool,
}

impl TickInput {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const JUMP: u8 = 1 << 2;
    pub const TRICK_A: u8 = 1 << 3;
    pub const TRICK_B: u8 = 1 << 4;

    /// Unpack from a key bitmask (used across the wasm boundary)
    pub fn from_bits(bits: u8) -> Self {
        Self {
            left: bits & Self::LEFT != 0,
            right: bits & Self::RIGHT != 0,
            jump: bits & Self::JUMP != 0,
            trick_a: bits & Self::TRICK_A != 0,
            trick_b: bits & Self::TRICK_B != 0,
        }
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    world.time_ticks += 1;

    world
        .controller
        .update(&mut world.player, &world.contacts, input, &mut events);

    let obstacle_params = &world.tuning.obstacles;
    for obstacle in &mut world.obstacles {
        obstacle.step();
        if obstacle_params.follow_terrain {
            obstacle.snap_to_terrain(&world.terrain, obstacle_params.clearance);
        }
    }

    world.controller.recover_if_out_of_bounds(
        &mut world.player,
        &mut world.contacts,
        &world.tuning.world,
        &mut events,
    );

    events
}
