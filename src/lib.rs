//! Skate Runner - side-scrolling skateboarding core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, ground contact, locomotion)
//! - `tuning`: Data-driven game balance
//! - `headless`: Minimal stand-in physics for native runs and tests
//! - `wasm`: Bridge to the browser-side game engine

pub mod error;
pub mod headless;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::ConfigError;
pub use tuning::{ControlLaw, SpinLimit, Tuning};

use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Host step length in milliseconds (60 Hz, one tick per frame)
    pub const STEP_MS: f32 = 1000.0 / 60.0;
    /// Velocity change per unit of force/mass applied for one step.
    /// Forces are integrated against the squared step length in ms.
    pub const FORCE_STEP_SCALE: f32 = STEP_MS * STEP_MS;
    /// Gravity force scale (gravity y = 1)
    pub const GRAVITY_SCALE: f32 = 0.001;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 20_000.0;
    pub const WORLD_HEIGHT: f32 = 720.0;
    /// Widest world the generator accepts
    pub const MAX_WORLD_WIDTH: f32 = 1_000_000.0;

    /// Terrain collider thickness
    pub const SEGMENT_THICKNESS: f32 = 5.0;

    /// Player body defaults (300px sprite at 0.5 scale)
    pub const PLAYER_SIZE: f32 = 150.0;
    pub const PLAYER_MASS: f32 = 10.0;
    pub const PLAYER_BOUNCE: f32 = 0.1;
    pub const PLAYER_AIR_FRICTION: f32 = 0.01;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Step `current` toward `target` by at most `step` radians, taking the short
/// way around the circle. Snaps onto the target when within one step.
pub fn rotate_toward(current: f32, target: f32, step: f32) -> f32 {
    if current == target {
        return current;
    }

    let diff = (target - current).abs();
    if diff <= step || diff >= TAU - step {
        return target;
    }

    let mut target = target;
    if diff > PI {
        if target < current {
            target += TAU;
        } else {
            target -= TAU;
        }
    }

    if target > current {
        current + step
    } else {
        current - step
    }
}
