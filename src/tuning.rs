//! Data-driven game balance
//!
//! Every gameplay constant lives here so one controller can cover the
//! different feel variants (heavy force-driven vs. light arcade). Loaded from
//! JSON; missing fields fall back to the defaults below.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Horizontal control law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlLaw {
    /// Force proportional to the gap between current and target velocity
    #[default]
    MatchVelocity,
    /// Velocity lerps toward the target directly
    Lerp,
}

/// How often the spin trick may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpinLimit {
    /// Spin whenever airborne
    #[default]
    Unlimited,
    /// One spin per airborne period, re-armed on landing
    OncePerAirborne,
    /// One spin, re-armed only by out-of-bounds recovery
    OncePerLife,
}

impl SpinLimit {
    /// Whether landing re-arms the trick
    pub fn resets_on_landing(&self) -> bool {
        matches!(self, SpinLimit::OncePerAirborne)
    }
}

/// World bounds and player body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Horizontal extent of generated terrain
    pub width: f32,
    /// Visible world height (y grows downward)
    pub height: f32,
    /// Player spawn and respawn point
    pub spawn: Vec2,
    /// How far below the world the player may fall before recovery
    pub fall_buffer: f32,
    /// Player body edge length (square)
    pub player_size: f32,
    pub player_mass: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            spawn: Vec2::new(100.0, WORLD_HEIGHT - 300.0),
            fall_buffer: 200.0,
            player_size: PLAYER_SIZE,
            player_mass: PLAYER_MASS,
        }
    }
}

/// Procedural terrain shape
///
/// Heights are given as offsets above the bottom of the world so the same
/// tuning works for any viewport height.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Starting surface height, above world bottom
    pub start_offset: f32,
    /// Highest the surface may go, above world bottom
    pub ceiling_offset: f32,
    /// Lowest the surface may go, above world bottom
    pub floor_offset: f32,
    pub min_length: f32,
    pub max_length: f32,
    /// Chance that a step past the flat start is a gap
    pub gap_chance: f64,
    /// Flat, gap-free launch area
    pub solid_start: f32,
    /// Largest rise or drop between neighbouring surfaces
    pub max_jump_height: f32,
    pub min_gap_width: f32,
    pub max_gap_width: f32,
    pub friction: f32,
    pub static_friction: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            start_offset: 120.0,
            ceiling_offset: 450.0,
            floor_offset: 50.0,
            min_length: 300.0,
            max_length: 400.0,
            gap_chance: 0.3,
            solid_start: 500.0,
            max_jump_height: 150.0,
            min_gap_width: 50.0,
            max_gap_width: 150.0,
            friction: 0.4,
            static_friction: 0.8,
        }
    }
}

impl TerrainParams {
    /// Highest surface y (smallest value)
    pub fn min_y(&self, world_height: f32) -> f32 {
        world_height - self.ceiling_offset
    }

    /// Lowest surface y (largest value)
    pub fn max_y(&self, world_height: f32) -> f32 {
        world_height - self.floor_offset
    }

    pub fn start_y(&self, world_height: f32) -> f32 {
        world_height - self.start_offset
    }
}

/// Moving obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleParams {
    /// Chance per segment (past the safe zone) of spawning an obstacle
    pub chance: f64,
    /// Extra distance past the solid start before obstacles appear
    pub safe_margin: f32,
    pub width: f32,
    pub height: f32,
    /// Gap between obstacle bottom and terrain surface
    pub clearance: f32,
    pub min_range: f32,
    pub max_range: f32,
    /// Pixels per tick
    pub min_speed: f32,
    pub max_speed: f32,
    /// Re-snap obstacle height to the terrain under it every tick
    pub follow_terrain: bool,
}

impl Default for ObstacleParams {
    fn default() -> Self {
        Self {
            chance: 0.2,
            safe_margin: 200.0,
            width: 50.0,
            height: 50.0,
            clearance: 5.0,
            min_range: 100.0,
            max_range: 300.0,
            min_speed: 2.0,
            max_speed: 2.0,
            follow_terrain: false,
        }
    }
}

/// Player controller feel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionParams {
    // === Horizontal ===
    pub control_law: ControlLaw,
    /// Target horizontal speed (pixels per tick)
    pub max_speed: f32,
    /// Force per unit of velocity error (MatchVelocity)
    pub move_force: f32,
    /// Fraction of velocity error closed per tick (Lerp)
    pub lerp_factor: f32,
    /// Velocity multiplier per tick with no horizontal input
    pub passive_friction: f32,
    /// Velocity multiplier per tick while grounded
    pub ground_damping: f32,

    // === Jump ===
    pub jump_force: f32,
    /// Faster skating jumps higher
    pub jump_speed_bonus: bool,
    pub jump_speed_factor: f32,
    /// Horizontal force per unit of velocity added on takeoff
    pub jump_nudge: f32,

    // === Spin trick ===
    /// Radians per tick
    pub base_spin: f32,
    /// Extra spin per unit of horizontal speed
    pub spin_speed_factor: f32,
    pub spin_limit: SpinLimit,

    // === Surface alignment ===
    /// Radians per tick toward the surface angle
    pub align_rate: f32,
    /// Surfaces flatter than this snap the player upright (radians)
    pub upright_threshold: f32,
}

impl Default for LocomotionParams {
    fn default() -> Self {
        Self {
            control_law: ControlLaw::MatchVelocity,
            max_speed: 10.0,
            move_force: 0.003,
            lerp_factor: 0.15,
            passive_friction: 0.9999,
            ground_damping: 0.98,

            jump_force: 0.40,
            jump_speed_bonus: true,
            jump_speed_factor: 0.005,
            jump_nudge: 0.001,

            base_spin: 0.15,
            spin_speed_factor: 0.01,
            spin_limit: SpinLimit::Unlimited,

            align_rate: 0.1,
            upright_threshold: 5.0_f32.to_radians(),
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldParams,
    pub terrain: TerrainParams,
    pub obstacles: ObstacleParams,
    pub locomotion: LocomotionParams,
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject parameter sets the generator or controller cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        positive("world.width", w.width)?;
        if w.width > MAX_WORLD_WIDTH {
            return Err(ConfigError::invalid(
                "world.width",
                format!("{} exceeds the {MAX_WORLD_WIDTH} limit", w.width),
            ));
        }
        positive("world.height", w.height)?;
        positive("world.player_size", w.player_size)?;
        positive("world.player_mass", w.player_mass)?;
        non_negative("world.fall_buffer", w.fall_buffer)?;
        finite("world.spawn", w.spawn.x)?;
        finite("world.spawn", w.spawn.y)?;

        let t = &self.terrain;
        ordered("terrain.min_length", t.min_length, t.max_length)?;
        positive("terrain.min_length", t.min_length)?;
        advances("terrain.min_length", w.width, t.min_length)?;
        ordered("terrain.min_gap_width", t.min_gap_width, t.max_gap_width)?;
        positive("terrain.min_gap_width", t.min_gap_width)?;
        advances("terrain.min_gap_width", w.width, t.min_gap_width)?;
        finite("terrain.max_length", t.max_length)?;
        finite("terrain.max_gap_width", t.max_gap_width)?;
        finite("terrain.floor_offset", t.floor_offset)?;
        finite("terrain.ceiling_offset", t.ceiling_offset)?;
        ordered("terrain.floor_offset", t.floor_offset, t.ceiling_offset)?;
        if t.start_offset < t.floor_offset || t.start_offset > t.ceiling_offset {
            return Err(ConfigError::invalid(
                "terrain.start_offset",
                format!(
                    "{} lies outside [{}, {}]",
                    t.start_offset, t.floor_offset, t.ceiling_offset
                ),
            ));
        }
        non_negative("terrain.max_jump_height", t.max_jump_height)?;
        non_negative("terrain.solid_start", t.solid_start)?;
        probability("terrain.gap_chance", t.gap_chance)?;

        let o = &self.obstacles;
        probability("obstacles.chance", o.chance)?;
        ordered("obstacles.min_range", o.min_range, o.max_range)?;
        non_negative("obstacles.min_range", o.min_range)?;
        ordered("obstacles.min_speed", o.min_speed, o.max_speed)?;
        non_negative("obstacles.min_speed", o.min_speed)?;
        positive("obstacles.width", o.width)?;
        positive("obstacles.height", o.height)?;

        let l = &self.locomotion;
        positive("locomotion.max_speed", l.max_speed)?;
        match l.control_law {
            ControlLaw::MatchVelocity => {
                // Above 1 the velocity overshoots the target every tick
                let gain = l.move_force * FORCE_STEP_SCALE / w.player_mass;
                if !(gain > 0.0 && gain <= 1.0) {
                    return Err(ConfigError::invalid(
                        "locomotion.move_force",
                        format!("per-tick gain {gain} must be in (0, 1]"),
                    ));
                }
            }
            ControlLaw::Lerp => unit_interval("locomotion.lerp_factor", l.lerp_factor)?,
        }
        unit_interval("locomotion.passive_friction", l.passive_friction)?;
        unit_interval("locomotion.ground_damping", l.ground_damping)?;
        non_negative("locomotion.jump_force", l.jump_force)?;
        positive("locomotion.base_spin", l.base_spin)?;
        non_negative("locomotion.spin_speed_factor", l.spin_speed_factor)?;
        positive("locomotion.align_rate", l.align_rate)?;
        non_negative("locomotion.upright_threshold", l.upright_threshold)?;

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be finite")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must not be negative")))
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("min {min} exceeds max {max}")))
    }
}

/// Stepping by `step` must still move x forward at the far end of the world
fn advances(field: &'static str, width: f32, step: f32) -> Result<(), ConfigError> {
    if width + step > width {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{step} is below the float spacing at x = {width}"),
        ))
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is not a probability")))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be in (0, 1]")))
    }
}
