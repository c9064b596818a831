//! Procedural side-scrolling terrain
//!
//! A single left-to-right scan emits either a sloped segment or a gap per
//! step. Height changes are bounded by the player's jump envelope and the
//! first stretch of the world is kept flat and gap-free, so every generated
//! world is traversable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::physics::{BodyHandle, BodyKind, ColliderDesc, PhysicsHost};
use crate::consts::SEGMENT_THICKNESS;
use crate::tuning::{ObstacleParams, TerrainParams, WorldParams};

/// A straight piece of ground backed by a static collider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub body: BodyHandle,
}

impl TerrainSegment {
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Slope angle (radians, clockwise with y down)
    #[inline]
    pub fn angle(&self) -> f32 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) / 2.0
    }

    #[inline]
    pub fn rise(&self) -> f32 {
        self.end.y - self.start.y
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.start.x && x <= self.end.x
    }

    /// Surface y at `x`, interpolated along the segment
    pub fn height_at(&self, x: f32) -> Option<f32> {
        if !self.contains_x(x) {
            return None;
        }
        let span = self.end.x - self.start.x;
        if span <= f32::EPSILON {
            return Some(self.start.y);
        }
        let t = (x - self.start.x) / span;
        Some(self.start.y + (self.end.y - self.start.y) * t)
    }

    /// Collider request for this segment
    fn collider(start: Vec2, end: Vec2, params: &TerrainParams) -> ColliderDesc {
        let d = end - start;
        ColliderDesc {
            angle: d.y.atan2(d.x),
            friction: params.friction,
            static_friction: params.static_friction,
            label: "terrain",
            ..ColliderDesc::rect(
                BodyKind::Static,
                (start + end) / 2.0,
                start.distance(end),
                SEGMENT_THICKNESS,
            )
        }
    }
}

/// A horizontal span with no ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub x_start: f32,
    pub x_end: f32,
    /// Surface height on the near side
    pub height_before: f32,
    /// Surface height the next segment starts at
    pub height_after: f32,
}

impl Gap {
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }
}

/// One step of the generated profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerrainPiece {
    Segment(TerrainSegment),
    Gap(Gap),
}

impl TerrainPiece {
    pub fn x_start(&self) -> f32 {
        match self {
            TerrainPiece::Segment(s) => s.start.x,
            TerrainPiece::Gap(g) => g.x_start,
        }
    }

    pub fn x_end(&self) -> f32 {
        match self {
            TerrainPiece::Segment(s) => s.end.x,
            TerrainPiece::Gap(g) => g.x_end,
        }
    }
}

/// The generated ground profile, ordered by x
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    pieces: Vec<TerrainPiece>,
    start_y: f32,
}

impl Terrain {
    pub fn pieces(&self) -> &[TerrainPiece] {
        &self.pieces
    }

    pub fn segments(&self) -> impl Iterator<Item = &TerrainSegment> {
        self.pieces.iter().filter_map(|p| match p {
            TerrainPiece::Segment(s) => Some(s),
            TerrainPiece::Gap(_) => None,
        })
    }

    pub fn gaps(&self) -> impl Iterator<Item = &Gap> {
        self.pieces.iter().filter_map(|p| match p {
            TerrainPiece::Gap(g) => Some(g),
            TerrainPiece::Segment(_) => None,
        })
    }

    /// Surface height at x = 0
    pub fn start_y(&self) -> f32 {
        self.start_y
    }

    /// Horizontal extent actually generated (may overshoot the requested width)
    pub fn width(&self) -> f32 {
        self.pieces.last().map(|p| p.x_end()).unwrap_or(0.0)
    }

    /// The piece covering `x`. At a shared boundary the earlier piece wins.
    pub fn piece_at(&self, x: f32) -> Option<&TerrainPiece> {
        let idx = self.pieces.partition_point(|p| p.x_end() < x);
        self.pieces.get(idx).filter(|p| p.x_start() <= x)
    }

    pub fn segment_at(&self, x: f32) -> Option<&TerrainSegment> {
        match self.piece_at(x)? {
            TerrainPiece::Segment(s) => Some(s),
            TerrainPiece::Gap(_) => None,
        }
    }

    /// Surface y under `x`, or None over a gap or outside the world
    pub fn height_at(&self, x: f32) -> Option<f32> {
        self.segment_at(x).and_then(|s| s.height_at(x))
    }

    /// Surface slope under `x`
    pub fn angle_at(&self, x: f32) -> Option<f32> {
        self.segment_at(x).map(TerrainSegment::angle)
    }
}

/// Build terrain and obstacles for a world, registering colliders with `host`
pub fn generate_terrain<R: Rng, H: PhysicsHost>(
    world: &WorldParams,
    params: &TerrainParams,
    obstacle_params: &ObstacleParams,
    rng: &mut R,
    host: &mut H,
) -> (Terrain, Vec<Obstacle>) {
    let min_y = params.min_y(world.height);
    let max_y = params.max_y(world.height);
    let jump = params.max_jump_height;

    let mut pieces = Vec::new();
    let mut obstacles = Vec::new();
    let start_y = params.start_y(world.height);
    let mut x = 0.0_f32;
    let mut y = start_y;

    while x < world.width {
        let make_gap = x >= params.solid_start && rng.random_bool(params.gap_chance);
        if make_gap {
            let gap_width = rng.random_range(params.min_gap_width..=params.max_gap_width);
            let next_y = (y + rng.random_range(-jump..=jump)).clamp(min_y, max_y);

            pieces.push(TerrainPiece::Gap(Gap {
                x_start: x,
                x_end: x + gap_width,
                height_before: y,
                height_after: next_y,
            }));
            x += gap_width;
            y = next_y;
            continue;
        }

        let length = rng.random_range(params.min_length..=params.max_length);
        let delta_y = if x < params.solid_start {
            0.0
        } else {
            rng.random_range(-jump..=jump)
        };
        let next_y = (y + delta_y).clamp(min_y, max_y);

        let p1 = Vec2::new(x, y);
        let p2 = Vec2::new(x + length, next_y);
        let body = host.create_body(&TerrainSegment::collider(p1, p2, params));
        let segment = TerrainSegment {
            start: p1,
            end: p2,
            body,
        };

        x += length;
        y = next_y;

        if x > params.solid_start + obstacle_params.safe_margin
            && rng.random_bool(obstacle_params.chance)
        {
            obstacles.push(spawn_obstacle(&segment, obstacle_params, rng, host));
        }

        pieces.push(TerrainPiece::Segment(segment));
    }

    let terrain = Terrain { pieces, start_y };
    log::info!(
        "Terrain generated: {} segments, {} gaps, {} obstacles over {:.0}px",
        terrain.segments().count(),
        terrain.gaps().count(),
        obstacles.len(),
        terrain.width()
    );

    (terrain, obstacles)
}

/// Place an obstacle resting on the middle of `segment`
fn spawn_obstacle<R: Rng, H: PhysicsHost>(
    segment: &TerrainSegment,
    params: &ObstacleParams,
    rng: &mut R,
    host: &mut H,
) -> Obstacle {
    let size = Vec2::new(params.width, params.height);
    let mid = segment.midpoint();
    let pos = Vec2::new(mid.x, mid.y - size.y / 2.0 - params.clearance);

    let body = host.create_body(&ColliderDesc {
        friction: 0.0,
        static_friction: 0.0,
        air_friction: 0.0,
        restitution: 0.0,
        label: "obstacle",
        ..ColliderDesc::rect(BodyKind::Kinematic, pos, size.x, size.y)
    });

    let range = rng.random_range(params.min_range..=params.max_range);
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let speed = rng.random_range(params.min_speed..=params.max_speed);

    log::debug!(
        "Obstacle {:?} at ({:.0}, {:.0}) range={:.0} dir={} speed={:.1}",
        body,
        pos.x,
        pos.y,
        range,
        direction,
        speed
    );

    Obstacle::new(body, pos, size, range, direction, speed)
}
