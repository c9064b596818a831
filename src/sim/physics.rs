//! Seam to the host physics engine
//!
//! The host owns the rigid-body solver. The core only asks it for bodies and
//! receives its collision pairs back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a host physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// How the host should simulate a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves
    Static,
    /// Moved by script, pushes dynamic bodies
    Kinematic,
    /// Fully simulated
    Dynamic,
}

/// Rectangle body request
#[derive(Debug, Clone, Serialize)]
pub struct ColliderDesc {
    pub kind: BodyKind,
    /// Centre of the rectangle
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    /// Rotation (radians, clockwise with y down)
    pub angle: f32,
    pub friction: f32,
    pub static_friction: f32,
    pub air_friction: f32,
    pub restitution: f32,
    pub mass: Option<f32>,
    pub label: &'static str,
}

impl ColliderDesc {
    pub fn rect(kind: BodyKind, center: Vec2, width: f32, height: f32) -> Self {
        Self {
            kind,
            center,
            width,
            height,
            angle: 0.0,
            friction: 0.1,
            static_friction: 0.5,
            air_friction: 0.01,
            restitution: 0.0,
            mass: None,
            label: "body",
        }
    }
}

/// Anything that can create bodies for the core
pub trait PhysicsHost {
    fn create_body(&mut self, desc: &ColliderDesc) -> BodyHandle;
}

/// In-process host that hands out sequential handles and keeps every request.
///
/// Used for headless runs and by the wasm bridge, which forwards the recorded
/// descriptors to the JS engine in creation order.
#[derive(Debug, Clone, Default)]
pub struct ColliderRegistry {
    bodies: Vec<(BodyHandle, ColliderDesc)>,
    next_id: u32,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&ColliderDesc> {
        self.bodies
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, desc)| desc)
    }

    /// All bodies in creation order
    pub fn bodies(&self) -> &[(BodyHandle, ColliderDesc)] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn count_of(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|(_, d)| d.kind == kind).count()
    }
}

impl PhysicsHost for ColliderRegistry {
    fn create_body(&mut self, desc: &ColliderDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.push((handle, desc.clone()));
        handle
    }
}

/// A collision pair as reported by the host
///
/// The host gives no guarantee about which body is `a`; `normal` is relative
/// to the pair as reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionPair {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub normal: Vec2,
}

impl CollisionPair {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, normal: Vec2) -> Self {
        Self {
            body_a,
            body_b,
            normal,
        }
    }

    /// The other body and the normal as seen from `body`'s side of the pair.
    /// None when `body` is not part of the pair.
    pub fn seen_from(&self, body: BodyHandle) -> Option<(BodyHandle, Vec2)> {
        if self.body_a == body {
            Some((self.body_b, self.normal))
        } else if self.body_b == body {
            Some((self.body_a, -self.normal))
        } else {
            None
        }
    }
}

/// Collision lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionEvent {
    Start(CollisionPair),
    End(CollisionPair),
}
