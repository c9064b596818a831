//! Ground contact tracking
//!
//! Keeps the set of bodies currently holding the player up. A single
//! grounded flag would flicker to airborne whenever the player rolls across
//! the seam between two segments; with a set, the player stays grounded
//! until the last supporting contact ends.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{BodyHandle, CollisionPair};

/// Normals steeper than this (pointing up, y down) count as ground
pub const GROUND_NORMAL_THRESHOLD: f32 = -0.5;

/// Supporting-contact set for one body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundContactTracker {
    player: BodyHandle,
    /// Bodies under the player, in contact order
    contacts: Vec<BodyHandle>,
    /// Slope of the most recent supporting contact (radians)
    surface_angle: f32,
}

impl GroundContactTracker {
    pub fn new(player: BodyHandle) -> Self {
        Self {
            player,
            contacts: Vec::new(),
            surface_angle: 0.0,
        }
    }

    pub fn player(&self) -> BodyHandle {
        self.player
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        !self.contacts.is_empty()
    }

    /// Surface angle under the player; 0 while airborne
    #[inline]
    pub fn surface_angle(&self) -> f32 {
        self.surface_angle
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_supporting(&self, body: BodyHandle) -> bool {
        self.contacts.contains(&body)
    }

    /// Collision started. Returns true when the other body was classified as
    /// ground under the player.
    pub fn on_collision_start(&mut self, pair: &CollisionPair) -> bool {
        let Some((other, normal)) = pair.seen_from(self.player) else {
            log::warn!("Collision start without player: {:?}", pair);
            return false;
        };
        self.begin_contact(other, normal)
    }

    /// Collision ended
    pub fn on_collision_end(&mut self, pair: &CollisionPair) {
        let Some((other, _)) = pair.seen_from(self.player) else {
            log::warn!("Collision end without player: {:?}", pair);
            return;
        };
        self.end_contact(other);
    }

    /// Record a contact with `other`. `normal` is taken from the player's side
    /// of the pair.
    pub fn begin_contact(&mut self, other: BodyHandle, normal: Vec2) -> bool {
        if normal.y >= GROUND_NORMAL_THRESHOLD {
            return false;
        }

        if !self.contacts.contains(&other) {
            self.contacts.push(other);
        }
        self.surface_angle = normal.x.atan2(-normal.y);
        log::debug!(
            "Ground contact {:?} (total {}), surface {:.1}°",
            other,
            self.contacts.len(),
            self.surface_angle.to_degrees()
        );
        true
    }

    /// Drop `other` from the supporting set
    pub fn end_contact(&mut self, other: BodyHandle) {
        self.contacts.retain(|&b| b != other);
        if self.contacts.is_empty() {
            self.surface_angle = 0.0;
        }
    }

    /// Forget every contact (respawn)
    pub fn clear(&mut self) {
        self.contacts.clear();
        self.surface_angle = 0.0;
    }
}
