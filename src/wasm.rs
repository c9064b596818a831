//! Browser bridge
//!
//! The JS game engine owns bodies, rendering and input. Each frame it:
//! 1. forwards collision start/end pairs from its physics step,
//! 2. writes the player body's integrated state with `sync_player`,
//! 3. calls `tick` with the held keys,
//! 4. applies `take_force` and reads `frame_json` back.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::sim::{
    BodyHandle, ColliderRegistry, CollisionEvent, CollisionPair, TickInput, World, tick,
};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Skate Runner core loaded");
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize for host: {e}");
        String::from("null")
    })
}

/// Simulation core handed to the JS host
#[wasm_bindgen]
pub struct SkateCore {
    world: World,
    host: ColliderRegistry,
}

#[wasm_bindgen]
impl SkateCore {
    /// Default-length world whose height follows the viewport
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, viewport_height: f32) -> Result<SkateCore, JsError> {
        let mut tuning = Tuning::default();
        tuning.world.height = viewport_height;
        tuning.world.spawn = Vec2::new(100.0, viewport_height - 300.0);
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    /// World from a JSON tuning document
    pub fn with_tuning(seed: u64, tuning_json: &str) -> Result<SkateCore, JsError> {
        let tuning = Tuning::from_json(tuning_json)?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> SkateCore {
        let mut host = ColliderRegistry::new();
        let world = World::generate(tuning, seed, &mut host);
        SkateCore { world, host }
    }

    /// Every body to create, in handle order
    pub fn colliders_json(&self) -> String {
        let bodies: Vec<_> = self
            .host
            .bodies()
            .iter()
            .map(|(handle, desc)| serde_json::json!({ "handle": handle.0, "desc": desc }))
            .collect();
        to_json(&bodies)
    }

    pub fn player_body(&self) -> u32 {
        self.world.player.body.0
    }

    pub fn sync_player(&mut self, x: f32, y: f32, vx: f32, vy: f32, rotation: f32, angular_vel: f32) {
        self.world
            .player
            .sync_from_host(Vec2::new(x, y), Vec2::new(vx, vy), rotation, angular_vel);
    }

    pub fn collision_start(&mut self, body_a: u32, body_b: u32, nx: f32, ny: f32) {
        let pair = CollisionPair::new(BodyHandle(body_a), BodyHandle(body_b), Vec2::new(nx, ny));
        self.world.handle_collision(&CollisionEvent::Start(pair));
    }

    pub fn collision_end(&mut self, body_a: u32, body_b: u32) {
        let pair = CollisionPair::new(BodyHandle(body_a), BodyHandle(body_b), Vec2::ZERO);
        self.world.handle_collision(&CollisionEvent::End(pair));
    }

    /// Run one tick; returns the tick's events as JSON
    pub fn tick(&mut self, keys: u8) -> String {
        let events = tick(&mut self.world, &TickInput::from_bits(keys));
        to_json(&events)
    }

    /// Force to apply to the player body this step, as `[fx, fy]`
    pub fn take_force(&mut self) -> Vec<f32> {
        self.world.player.take_force().to_array().to_vec()
    }

    /// Player pose, animation and obstacle positions
    pub fn frame_json(&self) -> String {
        to_json(&self.world.frame())
    }

    pub fn player_state(&self) -> Vec<f32> {
        let p = &self.world.player;
        vec![p.pos.x, p.pos.y, p.vel.x, p.vel.y, p.rotation, p.angular_vel]
    }
}
