//! Player locomotion controller
//!
//! One controller covers every feel variant; differences live in
//! [`LocomotionParams`]. State is an explicit stance machine:
//!
//! ```text
//! Grounded <--> Airborne(Idle) <--> Airborne(Spinning { target })
//! ```
//!
//! Landing always returns to `Grounded`, so a grounded spin cannot exist.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::GroundContactTracker;
use super::player::PlayerBody;
use super::state::GameEvent;
use super::tick::TickInput;
use crate::tuning::{ControlLaw, LocomotionParams, SpinLimit, WorldParams};
use crate::{normalize_angle, rotate_toward};

/// What the player is doing while in the air
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AirState {
    Idle,
    /// Full rotation in progress, ends once rotation crosses `target`
    Spinning { target: f32 },
}

/// Contact stance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stance {
    Grounded,
    Airborne(AirState),
}

impl Default for Stance {
    fn default() -> Self {
        Stance::Airborne(AirState::Idle)
    }
}

/// Animation the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    #[default]
    Idle,
    Left,
    Right,
    Airborne,
    Trick,
}

/// Per-tick player controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocomotionController {
    pub params: LocomotionParams,
    stance: Stance,
    /// Jump held last tick (edge detection)
    jump_was_down: bool,
    /// Spin consumed under a limiting [`SpinLimit`]
    spin_used: bool,
    animation: AnimationState,
}

impl LocomotionController {
    pub fn new(params: LocomotionParams) -> Self {
        Self {
            params,
            stance: Stance::default(),
            jump_was_down: false,
            spin_used: false,
            animation: AnimationState::Idle,
        }
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn is_grounded(&self) -> bool {
        self.stance == Stance::Grounded
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.stance, Stance::Airborne(AirState::Spinning { .. }))
    }

    /// Rotation the current spin ends at
    pub fn spin_target(&self) -> Option<f32> {
        match self.stance {
            Stance::Airborne(AirState::Spinning { target }) => Some(target),
            _ => None,
        }
    }

    /// Whether the limiter still allows a spin
    pub fn spin_available(&self) -> bool {
        self.params.spin_limit == SpinLimit::Unlimited || !self.spin_used
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    /// Run one controller tick against the player body
    pub fn update(
        &mut self,
        player: &mut PlayerBody,
        contacts: &GroundContactTracker,
        input: &TickInput,
        events: &mut Vec<GameEvent>,
    ) {
        self.sync_stance(contacts, events);
        self.horizontal(player, input);
        self.jump(player, input, events);
        self.spin(player, input, events);
        if self.is_grounded() {
            self.align_to_surface(player, contacts.surface_angle());
        }
        self.animation = self.pick_animation(input);
    }

    /// Follow the tracker's grounded flag. Landing cancels any spin.
    fn sync_stance(&mut self, contacts: &GroundContactTracker, events: &mut Vec<GameEvent>) {
        match (self.stance, contacts.on_ground()) {
            (Stance::Airborne(air), true) => {
                if let AirState::Spinning { .. } = air {
                    log::debug!("Landed mid-spin");
                }
                self.stance = Stance::Grounded;
                if self.params.spin_limit.resets_on_landing() {
                    self.spin_used = false;
                }
                events.push(GameEvent::Landed);
            }
            (Stance::Grounded, false) => {
                self.stance = Stance::Airborne(AirState::Idle);
            }
            _ => {}
        }
    }

    fn horizontal(&self, player: &mut PlayerBody, input: &TickInput) {
        let p = &self.params;
        let target = match (input.left, input.right) {
            (true, false) => -p.max_speed,
            (false, true) => p.max_speed,
            _ => 0.0,
        };

        if target != 0.0 {
            let diff = target - player.vel.x;
            match p.control_law {
                ControlLaw::MatchVelocity => player.apply_force(Vec2::new(diff * p.move_force, 0.0)),
                ControlLaw::Lerp => player.vel.x += diff * p.lerp_factor,
            }
        } else {
            player.vel.x *= p.passive_friction;
        }
    }

    fn jump(&mut self, player: &mut PlayerBody, input: &TickInput, events: &mut Vec<GameEvent>) {
        let pressed = input.jump && !self.jump_was_down;
        self.jump_was_down = input.jump;

        if !pressed || !self.is_grounded() {
            return;
        }

        let p = &self.params;
        let bonus = if p.jump_speed_bonus {
            player.vel.x.abs() * p.jump_speed_factor
        } else {
            0.0
        };
        player.apply_force(Vec2::new(player.vel.x * p.jump_nudge, -(p.jump_force + bonus)));
        log::debug!("Jump at vx={:.2} (bonus {:.3})", player.vel.x, bonus);
        events.push(GameEvent::Jumped);
    }

    fn spin(&mut self, player: &mut PlayerBody, input: &TickInput, events: &mut Vec<GameEvent>) {
        if self.stance == Stance::Airborne(AirState::Idle)
            && input.trick_a
            && input.trick_b
            && self.spin_available()
        {
            let target = player.rotation + TAU;
            player.angular_vel =
                self.params.base_spin + player.vel.x.abs() * self.params.spin_speed_factor;
            self.stance = Stance::Airborne(AirState::Spinning { target });
            if self.params.spin_limit != SpinLimit::Unlimited {
                self.spin_used = true;
            }
            log::debug!("Spin started: target {:.2}, rate {:.3}", target, player.angular_vel);
            events.push(GameEvent::SpinStarted);
        }

        if let Stance::Airborne(AirState::Spinning { target }) = self.stance {
            let crossed = (player.angular_vel > 0.0 && player.rotation >= target)
                || (player.angular_vel < 0.0 && player.rotation <= target);
            if crossed {
                player.angular_vel = 0.0;
                player.rotation = target.rem_euclid(TAU);
                self.stance = Stance::Airborne(AirState::Idle);
                events.push(GameEvent::SpinCompleted);
            }
        }
    }

    /// Ease rotation onto the slope; flat ground snaps upright
    fn align_to_surface(&self, player: &mut PlayerBody, surface_angle: f32) {
        let p = &self.params;
        player.rotation = rotate_toward(normalize_angle(player.rotation), surface_angle, p.align_rate);
        player.vel.x *= p.ground_damping;

        if surface_angle.abs() < p.upright_threshold {
            player.rotation = 0.0;
        }
        player.angular_vel = 0.0;
    }

    fn pick_animation(&self, input: &TickInput) -> AnimationState {
        if self.is_spinning() {
            return AnimationState::Trick;
        }
        match (input.left, input.right) {
            (true, false) => AnimationState::Left,
            (false, true) => AnimationState::Right,
            _ if self.is_grounded() => AnimationState::Idle,
            _ => AnimationState::Airborne,
        }
    }

    /// Respawn when the player has fallen below the world. Returns true when
    /// a reset happened.
    pub fn recover_if_out_of_bounds(
        &mut self,
        player: &mut PlayerBody,
        contacts: &mut GroundContactTracker,
        world: &WorldParams,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if player.pos.y <= world.height + world.fall_buffer {
            return false;
        }

        log::info!(
            "Player fell out of the world at x={:.0}, respawning at ({:.0}, {:.0})",
            player.pos.x,
            world.spawn.x,
            world.spawn.y
        );
        player.reset_to(world.spawn);
        contacts.clear();
        self.stance = Stance::Airborne(AirState::Idle);
        self.spin_used = false;
        events.push(GameEvent::Respawned);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::{BodyHandle, CollisionPair};

    const PLAYER: BodyHandle = BodyHandle(0);
    const FLOOR: BodyHandle = BodyHandle(1);

    fn setup(params: LocomotionParams) -> (LocomotionController, PlayerBody, GroundContactTracker) {
        (
            LocomotionController::new(params),
            PlayerBody::new(PLAYER, Vec2::new(100.0, 300.0), Vec2::splat(150.0), 10.0),
            GroundContactTracker::new(PLAYER),
        )
    }

    fn land(contacts: &mut GroundContactTracker, normal: Vec2) {
        contacts.on_collision_start(&CollisionPair::new(PLAYER, FLOOR, normal));
    }

    fn take_off(contacts: &mut GroundContactTracker) {
        contacts.on_collision_end(&CollisionPair::new(PLAYER, FLOOR, Vec2::NEG_Y));
    }

    fn trick() -> TickInput {
        TickInput {
            trick_a: true,
            trick_b: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_spin_sets_target_and_rate() {
        let (mut ctl, mut player, contacts) = setup(LocomotionParams::default());
        let mut events = Vec::new();
        player.rotation = 0.3;
        player.vel.x = 5.0;

        ctl.update(&mut player, &contacts, &trick(), &mut events);

        assert!(ctl.is_spinning());
        assert!((ctl.spin_target().unwrap() - (0.3 + TAU)).abs() < 1e-5);
        assert!((player.angular_vel - (0.15 + 5.0 * 0.01)).abs() < 1e-5);
        assert_eq!(ctl.animation(), AnimationState::Trick);
        assert!(events.contains(&GameEvent::SpinStarted));
    }

    #[test]
    fn test_spin_needs_both_keys() {
        let (mut ctl, mut player, contacts) = setup(LocomotionParams::default());
        let input = TickInput {
            trick_a: true,
            ..Default::default()
        };
        ctl.update(&mut player, &contacts, &input, &mut Vec::new());
        assert!(!ctl.is_spinning());
    }

    #[test]
    fn test_spin_advances_and_completes_once() {
        let (mut ctl, mut player, contacts) = setup(LocomotionParams::default());
        let mut events = Vec::new();
        player.rotation = 0.3;

        ctl.update(&mut player, &contacts, &trick(), &mut events);
        let target = ctl.spin_target().unwrap();

        let idle = TickInput::default();
        let mut last = player.rotation;
        let mut ticks = 0;
        while ctl.is_spinning() {
            // Host integrates rotation between ticks
            player.rotation += player.angular_vel;
            ctl.update(&mut player, &contacts, &idle, &mut events);
            if ctl.is_spinning() {
                assert!(player.rotation > last);
                assert!(player.rotation < target);
                last = player.rotation;
            }
            ticks += 1;
            assert!(ticks < 200, "spin never completed");
        }

        let completions = events
            .iter()
            .filter(|e| **e == GameEvent::SpinCompleted)
            .count();
        assert_eq!(completions, 1);
        assert!((player.rotation - target.rem_euclid(TAU)).abs() < 1e-4);
        assert_eq!(player.angular_vel, 0.0);
    }

    #[test]
    fn test_landing_cancels_spin() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        let mut events = Vec::new();
        ctl.update(&mut player, &contacts, &trick(), &mut events);
        assert!(ctl.is_spinning());
        player.rotation += player.angular_vel;

        land(&mut contacts, Vec2::NEG_Y);
        ctl.update(&mut player, &contacts, &TickInput::default(), &mut events);

        assert!(!ctl.is_spinning());
        assert_eq!(ctl.stance(), Stance::Grounded);
        assert!(events.contains(&GameEvent::Landed));
        // Flat ground: upright and still
        assert_eq!(player.rotation, 0.0);
        assert_eq!(player.angular_vel, 0.0);
    }

    #[test]
    fn test_no_spin_on_ground() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        land(&mut contacts, Vec2::NEG_Y);
        ctl.update(&mut player, &contacts, &trick(), &mut Vec::new());
        assert!(!ctl.is_spinning());
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        land(&mut contacts, Vec2::NEG_Y);
        let mut events = Vec::new();
        let hold = TickInput {
            jump: true,
            ..Default::default()
        };

        ctl.update(&mut player, &contacts, &hold, &mut events);
        assert!(player.take_force().y < 0.0);
        ctl.update(&mut player, &contacts, &hold, &mut events);
        assert_eq!(player.take_force(), Vec2::ZERO);

        // Release and press again
        ctl.update(&mut player, &contacts, &TickInput::default(), &mut events);
        ctl.update(&mut player, &contacts, &hold, &mut events);
        assert!(player.take_force().y < 0.0);

        let jumps = events.iter().filter(|e| **e == GameEvent::Jumped).count();
        assert_eq!(jumps, 2);
    }

    #[test]
    fn test_jump_requires_ground() {
        let (mut ctl, mut player, contacts) = setup(LocomotionParams::default());
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        ctl.update(&mut player, &contacts, &input, &mut Vec::new());
        assert_eq!(player.pending_force(), Vec2::ZERO);
    }

    #[test]
    fn test_jump_speed_bonus() {
        let params = LocomotionParams::default();
        let (mut ctl, mut player, mut contacts) = setup(params.clone());
        land(&mut contacts, Vec2::NEG_Y);
        player.vel.x = 8.0;
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        ctl.update(&mut player, &contacts, &input, &mut Vec::new());
        // Passive friction has already shaved a hair off vx by takeoff
        let force = player.take_force();
        assert!((force.y + (params.jump_force + 8.0 * params.jump_speed_factor)).abs() < 1e-4);
        assert!((force.x - 8.0 * params.jump_nudge).abs() < 1e-4);

        let flat = LocomotionParams {
            jump_speed_bonus: false,
            ..LocomotionParams::default()
        };
        let (mut ctl, mut player, mut contacts) = setup(flat);
        land(&mut contacts, Vec2::NEG_Y);
        player.vel.x = 8.0;
        ctl.update(&mut player, &contacts, &input, &mut Vec::new());
        assert!((player.take_force().y + params.jump_force).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_converges_monotonically() {
        let params = LocomotionParams {
            control_law: ControlLaw::Lerp,
            ..LocomotionParams::default()
        };
        let (mut ctl, mut player, contacts) = setup(params);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        let mut last = player.vel.x;
        for _ in 0..200 {
            ctl.update(&mut player, &contacts, &right, &mut Vec::new());
            assert!(player.vel.x >= last);
            assert!(player.vel.x <= 10.0);
            last = player.vel.x;
        }
        assert!((player.vel.x - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_match_velocity_converges_monotonically() {
        let (mut ctl, mut player, contacts) = setup(LocomotionParams::default());
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        let mut last = player.vel.x;
        for _ in 0..300 {
            ctl.update(&mut player, &contacts, &left, &mut Vec::new());
            player.resolve_force();
            assert!(player.vel.x <= last);
            assert!(player.vel.x >= -10.0);
            last = player.vel.x;
        }
        assert!((player.vel.x + 10.0).abs() < 0.05);
    }

    #[test]
    fn test_both_directions_cancel() {
        let (mut ctl, mut player, contacts) = setup(LocomotionParams::default());
        player.vel.x = 4.0;
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        ctl.update(&mut player, &contacts, &both, &mut Vec::new());
        assert_eq!(player.pending_force(), Vec2::ZERO);
        assert!((player.vel.x - 4.0 * 0.9999).abs() < 1e-5);
        assert_eq!(ctl.animation(), AnimationState::Airborne);
    }

    #[test]
    fn test_aligns_to_ramp_gradually() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        let slope = -30.0_f32.to_radians();
        land(&mut contacts, Vec2::new(slope.sin(), -slope.cos()));

        ctl.update(&mut player, &contacts, &TickInput::default(), &mut Vec::new());
        assert!((player.rotation + 0.1).abs() < 1e-5);

        for _ in 0..10 {
            ctl.update(&mut player, &contacts, &TickInput::default(), &mut Vec::new());
        }
        assert!((player.rotation - slope).abs() < 1e-5);
        assert_eq!(ctl.animation(), AnimationState::Idle);
    }

    #[test]
    fn test_ground_damping_and_still_body() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        land(&mut contacts, Vec2::NEG_Y);
        player.vel.x = 5.0;
        player.angular_vel = 0.2;
        player.rotation = 0.03;
        ctl.update(&mut player, &contacts, &TickInput::default(), &mut Vec::new());
        assert!((player.vel.x - 5.0 * 0.9999 * 0.98).abs() < 1e-5);
        assert_eq!(player.angular_vel, 0.0);
        assert_eq!(player.rotation, 0.0);
    }

    #[test]
    fn test_once_per_life_survives_landing() {
        let params = LocomotionParams {
            spin_limit: SpinLimit::OncePerLife,
            ..LocomotionParams::default()
        };
        let (mut ctl, mut player, mut contacts) = setup(params);
        let mut events = Vec::new();
        let world = WorldParams::default();

        ctl.update(&mut player, &contacts, &trick(), &mut events);
        assert!(ctl.is_spinning());

        land(&mut contacts, Vec2::NEG_Y);
        ctl.update(&mut player, &contacts, &TickInput::default(), &mut events);
        take_off(&mut contacts);
        ctl.update(&mut player, &contacts, &trick(), &mut events);
        assert!(!ctl.is_spinning());
        assert!(!ctl.spin_available());

        // Only falling out of the world re-arms it
        player.pos.y = world.height + world.fall_buffer + 1.0;
        assert!(ctl.recover_if_out_of_bounds(&mut player, &mut contacts, &world, &mut events));
        ctl.update(&mut player, &contacts, &trick(), &mut events);
        assert!(ctl.is_spinning());
    }

    #[test]
    fn test_once_per_airborne_rearms_on_landing() {
        let params = LocomotionParams {
            spin_limit: SpinLimit::OncePerAirborne,
            ..LocomotionParams::default()
        };
        let (mut ctl, mut player, mut contacts) = setup(params);
        let mut events = Vec::new();

        ctl.update(&mut player, &contacts, &trick(), &mut events);
        // Finish the spin in the air, then try again
        player.rotation = ctl.spin_target().unwrap();
        ctl.update(&mut player, &contacts, &TickInput::default(), &mut events);
        ctl.update(&mut player, &contacts, &trick(), &mut events);
        assert!(!ctl.is_spinning());

        land(&mut contacts, Vec2::NEG_Y);
        ctl.update(&mut player, &contacts, &TickInput::default(), &mut events);
        take_off(&mut contacts);
        ctl.update(&mut player, &contacts, &trick(), &mut events);
        assert!(ctl.is_spinning());
    }

    #[test]
    fn test_recovery_resets_player() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        let world = WorldParams::default();
        let mut events = Vec::new();

        land(&mut contacts, Vec2::NEG_Y);
        player.sync_from_host(
            Vec2::new(4000.0, world.height + 201.0),
            Vec2::new(7.0, 12.0),
            1.2,
            0.3,
        );

        assert!(ctl.recover_if_out_of_bounds(&mut player, &mut contacts, &world, &mut events));
        assert_eq!(player.pos, world.spawn);
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.rotation, 0.0);
        assert_eq!(player.angular_vel, 0.0);
        assert!(!contacts.on_ground());
        assert_eq!(ctl.stance(), Stance::Airborne(AirState::Idle));
        assert_eq!(events, vec![GameEvent::Respawned]);
    }

    #[test]
    fn test_no_recovery_inside_buffer() {
        let (mut ctl, mut player, mut contacts) = setup(LocomotionParams::default());
        let world = WorldParams::default();
        player.pos.y = world.height + world.fall_buffer;
        assert!(!ctl.recover_if_out_of_bounds(&mut player, &mut contacts, &world, &mut Vec::new()));
    }
}
