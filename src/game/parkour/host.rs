//! Capabilities the parkour controller needs from whatever runs the
//! character.
//!
//! The controller never touches engine state directly. The game implements
//! this trait on top of avian3d and bevy-tnua (see `game::player::host`);
//! tests implement it with a recording fake.

use bevy::prelude::*;

/// Result of a successful ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
}

/// Trait for hosts of a [`ParkourController`](super::ParkourController).
///
/// All vectors are in world space and engine units, with +Y up.
pub trait ParkourHost {
    fn position(&self) -> Vec3;

    /// Unit forward vector of the character.
    fn forward(&self) -> Vec3;

    /// Unit right vector of the character.
    fn right(&self) -> Vec3;

    fn velocity(&self) -> Vec3;

    fn speed(&self) -> f32 {
        self.velocity().length()
    }

    /// True while airborne, rising or falling.
    fn is_falling(&self) -> bool;

    /// Synchronous single-hit ray query from `origin` to `destination`.
    fn raycast(&self, origin: Vec3, destination: Vec3) -> Option<RayHit>;

    /// Requests walking along `direction`, scaled by `scale`. The host caps
    /// the resulting speed at the last value given to `set_max_speed`.
    fn add_movement_input(&mut self, direction: Vec3, scale: f32);

    fn set_max_speed(&mut self, speed: f32);

    fn set_braking_deceleration(&mut self, deceleration: f32);

    /// Whether the host currently allows the character to crouch.
    fn can_crouch(&self) -> bool;

    fn crouch(&mut self);

    fn uncrouch(&mut self);

    fn jump(&mut self);

    /// Sets or adds `velocity`. The overrides replace the horizontal and
    /// vertical velocity components instead of adding to them.
    fn launch(&mut self, velocity: Vec3, override_horizontal: bool, override_vertical: bool);

    /// Force applied over the next physics step.
    fn add_force(&mut self, force: Vec3);

    fn set_gravity_scale(&mut self, scale: f32);

    /// Confines motion to the plane with the given normal, or lifts the
    /// constraint with `None`.
    fn set_plane_constraint(&mut self, normal: Option<Dir3>);

    fn add_yaw(&mut self, degrees: f32);

    /// Roll of the character's camera relative to the character.
    fn set_camera_roll(&mut self, degrees: f32);
}
