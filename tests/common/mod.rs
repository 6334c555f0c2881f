//! Recording host shared by the controller tests.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use parkour_abilities::game::parkour::{ParkourConfig, ParkourController, ParkourHost, RayHit};

/// Poll interval used by the timeline tests; exact in binary floating point.
pub const STEP_SECS: f32 = 0.25;
pub const STEP: Duration = Duration::from_millis(250);

/// Config with a coarse poll so timelines are easy to count.
pub fn coarse_config() -> ParkourConfig {
    ParkourConfig {
        poll_interval: STEP_SECS,
        ..default()
    }
}

/// Which probes see a wall.
#[derive(Debug, Default, Clone, Copy)]
pub struct Walls {
    pub forward: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub velocity: Vec3,
    pub override_horizontal: bool,
    pub override_vertical: bool,
}

#[derive(Debug)]
pub struct MockHost {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub velocity: Vec3,
    pub falling: bool,
    pub walls: Walls,
    pub crouch_allowed: bool,

    pub crouched: bool,
    pub max_speed: f32,
    pub deceleration: f32,
    pub movement: Vec<(Vec3, f32)>,
    pub jumps: u32,
    pub launches: Vec<Launch>,
    pub forces: Vec<Vec3>,
    pub gravity_scale: f32,
    pub plane: Option<Dir3>,
    pub yaw: f32,
    pub camera_roll: f32,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            velocity: Vec3::ZERO,
            falling: false,
            walls: Walls::default(),
            crouch_allowed: true,
            crouched: false,
            max_speed: 600.0,
            deceleration: 2048.0,
            movement: Vec::new(),
            jumps: 0,
            launches: Vec::new(),
            forces: Vec::new(),
            gravity_scale: 1.0,
            plane: None,
            yaw: 0.0,
            camera_roll: 0.0,
        }
    }
}

impl MockHost {
    pub fn moving_at(speed: f32) -> Self {
        Self {
            velocity: Vec3::NEG_Z * speed,
            ..default()
        }
    }
}

impl ParkourHost for MockHost {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn forward(&self) -> Vec3 {
        self.forward
    }

    fn right(&self) -> Vec3 {
        self.right
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn is_falling(&self) -> bool {
        self.falling
    }

    fn raycast(&self, origin: Vec3, destination: Vec3) -> Option<RayHit> {
        let offset = destination - origin;
        let hit = if offset.dot(self.forward) > 0.0 {
            self.walls.forward
        } else if offset.dot(self.right) > 0.0 {
            self.walls.right
        } else {
            self.walls.left
        };
        hit.then_some(RayHit { point: destination })
    }

    fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.movement.push((direction, scale));
    }

    fn set_max_speed(&mut self, speed: f32) {
        self.max_speed = speed;
    }

    fn set_braking_deceleration(&mut self, deceleration: f32) {
        self.deceleration = deceleration;
    }

    fn can_crouch(&self) -> bool {
        self.crouch_allowed && !self.crouched
    }

    fn crouch(&mut self) {
        self.crouched = true;
    }

    fn uncrouch(&mut self) {
        self.crouched = false;
    }

    fn jump(&mut self) {
        self.jumps += 1;
    }

    fn launch(&mut self, velocity: Vec3, override_horizontal: bool, override_vertical: bool) {
        if override_horizontal {
            self.velocity.x = velocity.x;
            self.velocity.z = velocity.z;
        } else {
            self.velocity.x += velocity.x;
            self.velocity.z += velocity.z;
        }
        if override_vertical {
            self.velocity.y = velocity.y;
        } else {
            self.velocity.y += velocity.y;
        }
        self.launches.push(Launch {
            velocity,
            override_horizontal,
            override_vertical,
        });
    }

    fn add_force(&mut self, force: Vec3) {
        self.forces.push(force);
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    fn set_plane_constraint(&mut self, normal: Option<Dir3>) {
        self.plane = normal;
    }

    fn add_yaw(&mut self, degrees: f32) {
        self.yaw += degrees;
    }

    fn set_camera_roll(&mut self, degrees: f32) {
        self.camera_roll = degrees;
    }
}

/// Triggers the ability on the ground, lets the jump check jump, then
/// leaves the character falling at `speed` next to the given walls and
/// polls once more.
pub fn jump_toward_walls(
    controller: &mut ParkourController,
    host: &mut MockHost,
    speed: f32,
    walls: Walls,
) {
    host.falling = false;
    controller.parkour(host);
    controller.tick(host, STEP);

    host.falling = true;
    host.velocity = Vec3::new(0.0, 0.0, -speed);
    host.walls = walls;
    controller.tick(host, STEP);
}

/// Starts a wall-run on the right at 300 units/s.
pub fn start_right_wall_run(controller: &mut ParkourController, host: &mut MockHost) {
    jump_toward_walls(
        controller,
        host,
        300.0,
        Walls {
            right: true,
            ..default()
        },
    );
}
