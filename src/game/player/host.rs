//! [`ParkourHost`] on top of avian3d, and the fixed-step system feeding the
//! player's [`ParkourController`].

use avian3d::prelude::*;
use bevy::prelude::*;

use super::{MovementController, ParkourInput, Player};
use crate::{
    game::parkour::{ParkourController, ParkourHost, ParkourSystems, RayHit},
    screens::Screen,
};

/// Parkour tuning is authored in centimetres, the physics world in metres.
pub const UNITS_PER_METER: f32 = 100.0;

/// How long the jump action stays fed after a single jump request.
const JUMP_HOLD_SECS: f32 = 0.15;

/// Components an [`AvianParkourHost`] is built from.
pub type ParkourHostData = (
    Entity,
    &'static mut Transform,
    &'static mut LinearVelocity,
    &'static mut GravityScale,
    &'static mut MovementController,
);

pub struct AvianParkourHost<'a, 'w, 's> {
    entity: Entity,
    transform: &'a mut Transform,
    velocity: &'a mut LinearVelocity,
    gravity: &'a mut GravityScale,
    movement: &'a mut MovementController,
    spatial: &'a SpatialQuery<'w, 's>,
}

impl<'a, 'w, 's> AvianParkourHost<'a, 'w, 's> {
    pub fn new(
        entity: Entity,
        transform: &'a mut Transform,
        velocity: &'a mut LinearVelocity,
        gravity: &'a mut GravityScale,
        movement: &'a mut MovementController,
        spatial: &'a SpatialQuery<'w, 's>,
    ) -> Self {
        Self {
            entity,
            transform,
            velocity,
            gravity,
            movement,
            spatial,
        }
    }
}

impl ParkourHost for AvianParkourHost<'_, '_, '_> {
    fn position(&self) -> Vec3 {
        self.transform.translation * UNITS_PER_METER
    }

    fn forward(&self) -> Vec3 {
        self.transform.forward().as_vec3()
    }

    fn right(&self) -> Vec3 {
        self.transform.right().as_vec3()
    }

    fn velocity(&self) -> Vec3 {
        self.velocity.0 * UNITS_PER_METER
    }

    fn is_falling(&self) -> bool {
        !self.movement.grounded
    }

    fn raycast(&self, origin: Vec3, destination: Vec3) -> Option<RayHit> {
        let origin = origin / UNITS_PER_METER;
        let offset = destination / UNITS_PER_METER - origin;
        let (direction, max_distance) = Dir3::new_and_length(offset).ok()?;
        let filter = SpatialQueryFilter::from_excluded_entities([self.entity]);

        self.spatial
            .cast_ray(origin, direction, max_distance, true, &filter)
            .map(|hit| RayHit {
                point: (origin + direction * hit.distance) * UNITS_PER_METER,
            })
    }

    fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.movement.movement_input += direction * scale;
    }

    fn set_max_speed(&mut self, speed: f32) {
        self.movement.max_speed = speed / UNITS_PER_METER;
    }

    fn set_braking_deceleration(&mut self, deceleration: f32) {
        self.movement.braking_deceleration = deceleration / UNITS_PER_METER;
    }

    fn can_crouch(&self) -> bool {
        !self.movement.crouched
    }

    fn crouch(&mut self) {
        self.movement.crouched = true;
    }

    fn uncrouch(&mut self) {
        self.movement.crouched = false;
    }

    fn jump(&mut self) {
        self.movement.jump_hold = JUMP_HOLD_SECS;
    }

    fn launch(&mut self, velocity: Vec3, override_horizontal: bool, override_vertical: bool) {
        let velocity = velocity / UNITS_PER_METER;
        let current = &mut self.velocity.0;
        if override_horizontal {
            current.x = velocity.x;
            current.z = velocity.z;
        } else {
            current.x += velocity.x;
            current.z += velocity.z;
        }
        if override_vertical {
            current.y = velocity.y;
        } else {
            current.y += velocity.y;
        }
    }

    fn add_force(&mut self, force: Vec3) {
        self.movement.pending_force += force / UNITS_PER_METER;
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity.0 = scale;
    }

    fn set_plane_constraint(&mut self, normal: Option<Dir3>) {
        self.movement.plane_constraint = normal;
    }

    fn add_yaw(&mut self, degrees: f32) {
        // Positive yaw turns to the right, which is clockwise seen from above.
        self.transform.rotate_y(-degrees.to_radians());
    }

    fn set_camera_roll(&mut self, degrees: f32) {
        self.movement.camera_roll = degrees;
    }
}

/// Feeds this step's input into the controller, then advances its timers.
fn drive_parkour(
    time: Res<Time>,
    mut input: ResMut<ParkourInput>,
    spatial: SpatialQuery,
    mut players: Query<(&mut ParkourController, ParkourHostData), With<Player>>,
) {
    let (ability, cancel) = input.take_presses();

    for (mut controller, (entity, mut transform, mut velocity, mut gravity, mut movement)) in
        players.iter_mut()
    {
        let mut host = AvianParkourHost::new(
            entity,
            &mut transform,
            &mut velocity,
            &mut gravity,
            &mut movement,
            &spatial,
        );

        controller.move_forward(&mut host, input.forward);
        controller.move_right(&mut host, input.right);
        controller.sprint(&mut host, input.sprint);
        controller.crouch_slide(&mut host, input.crouch);
        if ability {
            controller.parkour(&mut host);
        }
        if cancel {
            controller.un_parkour(&mut host);
        }
        controller.tick(&mut host, time.delta());
    }
}

fn sync_spawned_hosts(
    spatial: SpatialQuery,
    mut players: Query<(&ParkourController, ParkourHostData), Added<ParkourController>>,
) {
    for (controller, (entity, mut transform, mut velocity, mut gravity, mut movement)) in
        players.iter_mut()
    {
        let mut host = AvianParkourHost::new(
            entity,
            &mut transform,
            &mut velocity,
            &mut gravity,
            &mut movement,
            &spatial,
        );
        controller.sync_host(&mut host);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        ParkourSystems::Abilities.run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(
        FixedUpdate,
        (sync_spawned_hosts, drive_parkour)
            .chain()
            .in_set(ParkourSystems::Abilities),
    );
}
