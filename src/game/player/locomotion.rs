use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_tnua::{TnuaToggle, builtins::TnuaBuiltinCrouch, prelude::*};

use super::{FLOAT_HEIGHT, MovementController, Player};
use crate::game::parkour::ParkourSystems;

const JUMP_HEIGHT: f32 = 1.2;
const CROUCH_FLOAT_OFFSET: f32 = -0.45;
/// Slack below the float height still counted as standing on ground.
const GROUND_MARGIN: f32 = 0.15;

fn sense_ground(
    spatial: SpatialQuery,
    mut players: Query<(Entity, &Transform, &mut MovementController), With<Player>>,
) {
    for (entity, transform, mut movement) in players.iter_mut() {
        let filter = SpatialQueryFilter::from_excluded_entities([entity]);
        let grounded = spatial
            .cast_ray(
                transform.translation,
                Dir3::NEG_Y,
                FLOAT_HEIGHT + GROUND_MARGIN,
                true,
                &filter,
            )
            .is_some();

        if grounded != movement.grounded {
            debug!(grounded, "ground contact changed");
            movement.grounded = grounded;
        }
    }
}

/// Locks translation along the dominant axis of a plane normal.
fn locked_axes_for(plane: Option<Dir3>) -> LockedAxes {
    let locked = LockedAxes::ROTATION_LOCKED;
    let Some(normal) = plane else {
        return locked;
    };
    let n = normal.abs();
    if n.y >= n.x && n.y >= n.z {
        locked.lock_translation_y()
    } else if n.x >= n.z {
        locked.lock_translation_x()
    } else {
        locked.lock_translation_z()
    }
}

/// Turns the host-side movement state into tnua and avian input.
///
/// Tnua is switched off while a plane constraint holds the body so its
/// floating spring does not fight the wall-run.
fn apply_locomotion(
    time: Res<Time>,
    mut players: Query<
        (
            &mut MovementController,
            &mut TnuaController,
            &mut TnuaToggle,
            &mut LockedAxes,
            &mut ConstantForce,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (mut movement, mut controller, mut toggle, mut locked, mut force) in players.iter_mut() {
        let constrained = movement.plane_constraint.is_some();
        let enabled = matches!(*toggle, TnuaToggle::Enabled);
        if constrained && enabled {
            *toggle = TnuaToggle::Disabled;
            debug!("tnua suspended");
        } else if !constrained && !enabled {
            *toggle = TnuaToggle::Enabled;
            debug!("tnua resumed");
        }
        *locked = locked_axes_for(movement.plane_constraint);
        force.0 = std::mem::take(&mut movement.pending_force);

        let mut direction = movement.movement_input;
        direction.y = 0.0;
        let direction = direction.clamp_length_max(1.0);
        movement.movement_input = Vec3::ZERO;

        // Feed the basis every frame, even with zero velocity, or tnua lets
        // the collider fall.
        controller.basis(TnuaBuiltinWalk {
            desired_velocity: direction * movement.max_speed,
            float_height: FLOAT_HEIGHT,
            acceleration: movement.braking_deceleration,
            ..Default::default()
        });

        if movement.crouched {
            controller.action(TnuaBuiltinCrouch {
                float_offset: CROUCH_FLOAT_OFFSET,
                ..Default::default()
            });
        }

        if movement.jump_hold > 0.0 {
            controller.action(TnuaBuiltinJump {
                height: JUMP_HEIGHT,
                ..Default::default()
            });
            movement.jump_hold = (movement.jump_hold - dt).max(0.0);
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, sense_ground.in_set(ParkourSystems::Sense));
    app.add_systems(
        FixedUpdate,
        apply_locomotion.in_set(ParkourSystems::Locomotion),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_run_plane_locks_vertical_translation() {
        let vertical = locked_axes_for(Some(Dir3::Y));
        assert!(vertical.is_translation_y_locked());
        assert!(!vertical.is_translation_x_locked());

        let sideways = locked_axes_for(Some(Dir3::NEG_X));
        assert!(sideways.is_translation_x_locked());
        assert!(!sideways.is_translation_y_locked());

        let free = locked_axes_for(None);
        assert!(free.is_rotation_y_locked());
        assert!(!free.is_translation_y_locked());
    }
}
