use bevy::{
    input::mouse::AccumulatedMouseMotion,
    prelude::*,
    window::{CursorGrabMode, CursorOptions},
};

use crate::{
    game::player::{MovementController, Player},
    screens::Screen,
};

/// Exponential decay rate of the camera roll toward its target.
const ROLL_DECAY: f32 = 8.0;
const PITCH_LIMIT: f32 = 1.2;

/// Third-person camera trailing the player.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct FollowCamera {
    pub distance: f32,
    pub height: f32,
    /// Radians per pixel of mouse motion.
    pub sensitivity: Vec2,
    pub pitch: f32,
    /// Current roll in degrees, easing toward the player's request.
    pub roll: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            distance: 5.0,
            height: 1.6,
            sensitivity: Vec2::new(0.003, 0.002),
            pitch: -0.2,
            roll: 0.0,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<FollowCamera>();
    app.add_systems(Update, attach_camera_to_player);
    app.add_systems(
        Update,
        (mouse_look, follow_player)
            .chain()
            .run_if(in_state(Screen::Gameplay)),
    );

    // Cursor lock management based on screen state
    app.add_systems(OnEnter(Screen::Gameplay), enable_cursor_lock);
    app.add_systems(OnExit(Screen::Gameplay), disable_cursor_lock);
}

/// Attach the follow camera component to the main camera when a player exists
fn attach_camera_to_player(
    mut commands: Commands,
    player_query: Query<(), With<Player>>,
    camera_query: Query<Entity, (With<Camera3d>, Without<FollowCamera>)>,
) {
    if player_query.is_empty() {
        return;
    }
    let fov: f32 = 70.0;
    if let Ok(camera_entity) = camera_query.single() {
        commands.entity(camera_entity).insert((
            FollowCamera::default(),
            Projection::from(PerspectiveProjection {
                fov: fov.to_radians(),
                ..Default::default()
            }),
        ));
    }
}

/// Mouse X turns the player, mouse Y pitches the camera.
fn mouse_look(
    motion: Res<AccumulatedMouseMotion>,
    cursor_options: Query<&CursorOptions, With<Window>>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut camera_query: Query<&mut FollowCamera>,
) {
    let locked = cursor_options
        .iter()
        .any(|cursor| cursor.grab_mode != CursorGrabMode::None);
    if !locked || motion.delta == Vec2::ZERO {
        return;
    }
    let Ok(mut camera) = camera_query.single_mut() else {
        return;
    };
    let Ok(mut player) = player_query.single_mut() else {
        return;
    };

    player.rotate_y(-motion.delta.x * camera.sensitivity.x);
    camera.pitch = (camera.pitch - motion.delta.y * camera.sensitivity.y)
        .clamp(-PITCH_LIMIT, PITCH_LIMIT);
}

fn follow_player(
    time: Res<Time>,
    player_query: Query<(&Transform, &MovementController), With<Player>>,
    mut camera_query: Query<(&mut Transform, &mut FollowCamera), Without<Player>>,
) {
    let Ok((player, movement)) = player_query.single() else {
        return;
    };
    let Ok((mut transform, mut camera)) = camera_query.single_mut() else {
        return;
    };

    camera.roll = eased_roll(camera.roll, movement.camera_roll, time.delta_secs());

    let (yaw, _, _) = player.rotation.to_euler(EulerRot::YXZ);
    let orbit = Quat::from_euler(EulerRot::YXZ, yaw, camera.pitch, 0.0);
    let pivot = player.translation + Vec3::Y * camera.height;

    transform.translation = pivot + orbit * Vec3::Z * camera.distance;
    transform.rotation = orbit * Quat::from_rotation_z(camera.roll.to_radians());
}

fn eased_roll(current: f32, target: f32, dt: f32) -> f32 {
    let mut roll = current;
    roll.smooth_nudge(&target, ROLL_DECAY, dt);
    roll
}

/// Enable cursor lock when entering gameplay
fn enable_cursor_lock(mut cursor_options: Query<&mut CursorOptions, With<Window>>) {
    for mut cursor in cursor_options.iter_mut() {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    }
    info!("Cursor lock enabled for gameplay");
}

/// Disable cursor lock when exiting gameplay
fn disable_cursor_lock(mut cursor_options: Query<&mut CursorOptions, With<Window>>) {
    for mut cursor in cursor_options.iter_mut() {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
    info!("Cursor lock disabled outside gameplay");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_eases_toward_the_wall_run_tilt() {
        let first = eased_roll(0.0, -20.0, 1.0 / 60.0);
        assert!(first < 0.0 && first > -20.0);

        let settled = (0..240).fold(0.0, |roll, _| eased_roll(roll, -20.0, 1.0 / 60.0));
        assert!((settled + 20.0).abs() < 0.01);
    }
}
