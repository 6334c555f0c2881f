//! Development tools for the game. This plugin is only enabled in dev builds.

use avian3d::prelude::{PhysicsDebugPlugin, PhysicsGizmos};
use bevy::{
    color::palettes::css::{ORANGE_RED, SKY_BLUE},
    dev_tools::states::log_transitions,
    input::common_conditions::input_just_pressed,
    prelude::*,
};

use crate::{
    game::{
        parkour::{LocomotionMode, ParkourController, Probe, ProbeFrame, ProbeGeometry},
        player::UNITS_PER_METER,
    },
    screens::Screen,
};

const PHYSICS_DEBUG_KEY: KeyCode = KeyCode::F3;

pub(super) fn plugin(app: &mut App) {
    // Log `Screen` state transitions.
    app.add_systems(
        Update,
        (log_transitions::<Screen>, log_locomotion_mode, draw_probes),
    );
    app.add_plugins(PhysicsDebugPlugin::default());
    app.add_systems(
        Update,
        toggle_physics_debug.run_if(input_just_pressed(PHYSICS_DEBUG_KEY)),
    );
}

fn toggle_physics_debug(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    info!(
        "Physics debug rendering: {}",
        if config.enabled { "ON" } else { "OFF" }
    );
}

fn log_locomotion_mode(
    controllers: Query<&ParkourController>,
    mut last: Local<Option<LocomotionMode>>,
) {
    let Ok(controller) = controllers.single() else {
        return;
    };
    let mode = controller.mode();
    if *last != Some(mode) {
        info!(?mode, session = ?controller.session(), "locomotion mode");
        *last = Some(mode);
    }
}

/// Draws the three wall probes, red while a wall session is running.
fn draw_probes(mut gizmos: Gizmos, controllers: Query<(&Transform, &ParkourController)>) {
    for (transform, controller) in &controllers {
        let probes = ProbeGeometry::from_config(controller.config());
        let frame = ProbeFrame {
            position: transform.translation * UNITS_PER_METER,
            forward: transform.forward().as_vec3(),
            right: transform.right().as_vec3(),
        };
        let color = if controller.session().is_wall_session() {
            ORANGE_RED
        } else {
            SKY_BLUE
        };

        for probe in [Probe::Forward, Probe::Left, Probe::Right] {
            let end = probes.point(probe, &frame) / UNITS_PER_METER;
            gizmos.line(transform.translation, end, color);
        }
    }
}
