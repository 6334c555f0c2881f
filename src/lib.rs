//! Parkour abilities for a third-person character: sprint, crouch-slide,
//! wall-run, wall-climb and chained wall-jumps.
//!
//! [`game::parkour`] holds the engine-agnostic controller. The rest wires it
//! into a Bevy app with avian3d physics and a bevy-tnua character.

#[cfg(feature = "dev")]
mod dev_tools;
pub mod game;
pub mod screens;

use avian3d::prelude::*;
use bevy::prelude::*;

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            DefaultPlugins
                .set(AssetPlugin {
                    // Wasm builds will check for meta files (that don't exist) if this isn't set.
                    // This causes errors and even panics on web build on itch.
                    // See https://github.com/bevyengine/bevy_github_ci_template/issues/48.
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Parkour Abilities".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                    .into(),
                    ..default()
                }),
            PhysicsPlugins::default(),
        ));

        app.add_plugins((
            screens::plugin,
            game::plugin,
            #[cfg(feature = "dev")]
            dev_tools::plugin,
        ));

        app.add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
