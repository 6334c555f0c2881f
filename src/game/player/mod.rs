//! The player character: an avian3d capsule walked by bevy-tnua and driven
//! by a [`ParkourController`].

pub mod host;
mod input;
mod locomotion;

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_tnua::{TnuaToggle, prelude::*};
use bevy_tnua_avian3d::*;

use crate::{
    game::{
        configs::ParkourSettings,
        parkour::{ParkourConfig, ParkourController, ParkourSystems},
    },
    screens::Screen,
};

pub use host::{AvianParkourHost, ParkourHostData, UNITS_PER_METER};
pub use input::{ParkourBindings, ParkourInput};

// Player marker component
#[derive(Component)]
pub struct Player;

/// Host-side movement state, in metres and seconds.
///
/// [`AvianParkourHost`] writes it while the controller runs, and the
/// locomotion systems turn it into tnua and avian input afterwards.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementController {
    /// Accumulated this step, cleared once handed to tnua.
    pub movement_input: Vec3,
    pub max_speed: f32,
    pub braking_deceleration: f32,
    pub crouched: bool,
    /// Seconds left during which the jump action is held.
    pub jump_hold: f32,
    /// Force in newtons for the next physics step.
    pub pending_force: Vec3,
    pub plane_constraint: Option<Dir3>,
    pub grounded: bool,
    /// Camera roll the character asks for, in degrees.
    pub camera_roll: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::from_config(&ParkourConfig::default())
    }
}

impl MovementController {
    pub fn from_config(config: &ParkourConfig) -> Self {
        Self {
            movement_input: Vec3::ZERO,
            max_speed: config.normal_speed / UNITS_PER_METER,
            braking_deceleration: config.default_deceleration / UNITS_PER_METER,
            crouched: false,
            jump_hold: 0.0,
            pending_force: Vec3::ZERO,
            plane_constraint: None,
            grounded: false,
            camera_roll: 0.0,
        }
    }
}

// Constants
pub const PLAYER_HEIGHT: f32 = 1.1;
pub const PLAYER_RADIUS: f32 = 0.4;
/// Centre of the body above the ground while standing.
pub const FLOAT_HEIGHT: f32 = 1.0;

// Player spawn command
pub struct SpawnPlayer {
    pub position: Vec3,
}

impl Command for SpawnPlayer {
    fn apply(self, world: &mut World) {
        let _ = world.run_system_cached_with(spawn_player, self);
    }
}

fn spawn_player(
    In(spawn_config): In<SpawnPlayer>,
    mut commands: Commands,
    settings: Res<ParkourSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = settings.0.clone();
    info!(position = ?spawn_config.position, "spawning player");

    commands
        .spawn((
            Name::new("Player"),
            Player,
            MovementController::from_config(&config),
            ParkourController::new(config),
            DespawnOnExit(Screen::Gameplay), // Cleanup when leaving Gameplay screen
            Transform::from_translation(spawn_config.position),
            Visibility::Visible,
        ))
        .insert((
            // Avian3D physics components
            RigidBody::Dynamic,
            Collider::capsule(PLAYER_RADIUS, PLAYER_HEIGHT),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(1.0),
            ConstantForce::default(),
            TnuaController::default(),
            TnuaToggle::Enabled,
            TnuaAvian3dSensorShape(Collider::cylinder(PLAYER_RADIUS - 0.01, 0.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Name::new("Player Body"),
                Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HEIGHT))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(0.9, 0.6, 0.2),
                    ..default()
                })),
            ));
        });
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<MovementController>();
    app.add_plugins((
        TnuaControllerPlugin::new(FixedUpdate),
        TnuaAvian3dPlugin::new(FixedUpdate),
    ));
    app.configure_sets(
        FixedUpdate,
        ParkourSystems::Locomotion.in_set(TnuaUserControlsSystems),
    );

    app.add_plugins((input::plugin, host::plugin, locomotion::plugin));
}
