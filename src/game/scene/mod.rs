//! Debug level with walls laid out for each parkour move.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::{game::player::SpawnPlayer, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        OnEnter(Screen::Gameplay),
        (spawn_parkour_course, spawn_level).chain(),
    );
}

/// Floor, two wall-run lanes, a climb wall and lights.
pub fn spawn_parkour_course(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Spawning parkour course...");

    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.5, 0.3),
        perceptual_roughness: 0.9,
        ..default()
    });
    let run_wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.7, 0.3, 0.3),
        ..default()
    });
    let climb_wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.3, 0.3, 0.7),
        ..default()
    });

    let floor_size = 60.0;
    let floor_height = 0.5;
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        floor_material,
        Vec3::new(0.0, -floor_height / 2.0, 0.0),
        Vec3::new(floor_size, floor_height, floor_size),
        "Ground Floor",
    );

    // Wall-run lanes. Running next to a wall keeps its face inside the
    // 70 cm side probe reach.
    let wall_height = 3.0;
    let wall_length = 16.0;
    let wall_thickness = 0.4;
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        run_wall_material.clone(),
        Vec3::new(-0.8, wall_height / 2.0, -10.0),
        Vec3::new(wall_thickness, wall_height, wall_length),
        "Wall Run Lane (left wall)",
    );
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        run_wall_material,
        Vec3::new(6.8, wall_height / 2.0, -10.0),
        Vec3::new(wall_thickness, wall_height, wall_length),
        "Wall Run Lane (right wall)",
    );

    // Needs `grounded_wall_climb` in the tuning file.
    let climb_height = 5.0;
    spawn_obstacle(
        &mut commands,
        &mut meshes,
        climb_wall_material,
        Vec3::new(3.0, climb_height / 2.0, -24.0),
        Vec3::new(8.0, climb_height, 0.5),
        "Climb Wall",
    );

    commands.spawn((
        Name::new("Sun"),
        DespawnOnExit(Screen::Gameplay),
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -1.0, -0.5, 0.0)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        affects_lightmapped_meshes: false,
    });
}

pub fn spawn_level(world: &mut World) {
    SpawnPlayer {
        position: Vec3::new(0.0, 1.5, 0.0),
    }
    .apply(world);
}

fn spawn_obstacle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    position: Vec3,
    size: Vec3,
    label: &str,
) {
    commands.spawn((
        DespawnOnExit(Screen::Gameplay),
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        Name::new(label.to_string()),
    ));
    debug!("Spawned obstacle: {} at {}", label, position);
}
