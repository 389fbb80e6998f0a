//! A demo scene that only uses primitive shapes.
//!
//! The nav area is built shortly after startup. Press `Space` to rebuild it and `G` to toggle the gizmos.

use std::time::Duration;

use avian_navarea::{navarea::NavAreaConfig, prelude::*};
use avian3d::prelude::*;
use bevy::{
    color::palettes::tailwind, input::common_conditions::input_just_pressed, prelude::*,
    time::common_conditions::once_after_delay,
};

fn main() -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(NavAreaPlugin)
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                build_nav_areas.run_if(once_after_delay(Duration::from_millis(500))),
                build_nav_areas.run_if(input_just_pressed(KeyCode::Space)),
                toggle_gizmos.run_if(input_just_pressed(KeyCode::KeyG)),
            ),
        )
        .run()
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let material_gray = materials.add(Color::from(tailwind::GRAY_300));
    let material_red = materials.add(Color::from(tailwind::RED_500));
    let shape = Cuboid::new(50.0, 0.1, 50.0);
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(shape)),
        RigidBody::Static,
        Collider::from(shape),
        MeshMaterial3d(material_gray.clone()),
    ));
    let shape = Cuboid::new(3.0, 2.0, 1.0);
    commands.spawn((
        Name::new("Cube"),
        Mesh3d(meshes.add(shape)),
        RigidBody::Static,
        Collider::from(shape),
        Transform::from_xyz(0.0, 1.0, 0.0),
        MeshMaterial3d(material_gray.clone()),
    ));
    let shape = Cuboid::new(1.0, 2.0, 3.0);
    commands.spawn((
        Name::new("Cube"),
        Mesh3d(meshes.add(shape)),
        RigidBody::Static,
        Collider::from(shape),
        Transform::from_xyz(-4.0, 1.0, 5.0),
        MeshMaterial3d(material_gray.clone()),
    ));

    // Too steep to walk on
    let shape = Cuboid::new(4.0, 0.2, 3.0);
    commands.spawn((
        Name::new("Ramp"),
        Mesh3d(meshes.add(shape)),
        RigidBody::Static,
        Collider::from(shape),
        Transform::from_xyz(6.0, 0.8, -5.0).with_rotation(Quat::from_rotation_z(0.9)),
        MeshMaterial3d(material_red.clone()),
    ));

    commands.spawn((
        Name::new("Nav Area"),
        NavArea(NavAreaConfig::new(24.0, 24.0, 4.0, 0.5, 2.0)),
        Transform::from_xyz(0.0, 1.0, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.5, -1.0, 0.3), Vec3::Y),
    ));
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(10.0, 18.0, 24.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn build_nav_areas(areas: Query<Entity, With<NavArea>>, mut commands: Commands) {
    for entity in &areas {
        commands.trigger_targets(BuildNavArea, entity);
    }
}

fn toggle_gizmos(mut gizmos: ResMut<NavAreaGizmos>) {
    gizmos.enabled = !gizmos.enabled;
}
