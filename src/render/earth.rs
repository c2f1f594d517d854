//! Planet body and scene lighting.

use bevy::prelude::*;

use crate::frame::EARTH_RENDER_RADIUS;

/// Marker component for the planet entity.
#[derive(Component)]
pub struct Earth;

/// Plugin spawning the static planet body.
pub struct EarthPlugin;

impl Plugin for EarthPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_earth);
    }
}

/// Spawn the planet at the frame origin plus a sun-like directional light.
fn spawn_earth(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(Sphere::new(EARTH_RENDER_RADIUS));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.16, 0.35, 0.65),
        perceptual_roughness: 0.9,
        ..default()
    });

    commands.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(Vec3::ZERO),
        Earth,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            ..default()
        },
        Transform::from_xyz(60.0, 20.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 120.0,
        ..default()
    });

    info!("Spawned planet body (radius {} render units)", EARTH_RENDER_RADIUS);
}
