//! Marker meshes for the tracked object and the nearby set.
//!
//! Markers spawn hidden at the origin and become visible on their first
//! successful propagation, so a model failure never draws a bogus position.

use bevy::prelude::*;

use crate::frame::inertial_to_render;
use crate::selection::TrackedState;

/// Tracked-object marker radius in render units. Deliberately oversized
/// (tens of km) so the object reads at planetary scale.
pub const TRACKED_MARKER_RADIUS: f32 = 0.09;

/// Nearby-object marker radius in render units.
pub const NEARBY_MARKER_RADIUS: f32 = 0.055;

/// Marker component for the tracked object's mesh.
#[derive(Component)]
pub struct TrackedMarker;

/// Marker component for a nearby object's mesh.
#[derive(Component)]
pub struct NearbyMarker {
    /// Index into the nearby set at creation time.
    pub index: usize,
}

/// Spawn the tracked-object marker. The caller owns the returned entity and
/// is responsible for despawning it exactly once.
pub fn spawn_tracked_marker(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let mesh = meshes.add(Sphere::new(TRACKED_MARKER_RADIUS));
    let color = Color::srgb(1.0, 0.8, 0.25);
    let material = materials.add(StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * 1.5,
        ..default()
    });

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(Vec3::ZERO),
            Visibility::Hidden,
            TrackedMarker,
        ))
        .id()
}

/// Spawn one nearby-object marker at an optional initial position.
pub fn spawn_nearby_marker(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    index: usize,
    initial: Option<Vec3>,
) -> Entity {
    let mesh = meshes.add(Sphere::new(NEARBY_MARKER_RADIUS));
    let color = Color::srgb(0.55, 0.75, 0.95);
    let material = materials.add(StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * 0.6,
        ..default()
    });

    let (translation, visibility) = match initial {
        Some(p) => (p, Visibility::Inherited),
        None => (Vec3::ZERO, Visibility::Hidden),
    };

    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(translation),
            visibility,
            NearbyMarker { index },
        ))
        .id()
}

/// Reposition the tracked marker from this tick's propagated state.
///
/// No state this tick (nothing tracked, or propagation failed) leaves the
/// marker where it was; it stays hidden until the first success.
pub fn sync_tracked_marker(
    state: Res<TrackedState>,
    mut query: Query<(&mut Transform, &mut Visibility), With<TrackedMarker>>,
) {
    let Some(state) = &state.state else {
        return;
    };
    for (mut transform, mut visibility) in query.iter_mut() {
        transform.translation = inertial_to_render(state.position_km);
        *visibility = Visibility::Inherited;
    }
}
