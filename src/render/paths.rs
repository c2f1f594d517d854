//! Orbit path construction and drawing.
//!
//! A path is one orbital period of the element set sampled at equal phase
//! offsets starting from wall-clock now, connected as an open polyline.
//! Samples where propagation fails are dropped rather than interpolated, so
//! a partially decayed set still draws the arc it can support. Paths are
//! rebuilt whole when the element set changes; the points of an existing
//! path are never edited in place.

use bevy::prelude::*;

use crate::elements::ElementSet;
use crate::frame::inertial_to_render;
use crate::types::{MS_PER_MINUTE, SimSet};

/// Settings for orbit path rendering.
#[derive(Resource)]
pub struct OrbitPathSettings {
    /// Whether to show orbit paths.
    pub visible: bool,
    /// Number of samples across one orbital period.
    pub samples: usize,
    /// Path color.
    pub color: Color,
}

impl Default for OrbitPathSettings {
    fn default() -> Self {
        Self {
            visible: true,
            samples: 500,
            color: Color::srgba(0.35, 0.8, 0.9, 0.55),
        }
    }
}

/// A sampled orbit polyline in render space.
#[derive(Component)]
pub struct OrbitPath {
    pub points: Vec<Vec3>,
}

/// Plugin providing orbit path visualization.
pub struct OrbitPathPlugin;

impl Plugin for OrbitPathPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitPathSettings>()
            .add_systems(Update, draw_orbit_paths.in_set(SimSet::SyncScene));
    }
}

/// Sample one orbital period into render-space points.
///
/// Returns `None` when the element set has no usable period or fewer than
/// two samples survive propagation.
pub fn build_orbit_path(
    elements: &ElementSet,
    start_unix_ms: f64,
    samples: usize,
) -> Option<Vec<Vec3>> {
    let period_ms = elements.period_minutes()? * MS_PER_MINUTE;
    let samples = samples.max(2);

    let mut points = Vec::with_capacity(samples);
    for i in 0..samples {
        let t = start_unix_ms + period_ms * (i as f64 / samples as f64);
        let Ok(state) = elements.propagate(t) else {
            continue;
        };
        points.push(inertial_to_render(state.position_km));
    }

    if points.len() < 2 {
        return None;
    }
    Some(points)
}

/// Build and spawn an orbit path entity for an element set.
///
/// The caller owns the returned entity and despawns it exactly once when the
/// element set is replaced or cleared.
pub fn spawn_orbit_path(
    commands: &mut Commands,
    elements: &ElementSet,
    start_unix_ms: f64,
    settings: &OrbitPathSettings,
) -> Option<Entity> {
    let points = build_orbit_path(elements, start_unix_ms, settings.samples)?;
    Some(commands.spawn(OrbitPath { points }).id())
}

/// Draw all orbit paths with gizmos.
fn draw_orbit_paths(
    mut gizmos: Gizmos,
    settings: Res<OrbitPathSettings>,
    paths: Query<&OrbitPath>,
) {
    if !settings.visible {
        return;
    }
    for path in &paths {
        if path.points.len() < 2 {
            continue;
        }
        gizmos.linestrip(path.points.iter().copied(), settings.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{ISS_LINE1, ISS_LINE2};
    use crate::types::EARTH_RADIUS_KM;

    #[test]
    fn test_path_samples_full_period() {
        let set = ElementSet::from_lines("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        let start = set.epoch_minutes * MS_PER_MINUTE;
        let points = build_orbit_path(&set, start, 500).unwrap();
        assert_eq!(points.len(), 500);

        // Every sample sits above the planet surface.
        let min_render_radius =
            (EARTH_RADIUS_KM * crate::frame::RENDER_UNITS_PER_KM) as f32;
        for p in &points {
            assert!(p.length() > min_render_radius);
        }

        // One full period comes back near the start (closed shape, open polyline).
        let first = points[0];
        let last = *points.last().unwrap();
        assert!(
            first.distance(last) < 0.5,
            "period endpoints {} render units apart",
            first.distance(last)
        );
    }

    #[test]
    fn test_sample_count_floor() {
        let set = ElementSet::from_lines("ISS (ZARYA)", ISS_LINE1, ISS_LINE2).unwrap();
        let start = set.epoch_minutes * MS_PER_MINUTE;
        let points = build_orbit_path(&set, start, 0).unwrap();
        assert_eq!(points.len(), 2);
    }
}
