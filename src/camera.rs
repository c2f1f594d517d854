//! Camera system for the tracking engine.
//!
//! While follow is enabled the camera chases the tracked object: a framing
//! offset scaled by zoom, clamped to a spherical shell around the planet,
//! approached exponentially each tick. With follow off the user orbits and
//! zooms freely inside the same shell.

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};

use crate::frame::{EARTH_RENDER_RADIUS, inertial_to_render};
use crate::selection::TrackedState;
use crate::types::SimSet;

/// Fraction of the remaining distance covered per tick while following.
pub const DEFAULT_SMOOTHING: f32 = 0.08;

/// Minimum zoom factor applied to the framing offset.
pub const MIN_ZOOM: f32 = 0.25;

/// Maximum zoom factor applied to the framing offset.
pub const MAX_ZOOM: f32 = 8.0;

/// Scroll wheel zoom speed in free-camera mode.
pub const ZOOM_SPEED: f32 = 0.1;

/// Radians of orbit per pixel of mouse drag in free-camera mode.
pub const ORBIT_SPEED: f32 = 0.005;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Closed set of follow framing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraMode {
    /// Beside the object, slightly raised, horizon in view.
    SideHorizon,
    /// Directly above the object.
    TopView,
    /// Above and ahead of the object.
    TopFront,
}

impl CameraMode {
    pub const ALL: [CameraMode; 3] =
        [CameraMode::SideHorizon, CameraMode::TopView, CameraMode::TopFront];

    pub fn label(&self) -> &'static str {
        match self {
            CameraMode::SideHorizon => "Horizon",
            CameraMode::TopView => "Top",
            CameraMode::TopFront => "Top-front",
        }
    }

    /// Framing offset at zoom 1.0, in render units.
    fn base_offset(&self) -> Vec3 {
        match self {
            CameraMode::SideHorizon => Vec3::new(2.2, 0.4, 0.0),
            CameraMode::TopView => Vec3::new(0.0, 2.8, 0.0),
            CameraMode::TopFront => Vec3::new(0.0, 2.2, 1.6),
        }
    }
}

/// Resource holding the camera configuration and follow state.
#[derive(Resource)]
pub struct CameraRig {
    pub mode: CameraMode,
    pub zoom: f32,
    pub follow: bool,
    /// Closest allowed distance from the planet center. Strictly greater
    /// than the planet's render radius.
    pub min_distance: f32,
    /// Furthest allowed distance from the planet center.
    pub max_distance: f32,
    /// Exponential approach rate per tick.
    pub smoothing: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            mode: CameraMode::SideHorizon,
            zoom: 1.0,
            follow: true,
            min_distance: EARTH_RENDER_RADIUS * 1.15,
            max_distance: EARTH_RENDER_RADIUS * 40.0,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

impl CameraRig {
    /// Set the zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Where the camera wants to be for a tracked object at `target`.
    pub fn desired_position(&self, target: Vec3) -> Vec3 {
        let desired = target + self.mode.base_offset() * self.zoom;
        clamp_to_shell(desired, self.min_distance, self.max_distance)
    }
}

/// Rescale a position to lie within a spherical shell around the origin,
/// preserving its direction.
pub fn clamp_to_shell(p: Vec3, min: f32, max: f32) -> Vec3 {
    let len = p.length();
    if len < 1e-6 {
        // Degenerate direction: snap to the inner shell on +X.
        return Vec3::new(min, 0.0, 0.0);
    }
    p * (len.clamp(min, max) / len)
}

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (follow_tracked, free_camera_controls).in_set(SimSet::Camera),
            );
    }
}

/// Spawn the main camera looking at the planet.
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 4.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));
}

/// Chase the tracked object while follow is enabled.
///
/// The camera closes a fixed fraction of the gap each tick and always looks
/// at the object, so mode and zoom changes glide instead of jumping.
fn follow_tracked(
    rig: Res<CameraRig>,
    state: Res<TrackedState>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if !rig.follow {
        return;
    }
    let Some(state) = &state.state else {
        return;
    };
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let target = inertial_to_render(state.position_km);
    let desired = rig.desired_position(target);

    transform.translation = transform.translation.lerp(desired, rig.smoothing);
    transform.look_at(target, Vec3::Y);
}

/// Free orbit and zoom around the planet while follow is disabled.
fn free_camera_controls(
    rig: Res<CameraRig>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    if rig.follow {
        return;
    }
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let mut translation = transform.translation;

    if mouse_scroll.delta.y != 0.0 {
        let zoom_factor = 1.0 - mouse_scroll.delta.y * ZOOM_SPEED;
        translation *= zoom_factor;
    }

    if mouse_buttons.pressed(MouseButton::Left) && mouse_motion.delta != Vec2::ZERO {
        let yaw = Quat::from_rotation_y(-mouse_motion.delta.x * ORBIT_SPEED);
        translation = yaw * translation;

        let right = *transform.right();
        let pitch = Quat::from_axis_angle(right, -mouse_motion.delta.y * ORBIT_SPEED);
        let pitched = pitch * translation;
        // Keep away from the poles so look_at's up vector stays valid.
        if pitched.normalize_or_zero().dot(Vec3::Y).abs() < 0.98 {
            translation = pitched;
        }
    }

    transform.translation = clamp_to_shell(translation, rig.min_distance, rig.max_distance);
    transform.look_at(Vec3::ZERO, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_min_distance_exceeds_planet_radius() {
        let rig = CameraRig::default();
        assert!(rig.min_distance > EARTH_RENDER_RADIUS);
        assert!(rig.max_distance > rig.min_distance);
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let p = Vec3::new(100.0, 40.0, -3.0);
        let clamped = clamp_to_shell(p, 5.0, 50.0);
        assert_relative_eq!(
            clamped.normalize().dot(p.normalize()),
            1.0,
            epsilon = 1e-5
        );
        assert_relative_eq!(clamped.length(), 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_clamp_handles_degenerate_input() {
        let clamped = clamp_to_shell(Vec3::ZERO, 5.0, 50.0);
        assert_relative_eq!(clamped.length(), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_smoothing_converges_to_desired() {
        let rig = CameraRig::default();
        let target = Vec3::new(6.8, 0.0, 0.0);
        let desired = rig.desired_position(target);

        let mut position = Vec3::new(0.0, 4.0, 20.0);
        for _ in 0..400 {
            position = position.lerp(desired, rig.smoothing);
        }
        assert!(position.distance(desired) < 1e-2);
    }

    proptest! {
        /// Distance stays inside [min, max] for any mode/zoom/target.
        #[test]
        fn prop_follow_distance_always_in_bounds(
            zoom in 0.25f32..8.0,
            mode_index in 0usize..3,
            x in -10.0f32..10.0,
            y in -10.0f32..10.0,
            z in -10.0f32..10.0,
        ) {
            let mut rig = CameraRig::default();
            rig.mode = CameraMode::ALL[mode_index];
            rig.set_zoom(zoom);

            let desired = rig.desired_position(Vec3::new(x, y, z));
            let distance = desired.length();
            prop_assert!(distance >= rig.min_distance * 0.999);
            prop_assert!(distance <= rig.max_distance * 1.001);
        }

        /// Zoom setter never leaves the supported range.
        #[test]
        fn prop_zoom_is_clamped(zoom in -100.0f32..100.0) {
            let mut rig = CameraRig::default();
            rig.set_zoom(zoom);
            prop_assert!(rig.zoom >= MIN_ZOOM && rig.zoom <= MAX_ZOOM);
        }
    }
}
