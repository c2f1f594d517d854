//! Keyboard shortcuts for simulation and camera control.

use bevy::prelude::*;

use crate::camera::CameraRig;
use crate::render::paths::OrbitPathSettings;
use crate::selection::SelectObject;
use crate::types::SimulationClock;

/// Plugin providing keyboard input handling.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, keyboard_shortcuts);
    }
}

/// Handle keyboard shortcuts for simulation control.
fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut clock: ResMut<SimulationClock>,
    mut rig: ResMut<CameraRig>,
    mut path_settings: ResMut<OrbitPathSettings>,
    mut selections: MessageWriter<SelectObject>,
) {
    // Space: toggle pause
    if keys.just_pressed(KeyCode::Space) {
        clock.paused = !clock.paused;
        info!("Simulation {}", if clock.paused { "paused" } else { "running" });
    }

    // Quick speed factor selection with number keys
    if keys.just_pressed(KeyCode::Digit1) {
        clock.set_speed(1.0);
        info!("Speed factor: 1x (real-time)");
    }
    if keys.just_pressed(KeyCode::Digit2) {
        clock.set_speed(2.0);
        info!("Speed factor: 2x");
    }
    if keys.just_pressed(KeyCode::Digit5) {
        clock.set_speed(5.0);
        info!("Speed factor: 5x");
    }
    if keys.just_pressed(KeyCode::Digit0) {
        clock.set_speed(10.0);
        info!("Speed factor: 10x");
    }

    // Bracket keys: halve/double speed within the UI range
    if keys.just_pressed(KeyCode::BracketLeft) {
        let speed = (clock.speed * 0.5).max(1.0);
        clock.set_speed(speed);
        info!("Speed factor: {}x", clock.speed);
    }
    if keys.just_pressed(KeyCode::BracketRight) {
        let speed = (clock.speed * 2.0).min(10.0);
        clock.set_speed(speed);
        info!("Speed factor: {}x", clock.speed);
    }

    // F: toggle camera follow
    if keys.just_pressed(KeyCode::KeyF) {
        rig.follow = !rig.follow;
        info!("Camera follow {}", if rig.follow { "on" } else { "off" });
    }

    // O: toggle orbit path visibility
    if keys.just_pressed(KeyCode::KeyO) {
        path_settings.visible = !path_settings.visible;
    }

    // Escape: clear the selection
    if keys.just_pressed(KeyCode::Escape) {
        selections.write(SelectObject(None));
    }
}
