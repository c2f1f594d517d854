//! UI module providing the egui control surface.
//!
//! The panels are the in-process consumers of the engine's control API:
//! selection, nearby count, clock, and camera settings.

mod icons;
mod panel;
mod time_controls;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub use panel::SearchState;

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SearchState>()
            .init_resource::<icons::FontsInitialized>()
            // Request plumbing is plain state and runs with the simulation.
            .add_systems(Update, panel::drive_search)
            // Font initialization MUST run before any UI systems that use icons
            .add_systems(
                EguiPrimaryContextPass,
                (
                    icons::setup_fonts,
                    panel::side_panel,
                    time_controls::time_controls_panel,
                )
                    .chain(),
            );
    }
}
