//! leotrack - Real-time satellite tracking and 3D orbital visualization
//!
//! A desktop application that propagates earth-orbiting objects from their
//! element sets and renders them around a live 3D planet.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use leotrack::camera::CameraPlugin;
use leotrack::catalog::{BuiltinCatalog, Catalog};
use leotrack::clock::ClockPlugin;
use leotrack::conjunctions::ConjunctionPlugin;
use leotrack::input::InputPlugin;
use leotrack::nearby::NearbyPlugin;
use leotrack::render::RenderPlugin;
use leotrack::selection::SelectionPlugin;
use leotrack::telemetry::TelemetryPlugin;
use leotrack::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(EguiPlugin::default())
        // Insert resources before plugins that depend on them
        .insert_resource(Catalog::new(BuiltinCatalog::new()))
        // Add engine plugins
        .add_plugins((
            ClockPlugin,
            SelectionPlugin,
            NearbyPlugin,
            TelemetryPlugin,
            ConjunctionPlugin,
            RenderPlugin,
            CameraPlugin,
            InputPlugin,
            UiPlugin,
        ))
        .run();
}
