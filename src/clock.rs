//! Virtual clock advancement for the tracking engine.
//!
//! Advances simulation time from wall-clock frame deltas, scaled and
//! pausable independently of rendering.

use bevy::prelude::*;

use crate::types::{SimSet, SimulationClock};

/// Plugin providing clock advancement.
pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>()
            // One tick: structural changes, then clock, propagation, scene
            // sync, camera. Later stages read what earlier ones just wrote.
            .configure_sets(
                Update,
                (
                    SimSet::Structure,
                    SimSet::Clock,
                    SimSet::Propagate,
                    SimSet::SyncScene,
                    SimSet::Camera,
                )
                    .chain(),
            )
            .add_systems(Update, advance_clock.in_set(SimSet::Clock));
    }
}

/// Advance virtual time by the wall-clock delta times the speed factor.
///
/// Runs every frame; a paused clock leaves virtual time untouched so the
/// rest of the tick re-propagates at the frozen instant.
fn advance_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    let wall_delta_ms = time.delta_secs_f64() * 1000.0;
    clock.advance(wall_delta_ms);
}
