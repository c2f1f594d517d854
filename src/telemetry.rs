//! Derived telemetry buffers for the tracked object.
//!
//! One sample per tick while an object is tracked and propagation succeeded.
//! History buffers grow for the lifetime of the selection and are cleared
//! exactly when the selection changes; windowing for display is the chart
//! layer's concern, not ours.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::selection::{Tracked, TrackedState};
use crate::types::{SimSet, SimulationClock};

/// The most recent per-tick readout, for live display.
#[derive(Clone, Copy, Debug)]
pub struct LiveSample {
    pub speed_km_s: f64,
    pub altitude_km: f64,
    pub position_km: DVec3,
    pub simulated_ms: f64,
}

/// Append-only telemetry history plus the live readout.
#[derive(Resource, Default)]
pub struct Telemetry {
    pub live: Option<LiveSample>,
    pub speed_km_s: Vec<f64>,
    pub altitude_km: Vec<f64>,
    pub drag_term: Vec<f64>,
}

impl Telemetry {
    /// Drop all history and the live readout. Called on selection change.
    pub fn clear(&mut self) {
        self.live = None;
        self.speed_km_s.clear();
        self.altitude_km.clear();
        self.drag_term.clear();
    }

    /// Number of samples accumulated for the current selection.
    pub fn len(&self) -> usize {
        self.speed_km_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speed_km_s.is_empty()
    }
}

/// Plugin providing per-tick telemetry sampling.
pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Telemetry>()
            .add_systems(Update, sample_telemetry.in_set(SimSet::SyncScene));
    }
}

/// Append one sample from this tick's propagated state.
///
/// A failed propagation skips the tick; the live readout keeps its last
/// value so the display does not flicker on transient model failures.
pub fn sample_telemetry(
    tracked: Res<Tracked>,
    state: Res<TrackedState>,
    clock: Res<SimulationClock>,
    mut telemetry: ResMut<Telemetry>,
) {
    let Some(object) = &tracked.object else {
        telemetry.live = None;
        return;
    };
    let Some(state) = &state.state else {
        return;
    };

    let sample = LiveSample {
        speed_km_s: state.speed_km_s(),
        altitude_km: state.altitude_km(),
        position_km: state.position_km,
        simulated_ms: clock.current_ms,
    };

    telemetry.speed_km_s.push(sample.speed_km_s);
    telemetry.altitude_km.push(sample.altitude_km);
    telemetry.drag_term.push(object.elements.drag_term);
    telemetry.live = Some(sample);
}
