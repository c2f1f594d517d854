//! Tracked-object selection and per-tick propagation.
//!
//! At most one object is tracked at a time. Selecting a new one disposes the
//! previous object's scene resources, resets the simulation clock to
//! wall-clock now, and clears the telemetry buffers; a record whose element
//! lines fail to parse produces no tracked object and never aborts the loop.

use std::sync::Arc;

use bevy::prelude::*;

use crate::catalog::ElementSetRecord;
use crate::elements::{ElementSet, StateVector};
use crate::render::markers::spawn_tracked_marker;
use crate::render::paths::{OrbitPathSettings, spawn_orbit_path};
use crate::telemetry::Telemetry;
use crate::types::{SimSet, SimulationClock, now_unix_ms};

/// Request to track a new object, or `None` to clear the selection.
#[derive(Message)]
pub struct SelectObject(pub Option<ElementSetRecord>);

/// The tracked object: its parsed elements and the scene entities it owns.
pub struct TrackedObject {
    pub elements: Arc<ElementSet>,
    pub marker: Entity,
    /// Absent when the element set yields no orbital period.
    pub path: Option<Entity>,
}

/// Resource owning the current tracked object, if any.
#[derive(Resource, Default)]
pub struct Tracked {
    pub object: Option<TrackedObject>,
}

impl Tracked {
    pub fn norad_id(&self) -> Option<u64> {
        self.object.as_ref().map(|o| o.elements.norad_id)
    }
}

/// This tick's propagated state for the tracked object.
///
/// `None` while nothing is tracked or when this tick's propagation failed;
/// consumers skip their update and retry next tick.
#[derive(Resource, Default)]
pub struct TrackedState {
    pub state: Option<StateVector>,
}

/// Plugin wiring selection handling and tracked-object propagation.
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SelectObject>()
            .init_resource::<Tracked>()
            .init_resource::<TrackedState>()
            .init_resource::<Telemetry>()
            .init_resource::<OrbitPathSettings>()
            .add_systems(
                Update,
                (
                    apply_selection.in_set(SimSet::Structure),
                    propagate_tracked.in_set(SimSet::Propagate),
                ),
            );
    }
}

/// Apply the most recent selection request.
///
/// Disposal of the old object's marker and path happens unconditionally
/// before anything new is created, so a replacement can never leak the
/// previous resources.
pub fn apply_selection(
    mut commands: Commands,
    mut selections: MessageReader<SelectObject>,
    mut tracked: ResMut<Tracked>,
    mut tracked_state: ResMut<TrackedState>,
    mut clock: ResMut<SimulationClock>,
    mut telemetry: ResMut<Telemetry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    path_settings: Res<OrbitPathSettings>,
) {
    // Several requests in one frame collapse to the last one.
    let Some(request) = selections.read().last() else {
        return;
    };

    if let Some(old) = tracked.object.take() {
        commands.entity(old.marker).despawn();
        if let Some(path) = old.path {
            commands.entity(path).despawn();
        }
    }
    tracked_state.state = None;
    telemetry.clear();

    let Some(record) = &request.0 else {
        info!("selection cleared");
        return;
    };

    let elements = match ElementSet::from_lines(&record.name, &record.line1, &record.line2) {
        Ok(parsed) => Arc::new(parsed),
        Err(e) => {
            warn!("rejecting {}: {}", record.name, e);
            return;
        }
    };

    let now = now_unix_ms();
    let marker = spawn_tracked_marker(&mut commands, &mut meshes, &mut materials);
    let path = spawn_orbit_path(&mut commands, &elements, now, &path_settings);
    clock.reset_to(now);

    info!("tracking {} ({})", record.name, record.norad_cat_id);
    tracked.object = Some(TrackedObject {
        elements,
        marker,
        path,
    });
}

/// Propagate the tracked object at the current virtual time.
///
/// Failure clears this tick's state only; the next tick retries at an
/// advanced instant.
pub fn propagate_tracked(
    tracked: Res<Tracked>,
    clock: Res<SimulationClock>,
    mut state: ResMut<TrackedState>,
) {
    let Some(object) = &tracked.object else {
        state.state = None;
        return;
    };
    state.state = object.elements.propagate(clock.current_ms).ok();
}
