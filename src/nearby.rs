//! Nearby-object set synchronization.
//!
//! Whenever the tracked object or the requested count changes, any in-flight
//! lookup is superseded and a new one is issued; the scene only ever mutates
//! when a result for the *latest* request arrives, so rapid successive
//! changes (a slider drag) settle on the last request regardless of fetch
//! completion order. The whole set is replaced atomically — old markers
//! despawned, new ones spawned — never patched in place.

use std::sync::Arc;

use bevy::prelude::*;

use crate::catalog::{Catalog, CatalogError, ElementSetRecord};
use crate::elements::ElementSet;
use crate::fetch::LatestFetch;
use crate::frame::inertial_to_render;
use crate::render::markers::{NearbyMarker, spawn_nearby_marker};
use crate::selection::Tracked;
use crate::types::{SimSet, SimulationClock};

/// Upper bound on the nearby-set cardinality.
pub const MAX_NEARBY: usize = 100;

/// Requested nearby-object count, settable from the UI.
#[derive(Resource, Default)]
pub struct NearbySettings {
    pub count: usize,
}

/// One member of the applied nearby set.
pub struct NearbyObject {
    pub elements: Arc<ElementSet>,
    pub marker: Entity,
}

/// The applied nearby set. Its cardinality always reflects the last request
/// that resolved; in-flight requests never show here.
#[derive(Resource, Default)]
pub struct NearbySet {
    pub objects: Vec<NearbyObject>,
}

impl NearbySet {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Synchronizer state: the in-flight lookup and the key it was issued for.
#[derive(Resource, Default)]
pub struct NearbySync {
    fetch: LatestFetch<Result<Vec<ElementSetRecord>, CatalogError>>,
    /// (tracked catalog id, count) of the newest request, applied or not.
    requested: Option<(u64, usize)>,
}

/// Plugin providing nearby-set synchronization.
pub struct NearbyPlugin;

impl Plugin for NearbyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NearbySettings>()
            .init_resource::<NearbySet>()
            .init_resource::<NearbySync>()
            .add_systems(
                Update,
                (
                    (request_nearby, apply_nearby).chain().in_set(SimSet::Structure),
                    sync_nearby_positions.in_set(SimSet::SyncScene),
                ),
            );
    }
}

/// Issue or supersede the nearby lookup when the (tracked, count) key moves.
///
/// A key with no tracked object or a zero count empties the set immediately;
/// there is nothing to fetch.
pub fn request_nearby(
    mut commands: Commands,
    mut sync: ResMut<NearbySync>,
    mut set: ResMut<NearbySet>,
    settings: Res<NearbySettings>,
    tracked: Res<Tracked>,
    catalog: Res<Catalog>,
) {
    let key = tracked
        .norad_id()
        .map(|id| (id, settings.count.min(MAX_NEARBY)));

    if key == sync.requested {
        return;
    }
    sync.requested = key;
    sync.fetch.cancel();

    match key {
        Some((id, count)) if count > 0 => {
            let source = catalog.0.clone();
            let generation = sync.fetch.begin(async move { source.fetch_nearby(id, count) });
            info!("nearby lookup #{generation}: {count} objects around {id}");
        }
        _ => {
            despawn_all(&mut commands, &mut set);
        }
    }
}

/// Apply a finished lookup to the scene.
///
/// A failed lookup degrades to an empty set; entries whose element lines do
/// not parse are skipped without failing the batch.
pub fn apply_nearby(
    mut commands: Commands,
    mut sync: ResMut<NearbySync>,
    mut set: ResMut<NearbySet>,
    clock: Res<SimulationClock>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(result) = sync.fetch.poll() else {
        return;
    };

    let records = match result {
        Ok(records) => records,
        Err(e) => {
            warn!("nearby lookup failed: {e}");
            Vec::new()
        }
    };

    despawn_all(&mut commands, &mut set);

    for record in &records {
        let elements = match ElementSet::from_lines(&record.name, &record.line1, &record.line2) {
            Ok(parsed) => Arc::new(parsed),
            Err(e) => {
                warn!("skipping nearby {}: {}", record.name, e);
                continue;
            }
        };
        let initial = elements
            .propagate(clock.current_ms)
            .ok()
            .map(|state| inertial_to_render(state.position_km));
        let marker = spawn_nearby_marker(
            &mut commands,
            &mut meshes,
            &mut materials,
            set.objects.len(),
            initial,
        );
        set.objects.push(NearbyObject { elements, marker });
    }

    info!("nearby set applied: {} objects", set.objects.len());
}

/// Reposition nearby markers at the current virtual time.
///
/// Skipped while the clock is paused; a member whose propagation fails this
/// tick keeps its last position and is retried next tick.
pub fn sync_nearby_positions(
    set: Res<NearbySet>,
    clock: Res<SimulationClock>,
    mut query: Query<(&mut Transform, &mut Visibility), With<NearbyMarker>>,
) {
    if clock.paused || set.objects.is_empty() {
        return;
    }
    for object in &set.objects {
        // Markers are created and destroyed together with the set entries, so
        // a miss here means the entity was externally despawned; skip it.
        let Ok((mut transform, mut visibility)) = query.get_mut(object.marker) else {
            continue;
        };
        if let Ok(state) = object.elements.propagate(clock.current_ms) {
            transform.translation = inertial_to_render(state.position_km);
            *visibility = Visibility::Inherited;
        }
    }
}

fn despawn_all(commands: &mut Commands, set: &mut NearbySet) {
    for old in set.objects.drain(..) {
        commands.entity(old.marker).despawn();
    }
}
