//! Conjunction event intake.
//!
//! Active conjunction (close-approach) reports are fetched once at startup
//! and held read-only for display. Supersession is a non-issue here — the
//! request does not depend on any mutable selection.

use bevy::prelude::*;

use crate::catalog::{Catalog, CatalogError, CdmEvent};
use crate::fetch::LatestFetch;

/// Resource holding the fetched conjunction events.
#[derive(Resource, Default)]
pub struct ConjunctionLog {
    pub events: Vec<CdmEvent>,
    /// Set once the startup fetch has resolved (either way).
    pub loaded: bool,
    fetch: LatestFetch<Result<Vec<CdmEvent>, CatalogError>>,
}

/// Plugin fetching conjunction events at startup.
pub struct ConjunctionPlugin;

impl Plugin for ConjunctionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConjunctionLog>()
            .add_systems(Startup, start_event_fetch)
            .add_systems(
                Update,
                poll_events.run_if(|log: Res<ConjunctionLog>| !log.loaded),
            );
    }
}

fn start_event_fetch(mut log: ResMut<ConjunctionLog>, catalog: Res<Catalog>) {
    let source = catalog.0.clone();
    log.fetch.begin(async move { source.fetch_active_events() });
}

fn poll_events(mut log: ResMut<ConjunctionLog>) {
    let Some(result) = log.fetch.poll() else {
        return;
    };
    match result {
        Ok(events) => {
            info!("loaded {} active conjunction events", events.len());
            log.events = events;
        }
        Err(e) => {
            warn!("conjunction event fetch failed: {e}");
        }
    }
    log.loaded = true;
}
