//! Common test utilities for integration tests.

use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use leotrack::catalog::{
    BuiltinCatalog, Catalog, CatalogError, CatalogSource, CdmEvent, ElementSetRecord, SearchHit,
};
use leotrack::clock::ClockPlugin;
use leotrack::nearby::NearbyPlugin;
use leotrack::selection::SelectionPlugin;
use leotrack::telemetry::TelemetryPlugin;

/// Shared, scriptable state behind [`FakeCatalog`].
#[derive(Default)]
pub struct FakeState {
    /// When set, `fetch_nearby` fails with this message.
    pub fail_nearby: Option<String>,
    /// Artificial latency applied to `fetch_nearby`, milliseconds.
    pub nearby_delay_ms: u64,
    /// Every `fetch_nearby` call observed, in order.
    pub nearby_calls: Vec<(u64, usize)>,
}

/// A catalog source wrapping the built-in snapshot with failure injection
/// and call recording for supersession tests.
pub struct FakeCatalog {
    data: BuiltinCatalog,
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeCatalog {
    pub fn new() -> (Self, Arc<Mutex<FakeState>>) {
        let state = Arc::new(Mutex::new(FakeState::default()));
        (
            Self {
                data: BuiltinCatalog::new(),
                state: state.clone(),
            },
            state,
        )
    }
}

impl CatalogSource for FakeCatalog {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, CatalogError> {
        self.data.search(query)
    }

    fn resolve_by_name(&self, name: &str) -> Result<ElementSetRecord, CatalogError> {
        self.data.resolve_by_name(name)
    }

    fn resolve_by_catalog_id(&self, id: u64) -> Result<ElementSetRecord, CatalogError> {
        self.data.resolve_by_catalog_id(id)
    }

    fn fetch_nearby(
        &self,
        catalog_id: u64,
        count: usize,
    ) -> Result<Vec<ElementSetRecord>, CatalogError> {
        let (fail, delay_ms) = {
            let mut state = self.state.lock().unwrap();
            state.nearby_calls.push((catalog_id, count));
            (state.fail_nearby.clone(), state.nearby_delay_ms)
        };
        if delay_ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(delay_ms));
        }
        if let Some(message) = fail {
            return Err(CatalogError::Unavailable(message));
        }
        self.data.fetch_nearby(catalog_id, count)
    }

    fn fetch_active_events(&self) -> Result<Vec<CdmEvent>, CatalogError> {
        self.data.fetch_active_events()
    }
}

/// Build a headless app with the simulation plugins and a scriptable catalog.
///
/// Rendering plugins are left out; markers still spawn their meshes because
/// the asset stores are registered manually.
pub fn tracking_app() -> (App, Arc<Mutex<FakeState>>) {
    let (catalog, state) = FakeCatalog::new();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()));
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();
    app.insert_resource(Catalog::new(catalog));
    app.add_plugins((ClockPlugin, SelectionPlugin, NearbyPlugin, TelemetryPlugin));
    (app, state)
}

/// Resolve a record from the app's catalog by id.
pub fn record_for(app: &App, id: u64) -> ElementSetRecord {
    app.world()
        .resource::<Catalog>()
        .0
        .resolve_by_catalog_id(id)
        .unwrap()
}

/// Step the app until `predicate` holds, failing after `max_steps`.
pub fn pump_until(app: &mut App, max_steps: usize, predicate: impl Fn(&App) -> bool) {
    for _ in 0..max_steps {
        app.update();
        if predicate(app) {
            return;
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    panic!("condition not reached after {max_steps} steps");
}
