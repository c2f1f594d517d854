//! Integration tests for the asynchronous catalog boundary: startup
//! conjunction intake and the debounced search/resolve pipeline.

mod common;

use std::time::Duration;

use common::{pump_until, tracking_app};

use leotrack::catalog::Catalog;
use leotrack::conjunctions::{ConjunctionLog, ConjunctionPlugin};
use leotrack::selection::Tracked;
use leotrack::ui::{SearchState, UiPlugin};

#[test]
fn test_conjunction_events_load_once_at_startup() {
    let (mut app, _) = tracking_app();
    app.add_plugins(ConjunctionPlugin);

    pump_until(&mut app, 500, |app| {
        app.world().resource::<ConjunctionLog>().loaded
    });

    let log = app.world().resource::<ConjunctionLog>();
    assert_eq!(log.events.len(), 3);
    assert!(log.events.iter().all(|e| e.probability > 0.0));
}

#[test]
fn test_search_debounces_then_resolves_into_selection() {
    let (mut app, _) = tracking_app();
    app.add_plugins(UiPlugin);
    app.update();

    // Type a query; nothing is fetched until the debounce window passes.
    let now = app
        .world()
        .resource::<bevy::prelude::Time>()
        .elapsed_secs_f64();
    {
        let mut search = app.world_mut().resource_mut::<SearchState>();
        search.query = "star".to_owned();
        search.edited(now);
    }
    app.update();
    assert!(app.world().resource::<SearchState>().suggestions.is_empty());

    std::thread::sleep(Duration::from_millis(350));
    pump_until(&mut app, 500, |app| {
        !app.world().resource::<SearchState>().suggestions.is_empty()
    });

    let suggestions = &app.world().resource::<SearchState>().suggestions;
    assert!(suggestions.iter().any(|h| h.norad_cat_id == 44713));

    // Picking a suggestion resolves the record and selects it.
    let catalog = app.world().resource::<Catalog>().clone();
    app.world_mut()
        .resource_mut::<SearchState>()
        .request_resolve(&catalog, 44713);

    pump_until(&mut app, 500, |app| {
        app.world().resource::<Tracked>().norad_id() == Some(44713)
    });
}
