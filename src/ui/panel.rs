//! Tracking side panel: search, object info, live telemetry, nearby and
//! camera controls, conjunction events.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::camera::{CameraMode, CameraRig, MAX_ZOOM, MIN_ZOOM};
use crate::catalog::{Catalog, CatalogError, ElementSetRecord, SearchHit};
use crate::conjunctions::ConjunctionLog;
use crate::fetch::LatestFetch;
use crate::nearby::{MAX_NEARBY, NearbySet, NearbySettings};
use crate::render::paths::OrbitPathSettings;
use crate::selection::{SelectObject, Tracked};
use crate::telemetry::Telemetry;
use crate::types::unix_ms_to_date_string;

use super::icons;

/// Idle time after the last keystroke before a search is issued.
const SEARCH_DEBOUNCE_SECS: f64 = 0.3;

/// Search and resolution state behind the panel.
///
/// Both requests follow the latest-wins discipline: a keystroke supersedes
/// the outstanding search, a new pick supersedes the outstanding resolve.
#[derive(Resource, Default)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<SearchHit>,
    /// Non-fatal failure notice shown in the panel.
    pub notice: Option<String>,
    dirty_at: Option<f64>,
    search: LatestFetch<Result<Vec<SearchHit>, CatalogError>>,
    resolve: LatestFetch<Result<ElementSetRecord, CatalogError>>,
}

impl SearchState {
    /// Record a query edit; the fetch is issued after the debounce window.
    pub fn edited(&mut self, now_secs: f64) {
        self.dirty_at = Some(now_secs);
    }

    /// Begin resolving a picked suggestion into a full record.
    pub fn request_resolve(&mut self, catalog: &Catalog, id: u64) {
        let source = catalog.0.clone();
        self.resolve.begin(async move { source.resolve_by_catalog_id(id) });
    }
}

/// Debounce, issue, and poll the panel's async requests.
///
/// Runs in the plain `Update` schedule: the requests are state, not
/// rendering, and tests drive them without an egui context.
pub fn drive_search(
    time: Res<Time>,
    catalog: Res<Catalog>,
    mut state: ResMut<SearchState>,
    mut selections: MessageWriter<SelectObject>,
) {
    let now = time.elapsed_secs_f64();

    if let Some(dirty_at) = state.dirty_at {
        if now - dirty_at >= SEARCH_DEBOUNCE_SECS {
            state.dirty_at = None;
            let query = state.query.trim().to_owned();
            if query.is_empty() {
                state.search.cancel();
                state.suggestions.clear();
            } else {
                let source = catalog.0.clone();
                state.search.begin(async move { source.search(&query) });
            }
        }
    }

    if let Some(result) = state.search.poll() {
        match result {
            Ok(hits) => {
                state.notice = None;
                state.suggestions = hits;
            }
            Err(e) => {
                state.suggestions.clear();
                state.notice = Some(format!("search failed: {e}"));
            }
        }
    }

    if let Some(result) = state.resolve.poll() {
        match result {
            Ok(record) => {
                state.notice = None;
                selections.write(SelectObject(Some(record)));
            }
            Err(e) => {
                state.notice = Some(format!("lookup failed: {e}"));
            }
        }
    }
}

/// System that renders the tracking side panel.
pub fn side_panel(
    mut contexts: EguiContexts,
    time: Res<Time>,
    catalog: Res<Catalog>,
    mut search: ResMut<SearchState>,
    mut selections: MessageWriter<SelectObject>,
    tracked: Res<Tracked>,
    telemetry: Res<Telemetry>,
    mut nearby_settings: ResMut<NearbySettings>,
    nearby_set: Res<NearbySet>,
    mut rig: ResMut<CameraRig>,
    mut path_settings: ResMut<OrbitPathSettings>,
    conjunctions: Res<ConjunctionLog>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let panel_frame = egui::Frame::none()
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 30, 220))
        .inner_margin(egui::Margin::same(12.0));

    egui::SidePanel::right("tracking_panel")
        .resizable(false)
        .default_width(260.0)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.heading(format!("{} Tracking", icons::TARGET));
            ui.separator();

            // Search section
            ui.horizontal(|ui| {
                ui.label(icons::SEARCH);
                if ui.text_edit_singleline(&mut search.query).changed() {
                    let now = time.elapsed_secs_f64();
                    search.edited(now);
                }
            });
            let picked: Vec<u64> = search
                .suggestions
                .iter()
                .filter_map(|hit| {
                    ui.button(format!("{} ({})", hit.name, hit.norad_cat_id))
                        .clicked()
                        .then_some(hit.norad_cat_id)
                })
                .collect();
            for id in picked {
                search.request_resolve(&catalog, id);
                search.suggestions.clear();
            }
            if let Some(notice) = &search.notice {
                ui.colored_label(egui::Color32::from_rgb(230, 160, 60), notice);
            }

            ui.separator();

            // Selected object and live telemetry
            match &tracked.object {
                Some(object) => {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(&object.elements.name).strong(),
                        );
                        if ui.button(icons::CLEAR).on_hover_text("Deselect (Esc)").clicked() {
                            selections.write(SelectObject(None));
                        }
                    });
                    ui.label(format!("Catalog #{}", object.elements.norad_id));
                    ui.label(format!("Drag term: {:.3e}", object.elements.drag_term));

                    if let Some(live) = &telemetry.live {
                        ui.monospace(format!("Speed    {:>9.3} km/s", live.speed_km_s));
                        ui.monospace(format!("Altitude {:>9.1} km", live.altitude_km));
                        ui.monospace(format!(
                            "Position {:>8.0} {:>8.0} {:>8.0}",
                            live.position_km.x, live.position_km.y, live.position_km.z
                        ));
                        ui.monospace(unix_ms_to_date_string(live.simulated_ms));
                    }
                    ui.label(format!("{} samples buffered", telemetry.len()));
                }
                None => {
                    ui.label("No object selected");
                }
            }

            ui.separator();

            // Nearby set
            ui.label("Nearby objects:");
            ui.add(egui::Slider::new(&mut nearby_settings.count, 0..=MAX_NEARBY));
            ui.label(format!("{} shown", nearby_set.len()));

            ui.separator();

            // Camera controls
            ui.checkbox(&mut rig.follow, "Follow camera");
            ui.horizontal(|ui| {
                for mode in CameraMode::ALL {
                    if ui
                        .selectable_label(rig.mode == mode, mode.label())
                        .clicked()
                    {
                        rig.mode = mode;
                    }
                }
            });
            let mut zoom = rig.zoom;
            if ui
                .add(egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM).text("Zoom"))
                .changed()
            {
                rig.set_zoom(zoom);
            }
            ui.checkbox(&mut path_settings.visible, "Orbit path");

            ui.separator();

            // Conjunction events
            ui.label("Active conjunctions:");
            if conjunctions.events.is_empty() {
                ui.label(if conjunctions.loaded { "none" } else { "loading..." });
            }
            for event in &conjunctions.events {
                ui.monospace(format!(
                    "{} / {}",
                    event.primary_name, event.secondary_name
                ));
                ui.label(format!(
                    "  Pc {:.1e}  miss {:.2} km",
                    event.probability, event.miss_distance_km
                ));
                ui.label(format!("  TCA {}", unix_ms_to_date_string(event.tca_unix_ms)));
            }
        });
}
