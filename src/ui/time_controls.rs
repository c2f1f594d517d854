//! Time controls panel at the bottom of the screen.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::types::{SimulationClock, unix_ms_to_date_string};

use super::icons;

/// System that renders the time controls panel.
pub fn time_controls_panel(mut contexts: EguiContexts, mut clock: ResMut<SimulationClock>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::bottom("time_controls")
        .frame(
            egui::Frame::none()
                .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 30, 220))
                .inner_margin(egui::Margin::symmetric(16.0, 8.0)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                // Play/Pause button
                let icon = if clock.paused { icons::PLAY } else { icons::PAUSE };
                if ui
                    .button(icon)
                    .on_hover_text(if clock.paused {
                        "Resume (Space)"
                    } else {
                        "Pause (Space)"
                    })
                    .clicked()
                {
                    clock.paused = !clock.paused;
                }

                ui.separator();

                // Simulated date/time display
                ui.label(
                    egui::RichText::new(unix_ms_to_date_string(clock.current_ms)).monospace(),
                );

                ui.separator();

                // Speed factor buttons (mutually exclusive)
                ui.label("Speed:");
                for speed in [1.0, 2.0, 5.0, 10.0] {
                    let label = format!("{}x", speed as i32);
                    let is_selected = (clock.speed - speed).abs() < 0.01;
                    if ui.selectable_label(is_selected, label).clicked() {
                        clock.set_speed(speed);
                    }
                }
            });
        });
}
