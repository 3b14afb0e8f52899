pub mod panels;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::app::AppState;
use crate::persistence::PersistentSettings;
use crate::scene::{Airframe, AirframeAttitude, PreviewImage};

/// Main UI system that renders all the egui panels
pub fn ui_system(
    mut contexts: EguiContexts,
    mut state: ResMut<AppState>,
    mut settings: ResMut<PersistentSettings>,
    mut airframe_query: Query<&mut AirframeAttitude, With<Airframe>>,
    preview_image: Res<PreviewImage>,
) {
    // Register the preview render target with egui once
    if state.preview_texture_id.is_none() {
        let texture_id = contexts.add_image(preview_image.handle.clone());
        state.preview_texture_id = Some(texture_id);
    }

    update_airframe_attitude(&state, &mut airframe_query);

    let ctx = contexts.ctx_mut();
    ctx.request_repaint();

    // Widget edits touch settings every frame; only flag a real change so
    // the auto-save system does not rewrite the file continuously.
    let settings_inner = settings.bypass_change_detection();

    let mut settings_changed = false;
    render_top_panel(ctx, &mut state, settings_inner, &mut settings_changed);
    render_central_panel(ctx, &mut state, settings_inner);

    if settings_changed {
        settings.set_changed();
    }
}

/// Feeds the latest telemetry into the 3D preview
fn update_airframe_attitude(
    state: &AppState,
    query: &mut Query<&mut AirframeAttitude, With<Airframe>>,
) {
    let Ok(buffer) = state.data_buffer.lock() else {
        return;
    };
    let Some(latest) = buffer.latest() else {
        return;
    };
    for mut attitude in query.iter_mut() {
        attitude.pitch = latest.snapshot.pitch;
        attitude.roll = latest.snapshot.roll;
        attitude.yaw = latest.snapshot.yaw;
    }
}

fn render_top_panel(
    ctx: &egui::Context,
    state: &mut AppState,
    settings: &mut PersistentSettings,
    settings_changed: &mut bool,
) {
    egui::TopBottomPanel::top("top_panel")
        .frame(egui::Frame {
            inner_margin: egui::Margin::same(8.0),
            fill: ctx.style().visuals.window_fill(),
            ..Default::default()
        })
        .show(ctx, |ui| {
            *settings_changed |= panels::render_connection_panel(ui, state, settings);
        });
}

fn render_central_panel(
    ctx: &egui::Context,
    state: &mut AppState,
    settings: &PersistentSettings,
) {
    egui::CentralPanel::default()
        .frame(egui::Frame {
            inner_margin: egui::Margin::same(8.0),
            fill: ctx.style().visuals.window_fill(),
            ..Default::default()
        })
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    // Horizontal layout: Controls | Vehicle | Log
                    ui.horizontal_top(|ui| {
                        let available_width = ui.available_width();
                        let controls_width = available_width * 0.28;
                        let vehicle_width = available_width * 0.38;
                        let logs_width = available_width * 0.30;

                        ui.group(|ui| {
                            panels::render_controls_section(ui, state, controls_width);
                        });

                        ui.group(|ui| {
                            panels::render_vehicle_section(ui, state, vehicle_width);
                        });

                        ui.group(|ui| {
                            panels::render_logs_section(ui, state, settings, logs_width);
                        });
                    });

                    panels::render_attitude_plot(ui, state);
                });
        });
}
