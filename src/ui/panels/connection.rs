use bevy_egui::egui;
use tracing::warn;

use crate::app::AppState;
use crate::persistence::PersistentSettings;

/// Renders the top panel: device address, connect/disconnect, log options.
/// Returns true when a persisted setting was edited.
pub fn render_connection_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    settings: &mut PersistentSettings,
) -> bool {
    let mut changed = false;

    ui.horizontal_wrapped(|ui| {
        ui.heading("Quadcopter Control Panel");
        ui.separator();

        ui.label("Device:");
        let url_edit = ui.add(
            egui::TextEdit::singleline(&mut settings.device_url).desired_width(180.0),
        );
        changed |= url_edit.changed();

        if state.connected() {
            if ui.button("Disconnect").clicked() {
                state.disconnect();
            }
        } else if ui.button("Connect").clicked() {
            if let Err(e) = state.connect(&settings.device_url) {
                warn!("connect failed: {e:#}");
                if let Ok(mut buffer) = state.data_buffer.lock() {
                    buffer.push_log(format!("Connect failed: {e:#}"));
                }
            }
        }

        ui.separator();
        changed |= ui
            .checkbox(&mut settings.auto_scroll_logs, "Auto-scroll log")
            .changed();
    });

    changed
}
