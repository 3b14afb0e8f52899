use bevy_egui::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot};

use crate::app::AppState;

/// Renders the attitude history plot (pitch, roll, yaw over time)
pub fn render_attitude_plot(ui: &mut egui::Ui, state: &AppState) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.label("Attitude History");
            if ui.button("clear").clicked() {
                state.data_buffer.lock().unwrap().clear_data();
            }
        });

        let buffer = state.data_buffer.lock().unwrap();
        let available_width = ui.available_width();
        let plot_height = (ui.ctx().screen_rect().height() * 0.30).min(280.0);

        Plot::new("attitude_plot")
            .legend(Legend::default())
            .height(plot_height)
            .width(available_width)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(buffer.pitch_points())
                        .name("Pitch")
                        .color(Color32::from_rgb(0, 255, 0)),
                );
                plot_ui.line(
                    Line::new(buffer.roll_points())
                        .name("Roll")
                        .color(Color32::from_rgb(255, 0, 0)),
                );
                plot_ui.line(
                    Line::new(buffer.yaw_points())
                        .name("Yaw")
                        .color(Color32::from_rgb(0, 0, 255)),
                );
            });
    });
}
