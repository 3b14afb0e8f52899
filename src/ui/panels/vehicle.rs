use bevy_egui::egui::{self, Color32, ProgressBar, RichText};

use crate::app::AppState;
use crate::telemetry::{format_angle, motor_percent, MotorOutput, TelemetrySnapshot};

/// Renders the vehicle section: 3D attitude preview, orientation readouts,
/// and the four motor output bars.
pub fn render_vehicle_section(ui: &mut egui::Ui, state: &AppState, width: f32) {
    ui.vertical(|ui| {
        ui.set_width(width);
        ui.label("Vehicle");

        let preview_height = width * 0.6;
        if let Some(texture_id) = state.preview_texture_id {
            ui.image(egui::load::SizedTexture::new(
                texture_id,
                egui::vec2(width, preview_height),
            ));
        } else {
            ui.allocate_space(egui::vec2(width, preview_height));
            ui.label("Loading preview...");
        }

        ui.add_space(5.0);

        let (latest, motors) = {
            let buffer = state.data_buffer.lock().unwrap();
            (buffer.latest().map(|r| r.snapshot), buffer.motors)
        };

        egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::same(8.0))
            .show(ui, |ui| {
                match latest {
                    Some(snapshot) => render_orientation(ui, snapshot),
                    None => {
                        ui.label("No telemetry received yet");
                    }
                }

                ui.separator();

                match motors {
                    Some(motors) => render_motor_bars(ui, motors),
                    None => {
                        ui.label("No motor data yet");
                    }
                }
            });
    });
}

fn render_orientation(ui: &mut egui::Ui, snapshot: TelemetrySnapshot) {
    let rows = [
        ("Pitch", snapshot.pitch, Color32::from_rgb(20, 80, 20), Color32::from_rgb(100, 255, 100)),
        ("Roll", snapshot.roll, Color32::from_rgb(80, 20, 20), Color32::from_rgb(255, 100, 100)),
        ("Yaw", snapshot.yaw, Color32::from_rgb(20, 20, 80), Color32::from_rgb(100, 100, 255)),
    ];

    ui.horizontal_wrapped(|ui| {
        for (name, value, fill, text_color) in rows {
            egui::Frame::none()
                .inner_margin(egui::Margin::symmetric(6.0, 4.0))
                .fill(fill)
                .rounding(egui::Rounding::same(4.0))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("{name}: {}", format_angle(value)))
                            .color(text_color)
                            .monospace(),
                    );
                });
        }
    });
}

fn render_motor_bars(ui: &mut egui::Ui, motors: MotorOutput) {
    ui.label("Motor Output");
    let bars = [
        ("FL", motors.front_left),
        ("FR", motors.front_right),
        ("BL", motors.back_left),
        ("BR", motors.back_right),
    ];
    for (name, raw) in bars {
        let percent = motor_percent(raw);
        ui.horizontal(|ui| {
            ui.monospace(name);
            ui.add(ProgressBar::new(percent as f32 / 100.0).text(format!("{percent}%")));
        });
    }
}
