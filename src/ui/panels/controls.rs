use bevy_egui::egui::{self, Color32, RichText, Slider, Stroke};

use crate::app::AppState;
use crate::config::{JOYSTICK_SIZE, KNOB_RADIUS, THROTTLE_MAX, YAW_LIMIT};

/// Renders the flight controls: arm toggle, throttle and yaw sliders, and
/// the pitch/roll joystick. Every interaction nudges an immediate push.
pub fn render_controls_section(ui: &mut egui::Ui, state: &mut AppState, width: f32) {
    ui.vertical(|ui| {
        ui.set_width(width);
        ui.heading("Flight Controls");
        ui.add_space(5.0);

        render_arm_toggle(ui, state, width);
        ui.separator();
        render_sliders(ui, state);
        ui.separator();
        render_joystick(ui, state);
    });
}

fn render_arm_toggle(ui: &mut egui::Ui, state: &mut AppState, width: f32) {
    let (label, fill) = if state.control.armed {
        ("DISARM", Color32::from_rgb(160, 40, 40))
    } else {
        ("ARM", Color32::from_rgb(40, 130, 60))
    };

    let button = egui::Button::new(RichText::new(label).strong().color(Color32::WHITE))
        .fill(fill)
        .min_size(egui::vec2(width - 20.0, 32.0));
    if ui.add(button).clicked() {
        state.control.toggle_armed();
        state.push_control();
    }

    let (status, color) = if state.control.armed {
        ("ARMED", Color32::from_rgb(255, 100, 100))
    } else {
        ("DISARMED", Color32::GRAY)
    };
    ui.label(RichText::new(status).color(color).strong());
}

fn render_sliders(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Throttle");
    let mut throttle = state.control.throttle;
    if ui
        .add(Slider::new(&mut throttle, 0..=THROTTLE_MAX).suffix("%"))
        .changed()
    {
        state.control.set_throttle(throttle);
        state.push_control();
    }

    ui.add_space(3.0);

    ui.label("Yaw");
    let mut yaw = state.control.yaw;
    if ui
        .add(Slider::new(&mut yaw, -YAW_LIMIT..=YAW_LIMIT))
        .changed()
    {
        state.control.set_yaw(yaw);
        state.push_control();
    }
}

fn render_joystick(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Pitch / Roll");

    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(JOYSTICK_SIZE, JOYSTICK_SIZE), egui::Sense::drag());
    let center = rect.center();
    let max_radius = rect.width() / 2.0 - KNOB_RADIUS;

    if response.drag_started() {
        state.control.begin_drag();
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            state.control.drag_to(pos - center, max_radius);
            state.push_control();
        }
    }
    if response.drag_stopped() && state.control.end_drag() {
        state.push_control();
    }

    let painter = ui.painter();
    painter.circle_filled(center, rect.width() / 2.0, Color32::from_gray(40));
    painter.circle_stroke(center, max_radius, Stroke::new(1.0, Color32::from_gray(75)));
    painter.line_segment(
        [rect.left_center(), rect.right_center()],
        Stroke::new(1.0, Color32::from_gray(55)),
    );
    painter.line_segment(
        [rect.center_top(), rect.center_bottom()],
        Stroke::new(1.0, Color32::from_gray(55)),
    );
    painter.circle_filled(
        center + state.control.knob_offset(),
        KNOB_RADIUS,
        Color32::from_gray(130),
    );

    ui.horizontal(|ui| {
        ui.label(format!("Pitch: {}", state.control.pitch));
        ui.separator();
        ui.label(format!("Roll: {}", state.control.roll));
    });
}
