use bevy_egui::egui::{vec2, Vec2};

use crate::config::{THROTTLE_MAX, TILT_LIMIT, YAW_LIMIT};

/// Joystick drag state machine. `Dragging` carries the knob offset from the
/// widget center in pixels, already clamped to the boundary circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { knob: Vec2 },
}

/// Snapshot of the control axes handed to the push thread.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlFrame {
    pub throttle: i32,
    pub pitch: i32,
    pub roll: i32,
    pub yaw: i32,
    pub armed: bool,
}

/// Operator intent. Owned by the UI and mutated only by input handlers;
/// the link thread only ever sees `ControlFrame` copies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlState {
    pub armed: bool,
    pub throttle: i32,
    pub pitch: i32,
    pub roll: i32,
    pub yaw: i32,
    pub drag: DragState,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            armed: false,
            throttle: 0,
            pitch: 0,
            roll: 0,
            yaw: 0,
            drag: DragState::Idle,
        }
    }
}

impl ControlState {
    pub fn frame(&self) -> ControlFrame {
        ControlFrame {
            throttle: self.throttle,
            pitch: self.pitch,
            roll: self.roll,
            yaw: self.yaw,
            armed: self.armed,
        }
    }

    /// Flips the armed flag. Disarming returns every axis to its rest
    /// position and recenters the knob; arming leaves the axes alone.
    pub fn toggle_armed(&mut self) {
        self.armed = !self.armed;
        if !self.armed {
            self.throttle = 0;
            self.pitch = 0;
            self.roll = 0;
            self.yaw = 0;
            self.drag = DragState::Idle;
        }
    }

    pub fn set_throttle(&mut self, value: i32) {
        self.throttle = value.clamp(0, THROTTLE_MAX);
    }

    pub fn set_yaw(&mut self, value: i32) {
        self.yaw = value.clamp(-YAW_LIMIT, YAW_LIMIT);
    }

    pub fn begin_drag(&mut self) {
        self.drag = DragState::Dragging { knob: Vec2::ZERO };
    }

    /// Applies a pointer offset (relative to the widget center) while
    /// dragging. The offset is clamped to the boundary circle and mapped
    /// linearly onto roll (x) and pitch (y). Moves without an active drag
    /// are ignored.
    pub fn drag_to(&mut self, offset: Vec2, max_radius: f32) {
        if self.drag == DragState::Idle {
            return;
        }
        let knob = clamp_to_radius(offset, max_radius);
        self.roll = axis_value(knob.x, max_radius);
        self.pitch = axis_value(knob.y, max_radius);
        self.drag = DragState::Dragging { knob };
    }

    /// Ends a drag: recenters the knob and zeroes pitch/roll, leaving
    /// throttle and yaw where they are. Returns false (and changes
    /// nothing) when no drag is active, so duplicate release events from
    /// overlapping pointer handlers are harmless.
    pub fn end_drag(&mut self) -> bool {
        if self.drag == DragState::Idle {
            return false;
        }
        self.drag = DragState::Idle;
        self.pitch = 0;
        self.roll = 0;
        true
    }

    /// Current knob offset for rendering; centered when idle.
    pub fn knob_offset(&self) -> Vec2 {
        match self.drag {
            DragState::Dragging { knob } => knob,
            DragState::Idle => Vec2::ZERO,
        }
    }
}

/// Caps the offset magnitude at `max_radius`, preserving its direction.
pub fn clamp_to_radius(offset: Vec2, max_radius: f32) -> Vec2 {
    if offset.length() > max_radius {
        let angle = offset.y.atan2(offset.x);
        vec2(angle.cos(), angle.sin()) * max_radius
    } else {
        offset
    }
}

/// Linear map from a clamped pixel offset to an axis value in
/// [-TILT_LIMIT, TILT_LIMIT].
pub fn axis_value(offset: f32, max_radius: f32) -> i32 {
    ((offset / max_radius) * TILT_LIMIT as f32).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 66.0;

    #[test]
    fn offsets_beyond_radius_land_on_the_boundary_circle() {
        for offset in [
            vec2(200.0, 0.0),
            vec2(0.0, -500.0),
            vec2(150.0, 150.0),
            vec2(-90.0, 40.0),
        ] {
            let clamped = clamp_to_radius(offset, RADIUS);
            assert!(
                (clamped.length() - RADIUS).abs() < 1e-3,
                "clamped {clamped:?} not on boundary"
            );
            // Direction is preserved
            let expected = offset.y.atan2(offset.x);
            let actual = clamped.y.atan2(clamped.x);
            assert!((expected - actual).abs() < 1e-5);
        }
    }

    #[test]
    fn offsets_inside_radius_pass_through() {
        let offset = vec2(10.0, -20.0);
        assert_eq!(clamp_to_radius(offset, RADIUS), offset);
    }

    #[test]
    fn center_maps_to_zero() {
        assert_eq!(axis_value(0.0, RADIUS), 0);
    }

    #[test]
    fn axis_values_stay_within_tilt_limit() {
        let mut state = ControlState::default();
        state.begin_drag();
        for offset in [
            vec2(1000.0, 0.0),
            vec2(-1000.0, 1000.0),
            vec2(0.0, -3.0),
            vec2(RADIUS, RADIUS),
        ] {
            state.drag_to(offset, RADIUS);
            assert!(state.roll.abs() <= TILT_LIMIT, "roll = {}", state.roll);
            assert!(state.pitch.abs() <= TILT_LIMIT, "pitch = {}", state.pitch);
        }
        // Full deflections hit the limits exactly
        state.drag_to(vec2(RADIUS, 0.0), RADIUS);
        assert_eq!((state.roll, state.pitch), (TILT_LIMIT, 0));
        state.drag_to(vec2(0.0, -RADIUS), RADIUS);
        assert_eq!((state.roll, state.pitch), (0, -TILT_LIMIT));
    }

    #[test]
    fn disarm_resets_every_axis_and_recenters_the_knob() {
        let mut state = ControlState {
            armed: true,
            throttle: 72,
            pitch: -13,
            roll: 41,
            yaw: -88,
            drag: DragState::Dragging {
                knob: vec2(30.0, -17.0),
            },
        };
        state.toggle_armed();
        assert!(!state.armed);
        assert_eq!(state.throttle, 0);
        assert_eq!(state.pitch, 0);
        assert_eq!(state.roll, 0);
        assert_eq!(state.yaw, 0);
        assert_eq!(state.knob_offset(), Vec2::ZERO);
    }

    #[test]
    fn arming_leaves_axes_alone() {
        let mut state = ControlState::default();
        state.set_throttle(30);
        state.set_yaw(-40);
        state.toggle_armed();
        assert!(state.armed);
        assert_eq!(state.throttle, 30);
        assert_eq!(state.yaw, -40);
    }

    #[test]
    fn drag_end_resets_pitch_and_roll_only() {
        let mut state = ControlState::default();
        state.set_throttle(55);
        state.set_yaw(25);
        state.begin_drag();
        state.drag_to(vec2(RADIUS, RADIUS), RADIUS);
        assert!(state.end_drag());
        assert_eq!(state.pitch, 0);
        assert_eq!(state.roll, 0);
        assert_eq!(state.throttle, 55);
        assert_eq!(state.yaw, 25);
        assert_eq!(state.drag, DragState::Idle);
    }

    #[test]
    fn duplicate_release_is_a_no_op() {
        let mut state = ControlState::default();
        state.begin_drag();
        state.drag_to(vec2(12.0, 34.0), RADIUS);
        assert!(state.end_drag());
        let before = state;
        assert!(!state.end_drag());
        assert_eq!(state, before);
    }

    #[test]
    fn moves_without_an_active_drag_are_ignored() {
        let mut state = ControlState::default();
        state.drag_to(vec2(50.0, 50.0), RADIUS);
        assert_eq!((state.roll, state.pitch), (0, 0));
    }

    #[test]
    fn slider_inputs_are_clamped_to_their_ranges() {
        let mut state = ControlState::default();
        state.set_throttle(150);
        assert_eq!(state.throttle, THROTTLE_MAX);
        state.set_throttle(-5);
        assert_eq!(state.throttle, 0);
        state.set_yaw(999);
        assert_eq!(state.yaw, YAW_LIMIT);
        state.set_yaw(-999);
        assert_eq!(state.yaw, -YAW_LIMIT);
    }
}
