use chrono::{DateTime, Local};
use egui_plot::PlotPoints;
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Instant;

use crate::config::{MAX_LOG_MESSAGES, MAX_POINTS};

/// Orientation reading from `GET /sensor`, in degrees. Display-only.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct TelemetrySnapshot {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

/// Per-motor PWM duty from the `/control` response, raw 0-255. The
/// firmware echoes extra fields (armed flag, orientation) which are
/// ignored here.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct MotorOutput {
    #[serde(rename = "motorFL")]
    pub front_left: u8,
    #[serde(rename = "motorFR")]
    pub front_right: u8,
    #[serde(rename = "motorBL")]
    pub back_left: u8,
    #[serde(rename = "motorBR")]
    pub back_right: u8,
}

/// Converts a raw 0-255 duty value to a whole percentage.
pub fn motor_percent(raw: u8) -> u8 {
    (raw as f32 / 2.55).round() as u8
}

/// Formats an orientation angle for the readouts: one decimal, degree
/// suffix.
pub fn format_angle(degrees: f32) -> String {
    format!("{degrees:.1}°")
}

#[derive(Clone, Copy, Debug)]
pub struct TelemetryRecord {
    pub elapsed: f64,
    pub clock_time: DateTime<Local>,
    pub snapshot: TelemetrySnapshot,
}

#[derive(Clone, Debug)]
pub struct LogMessage {
    pub clock_time: DateTime<Local>,
    pub message: String,
}

/// Shared buffer between the link threads and the UI: telemetry history
/// for the plot and readouts, the latest motor output, and a bounded
/// event log.
pub struct DataBuffer {
    pub data: VecDeque<TelemetryRecord>,
    pub motors: Option<MotorOutput>,
    pub logs: VecDeque<LogMessage>,
    start_time: Instant,
}

impl Default for DataBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DataBuffer {
    pub fn new() -> Self {
        Self {
            data: VecDeque::with_capacity(MAX_POINTS),
            motors: None,
            logs: VecDeque::with_capacity(MAX_LOG_MESSAGES),
            start_time: Instant::now(),
        }
    }

    pub fn push(&mut self, snapshot: TelemetrySnapshot) {
        if self.data.len() >= MAX_POINTS {
            self.data.pop_front();
        }
        self.data.push_back(TelemetryRecord {
            elapsed: self.start_time.elapsed().as_secs_f64(),
            clock_time: Local::now(),
            snapshot,
        });
    }

    pub fn set_motors(&mut self, motors: MotorOutput) {
        self.motors = Some(motors);
    }

    pub fn push_log(&mut self, message: String) {
        if self.logs.len() >= MAX_LOG_MESSAGES {
            self.logs.pop_front();
        }
        self.logs.push_back(LogMessage {
            clock_time: Local::now(),
            message,
        });
    }

    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.data.back()
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    pub fn pitch_points(&self) -> PlotPoints {
        self.data
            .iter()
            .map(|d| [d.elapsed, d.snapshot.pitch as f64])
            .collect()
    }

    pub fn roll_points(&self) -> PlotPoints {
        self.data
            .iter()
            .map(|d| [d.elapsed, d.snapshot.roll as f64])
            .collect()
    }

    pub fn yaw_points(&self) -> PlotPoints {
        self.data
            .iter()
            .map(|d| [d.elapsed, d.snapshot.yaw as f64])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_percent_matches_the_display_contract() {
        assert_eq!(motor_percent(255), 100);
        assert_eq!(motor_percent(128), 50);
        assert_eq!(motor_percent(64), 25);
        assert_eq!(motor_percent(0), 0);
    }

    #[test]
    fn angles_render_with_one_decimal_and_degree_suffix() {
        assert_eq!(format_angle(12.34), "12.3°");
        assert_eq!(format_angle(-5.0), "-5.0°");
        assert_eq!(format_angle(0.0), "0.0°");
    }

    #[test]
    fn motor_output_parses_and_ignores_firmware_extras() {
        let json = r#"{"armed":true,"motorFL":255,"motorFR":128,
                       "motorBL":0,"motorBR":64,"pitch":1.0,"roll":2.0,"yaw":3.0}"#;
        let motors: MotorOutput = serde_json::from_str(json).unwrap();
        assert_eq!(motors.front_left, 255);
        assert_eq!(motors.front_right, 128);
        assert_eq!(motors.back_left, 0);
        assert_eq!(motors.back_right, 64);
    }

    #[test]
    fn telemetry_snapshot_parses_sensor_json() {
        let snap: TelemetrySnapshot =
            serde_json::from_str(r#"{"pitch":12.34,"roll":-5.0,"yaw":0}"#).unwrap();
        assert_eq!(snap.pitch, 12.34);
        assert_eq!(snap.roll, -5.0);
        assert_eq!(snap.yaw, 0.0);
    }

    #[test]
    fn telemetry_history_is_bounded() {
        let mut buffer = DataBuffer::new();
        for i in 0..(MAX_POINTS + 10) {
            buffer.push(TelemetrySnapshot {
                pitch: i as f32,
                ..Default::default()
            });
        }
        assert_eq!(buffer.data.len(), MAX_POINTS);
        assert_eq!(buffer.latest().unwrap().snapshot.pitch, (MAX_POINTS + 9) as f32);
    }

    #[test]
    fn event_log_is_bounded() {
        let mut buffer = DataBuffer::new();
        for i in 0..(MAX_LOG_MESSAGES + 5) {
            buffer.push_log(format!("event {i}"));
        }
        assert_eq!(buffer.logs.len(), MAX_LOG_MESSAGES);
    }
}
