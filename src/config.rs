// Device link configuration
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
pub const CONTROL_PUSH_INTERVAL_MS: u64 = 100;
pub const SENSOR_POLL_INTERVAL_MS: u64 = 200;
pub const HTTP_TIMEOUT_MS: u64 = 1_000;

// Control value ranges
pub const THROTTLE_MAX: i32 = 100;
pub const TILT_LIMIT: i32 = 50;
pub const YAW_LIMIT: i32 = 100;

// Joystick widget geometry (pixels)
pub const JOYSTICK_SIZE: f32 = 180.0;
pub const KNOB_RADIUS: f32 = 24.0;

// Data buffer limits
pub const MAX_POINTS: usize = 500;
pub const MAX_LOG_MESSAGES: usize = 100;
