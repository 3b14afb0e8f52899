pub mod connection;
pub mod controls;
pub mod logs;
pub mod plots;
pub mod vehicle;

pub use connection::render_connection_panel;
pub use controls::render_controls_section;
pub use logs::render_logs_section;
pub use plots::render_attitude_plot;
pub use vehicle::render_vehicle_section;
