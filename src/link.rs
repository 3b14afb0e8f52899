use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::{CONTROL_PUSH_INTERVAL_MS, HTTP_TIMEOUT_MS, SENSOR_POLL_INTERVAL_MS};
use crate::control::ControlFrame;
use crate::telemetry::{DataBuffer, MotorOutput, TelemetrySnapshot};

pub enum LinkCommand {
    Push(ControlFrame),
    Disconnect,
}

/// Starts the two device polling threads: a control push loop and a
/// sensor pull loop. The returned sender nudges the push loop with fresh
/// control frames; `LinkCommand::Disconnect` (or dropping the sender)
/// stops both threads.
pub fn start_link(
    base_url: String,
    data_buffer: Arc<Mutex<DataBuffer>>,
) -> Result<mpsc::Sender<LinkCommand>> {
    let client = Client::builder()
        .timeout(Duration::from_millis(HTTP_TIMEOUT_MS))
        .build()
        .context("failed to build HTTP client")?;

    let running = Arc::new(AtomicBool::new(true));
    let (tx, rx) = mpsc::channel();

    info!(%base_url, "starting device link");
    if let Ok(mut buf) = data_buffer.lock() {
        buf.push_log(format!("Connecting to {base_url}"));
    }

    {
        let client = client.clone();
        let base_url = base_url.clone();
        let data_buffer = Arc::clone(&data_buffer);
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("control-push".into())
            .spawn(move || control_loop(client, base_url, data_buffer, rx, running))
            .context("failed to spawn control push thread")?;
    }

    thread::Builder::new()
        .name("sensor-pull".into())
        .spawn(move || sensor_loop(client, base_url, data_buffer, running))
        .context("failed to spawn sensor pull thread")?;

    Ok(tx)
}

/// Pushes the current control frame every `CONTROL_PUSH_INTERVAL_MS`, or
/// immediately when the UI nudges it. A burst of nudges (a slider or
/// joystick drag) collapses into a single request carrying the freshest
/// frame, so at most one control request is ever in flight and responses
/// apply in send order.
fn control_loop(
    client: Client,
    base_url: String,
    data_buffer: Arc<Mutex<DataBuffer>>,
    rx: mpsc::Receiver<LinkCommand>,
    running: Arc<AtomicBool>,
) {
    let interval = Duration::from_millis(CONTROL_PUSH_INTERVAL_MS);
    let mut frame = ControlFrame::default();

    // One immediate push before settling into the cadence
    push_once(&client, &base_url, frame, &data_buffer);

    'outer: loop {
        match rx.recv_timeout(interval) {
            Ok(LinkCommand::Push(next)) => {
                frame = next;
                while let Ok(cmd) = rx.try_recv() {
                    match cmd {
                        LinkCommand::Push(next) => frame = next,
                        LinkCommand::Disconnect => break 'outer,
                    }
                }
            }
            Ok(LinkCommand::Disconnect) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
        push_once(&client, &base_url, frame, &data_buffer);
    }

    running.store(false, Ordering::Relaxed);
    if let Ok(mut buf) = data_buffer.lock() {
        buf.push_log("Disconnected".to_string());
    }
    info!("control push thread exited");
}

fn push_once(
    client: &Client,
    base_url: &str,
    frame: ControlFrame,
    data_buffer: &Arc<Mutex<DataBuffer>>,
) {
    match push_control(client, base_url, frame) {
        Ok(motors) => {
            debug!(?frame, ?motors, "control push ok");
            if let Ok(mut buf) = data_buffer.lock() {
                buf.set_motors(motors);
            }
        }
        // Failures never touch control state; the next push proceeds
        // on schedule regardless.
        Err(e) => {
            warn!("control push failed: {e:#}");
            if let Ok(mut buf) = data_buffer.lock() {
                buf.push_log(format!("Control push failed: {e:#}"));
            }
        }
    }
}

fn push_control(client: &Client, base_url: &str, frame: ControlFrame) -> Result<MotorOutput> {
    let url = control_url(base_url, frame);
    let motors = client
        .get(&url)
        .send()
        .context("control request failed")?
        .error_for_status()
        .context("control request rejected")?
        .json::<MotorOutput>()
        .context("malformed control response")?;
    Ok(motors)
}

/// Polls `/sensor` every `SENSOR_POLL_INTERVAL_MS` until the link stops.
/// The first pull happens immediately; the cadence is anchored to a
/// deadline rather than a sleep-after-work, so request duration does not
/// stretch the period.
fn sensor_loop(
    client: Client,
    base_url: String,
    data_buffer: Arc<Mutex<DataBuffer>>,
    running: Arc<AtomicBool>,
) {
    let interval = Duration::from_millis(SENSOR_POLL_INTERVAL_MS);
    let mut deadline = Instant::now();
    while running.load(Ordering::Relaxed) {
        match pull_sensor(&client, &base_url) {
            Ok(snapshot) => {
                debug!(?snapshot, "sensor pull ok");
                if let Ok(mut buf) = data_buffer.lock() {
                    buf.push(snapshot);
                }
            }
            Err(e) => {
                warn!("telemetry pull failed: {e:#}");
                if let Ok(mut buf) = data_buffer.lock() {
                    buf.push_log(format!("Telemetry pull failed: {e:#}"));
                }
            }
        }
        deadline = advance_deadline(deadline, Instant::now(), interval);
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
    info!("sensor pull thread exited");
}

/// Next poll deadline: one interval past the previous deadline, or now
/// when a slow request (a timeout during an outage) has already overrun
/// it.
fn advance_deadline(deadline: Instant, now: Instant, interval: Duration) -> Instant {
    let next = deadline + interval;
    if next > now { next } else { now }
}

fn pull_sensor(client: &Client, base_url: &str) -> Result<TelemetrySnapshot> {
    let url = format!("{}/sensor", base_url.trim_end_matches('/'));
    let snapshot = client
        .get(&url)
        .send()
        .context("sensor request failed")?
        .error_for_status()
        .context("sensor request rejected")?
        .json::<TelemetrySnapshot>()
        .context("malformed sensor response")?;
    Ok(snapshot)
}

fn control_url(base_url: &str, frame: ControlFrame) -> String {
    format!(
        "{}/control?throttle={}&pitch={}&roll={}&yaw={}&arm={}",
        base_url.trim_end_matches('/'),
        frame.throttle,
        frame.pitch,
        frame.roll,
        frame.yaw,
        u8::from(frame.armed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_url_serializes_the_full_frame() {
        let frame = ControlFrame {
            throttle: 40,
            pitch: -12,
            roll: 7,
            yaw: -100,
            armed: true,
        };
        assert_eq!(
            control_url("http://192.168.4.1", frame),
            "http://192.168.4.1/control?throttle=40&pitch=-12&roll=7&yaw=-100&arm=1"
        );
    }

    #[test]
    fn disarmed_frame_sends_arm_zero() {
        let url = control_url("http://10.0.0.2/", ControlFrame::default());
        assert_eq!(
            url,
            "http://10.0.0.2/control?throttle=0&pitch=0&roll=0&yaw=0&arm=0"
        );
    }

    #[test]
    fn failed_push_only_logs_and_leaves_motors_untouched() {
        let client = Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let data_buffer = Arc::new(Mutex::new(DataBuffer::new()));
        let frame = ControlFrame {
            throttle: 40,
            armed: true,
            ..Default::default()
        };

        // Port 1 on loopback refuses the connection; the failure must be
        // absorbed here, not propagated.
        push_once(&client, "http://127.0.0.1:1", frame, &data_buffer);

        let buf = data_buffer.lock().unwrap();
        assert!(buf.motors.is_none());
        assert_eq!(buf.logs.len(), 1);
        assert!(buf.logs[0].message.starts_with("Control push failed"));
    }

    #[test]
    fn poll_deadline_advances_by_one_interval() {
        let interval = Duration::from_millis(200);
        let start = Instant::now();
        // Request finished well before the deadline
        assert_eq!(
            advance_deadline(start, start + Duration::from_millis(30), interval),
            start + interval
        );
    }

    #[test]
    fn overrun_poll_deadline_resets_to_now() {
        let interval = Duration::from_millis(200);
        let start = Instant::now();
        // A 1s timeout blew past the deadline; do not schedule in the past
        let late = start + Duration::from_millis(1_000);
        assert_eq!(advance_deadline(start, late, interval), late);
    }
}
