use bevy::prelude::*;
use bevy_egui::egui;
use std::sync::{mpsc, Arc, Mutex};
use tracing::warn;

use crate::control::ControlState;
use crate::link::{self, LinkCommand};
use crate::persistence::PersistentSettings;
use crate::telemetry::DataBuffer;

#[derive(Resource)]
pub struct AppState {
    pub data_buffer: Arc<Mutex<DataBuffer>>,
    pub control: ControlState,
    pub link_sender: Option<mpsc::Sender<LinkCommand>>,
    pub preview_texture_id: Option<egui::TextureId>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_buffer: Arc::new(Mutex::new(DataBuffer::new())),
            control: ControlState::default(),
            link_sender: None,
            preview_texture_id: None,
        }
    }
}

impl AppState {
    pub fn connected(&self) -> bool {
        self.link_sender.is_some()
    }

    pub fn connect(&mut self, device_url: &str) -> anyhow::Result<()> {
        if self.link_sender.is_some() {
            return Ok(());
        }
        let sender = link::start_link(device_url.to_string(), Arc::clone(&self.data_buffer))?;
        // The push loop starts from the disarmed rest frame; hand it the
        // actual current state right away.
        let _ = sender.send(LinkCommand::Push(self.control.frame()));
        self.link_sender = Some(sender);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(sender) = &self.link_sender {
            let _ = sender.send(LinkCommand::Disconnect);
        }
        self.link_sender = None;
    }

    /// Forwards the current control frame to the push thread. Every input
    /// handler calls this after mutating `self.control`.
    pub fn push_control(&self) {
        if let Some(sender) = &self.link_sender {
            if let Err(e) = sender.send(LinkCommand::Push(self.control.frame())) {
                warn!("control push channel closed: {e}");
            }
        }
    }
}

/// Connects to the persisted device address once at startup.
pub fn auto_connect_system(mut state: ResMut<AppState>, settings: Res<PersistentSettings>) {
    if let Err(e) = state.connect(&settings.device_url) {
        warn!("initial connect failed: {e:#}");
        if let Ok(mut buffer) = state.data_buffer.lock() {
            buffer.push_log(format!("Connect failed: {e:#}"));
        }
    }
}
