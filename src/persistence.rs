use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::DEFAULT_DEVICE_URL;

fn default_device_url() -> String {
    DEFAULT_DEVICE_URL.to_string()
}

fn default_auto_scroll() -> bool {
    true
}

/// Operator preferences persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Resource)]
pub struct PersistentSettings {
    #[serde(default = "default_device_url")]
    pub device_url: String,
    #[serde(default = "default_auto_scroll")]
    pub auto_scroll_logs: bool,
}

impl Default for PersistentSettings {
    fn default() -> Self {
        Self {
            device_url: default_device_url(),
            auto_scroll_logs: default_auto_scroll(),
        }
    }
}

impl PersistentSettings {
    fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        let app_config_dir = config_dir.join("quad_panel");
        let _ = fs::create_dir_all(&app_config_dir);
        app_config_dir.join("settings.json")
    }

    /// Load settings from disk, or use defaults if file doesn't exist.
    pub fn load() -> Self {
        let path = Self::settings_path();
        match Self::load_from(&path) {
            Ok(settings) => {
                info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                info!("using default settings: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).context("failed to read settings file")?;
        serde_json::from_str(&contents).context("failed to parse settings file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, json).context("failed to write settings file")
    }
}

/// System that saves settings whenever they change.
pub fn auto_save_system(settings: Res<PersistentSettings>) {
    if settings.is_changed() && !settings.is_added() {
        if let Err(e) = settings.save() {
            warn!("failed to auto-save settings: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = PersistentSettings {
            device_url: "http://10.1.2.3:8080".to_string(),
            auto_scroll_logs: false,
        };
        settings.save_to(&path).unwrap();

        let loaded = PersistentSettings::load_from(&path).unwrap();
        assert_eq!(loaded.device_url, settings.device_url);
        assert!(!loaded.auto_scroll_logs);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: PersistentSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.device_url, DEFAULT_DEVICE_URL);
        assert!(settings.auto_scroll_logs);
    }
}
