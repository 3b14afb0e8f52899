use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod control;
mod link;
mod persistence;
mod scene;
mod telemetry;
mod ui;

use crate::app::AppState;
use crate::persistence::PersistentSettings;

fn main() {
    setup_logging();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Quadcopter Control Panel".to_string(),
                        resolution: (1080.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        .add_plugins(EguiPlugin)
        .init_resource::<AppState>()
        .insert_resource(PersistentSettings::load())
        .add_systems(Startup, (scene::setup_preview_scene, app::auto_connect_system))
        .add_systems(
            Update,
            (
                ui::ui_system,
                scene::apply_attitude,
                persistence::auto_save_system,
            ),
        )
        .run();
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wgpu=error,naga=warn,bevy_render=warn")),
        )
        .try_init()
        .expect("failed to initialize logging");
}
