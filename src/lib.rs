//! Hex-grid bubble shooter with chain-reaction bombs.

pub mod config;
pub mod game;
mod theme;

use bevy::{prelude::*, window::PrimaryWindow};

use config::GameConfig;
use theme::palette;

/// Simulation ticks per second.
pub const TICK_RATE: f64 = 60.0;

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hexpop".to_string(),
                resizable: false,
                ..default()
            }),
            ..default()
        }));

        // Loaded after `LogPlugin` so fallbacks show up in the log.
        app.insert_resource(GameConfig::load_or_default());
        app.insert_resource(ClearColor(palette::BACKGROUND));
        app.insert_resource(Time::<Fixed>::from_hz(TICK_RATE));

        app.add_systems(Startup, (spawn_camera, size_window));
        app.add_plugins(game::plugin);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d));
}

/// Match the window to the configured playfield.
fn size_window(mut window: Single<&mut Window, With<PrimaryWindow>>, config: Res<GameConfig>) {
    window.resolution.set(config.width, config.height);
}
