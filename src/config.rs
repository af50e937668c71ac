//! Tunable game settings.
//!
//! Defaults reproduce the classic layout: a 640x600 playfield, 8 rows of 15
//! bubbles with 20px radius. A JSON file can override any subset of fields.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, ensure};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "HEXPOP_CONFIG";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playfield width in pixels.
    pub width: f32,
    /// Playfield height in pixels.
    pub height: f32,
    /// Radius of a bubble.
    pub bubble_radius: f32,
    /// Extra reach added to the bubble radius when testing projectile contact.
    pub collision_radius: f32,
    /// Rows filled at the start of a game.
    pub rows: i32,
    /// Columns per row; also the snap bound for projectiles.
    pub cols: i32,
    /// Chance that a generated bubble is a bomb.
    pub bomb_probability: f64,
    /// Chance that a generated bubble below the ceiling row is stone.
    pub stone_probability: f64,
    /// Projectile speed in pixels per tick.
    pub shoot_speed: f32,
    /// Aim rotation per tick in radians.
    pub turn_speed: f32,
    /// Distance between the shooter and the bottom of the playfield.
    pub shooter_margin: f32,
    /// Velocity gained per tick by a falling bubble.
    pub fall_gravity: f32,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 600.0,
            bubble_radius: 20.0,
            collision_radius: 10.0,
            rows: 8,
            cols: 15,
            bomb_probability: 0.2,
            stone_probability: 0.1,
            shoot_speed: 10.0,
            turn_speed: 0.03,
            shooter_margin: 50.0,
            fall_gravity: 0.2,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Y position of the shooter, which doubles as the losing line.
    pub fn shooter_y(&self) -> f32 {
        self.height - self.shooter_margin
    }

    /// Contact distance between a projectile and a grid bubble.
    pub fn contact_distance(&self) -> f32 {
        self.bubble_radius + self.collision_radius
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "playfield must have a positive size, got {}x{}",
            self.width,
            self.height
        );
        ensure!(
            self.bubble_radius > 0.0,
            "bubble_radius must be positive, got {}",
            self.bubble_radius
        );
        ensure!(
            self.collision_radius >= 0.0,
            "collision_radius must not be negative, got {}",
            self.collision_radius
        );
        ensure!(
            self.rows >= 0 && self.cols > 0,
            "grid must have at least one column, got {} rows x {} cols",
            self.rows,
            self.cols
        );
        ensure!(
            (0.0..=1.0).contains(&self.bomb_probability)
                && (0.0..=1.0).contains(&self.stone_probability),
            "probabilities must be within [0, 1]"
        );
        ensure!(self.shoot_speed > 0.0, "shoot_speed must be positive");
        ensure!(
            self.fall_gravity > 0.0,
            "fall_gravity must be positive, got {}",
            self.fall_gravity
        );
        ensure!(
            self.turn_speed >= 0.0,
            "turn_speed must not be negative, got {}",
            self.turn_speed
        );
        ensure!(
            self.shooter_margin > 0.0 && self.shooter_margin < self.height,
            "shooter_margin must lie inside the playfield"
        );
        Ok(())
    }

    /// Parse and validate a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Where the config file is looked up when no override is given.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("hexpop").join("config.json"))
    }

    /// Load the config from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Self::default()
            }
        }
    }
}
