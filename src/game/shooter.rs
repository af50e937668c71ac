//! The shooter/launcher at the bottom of the screen.
//!
//! The player rotates the aim with the arrow keys and fires the loaded
//! bubble. The loaded color is always drawn from the colors still on the
//! grid, so the player is never handed a color that cannot match.

use std::f32::consts::PI;

use bevy::prelude::*;
use rand::{Rng, seq::IndexedRandom};

use super::{bubble::BubbleColor, projectile::Projectile};

/// Smallest aim angle (pointing right), in radians from the +x axis.
pub const MIN_AIM_ANGLE: f32 = 0.1 * PI;

/// Largest aim angle (pointing left).
pub const MAX_AIM_ANGLE: f32 = 0.9 * PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Shooter {
    /// Where projectiles start.
    pub position: Vec2,
    /// Aim angle; `PI / 2` points straight up.
    angle: f32,
    /// The currently loaded bubble color.
    loaded: BubbleColor,
}

impl Shooter {
    pub fn new(position: Vec2, loaded: BubbleColor) -> Self {
        Self {
            position,
            angle: PI / 2.0,
            loaded,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn loaded(&self) -> BubbleColor {
        self.loaded
    }

    /// Unit vector of the current aim (y-down pixel space).
    pub fn aim_direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), -self.angle.sin())
    }

    /// Turn the aim; positive `direction` turns left.
    pub fn rotate(&mut self, direction: f32, turn_speed: f32) {
        self.angle = (self.angle + direction * turn_speed).clamp(MIN_AIM_ANGLE, MAX_AIM_ANGLE);
    }

    /// Launch the loaded bubble along the aim.
    pub fn fire(&self, speed: f32) -> Projectile {
        Projectile::new(self.position, self.aim_direction() * speed, self.loaded)
    }

    /// Load a new color from the ones still in play.
    ///
    /// Keeps the current color if nothing colored is left.
    pub fn reload(&mut self, available: &[BubbleColor], rng: &mut impl Rng) {
        if let Some(&color) = available.choose(rng) {
            self.loaded = color;
        }
    }

    /// Reload if the loaded color has left the grid.
    ///
    /// Returns whether a new color was loaded.
    pub fn ensure_available(&mut self, available: &[BubbleColor], rng: &mut impl Rng) -> bool {
        if available.is_empty() || available.contains(&self.loaded) {
            return false;
        }
        self.reload(available, rng);
        true
    }
}
