//! Projectile - the bubble being shot.
//!
//! The projectile travels in a straight line, bouncing off the side walls,
//! until it touches a grid bubble or the ceiling.

use bevy::prelude::*;

use super::{bubble::BubbleColor, grid::HexGrid};

/// Upper bound on steps when simulating a shot; a real shot ends far sooner.
const MAX_SIMULATION_STEPS: usize = 10_000;

/// The bubble in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Displacement per tick.
    pub velocity: Vec2,
    pub color: BubbleColor,
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, color: BubbleColor) -> Self {
        Self {
            position,
            velocity,
            color,
        }
    }

    /// Move one tick, bouncing off the side walls.
    pub fn advance(&mut self, width: f32, radius: f32) {
        self.position += self.velocity;
        bounce_off_walls(&mut self.position, &mut self.velocity, width, radius);
    }

    /// Whether the projectile has reached the ceiling or a grid bubble.
    pub fn touches(&self, grid: &HexGrid, radius: f32, reach: f32) -> bool {
        touches_at(self.position, grid, radius, reach)
    }
}

/// Reflect off the left and right walls, keeping the bubble inside.
fn bounce_off_walls(position: &mut Vec2, velocity: &mut Vec2, width: f32, radius: f32) {
    // Left wall bounce
    if position.x <= radius {
        position.x = radius;
        velocity.x = velocity.x.abs();
    }

    // Right wall bounce
    if position.x >= width - radius {
        position.x = width - radius;
        velocity.x = -velocity.x.abs();
    }
}

fn touches_at(position: Vec2, grid: &HexGrid, radius: f32, reach: f32) -> bool {
    position.y <= radius || grid.first_contact(position, reach).is_some()
}

/// Walk a shot from `start` over the current grid and return where it
/// would first touch a bubble or the ceiling. Pure, used for the aim preview.
pub fn simulate_path(
    start: Vec2,
    velocity: Vec2,
    grid: &HexGrid,
    width: f32,
    radius: f32,
    reach: f32,
) -> Vec2 {
    let mut position = start;
    let mut velocity = velocity;

    for _ in 0..MAX_SIMULATION_STEPS {
        position += velocity;
        bounce_off_walls(&mut position, &mut velocity, width, radius);

        if touches_at(position, grid, radius, reach) {
            break;
        }
    }

    position
}
