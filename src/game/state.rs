//! Game state management - status, per-tick input and the events a tick produces.
//!
//! Win: Clear all bubbles from the grid.
//! Lose: A resting bubble reaches the shooter line.

use bevy::prelude::*;

/// Where the current game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Playing
    }
}

/// Controls sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
    /// Toggle the aim preview.
    pub toggle_aid: bool,
    pub reset: bool,
}

impl InputState {
    /// Net rotation direction: +1 turns left, -1 turns right.
    pub fn rotation(&self) -> f32 {
        match (self.rotate_left, self.rotate_right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// Something the renderer should react to.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    /// Spawn `count` particles at `position` (playfield pixels).
    ParticleBurst {
        position: Vec2,
        color: Color,
        count: u32,
    },
    ScoreChanged {
        total: u32,
    },
    StatusChanged(GameStatus),
}

/// Ordered events of one tick.
pub type FrameEvents = Vec<FrameEvent>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keys_cancel_out() {
        let input = InputState {
            rotate_left: true,
            rotate_right: true,
            ..default()
        };
        assert_eq!(input.rotation(), 0.0);
        assert_eq!(
            InputState {
                rotate_right: true,
                ..default()
            }
            .rotation(),
            -1.0
        );
    }

    #[test]
    fn only_playing_is_live() {
        assert!(!GameStatus::Playing.is_over());
        assert!(GameStatus::Won.is_over());
        assert!(GameStatus::Lost.is_over());
    }
}
