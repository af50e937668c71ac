//! The main game module for the bubble shooter.
//!
//! The simulation lives in plain Rust types and runs one tick per fixed
//! step through [`session::GameSession`]:
//! - Hexagonal grid system (odd-row offset coordinates)
//! - Bubble lifecycles: resting, exploding, falling
//! - Shooter/launcher and projectile physics
//! - Color matching, bomb chains and floating detection
//! - Win/lose conditions
//!
//! The Bevy side only latches input, forwards the tick's events as messages
//! and draws the current state.

pub mod bubble;
pub mod cluster;
mod debug;
pub mod error;
pub mod floating;
pub mod grid;
pub mod hex;
mod polish;
pub mod projectile;
pub mod session;
pub mod shooter;
pub mod state;

use bevy::prelude::*;

use crate::config::GameConfig;
use session::GameSession;
use state::{FrameEvent, GameStatus, InputState};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<FrameEvent>();
    app.init_resource::<PendingInput>();
    app.register_type::<GameStatus>();
    app.register_type::<hex::HexCoord>();
    app.register_type::<bubble::BubbleKind>();

    app.add_systems(Startup, start_session);
    app.add_systems(Update, (latch_input, quit_on_request));
    app.add_systems(FixedUpdate, tick_session.in_set(SimulationSystems));

    app.add_plugins((polish::plugin, debug::plugin));
}

/// Systems that advance the simulation. Effects reading the tick's
/// messages run after this set.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationSystems;

/// Edge-triggered keys seen since the last fixed tick.
#[derive(Resource, Debug, Default)]
struct PendingInput(InputState);

fn start_session(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(GameSession::new(config.clone()));
}

/// Remember key presses until the next fixed tick consumes them.
fn latch_input(keys: Res<ButtonInput<KeyCode>>, mut pending: ResMut<PendingInput>) {
    if keys.just_pressed(KeyCode::Space) {
        pending.0.fire = true;
    }
    if keys.just_pressed(KeyCode::KeyL) {
        pending.0.toggle_aid = true;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        pending.0.reset = true;
    }
}

fn tick_session(
    keys: Res<ButtonInput<KeyCode>>,
    mut pending: ResMut<PendingInput>,
    mut session: ResMut<GameSession>,
    mut frame_events: MessageWriter<FrameEvent>,
) {
    let input = InputState {
        rotate_left: keys.pressed(KeyCode::ArrowLeft),
        rotate_right: keys.pressed(KeyCode::ArrowRight),
        ..std::mem::take(&mut pending.0)
    };

    frame_events.write_batch(session.tick(&input));
}

fn quit_on_request(keys: Res<ButtonInput<KeyCode>>, mut app_exit: MessageWriter<AppExit>) {
    if keys.any_just_pressed([KeyCode::Escape, KeyCode::KeyQ]) {
        info!("Quit requested");
        app_exit.write(AppExit::Success);
    }
}

/// Map a playfield point (origin top-left, y down) to world space
/// (origin at the window center, y up).
pub fn to_world(point: Vec2, config: &GameConfig) -> Vec2 {
    Vec2::new(point.x - config.width / 2.0, config.height / 2.0 - point.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playfield_corners_map_to_window_edges() {
        let config = GameConfig::default();
        assert_eq!(to_world(Vec2::ZERO, &config), Vec2::new(-320.0, 300.0));
        assert_eq!(
            to_world(Vec2::new(640.0, 600.0), &config),
            Vec2::new(320.0, -300.0)
        );
        assert_eq!(to_world(Vec2::new(320.0, 300.0), &config), Vec2::ZERO);
    }
}
