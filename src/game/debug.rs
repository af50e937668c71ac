//! Debug visualization for the hexagonal grid.
//!
//! Toggle with the 'D' key.
//! Shows:
//! - Hex cell outlines for every cell down to the shooter line
//! - Occupied cells highlighted
//!
//! The walls and the losing line are always drawn.

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{grid::GridBounds, hex::HexCoord, session::GameSession, to_world};
use crate::config::GameConfig;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugGridVisible>();

    // Toggle debug with 'D' key
    app.add_systems(Update, toggle_debug.run_if(input_just_pressed(KeyCode::KeyD)));

    // Draw debug grid when visible
    app.add_systems(Update, draw_debug_grid.run_if(debug_visible));

    app.add_systems(Update, draw_walls);
}

/// Resource to track if debug visualization is visible.
#[derive(Resource, Default)]
pub struct DebugGridVisible(pub bool);

fn debug_visible(debug: Res<DebugGridVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugGridVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug grid: {}", state);
}

/// Last row whose cells can still hold a bubble without losing.
fn last_safe_row(config: &GameConfig) -> i32 {
    let row_pitch = HexCoord::row_pitch(config.bubble_radius);
    ((config.shooter_y() - 2.0 * config.bubble_radius) / row_pitch).floor() as i32
}

/// Draw the debug grid using Bevy's Gizmos.
fn draw_debug_grid(mut gizmos: Gizmos, session: Res<GameSession>) {
    let config = session.config();
    let grid = session.grid();
    let bounds = &grid.bounds;
    let last_row = last_safe_row(config);

    for row in bounds.min_row..=last_row + 1 {
        for col in bounds.min_col..=bounds.max_col {
            let coord = HexCoord::new(row, col);

            let color = if grid.is_occupied(coord) {
                css::LIMEGREEN.with_alpha(0.5)
            } else if row == 0 {
                // Ceiling row (anchor row) in different color
                css::GOLD.with_alpha(0.3)
            } else if row > last_row {
                // Cells past the losing line
                css::INDIAN_RED.with_alpha(0.3)
            } else {
                css::GRAY.with_alpha(0.25)
            };

            draw_hex_outline(&mut gizmos, coord, config, color);
        }
    }

    draw_bounds_outline(&mut gizmos, bounds, last_row, config);
}

/// Draw a hexagon outline at the given coordinates.
fn draw_hex_outline(gizmos: &mut Gizmos, coord: HexCoord, config: &GameConfig, color: impl Into<Color>) {
    let corners = coord.corners(config.bubble_radius).map(|c| to_world(c, config));
    let color = color.into();

    for i in 0..6 {
        let next = (i + 1) % 6;
        gizmos.line_2d(corners[i], corners[next], color);
    }
}

/// Mark the left and right edge cells of every row.
fn draw_bounds_outline(gizmos: &mut Gizmos, bounds: &GridBounds, last_row: i32, config: &GameConfig) {
    let color = css::AQUA.with_alpha(0.8);

    for row in bounds.min_row..=last_row {
        draw_hex_outline(gizmos, HexCoord::new(row, bounds.min_col), config, color);
        draw_hex_outline(gizmos, HexCoord::new(row, bounds.max_col), config, color);
    }
}

/// Draw the walls and the losing line.
fn draw_walls(mut gizmos: Gizmos, config: Res<GameConfig>) {
    let wall_color = css::ORANGE.with_alpha(0.8);
    let danger_color = css::RED.with_alpha(0.6);

    let top_left = to_world(Vec2::ZERO, &config);
    let top_right = to_world(Vec2::new(config.width, 0.0), &config);
    let bottom_left = to_world(Vec2::new(0.0, config.height), &config);
    let bottom_right = to_world(Vec2::new(config.width, config.height), &config);

    // Left wall
    gizmos.line_2d(top_left, bottom_left, wall_color);

    // Right wall
    gizmos.line_2d(top_right, bottom_right, wall_color);

    // Ceiling
    gizmos.line_2d(top_left, top_right, wall_color);

    // Losing line at the shooter
    gizmos.line_2d(
        to_world(Vec2::new(0.0, config.shooter_y()), &config),
        to_world(Vec2::new(config.width, config.shooter_y()), &config),
        danger_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_rows_stay_above_the_shooter_line() {
        let config = GameConfig::default();
        let last = last_safe_row(&config);
        let bottom = HexCoord::new(last, 0).to_pixel(config.bubble_radius).y + config.bubble_radius;
        assert!(bottom <= config.shooter_y());

        let next = HexCoord::new(last + 1, 0).to_pixel(config.bubble_radius).y + config.bubble_radius;
        assert!(next > config.shooter_y());
    }
}
