//! Hexagonal coordinate system using offset coordinates (odd-r).
//!
//! Based on Red Blob Games' excellent guide:
//! https://www.redblobgames.com/grids/hexagons/
//!
//! Bubbles are packed in rows; odd rows are shifted right by one bubble radius.
//! Pixel space is y-down with the origin at the top-left of the playfield,
//! so row 0 hangs from the ceiling.

use bevy::prelude::*;

/// Square root of 3, used for the vertical row pitch.
pub const SQRT_3: f32 = 1.732_050_8;

/// Offset hex coordinate (odd-r system).
///
/// - `row` increases downward, row 0 is the ceiling anchor row
/// - `col` increases to the right
/// - Odd rows are shifted right by one bubble radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct HexCoord {
    /// Row (y-axis, downward)
    pub row: i32,
    /// Column (x-axis)
    pub col: i32,
}

impl HexCoord {
    /// Create a new hex coordinate.
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether this cell sits on a shifted (odd) row.
    #[inline]
    pub const fn is_odd_row(&self) -> bool {
        self.row.rem_euclid(2) == 1
    }

    /// Get all 6 neighboring hex coordinates.
    ///
    /// In offset coordinates (odd-r), neighbors depend on row parity.
    /// Odd rows are shifted right, so their diagonal neighbors sit one
    /// column further right than those of an even row.
    pub fn neighbors(&self) -> [HexCoord; 6] {
        let (row, col) = (self.row, self.col);
        let diagonal = if self.is_odd_row() { col + 1 } else { col - 1 };

        [
            HexCoord::new(row, col - 1),      // West
            HexCoord::new(row, col + 1),      // East
            HexCoord::new(row - 1, col),      // North
            HexCoord::new(row + 1, col),      // South
            HexCoord::new(row - 1, diagonal), // North diagonal
            HexCoord::new(row + 1, diagonal), // South diagonal
        ]
    }

    /// Whether `other` is one of the six neighbors of this cell.
    pub fn is_neighbor(&self, other: HexCoord) -> bool {
        self.neighbors().contains(&other)
    }

    /// Horizontal distance between the centers of two adjacent bubbles in a row.
    #[inline]
    pub fn column_pitch(radius: f32) -> f32 {
        radius * 2.0 + 1.0
    }

    /// Vertical distance between two rows.
    #[inline]
    pub fn row_pitch(radius: f32) -> f32 {
        radius * SQRT_3 + 1.0
    }

    /// Convert offset hex coordinates to the pixel center of the cell.
    ///
    /// - x = col * (2r + 1) + r (+ r on odd rows)
    /// - y = row * (r * sqrt(3) + 1) + r
    pub fn to_pixel(&self, radius: f32) -> Vec2 {
        let shift = if self.is_odd_row() { radius } else { 0.0 };
        let x = self.col as f32 * Self::column_pitch(radius) + radius + shift;
        let y = self.row as f32 * Self::row_pitch(radius) + radius;
        Vec2::new(x, y)
    }

    /// Convert a pixel position to the nearest offset hex coordinate.
    ///
    /// The row is found first, then the column is rounded after removing
    /// that row's shift.
    pub fn from_pixel(pos: Vec2, radius: f32) -> Self {
        let row = ((pos.y - radius) / Self::row_pitch(radius)).round() as i32;
        let shift = if row.rem_euclid(2) == 1 { radius } else { 0.0 };
        let col = ((pos.x - radius - shift) / Self::column_pitch(radius)).round() as i32;

        Self { row, col }
    }

    /// Get the 6 corner vertices of this hex around its pixel center.
    ///
    /// Useful for debug drawing. Returns corners in order for drawing a polygon.
    pub fn corners(&self, radius: f32) -> [Vec2; 6] {
        let center = self.to_pixel(radius);
        let mut corners = [Vec2::ZERO; 6];

        for (i, corner) in corners.iter_mut().enumerate() {
            // For pointy-top, first corner is at 30 degrees
            let angle = std::f32::consts::PI / 180.0 * (60.0 * i as f32 + 30.0);
            *corner = Vec2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
        }

        corners
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
