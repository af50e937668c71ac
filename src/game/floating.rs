//! Floating bubble detection.
//!
//! A bubble stays up only while a chain of occupied cells links it to the
//! ceiling row. Everything else is floating and drops.

use std::collections::{HashSet, VecDeque};

use super::{bubble::BubbleId, grid::HexGrid, hex::HexCoord};

/// Find all cells connected to the ceiling (row 0) using BFS.
///
/// Color-agnostic: stones and exploding bubbles still hold the structure.
pub fn find_anchored(grid: &HexGrid) -> HashSet<HexCoord> {
    let mut anchored = HashSet::new();
    let mut queue = VecDeque::new();

    // Start from all bubbles in the ceiling row
    for coord in grid.coords().filter(|c| c.row == 0) {
        anchored.insert(coord);
        queue.push_back(coord);
    }

    while let Some(coord) = queue.pop_front() {
        for neighbor in coord.neighbors() {
            if grid.is_occupied(neighbor) && anchored.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    anchored
}

/// Bubbles in the grid with no path to the ceiling, in creation order.
pub fn find_floating(grid: &HexGrid) -> Vec<BubbleId> {
    let anchored = find_anchored(grid);
    grid.indexed()
        .filter(|b| !anchored.contains(&b.coord))
        .map(|b| b.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        bubble::{BubbleColor, BubbleKind},
        grid::GridBounds,
    };

    const RED: BubbleKind = BubbleKind::Plain(BubbleColor::Red);

    fn grid_with(cells: &[(i32, i32)]) -> HexGrid {
        let mut grid = HexGrid::new(20.0, GridBounds::with_cols(15));
        for &(row, col) in cells {
            grid.insert(HexCoord::new(row, col), RED).unwrap();
        }
        grid
    }

    fn coords(grid: &HexGrid, ids: &[BubbleId]) -> Vec<HexCoord> {
        let mut coords: Vec<_> = ids
            .iter()
            .filter_map(|id| grid.bubble(*id))
            .map(|b| b.coord)
            .collect();
        coords.sort();
        coords
    }

    #[test]
    fn connected_structure_has_no_floaters() {
        let grid = grid_with(&[(0, 0), (0, 1), (1, 0), (2, 0), (2, 1), (3, 1)]);
        assert!(find_floating(&grid).is_empty());
    }

    #[test]
    fn island_without_ceiling_path_floats() {
        let grid = grid_with(&[(0, 0), (1, 0), (4, 6), (5, 6)]);
        let floating = find_floating(&grid);
        assert_eq!(
            coords(&grid, &floating),
            vec![HexCoord::new(4, 6), HexCoord::new(5, 6)]
        );
    }

    #[test]
    fn removing_the_only_connector_drops_the_substructure() {
        // (1, 3) is the only link between the ceiling and rows 2-3.
        let mut grid = grid_with(&[(0, 3), (1, 3), (2, 3), (2, 4), (3, 3), (3, 4)]);
        let connector = grid.get(HexCoord::new(1, 3)).unwrap().id;
        assert!(find_floating(&grid).is_empty());

        grid.remove(connector);
        let floating = find_floating(&grid);
        assert_eq!(
            coords(&grid, &floating),
            vec![
                HexCoord::new(2, 3),
                HexCoord::new(2, 4),
                HexCoord::new(3, 3),
                HexCoord::new(3, 4),
            ]
        );
    }

    #[test]
    fn detection_is_idempotent() {
        let grid = grid_with(&[(0, 0), (3, 3), (3, 4), (6, 1)]);
        assert_eq!(find_floating(&grid), find_floating(&grid));
    }

    #[test]
    fn stone_and_exploding_bubbles_still_anchor() {
        let mut grid = HexGrid::new(20.0, GridBounds::with_cols(15));
        grid.insert(HexCoord::new(0, 0), BubbleKind::Stone).unwrap();
        let middle = grid.insert(HexCoord::new(1, 0), RED).unwrap();
        grid.insert(HexCoord::new(2, 0), RED).unwrap();
        grid.bubble_mut(middle).unwrap().start_explosion(3).unwrap();

        assert!(find_floating(&grid).is_empty());
    }

    #[test]
    fn empty_ceiling_means_everything_floats() {
        let grid = grid_with(&[(1, 1), (2, 1)]);
        assert_eq!(find_floating(&grid).len(), 2);
    }
}
