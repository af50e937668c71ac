//! The hexagonal grid that holds all bubbles.
//!
//! Bubbles live in an arena keyed by [`BubbleId`]; a sparse `HashMap` indexes
//! the cells of bubbles that are still part of the structure (resting or
//! exploding). Falling bubbles leave the index but stay in the arena until
//! they are removed.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use bevy::prelude::*;

use super::{
    bubble::{Bubble, BubbleColor, BubbleId, BubbleKind},
    error::SimError,
    hex::HexCoord,
};

/// Upper bound on cells visited by the fallback ring search.
const MAX_RING_SEARCH: usize = 1000;

/// The bounds of the playable grid area.
///
/// Defines which hex coordinates a projectile may snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct GridBounds {
    /// Minimum col coordinate (left edge).
    pub min_col: i32,
    /// Maximum col coordinate (right edge).
    pub max_col: i32,
    /// Minimum row coordinate (the ceiling).
    pub min_row: i32,
}

impl GridBounds {
    /// Bounds for a grid `cols` wide hanging from row 0.
    pub fn with_cols(cols: i32) -> Self {
        Self {
            min_col: 0,
            max_col: cols - 1,
            min_row: 0,
        }
    }

    /// Check if a hex coordinate is within bounds.
    pub fn contains(&self, coord: HexCoord) -> bool {
        coord.col >= self.min_col && coord.col <= self.max_col && coord.row >= self.min_row
    }

    /// Pull a coordinate back inside the bounds.
    pub fn clamp(&self, coord: HexCoord) -> HexCoord {
        HexCoord::new(
            coord.row.max(self.min_row),
            coord.col.clamp(self.min_col, self.max_col),
        )
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::with_cols(15)
    }
}

/// Owning collection of every active bubble.
#[derive(Debug, Clone, Default)]
pub struct HexGrid {
    /// All active bubbles in creation order.
    bubbles: BTreeMap<BubbleId, Bubble>,
    /// Map from hex coordinates to the bubble holding that cell.
    cells: HashMap<HexCoord, BubbleId>,
    next_id: u32,
    /// Bubble radius used to place new bubbles.
    radius: f32,
    /// The playable area bounds.
    pub bounds: GridBounds,
}

impl HexGrid {
    /// Create a new empty grid.
    pub fn new(radius: f32, bounds: GridBounds) -> Self {
        Self {
            radius,
            bounds,
            ..default()
        }
    }

    /// Check if a cell is occupied.
    pub fn is_occupied(&self, coord: HexCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Get the bubble holding a cell, if any.
    pub fn get(&self, coord: HexCoord) -> Option<&Bubble> {
        self.cells.get(&coord).and_then(|id| self.bubbles.get(id))
    }

    pub fn bubble(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(&id)
    }

    pub fn bubble_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.get_mut(&id)
    }

    /// Place a new resting bubble.
    pub fn insert(&mut self, coord: HexCoord, kind: BubbleKind) -> Result<BubbleId, SimError> {
        if self.is_occupied(coord) {
            return Err(SimError::CellOccupied(coord));
        }

        let id = BubbleId(self.next_id);
        self.next_id += 1;
        self.bubbles
            .insert(id, Bubble::new(id, kind, coord, self.radius));
        self.cells.insert(coord, id);
        Ok(id)
    }

    /// Remove a bubble from the simulation.
    ///
    /// Returns the bubble that was removed, if any.
    pub fn remove(&mut self, id: BubbleId) -> Option<Bubble> {
        let bubble = self.bubbles.remove(&id)?;
        if self.cells.get(&bubble.coord) == Some(&id) {
            self.cells.remove(&bubble.coord);
        }
        Some(bubble)
    }

    /// Drop a bubble's cell from the index while keeping it simulated.
    pub fn detach(&mut self, id: BubbleId) -> Result<(), SimError> {
        let bubble = self.bubbles.get(&id).ok_or(SimError::UnknownBubble(id))?;
        if self.cells.get(&bubble.coord) == Some(&id) {
            self.cells.remove(&bubble.coord);
        }
        Ok(())
    }

    /// Get the number of active bubbles.
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// True when no bubble is left in any state.
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Iterate over all active bubbles, falling ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bubble> {
        self.bubbles.values_mut()
    }

    /// Iterate over the bubbles that hold a cell, in creation order.
    pub fn indexed(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles
            .values()
            .filter(|b| self.cells.get(&b.coord) == Some(&b.id))
    }

    /// Get all occupied coordinates.
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.cells.keys().copied()
    }

    /// Occupied neighbor cells of `coord`.
    pub fn neighbor_bubbles(&self, coord: HexCoord) -> Vec<&Bubble> {
        coord
            .neighbors()
            .into_iter()
            .filter_map(|n| self.get(n))
            .collect()
    }

    /// Find empty in-bounds neighbors of a cell.
    pub fn empty_neighbors(&self, coord: HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.bounds.contains(*n) && !self.is_occupied(*n))
            .collect()
    }

    /// Palette colors of resting bubbles, in palette order.
    ///
    /// Stones, and bubbles already exploding or falling, do not count.
    pub fn colors_in_play(&self) -> Vec<BubbleColor> {
        let present: HashSet<BubbleColor> = self
            .indexed()
            .filter(|b| b.is_resting())
            .filter_map(|b| b.kind.color())
            .collect();

        BubbleColor::ALL
            .into_iter()
            .filter(|c| present.contains(c))
            .collect()
    }

    /// First indexed bubble (creation order) within `reach` of `pos`.
    pub fn first_contact(&self, pos: Vec2, reach: f32) -> Option<&Bubble> {
        self.indexed().find(|b| b.position.distance(pos) < reach)
    }

    /// Pick the cell a projectile at `pos` attaches to.
    ///
    /// The projectile snaps to the empty neighbor, nearest to `pos`, of the
    /// first bubble it overlaps. Without an overlap, or when that bubble is
    /// boxed in, the position is rounded to the grid instead.
    pub fn resolve_snap_position(&self, pos: Vec2, reach: f32) -> Option<HexCoord> {
        if let Some(contact) = self.first_contact(pos, reach) {
            let nearest = self
                .empty_neighbors(contact.coord)
                .into_iter()
                .map(|coord| (coord, coord.to_pixel(self.radius).distance(pos)))
                // `min_by` keeps the first of equally near cells.
                .min_by(|a, b| a.1.total_cmp(&b.1));

            if let Some((coord, _)) = nearest {
                return Some(coord);
            }
            debug!(
                "Bubble at {} has no empty neighbor, rounding {:?} to the grid",
                contact.coord, pos
            );
        }

        let target = self
            .bounds
            .clamp(HexCoord::from_pixel(pos, self.radius));
        self.closest_empty_cell(target)
    }

    /// Find the closest empty in-bounds cell to `target`.
    ///
    /// Searches neighbors in expanding rings when `target` itself is taken.
    pub fn closest_empty_cell(&self, target: HexCoord) -> Option<HexCoord> {
        let mut checked = HashSet::new();
        let mut to_check = VecDeque::from([target]);

        while let Some(coord) = to_check.pop_front() {
            if !checked.insert(coord) {
                continue;
            }

            if self.bounds.contains(coord) && !self.is_occupied(coord) {
                return Some(coord);
            }

            for neighbor in coord.neighbors() {
                if self.bounds.contains(neighbor) && !checked.contains(&neighbor) {
                    to_check.push_back(neighbor);
                }
            }

            // Safety limit to prevent runaway searches
            if checked.len() > MAX_RING_SEARCH {
                break;
            }
        }

        None
    }
}
