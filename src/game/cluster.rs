//! Cluster detection - finding and popping matching bubbles.
//!
//! Uses flood fill (BFS) to find connected groups of same-colored bubbles.
//! When a cluster of 3+ is found, or a bomb lands, the bubbles are scheduled
//! to explode. Bombs caught in the explosion blast all their neighbors one
//! wave later, which can chain into further bombs.

use std::collections::{HashSet, VecDeque};

use bevy::prelude::*;

use super::{
    bubble::BubbleId,
    grid::HexGrid,
    hex::HexCoord,
};

/// Minimum cluster size to pop (match-3).
pub const MIN_CLUSTER_SIZE: usize = 3;

/// Ticks between a bomb going off and its blast reaching the neighbors.
pub const CHAIN_DELAY: u32 = 5;

/// Points awarded per bubble in the triggering match.
pub const POINTS_PER_BUBBLE: u32 = 10;

/// One bubble scheduled to explode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detonation {
    pub id: BubbleId,
    pub coord: HexCoord,
    /// Ticks before the pop animation starts.
    pub delay: u32,
}

/// Everything a landed bubble sets off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplosionPlan {
    /// Scheduled explosions, trigger first, then blast waves in order.
    pub detonations: Vec<Detonation>,
    /// Number of bubbles set off by the trigger itself (chain victims excluded).
    pub matched: usize,
}

impl ExplosionPlan {
    pub fn is_empty(&self) -> bool {
        self.detonations.is_empty()
    }

    /// Score for the triggering match.
    pub fn points(&self) -> u32 {
        self.matched as u32 * POINTS_PER_BUBBLE
    }
}

/// Find all connected resting bubbles matching the color of the bubble at
/// `start` using flood fill (BFS).
///
/// Stones and differently colored bubbles never join. Returns an empty group
/// if `start` is empty or not resting.
pub fn find_group(grid: &HexGrid, start: HexCoord) -> Vec<BubbleId> {
    let Some(origin) = grid.get(start).filter(|b| b.is_resting()) else {
        return Vec::new();
    };
    if origin.kind.is_stone() {
        return vec![origin.id];
    }

    let target = origin.kind;
    let mut group = vec![origin.id];
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(coord) = queue.pop_front() {
        for neighbor in grid.neighbor_bubbles(coord) {
            if neighbor.is_resting()
                && neighbor.kind.matches(target)
                && visited.insert(neighbor.coord)
            {
                group.push(neighbor.id);
                queue.push_back(neighbor.coord);
            }
        }
    }

    group
}

/// Work out which bubbles explode, and when, after a bubble lands at `placed`.
///
/// Pops trigger on a same-color group of [`MIN_CLUSTER_SIZE`] or more, or
/// whenever the placed bubble is a bomb. Bomb blasts are color-agnostic and
/// reach every resting neighbor [`CHAIN_DELAY`] ticks after the bomb goes off.
/// No bubble is ever scheduled twice, so the chain terminates.
pub fn resolve(grid: &HexGrid, placed: HexCoord) -> ExplosionPlan {
    let Some(origin) = grid.get(placed).filter(|b| b.is_resting()) else {
        return ExplosionPlan::default();
    };

    let group = find_group(grid, placed);
    let trigger = if group.len() >= MIN_CLUSTER_SIZE {
        group
    } else if origin.kind.is_bomb() {
        vec![origin.id]
    } else {
        return ExplosionPlan::default();
    };

    let mut plan = ExplosionPlan {
        detonations: Vec::new(),
        matched: trigger.len(),
    };
    let mut scheduled: HashSet<BubbleId> = HashSet::new();
    let mut bombs: VecDeque<(HexCoord, u32)> = VecDeque::new();

    for id in trigger {
        let Some(bubble) = grid.bubble(id) else {
            continue;
        };
        scheduled.insert(id);
        plan.detonations.push(Detonation {
            id,
            coord: bubble.coord,
            delay: 0,
        });
        if bubble.kind.is_bomb() {
            bombs.push_back((bubble.coord, CHAIN_DELAY));
        }
    }

    // Chain reaction: each bomb blasts its whole neighborhood, one wave later.
    while let Some((bomb, delay)) = bombs.pop_front() {
        for neighbor in grid.neighbor_bubbles(bomb) {
            if !neighbor.is_resting() || !scheduled.insert(neighbor.id) {
                continue;
            }
            plan.detonations.push(Detonation {
                id: neighbor.id,
                coord: neighbor.coord,
                delay,
            });
            if neighbor.kind.is_bomb() {
                bombs.push_back((neighbor.coord, delay + CHAIN_DELAY));
            }
        }
    }

    debug!(
        "Landing at {} sets off {} bubbles ({} matched)",
        placed,
        plan.detonations.len(),
        plan.matched
    );

    plan
}
