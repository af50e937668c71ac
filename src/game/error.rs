//! Invariant violations raised by the simulation core.
//!
//! None of these are recoverable user errors: a correct session never
//! produces them. They are returned instead of panicking so the caller can
//! log the bug and keep the frame loop alive.

use std::fmt;

use super::{bubble::BubbleId, hex::HexCoord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Tried to place a bubble in a cell that already holds one.
    CellOccupied(HexCoord),
    /// A lifecycle transition was requested from the wrong state.
    InvalidTransition {
        id: BubbleId,
        from: &'static str,
        to: &'static str,
    },
    /// The bubble was already removed from the simulation.
    UnknownBubble(BubbleId),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::CellOccupied(coord) => write!(f, "cell {coord} is already occupied"),
            SimError::InvalidTransition { id, from, to } => {
                write!(f, "bubble {id} cannot go from {from} to {to}")
            }
            SimError::UnknownBubble(id) => write!(f, "bubble {id} is not in the simulation"),
        }
    }
}

impl std::error::Error for SimError {}
