//! Error kinds. Accessor-level errors (`GridError`) are internal and
//! should never escape the engine — if one does, the Arena turns it into
//! an `EngineBug`. `ArenaError` is the only error type the public API
//! returns.

use hn_types::{BattleState, HexCoord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds(HexCoord),
    TileOccupied(HexCoord),
    TileEmpty(HexCoord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// Caller invoked an operation outside the state it requires.
    InvalidState { expected: &'static str, actual: BattleState },
    /// An internal invariant failed — HP out of bounds, occupancy
    /// disagreement, an accessor error that should have been impossible.
    /// This aborts the epoch; it is never silently recovered.
    EngineBug { context: String },
}

impl ArenaError {
    pub fn engine_bug(context: impl Into<String>) -> Self {
        Self::EngineBug { context: context.into() }
    }
}

impl From<GridError> for ArenaError {
    fn from(e: GridError) -> Self {
        ArenaError::engine_bug(format!("grid accessor error escaped to arena: {e:?}"))
    }
}
