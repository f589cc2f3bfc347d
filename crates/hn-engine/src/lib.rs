//! The battle engine — arena orchestration, per-epoch resolution pipeline.
//!
//! All mutable battle logic lives here. Pure data tables live in `hn-data`.

pub mod arena;
pub mod combat;
pub mod death;
pub mod error;
pub mod hex_grid;
pub mod items;
pub mod movement;
pub mod prediction;
pub mod sponsor;
pub mod storm;

pub use arena::{Arena, RosterEntry};
pub use error::{ArenaError, GridError};
