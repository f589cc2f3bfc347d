//! Core types for the HungerNads battle engine.
//!
//! Everything here is inert data — ids, coordinates, enums, and the wire
//! records the engine produces. No game logic lives in this crate.

pub mod agent;
pub mod enums;
pub mod event;
pub mod hex;
pub mod ids;
pub mod intent;
pub mod item;
pub mod market;
pub mod result;
pub mod rng;

pub use agent::Agent;
pub use enums::{
    AllianceEventType, Asset, BattlePhase, BattleState, BuffType, Class, DeathCause,
    ItemType, MoveFailureReason, PredictionDirection, Skill, TileType,
};
pub use event::Event;
pub use hex::{HexCoord, HexDirection, MoveVector, ARENA_COORDS};
pub use ids::{AgentId, BattleId, BuffId, ItemId};
pub use intent::{AllianceProposal, AttackIntent, Intent, PredictionIntent};
pub use item::{Buff, Item};
pub use market::{MarketSnapshot, SponsorEffect, SponsorEffects};
pub use result::{
    AgentDeath, BattleRecord, CombatResult, EpochResult, ItemPickedUp, ItemSpawned, MoveResult,
    PredictionResult, StormDamageResult, TrapTriggered,
};
pub use rng::RngState;
