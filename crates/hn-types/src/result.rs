//! Typed per-epoch sub-results, the agent snapshot, and the two objects
//! that hand off to outer collaborators: `EpochResult` and `BattleRecord`.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::enums::{Asset, BattlePhase, DeathCause, ItemType, MoveFailureReason, PredictionDirection};
use crate::event::Event;
use crate::hex::HexCoord;
use crate::ids::{AgentId, ItemId};
use crate::market::MarketSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub agent_id: AgentId,
    pub from: HexCoord,
    pub to: HexCoord,
    pub success: bool,
    pub reason: Option<MoveFailureReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPickedUp {
    pub agent_id: AgentId,
    pub item_id: ItemId,
    pub item_type: ItemType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapTriggered {
    pub agent_id: AgentId,
    pub item_id: ItemId,
    pub damage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSpawned {
    pub item_id: ItemId,
    pub item_type: ItemType,
    pub position: HexCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub agent_id: AgentId,
    pub asset: Asset,
    pub direction: PredictionDirection,
    pub actual_change_pct: f64,
    pub correct: bool,
    pub hp_change: i64,
    pub hp_after: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub attacker_id: AgentId,
    pub defender_id: AgentId,
    pub attack_stake: f64,
    pub damage: u32,
    pub blocked: bool,
    pub defended: bool,
    pub betrayal: bool,
    pub hp_transfer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StormDamageResult {
    pub agent_id: AgentId,
    pub damage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDeath {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub cause: DeathCause,
    pub killer_id: Option<AgentId>,
    pub epoch: u32,
    pub final_hp: u32,
}

/// The single handoff object for one epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochResult {
    pub epoch: u32,
    pub phase: BattlePhase,
    pub market: MarketSnapshot,
    pub move_results: Vec<MoveResult>,
    pub trap_triggers: Vec<TrapTriggered>,
    pub item_pickups: Vec<ItemPickedUp>,
    pub prediction_results: Vec<PredictionResult>,
    pub combat_results: Vec<CombatResult>,
    pub storm_damage: Vec<StormDamageResult>,
    pub deaths: Vec<AgentDeath>,
    pub item_spawns: Vec<ItemSpawned>,
    pub events: Vec<Event>,
    pub agents: Vec<Agent>,
    pub is_terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub battle_id: crate::ids::BattleId,
    pub roster: Vec<Agent>,
    pub winner_id: Option<AgentId>,
    pub epochs_survived: u32,
    pub eliminations: Vec<AgentDeath>,
    pub started_at: u64,
    pub ended_at: u64,
}
