//! The event vocabulary — a single discriminated union, for fan-out to
//! whatever transport an outer collaborator chooses. The engine only
//! ever produces this in-memory enum; wire framing is someone else's job.

use serde::{Deserialize, Serialize};

use crate::enums::{AllianceEventType, Asset, BattlePhase, DeathCause, ItemType, MoveFailureReason, PredictionDirection, Skill};
use crate::hex::HexCoord;
use crate::ids::{AgentId, BattleId, ItemId};
use crate::market::SponsorEffect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum Event {
    EpochStart { battle_id: BattleId, epoch: u32 },

    AgentMoved {
        battle_id: BattleId,
        epoch: u32,
        agent_id: AgentId,
        from: HexCoord,
        to: HexCoord,
        success: bool,
        reason: Option<MoveFailureReason>,
    },

    ItemSpawned { battle_id: BattleId, epoch: u32, item_id: ItemId, item_type: ItemType, position: HexCoord },

    ItemPickedUp { battle_id: BattleId, epoch: u32, agent_id: AgentId, item_id: ItemId, item_type: ItemType },

    TrapTriggered { battle_id: BattleId, epoch: u32, agent_id: AgentId, item_id: ItemId, damage: u32 },

    AgentAction { battle_id: BattleId, epoch: u32, agent_id: AgentId, reasoning: String },

    PredictionResult {
        battle_id: BattleId,
        epoch: u32,
        agent_id: AgentId,
        asset: Asset,
        direction: PredictionDirection,
        actual_change_pct: f64,
        correct: bool,
        hp_change: i64,
        hp_after: u32,
    },

    CombatResult {
        battle_id: BattleId,
        epoch: u32,
        attacker_id: AgentId,
        defender_id: AgentId,
        attack_stake: f64,
        damage: u32,
        blocked: bool,
        defended: bool,
        betrayal: bool,
        hp_transfer: u32,
    },

    AllianceEvent {
        battle_id: BattleId,
        epoch: u32,
        event_type: AllianceEventType,
        agent_a: AgentId,
        agent_b: AgentId,
    },

    SkillActivation { battle_id: BattleId, epoch: u32, agent_id: AgentId, skill: Skill },

    StormDamage { battle_id: BattleId, epoch: u32, agent_id: AgentId, damage: u32 },

    SponsorBoost { battle_id: BattleId, epoch: u32, agent_id: AgentId, effect: SponsorEffect },

    AgentDeath {
        battle_id: BattleId,
        epoch: u32,
        agent_id: AgentId,
        agent_name: String,
        cause: DeathCause,
        killer_id: Option<AgentId>,
        final_hp: u32,
    },

    PhaseChange { battle_id: BattleId, epoch: u32, from: BattlePhase, to: BattlePhase },

    EpochEnd { battle_id: BattleId, epoch: u32, is_terminal: bool },

    BattleEnd { battle_id: BattleId, epoch: u32, winner: Option<AgentId> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_tag_round_trips() {
        let ev = Event::PhaseChange {
            battle_id: BattleId::new(1),
            epoch: 10,
            from: BattlePhase::Loot,
            to: BattlePhase::Hunt,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"phase_change\""));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
