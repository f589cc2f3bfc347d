//! Per-agent, per-epoch intent — the input the engine consumes from the
//! intent-provider collaborator.

use serde::{Deserialize, Serialize};

use crate::enums::{Asset, PredictionDirection};
use crate::hex::MoveVector;
use crate::ids::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionIntent {
    pub asset: Asset,
    pub direction: PredictionDirection,
    /// Raw requested stake percent; the Prediction subsystem clamps this
    /// to `[5, 50]` before use.
    pub stake_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackIntent {
    pub target_id: AgentId,
    pub stake: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllianceProposal {
    pub partner_id: AgentId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub agent_id: AgentId,
    pub predict: PredictionIntent,
    /// Mutually exclusive with `defend`: an intent requests attack, or
    /// defend, or neither, never both.
    pub attack: Option<AttackIntent>,
    pub defend: bool,
    pub movement: MoveVector,
    pub alliance_proposal: Option<AllianceProposal>,
    pub reasoning: String,
}

impl Intent {
    /// The fallback intent the missing-intent contract in §6 mandates:
    /// `{predict: {ETH, UP, 5}, defend: false, move: Hold}`.
    pub fn default_for(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            predict: PredictionIntent {
                asset: Asset::Eth,
                direction: PredictionDirection::Up,
                stake_percent: 5.0,
            },
            attack: None,
            defend: false,
            movement: MoveVector::Hold,
            alliance_proposal: None,
            reasoning: String::new(),
        }
    }

    /// `true` when the attack-or-defend mutual exclusion is violated. The
    /// engine treats this as `InvalidInput`: it drops the attack and
    /// keeps the defend, recording the reason rather than aborting.
    pub fn violates_attack_defend_exclusion(&self) -> bool {
        self.attack.is_some() && self.defend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_intent_matches_missing_intent_contract() {
        let intent = Intent::default_for(AgentId::new(3));
        assert_eq!(intent.predict.asset, Asset::Eth);
        assert_eq!(intent.predict.direction, PredictionDirection::Up);
        assert_eq!(intent.predict.stake_percent, 5.0);
        assert!(!intent.defend);
        assert_eq!(intent.movement, MoveVector::Hold);
    }

    #[test]
    fn attack_and_defend_together_is_flagged() {
        let mut intent = Intent::default_for(AgentId::new(1));
        intent.attack = Some(AttackIntent { target_id: AgentId::new(2), stake: 10.0 });
        intent.defend = true;
        assert!(intent.violates_attack_defend_exclusion());
    }
}
