//! Death — detect HP<=0 transitions, attribute cause, order elimination.
//!
//! Death detection compares HP at end-of-epoch against the alive set
//! captured at the *start* of the epoch; HP manipulation earlier in the
//! pipeline never touches the `alive` flag itself, so there is no window
//! where a half-dead agent's state is read inconsistently.

use std::collections::BTreeMap;

use hn_types::ids::AgentId;
use hn_types::{Agent, AgentDeath, DeathCause};

use crate::hex_grid::HexGrid;

/// Per-victim damage-source totals accumulated across this epoch's
/// pipeline, read once by `resolve_deaths`.
#[derive(Debug, Clone, Default)]
pub struct DamageLedger {
    pub combat: BTreeMap<AgentId, u32>,
    pub prediction: u32,
    pub storm: u32,
    pub bleed: u32,
    pub trap: u32,
}

impl DamageLedger {
    pub fn total(&self) -> u32 {
        self.combat.values().sum::<u32>() + self.prediction + self.storm + self.bleed + self.trap
    }

    pub fn combat_total(&self) -> u32 {
        self.combat.values().sum()
    }

    pub fn top_attacker(&self) -> Option<AgentId> {
        self.combat.iter().max_by_key(|(&id, &dmg)| (dmg, std::cmp::Reverse(id))).map(|(&id, _)| id)
    }
}

fn majority_cause(ledger: &DamageLedger) -> DeathCause {
    let total = ledger.total();
    if total == 0 {
        return DeathCause::Multi;
    }
    let half = total as f64 / 2.0;
    let sources: [(u32, DeathCause); 5] = [
        (ledger.combat_total(), DeathCause::Combat),
        (ledger.prediction, DeathCause::Prediction),
        (ledger.storm, DeathCause::Storm),
        (ledger.bleed, DeathCause::Bleed),
        (ledger.trap, DeathCause::Trap),
    ];
    for (amount, cause) in sources {
        if (amount as f64) > half {
            return cause;
        }
    }
    DeathCause::Multi
}

/// Scan for agents that were alive at epoch start but have HP <= 0 now,
/// in ascending agent-id order (the tie-break for same-epoch deaths).
pub fn resolve_deaths(
    grid: &mut HexGrid,
    agents: &mut [Agent],
    alive_at_epoch_start: &[AgentId],
    ledgers: &BTreeMap<AgentId, DamageLedger>,
    epoch: u32,
) -> Vec<AgentDeath> {
    let mut newly_dead: Vec<AgentId> = alive_at_epoch_start
        .iter()
        .copied()
        .filter(|id| agents.iter().any(|a| a.id == *id && a.hp == 0 && a.alive))
        .collect();
    newly_dead.sort();

    let mut out = Vec::new();
    for id in newly_dead {
        let empty_ledger = DamageLedger::default();
        let ledger = ledgers.get(&id).unwrap_or(&empty_ledger);
        let cause = majority_cause(ledger);
        let killer_id = match cause {
            DeathCause::Combat | DeathCause::Multi => ledger.top_attacker(),
            _ => None,
        };

        let (name, final_hp, position) = {
            let agent = agents.iter().find(|a| a.id == id).unwrap();
            (agent.name.clone(), agent.hp, agent.position)
        };

        if let Some(agent) = agents.iter_mut().find(|a| a.id == id) {
            agent.alive = false;
        }
        let _ = grid.clear(position);

        if let Some(killer_id) = killer_id {
            if let Some(killer) = agents.iter_mut().find(|a| a.id == killer_id) {
                killer.kills += 1;
            }
        }

        out.push(AgentDeath { agent_id: id, agent_name: name, cause, killer_id, epoch, final_hp });
    }
    out
}
