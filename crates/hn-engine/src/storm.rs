//! Storm — zone shrink per phase, attrition to agents caught on lethal
//! tiles.

use hn_data::classes::STORM_DAMAGE_FRACTION;
use hn_types::{Agent, BattlePhase, StormDamageResult};

use crate::hex_grid::HexGrid;

/// Apply storm damage for this phase. A tile is lethal when its stored
/// `storm_level >= S` and `S > 0`, where `S` is `phase.lethal_storm_level()`.
/// Storm tiles persist — they are never consumed.
pub fn apply_storm(grid: &HexGrid, agents: &mut [Agent], phase: BattlePhase) -> Vec<StormDamageResult> {
    let s = phase.lethal_storm_level();
    if s == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for agent in agents.iter_mut().filter(|a| a.alive) {
        let Ok(tile) = grid.tile(agent.position) else { continue };
        if tile.storm_level >= s {
            let damage = (STORM_DAMAGE_FRACTION * agent.max_hp as f64) as i64;
            agent.apply_hp_delta(-damage);
            out.push(StormDamageResult { agent_id: agent.id, damage: damage.unsigned_abs() as u32 });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::ids::AgentId;
    use hn_types::{Class, HexCoord};

    #[test]
    fn loot_phase_deals_no_storm_damage() {
        let grid = HexGrid::new();
        let mut agents = vec![Agent::new(AgentId::new(1), "a", Class::Warrior, HexCoord::new(2, -2))];
        let out = apply_storm(&grid, &mut agents, BattlePhase::Loot);
        assert!(out.is_empty());
    }

    #[test]
    fn final_stand_kills_ring_one_stragglers() {
        let grid = HexGrid::new();
        let mut agents = vec![
            Agent::new(AgentId::new(1), "a", Class::Warrior, HexCoord::new(1, -1)),
            Agent::new(AgentId::new(2), "b", Class::Survivor, HexCoord::new(-1, 1)),
        ];
        agents[0].hp = 30;
        agents[1].hp = 30;
        let out = apply_storm(&grid, &mut agents, BattlePhase::FinalStand);
        assert_eq!(out.len(), 2);
        for a in &agents {
            assert_eq!(a.hp, 0);
        }
    }

    #[test]
    fn cornucopia_never_lethal() {
        let grid = HexGrid::new();
        let mut agents = vec![Agent::new(AgentId::new(1), "a", Class::Warrior, HexCoord::new(0, 0))];
        let out = apply_storm(&grid, &mut agents, BattlePhase::FinalStand);
        assert!(out.is_empty());
    }
}
