//! Combat — the hardest subsystem. Resolves every attack intent with
//! defense, alliances, skill modifiers, and betrayal.

use std::collections::{BTreeMap, BTreeSet};

use hn_data::classes::{
    base_attack_bonus, stake_multiplier, DEFEND_COST_FRACTION, RECKLESS_SELF_DAMAGE_FRACTION,
};
use hn_types::ids::AgentId;
use hn_types::{Agent, AllianceEventType, BuffType, Class, CombatResult, HexCoord, Intent, RngState, Skill, SponsorEffects};

use crate::hex_grid::HexGrid;

/// Unordered pair identifying one potential alliance, normalized so the
/// lower id is always first.
pub type AlliancePair = (AgentId, AgentId);

pub fn alliance_pair(a: AgentId, b: AgentId) -> AlliancePair {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllianceBreak {
    pub agent_a: AgentId,
    pub agent_b: AgentId,
    pub event_type: AllianceEventType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillUse {
    pub agent_id: AgentId,
    pub skill: Skill,
}

struct ValidAttack {
    attacker: AgentId,
    target: AgentId,
    stake: f64,
}

fn collect_valid_attacks(
    agents: &[Agent],
    grid: &HexGrid,
    intents: &BTreeMap<AgentId, Intent>,
) -> Vec<ValidAttack> {
    let position_of = |id: AgentId| -> Option<HexCoord> {
        agents.iter().find(|a| a.id == id).map(|a| a.position)
    };
    let is_alive = |id: AgentId| -> bool { agents.iter().any(|a| a.id == id && a.alive) };

    let mut out = Vec::new();
    for agent in agents.iter().filter(|a| a.alive) {
        let Some(intent) = intents.get(&agent.id) else { continue };
        let Some(attack) = intent.attack else { continue };
        if intent.defend {
            continue; // InvalidInput: attack+defend together — drop the attack, keep the defend.
        }
        if !is_alive(attack.target_id) {
            continue; // InvalidInput: dead/nonexistent target — drop silently.
        }
        let (Some(a_pos), Some(t_pos)) = (position_of(agent.id), position_of(attack.target_id)) else {
            continue;
        };
        if a_pos.distance(t_pos) > 1 {
            continue; // InvalidInput: out of range — drop silently.
        }
        out.push(ValidAttack { attacker: agent.id, target: attack.target_id, stake: attack.stake });
    }
    out
}

/// Resolve all attack intents for this epoch.
///
/// Defenders are visited in ascending id order, and within a defender's
/// group attackers are visited in ascending id order — this is both the
/// "lower attackerId first" shield tie-break rule and the overall
/// deterministic resolution order the epoch pipeline requires.
pub fn resolve_combat(
    agents: &mut [Agent],
    grid: &HexGrid,
    intents: &BTreeMap<AgentId, Intent>,
    sponsor_effects: &SponsorEffects,
    alliances: &mut BTreeSet<AlliancePair>,
    rng: &mut RngState,
) -> (Vec<CombatResult>, Vec<AllianceBreak>, Vec<SkillUse>) {
    let valid_attacks = collect_valid_attacks(agents, grid, intents);

    let mut by_defender: BTreeMap<AgentId, Vec<ValidAttack>> = BTreeMap::new();
    for attack in valid_attacks {
        by_defender.entry(attack.target).or_default().push(attack);
    }
    for group in by_defender.values_mut() {
        group.sort_by_key(|a| a.attacker);
    }

    let mut results = Vec::new();
    let mut alliance_events = Vec::new();
    let mut skill_uses = Vec::new();
    let mut defend_cost_charged: BTreeSet<AgentId> = BTreeSet::new();
    let mut fortify_used: BTreeSet<AgentId> = BTreeSet::new();

    for (&defender_id, group) in by_defender.iter() {
        let defender_snapshot = agents.iter().find(|a| a.id == defender_id).unwrap().clone();
        let defender_sponsor = sponsor_effects.get(&defender_id).copied().unwrap_or_default();
        let wants_to_defend = intents.get(&defender_id).map(|i| i.defend).unwrap_or(false);
        let is_defending = wants_to_defend || defender_sponsor.free_defend;
        let has_shield = defender_snapshot.has_buff(BuffType::ShieldBoost);

        for (idx, attack) in group.iter().enumerate() {
            let attacker_snapshot = agents.iter().find(|a| a.id == attack.attacker).unwrap().clone();

            // RECKLESS: auto-pick when this attacker's target matches its
            // previous 2+ consecutive epochs' target.
            let streak = match attacker_snapshot.last_attack_target {
                Some((prev_target, prev_count)) if prev_target == attack.target => prev_count + 1,
                _ => 1,
            };
            let reckless = attacker_snapshot.class == Class::Warrior && streak >= 2;

            let weapon_bonus = attacker_snapshot.buff_magnitude_total(BuffType::WeaponBoost);
            let sponsor_bonus = sponsor_effects.get(&attack.attacker).map(|s| s.attack_bonus).unwrap_or(0.0);
            let class_bonus = base_attack_bonus(attacker_snapshot.class);

            let effective_stake = attack.stake * stake_multiplier(attacker_snapshot.class);
            if attacker_snapshot.class == Class::Gambler {
                skill_uses.push(SkillUse { agent_id: attacker_snapshot.id, skill: Skill::AllIn });
            }

            let mut raw_damage =
                (effective_stake.floor()) * (1.0 + weapon_bonus + sponsor_bonus + class_bonus);

            let is_betrayal = alliances.remove(&alliance_pair(attack.attacker, defender_id));
            if is_betrayal {
                raw_damage *= 2.0;
                alliance_events.push(AllianceBreak {
                    agent_a: attack.attacker,
                    agent_b: defender_id,
                    event_type: AllianceEventType::Betrayed,
                });
            }

            let mut damage = raw_damage as i64;
            let mut blocked = false;
            // FORTIFY's deterministic precondition: the defender raised
            // its own defend flag AND holds an active SHIELD buff (the
            // skill reinforces worn gear, it isn't a bare class perk),
            // and hasn't already spent its one conversion this epoch.
            let fortified = !reckless
                && defender_snapshot.class == Class::Survivor
                && wants_to_defend
                && has_shield
                && !fortify_used.contains(&defender_id);

            if fortified {
                blocked = true;
                fortify_used.insert(defender_id);
                skill_uses.push(SkillUse { agent_id: defender_id, skill: Skill::Fortify });
            } else if is_defending && !reckless {
                if has_shield {
                    blocked = true;
                } else if idx == 0 {
                    blocked = true;
                }
            }

            if is_defending && !defend_cost_charged.contains(&defender_id) {
                defend_cost_charged.insert(defender_id);
                if !defender_sponsor.free_defend && !fortified {
                    let cost = (DEFEND_COST_FRACTION * defender_snapshot.max_hp as f64) as i64;
                    if let Some(defender) = agents.iter_mut().find(|a| a.id == defender_id) {
                        defender.apply_hp_delta(-cost);
                    }
                }
            }

            if blocked {
                damage = 0;
            }
            let hp_transfer = damage.max(0) as u32;

            if reckless {
                skill_uses.push(SkillUse { agent_id: attack.attacker, skill: Skill::Reckless });
                let self_damage =
                    (RECKLESS_SELF_DAMAGE_FRACTION * attacker_snapshot.max_hp as f64) as i64;
                if let Some(attacker) = agents.iter_mut().find(|a| a.id == attack.attacker) {
                    attacker.apply_hp_delta(-self_damage);
                }
            }

            if damage > 0 {
                if let Some(defender) = agents.iter_mut().find(|a| a.id == defender_id) {
                    defender.apply_hp_delta(-damage);
                }
                if let Some(attacker) = agents.iter_mut().find(|a| a.id == attack.attacker) {
                    attacker.apply_hp_delta(damage);
                }
            }

            if let Some(attacker) = agents.iter_mut().find(|a| a.id == attack.attacker) {
                attacker.last_attack_target = Some((attack.target, streak));
            }

            results.push(CombatResult {
                attacker_id: attack.attacker,
                defender_id,
                attack_stake: attack.stake,
                damage: damage.max(0) as u32,
                blocked,
                defended: is_defending,
                betrayal: is_betrayal,
                hp_transfer,
            });
        }
    }

    (results, alliance_events, skill_uses)
}

/// The agent PARASITE's MIMIC skill copies next epoch: the attacker with
/// the highest total `hpTransfer` gained this epoch, ties broken by
/// lowest agent id. `None` when no attack landed.
pub fn most_successful_agent(results: &[CombatResult]) -> Option<AgentId> {
    let mut gained: BTreeMap<AgentId, u32> = BTreeMap::new();
    for r in results {
        *gained.entry(r.attacker_id).or_insert(0) += r.hp_transfer;
    }
    gained
        .into_iter()
        .max_by_key(|&(id, amount)| (amount, std::cmp::Reverse(id)))
        .map(|(id, _)| id)
}

/// Form a mutual alliance when two living agents both proposed each
/// other this epoch.
pub fn resolve_alliance_proposals(
    agents: &[Agent],
    intents: &BTreeMap<AgentId, Intent>,
    alliances: &mut BTreeSet<AlliancePair>,
) -> Vec<AllianceBreak> {
    let mut formed = Vec::new();
    for agent in agents.iter().filter(|a| a.alive) {
        let Some(intent) = intents.get(&agent.id) else { continue };
        let Some(proposal) = intent.alliance_proposal else { continue };
        if agent.id >= proposal.partner_id {
            continue; // only the lower id drives formation, to avoid double emission
        }
        let Some(partner_intent) = intents.get(&proposal.partner_id) else { continue };
        let mutual = partner_intent.alliance_proposal.map(|p| p.partner_id) == Some(agent.id);
        if mutual {
            let pair = alliance_pair(agent.id, proposal.partner_id);
            if alliances.insert(pair) {
                formed.push(AllianceBreak {
                    agent_a: pair.0,
                    agent_b: pair.1,
                    event_type: AllianceEventType::Formed,
                });
            }
        }
    }
    formed
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::{AttackIntent, Class};

    fn agent(id: u32, class: Class, pos: HexCoord) -> Agent {
        Agent::new(AgentId::new(id), format!("a{id}"), class, pos)
    }

    fn intent_attack(from: AgentId, target: AgentId, stake: f64) -> Intent {
        let mut i = Intent::default_for(from);
        i.attack = Some(AttackIntent { target_id: target, stake });
        i
    }

    fn intent_defend(id: AgentId) -> Intent {
        let mut i = Intent::default_for(id);
        i.defend = true;
        i
    }

    #[test]
    fn scenario_blocked_defend_then_lethal_followup() {
        let mut agents = vec![
            agent(1, Class::Warrior, HexCoord::new(0, 0)),
            agent(2, Class::Survivor, HexCoord::new(1, 0)),
        ];
        let grid = HexGrid::new();
        let mut alliances = BTreeSet::new();
        let mut rng = RngState::new(1);

        let mut intents = BTreeMap::new();
        intents.insert(AgentId::new(1), intent_attack(AgentId::new(1), AgentId::new(2), 600.0));
        intents.insert(AgentId::new(2), intent_defend(AgentId::new(2)));
        let (results, _, _) =
            resolve_combat(&mut agents, &grid, &intents, &SponsorEffects::new(), &mut alliances, &mut rng);

        assert!(results[0].blocked);
        assert_eq!(results[0].damage, 0);
        let survivor = agents.iter().find(|a| a.id == AgentId::new(2)).unwrap();
        assert_eq!(survivor.hp, 1000 - 30); // paid defend cost once
        let warrior = agents.iter().find(|a| a.id == AgentId::new(1)).unwrap();
        assert_eq!(warrior.hp, 1000);

        // Next epoch: W attacks again, S does not defend.
        let mut intents2 = BTreeMap::new();
        intents2.insert(AgentId::new(1), intent_attack(AgentId::new(1), AgentId::new(2), 800.0));
        let (results2, _, _) = resolve_combat(
            &mut agents,
            &grid,
            &intents2,
            &SponsorEffects::new(),
            &mut alliances,
            &mut rng,
        );
        assert_eq!(results2[0].damage, 1000);
        let survivor = agents.iter().find(|a| a.id == AgentId::new(2)).unwrap();
        assert_eq!(survivor.hp, 0);
        let warrior = agents.iter().find(|a| a.id == AgentId::new(1)).unwrap();
        assert_eq!(warrior.hp, 1000); // capped
    }

    #[test]
    fn betrayal_doubles_damage_and_dissolves_alliance() {
        let mut agents = vec![
            agent(1, Class::Survivor, HexCoord::new(0, 0)),
            agent(2, Class::Survivor, HexCoord::new(1, 0)),
        ];
        let grid = HexGrid::new();
        let mut alliances = BTreeSet::new();
        alliances.insert(alliance_pair(AgentId::new(1), AgentId::new(2)));
        let mut rng = RngState::new(1);

        let mut intents = BTreeMap::new();
        intents.insert(AgentId::new(1), intent_attack(AgentId::new(1), AgentId::new(2), 200.0));
        let (results, alliance_events, _) =
            resolve_combat(&mut agents, &grid, &intents, &SponsorEffects::new(), &mut alliances, &mut rng);

        assert!(results[0].betrayal);
        assert_eq!(results[0].damage, 400); // 200 base, doubled by betrayal
        assert!(alliances.is_empty());
        assert_eq!(alliance_events.len(), 1);
        assert_eq!(alliance_events[0].event_type, AllianceEventType::Betrayed);
    }

    #[test]
    fn second_attacker_without_shield_lands_unblocked() {
        let mut agents = vec![
            agent(1, Class::Warrior, HexCoord::new(0, 0)),
            agent(2, Class::Warrior, HexCoord::new(-1, 0)),
            agent(3, Class::Gambler, HexCoord::new(1, 0)),
        ];
        let grid = HexGrid::new();
        let mut alliances = BTreeSet::new();
        let mut rng = RngState::new(1);

        let mut intents = BTreeMap::new();
        intents.insert(AgentId::new(1), intent_attack(AgentId::new(1), AgentId::new(3), 100.0));
        intents.insert(AgentId::new(2), intent_attack(AgentId::new(2), AgentId::new(3), 100.0));
        intents.insert(AgentId::new(3), intent_defend(AgentId::new(3)));

        let (results, _, _) =
            resolve_combat(&mut agents, &grid, &intents, &SponsorEffects::new(), &mut alliances, &mut rng);

        assert!(results[0].blocked); // attacker 1, first in order
        assert!(!results[1].blocked); // attacker 2, lands since no shield
    }

    #[test]
    fn most_successful_agent_picks_highest_hp_transfer() {
        let results = vec![
            CombatResult {
                attacker_id: AgentId::new(1),
                defender_id: AgentId::new(3),
                attack_stake: 100.0,
                damage: 100,
                blocked: false,
                defended: false,
                betrayal: false,
                hp_transfer: 100,
            },
            CombatResult {
                attacker_id: AgentId::new(2),
                defender_id: AgentId::new(3),
                attack_stake: 50.0,
                damage: 50,
                blocked: false,
                defended: false,
                betrayal: false,
                hp_transfer: 50,
            },
        ];
        assert_eq!(most_successful_agent(&results), Some(AgentId::new(1)));
    }

    #[test]
    fn most_successful_agent_is_none_without_combat() {
        assert_eq!(most_successful_agent(&[]), None);
    }
}
