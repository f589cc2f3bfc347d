//! Arena — the owning orchestrator. Drives the fixed per-epoch pipeline
//! and owns the full battle state; every other component receives its
//! pieces by borrowed reference scoped to a single `process_epoch` call.

use std::collections::{BTreeMap, BTreeSet};

use hn_data::classes::BLEED_FRACTION;
use hn_data::PhaseConfig;
use hn_types::ids::{AgentId, BattleId, ItemId};
use hn_types::{
    Agent, AgentDeath, AllianceEventType, BattlePhase, BattleRecord, BattleState, Class,
    CombatResult, Event, HexCoord, Intent, Item, ItemType, MarketSnapshot, MoveResult, RngState,
    Skill, SponsorEffects,
};

use crate::combat::{self, AlliancePair};
use crate::death::{self, DamageLedger};
use crate::error::ArenaError;
use crate::hex_grid::HexGrid;
use crate::items;
use crate::movement;
use crate::storm;

/// One battle's full mutable state. One Arena = one battle = one logical
/// owner; `process_epoch` is synchronous and single-threaded with
/// respect to its own Arena.
pub struct Arena {
    pub battle_id: BattleId,
    pub state: BattleState,
    pub grid: HexGrid,
    pub agents: Vec<Agent>,
    pub items: Vec<Item>,
    pub epoch: u32,
    pub max_epochs: u32,
    pub phase: BattlePhase,
    pub phase_config: PhaseConfig,
    alliances: BTreeSet<AlliancePair>,
    previous_market: MarketSnapshot,
    last_death: Option<AgentId>,
    next_item_id: u32,
    next_buff_id: u32,
    started_at: u64,
    previous_intents: BTreeMap<AgentId, Intent>,
    previous_most_successful: Option<AgentId>,
    all_deaths: Vec<AgentDeath>,
}

/// One agent's spawn-time identity, before any HP is spent.
pub struct RosterEntry {
    pub id: AgentId,
    pub name: String,
    pub class: Class,
    pub position: HexCoord,
}

impl Arena {
    pub fn new(battle_id: BattleId, max_epochs: u32, started_at: u64) -> Self {
        Self {
            battle_id,
            state: BattleState::Pending,
            grid: HexGrid::new(),
            agents: Vec::new(),
            items: Vec::new(),
            epoch: 0,
            max_epochs,
            phase: BattlePhase::Loot,
            phase_config: PhaseConfig::standard(),
            alliances: BTreeSet::new(),
            previous_market: MarketSnapshot { eth: 0.0, btc: 0.0, sol: 0.0, mon: 0.0, timestamp: 0 },
            last_death: None,
            next_item_id: 0,
            next_buff_id: 0,
            started_at,
            previous_intents: BTreeMap::new(),
            previous_most_successful: None,
            all_deaths: Vec::new(),
        }
    }

    /// Place the initial roster on the grid. Must be called while
    /// `PENDING`.
    pub fn spawn_agents(&mut self, roster: Vec<RosterEntry>) -> Result<(), ArenaError> {
        self.require_state(BattleState::Pending, "spawn_agents")?;
        for entry in roster {
            self.grid.place(entry.id, entry.position).map_err(ArenaError::from)?;
            self.agents.push(Agent::new(entry.id, entry.name, entry.class, entry.position));
        }
        Ok(())
    }

    pub fn start_battle(&mut self) -> Result<(), ArenaError> {
        self.require_state(BattleState::Pending, "start_battle")?;
        self.state = BattleState::Active;
        Ok(())
    }

    fn require_state(&self, expected: BattleState, _op: &'static str) -> Result<(), ArenaError> {
        if self.state != expected {
            return Err(ArenaError::InvalidState { expected: state_label(expected), actual: self.state });
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        let alive = self.agents.iter().filter(|a| a.alive).count();
        alive <= 1 || self.epoch >= self.max_epochs
    }

    /// Highest HP wins; ties broken by kills, then lowest agent id. If no
    /// agent is alive, the last agent to die wins (mutual annihilation).
    pub fn current_winner(&self) -> Option<AgentId> {
        let alive: Vec<&Agent> = self.agents.iter().filter(|a| a.alive).collect();
        if alive.is_empty() {
            return self.last_death;
        }
        alive
            .into_iter()
            .max_by(|a, b| (a.hp, a.kills, std::cmp::Reverse(a.id)).cmp(&(b.hp, b.kills, std::cmp::Reverse(b.id))))
            .map(|a| a.id)
    }

    pub fn complete_battle(&mut self) -> Result<BattleRecord, ArenaError> {
        self.require_state(BattleState::Active, "complete_battle")?;
        self.state = BattleState::Completed;
        let winner_id = self.current_winner();
        Ok(BattleRecord {
            battle_id: self.battle_id,
            roster: self.agents.clone(),
            winner_id,
            epochs_survived: self.epoch,
            eliminations: self.all_deaths.clone(),
            started_at: self.started_at,
            ended_at: self.started_at,
        })
    }

    /// Advance the battle by exactly one epoch.
    pub fn process_epoch(
        &mut self,
        market: MarketSnapshot,
        mut intents: BTreeMap<AgentId, Intent>,
        sponsor_effects: SponsorEffects,
    ) -> Result<hn_types::EpochResult, ArenaError> {
        self.require_state(BattleState::Active, "process_epoch")?;

        let epoch = self.epoch + 1;
        self.epoch = epoch;

        // Missing-intent contract: every living agent gets exactly one
        // intent; a gap is filled with the documented default.
        for agent in self.agents.iter().filter(|a| a.alive) {
            intents.entry(agent.id).or_insert_with(|| Intent::default_for(agent.id));
        }

        let root_rng = RngState::for_epoch(self.battle_id.get(), epoch);
        let mut events = Vec::new();
        let mut skill_events: Vec<(AgentId, Skill)> = Vec::new();

        // PARASITE MIMIC: deterministic from the previous epoch's
        // snapshot — copy the most-successful agent's recorded intent
        // verbatim, re-keyed to the mimicking agent.
        if let Some(source_id) = self.previous_most_successful {
            if let Some(source_intent) = self.previous_intents.get(&source_id) {
                let mimicked = source_intent.clone();
                for agent in self.agents.iter().filter(|a| a.alive && a.class == Class::Parasite) {
                    let mut copy = mimicked.clone();
                    copy.agent_id = agent.id;
                    intents.insert(agent.id, copy);
                    skill_events.push((agent.id, Skill::Mimic));
                }
            }
        }
        for (agent_id, skill) in &skill_events {
            events.push(Event::SkillActivation { battle_id: self.battle_id, epoch, agent_id: *agent_id, skill: *skill });
        }
        let alive_at_epoch_start: Vec<AgentId> =
            self.agents.iter().filter(|a| a.alive).map(|a| a.id).collect();

        events.push(Event::EpochStart { battle_id: self.battle_id, epoch });

        // Record each living agent's resolved intent (post-MIMIC) and any
        // sponsor effect granted this epoch, both pass-through events for
        // outer collaborators.
        for agent in self.agents.iter().filter(|a| a.alive) {
            if let Some(intent) = intents.get(&agent.id) {
                events.push(Event::AgentAction {
                    battle_id: self.battle_id,
                    epoch,
                    agent_id: agent.id,
                    reasoning: intent.reasoning.clone(),
                });
            }
        }
        for (&agent_id, &effect) in sponsor_effects.iter() {
            events.push(Event::SponsorBoost { battle_id: self.battle_id, epoch, agent_id, effect });
            if effect.hp_boost != 0.0 {
                if let Some(agent) = self.agents.iter_mut().find(|a| a.id == agent_id && a.alive) {
                    agent.apply_hp_delta(effect.hp_boost as i64);
                }
            }
        }

        // Step 4: phase advance.
        let new_phase = self.phase_config.phase_for_epoch(epoch);
        if new_phase.ordinal() > self.phase.ordinal() {
            events.push(Event::PhaseChange { battle_id: self.battle_id, epoch, from: self.phase, to: new_phase });
            self.phase = new_phase;
        }

        // Step 5: movement.
        let move_vectors: BTreeMap<AgentId, hn_types::MoveVector> =
            intents.iter().map(|(&id, i)| (id, i.movement)).collect();
        let move_results: Vec<MoveResult> =
            movement::resolve_moves(&mut self.grid, &mut self.agents, &move_vectors);
        for m in &move_results {
            events.push(Event::AgentMoved {
                battle_id: self.battle_id,
                epoch,
                agent_id: m.agent_id,
                from: m.from,
                to: m.to,
                success: m.success,
                reason: m.reason,
            });
        }

        // Step 6: items — traps first, then pickups.
        let trap_triggers = items::resolve_traps(&mut self.grid, &mut self.agents, &mut self.items);
        for t in &trap_triggers {
            events.push(Event::TrapTriggered {
                battle_id: self.battle_id,
                epoch,
                agent_id: t.agent_id,
                item_id: t.item_id,
                damage: t.damage,
            });
        }
        let item_pickups =
            items::resolve_pickups(&mut self.grid, &mut self.agents, &mut self.items, &mut self.next_buff_id);
        for p in &item_pickups {
            events.push(Event::ItemPickedUp {
                battle_id: self.battle_id,
                epoch,
                agent_id: p.agent_id,
                item_id: p.item_id,
                item_type: p.item_type,
            });
        }

        // Step 7: prediction.
        let mut prediction_rng = root_rng.sub_stream("prediction");
        let (prediction_results, prediction_skill_uses) = crate::prediction::resolve_predictions(
            &mut self.agents,
            &market,
            &self.previous_market,
            &intents,
            &mut prediction_rng,
        );
        for p in &prediction_results {
            events.push(Event::PredictionResult {
                battle_id: self.battle_id,
                epoch,
                agent_id: p.agent_id,
                asset: p.asset,
                direction: p.direction,
                actual_change_pct: p.actual_change_pct,
                correct: p.correct,
                hp_change: p.hp_change,
                hp_after: p.hp_after,
            });
        }
        for s in &prediction_skill_uses {
            events.push(Event::SkillActivation { battle_id: self.battle_id, epoch, agent_id: s.agent_id, skill: s.skill });
        }

        // Step 8: combat (alliance formation, then attacks).
        let formed = combat::resolve_alliance_proposals(&self.agents, &intents, &mut self.alliances);
        for f in &formed {
            events.push(Event::AllianceEvent {
                battle_id: self.battle_id,
                epoch,
                event_type: f.event_type,
                agent_a: f.agent_a,
                agent_b: f.agent_b,
            });
        }
        let mut combat_rng = root_rng.sub_stream("combat");
        let (combat_results, betrayals, skill_uses) = combat::resolve_combat(
            &mut self.agents,
            &self.grid,
            &intents,
            &sponsor_effects,
            &mut self.alliances,
            &mut combat_rng,
        );
        for b in &betrayals {
            events.push(Event::AllianceEvent {
                battle_id: self.battle_id,
                epoch,
                event_type: b.event_type,
                agent_a: b.agent_a,
                agent_b: b.agent_b,
            });
        }
        for s in &skill_uses {
            events.push(Event::SkillActivation { battle_id: self.battle_id, epoch, agent_id: s.agent_id, skill: s.skill });
        }
        for c in &combat_results {
            events.push(Event::CombatResult {
                battle_id: self.battle_id,
                epoch,
                attacker_id: c.attacker_id,
                defender_id: c.defender_id,
                attack_stake: c.attack_stake,
                damage: c.damage,
                blocked: c.blocked,
                defended: c.defended,
                betrayal: c.betrayal,
                hp_transfer: c.hp_transfer,
            });
        }

        // Step 9: storm.
        let storm_results = storm::apply_storm(&self.grid, &mut self.agents, self.phase);
        for s in &storm_results {
            events.push(Event::StormDamage { battle_id: self.battle_id, epoch, agent_id: s.agent_id, damage: s.damage });
        }

        // Step 10: bleed — flat attrition to every living agent.
        let mut bleed: BTreeMap<AgentId, u32> = BTreeMap::new();
        for agent in self.agents.iter_mut().filter(|a| a.alive) {
            let amount = (BLEED_FRACTION * agent.max_hp as f64) as i64;
            agent.apply_hp_delta(-amount);
            bleed.insert(agent.id, amount.unsigned_abs() as u32);
        }

        // Step 11: death — build per-victim ledgers, then detect.
        let mut ledgers: BTreeMap<AgentId, DamageLedger> = BTreeMap::new();
        for c in &combat_results {
            if c.damage > 0 {
                *ledgers.entry(c.defender_id).or_default().combat.entry(c.attacker_id).or_insert(0) += c.damage;
            }
        }
        for p in &prediction_results {
            if p.hp_change < 0 {
                ledgers.entry(p.agent_id).or_default().prediction += (-p.hp_change) as u32;
            }
        }
        for s in &storm_results {
            ledgers.entry(s.agent_id).or_default().storm += s.damage;
        }
        for t in &trap_triggers {
            ledgers.entry(t.agent_id).or_default().trap += t.damage;
        }
        for (&id, &amount) in &bleed {
            ledgers.entry(id).or_default().bleed += amount;
        }
        let deaths: Vec<AgentDeath> =
            death::resolve_deaths(&mut self.grid, &mut self.agents, &alive_at_epoch_start, &ledgers, epoch);
        for d in &deaths {
            self.last_death = Some(d.agent_id);
            self.all_deaths.push(d.clone());
            events.push(Event::AgentDeath {
                battle_id: self.battle_id,
                epoch,
                agent_id: d.agent_id,
                agent_name: d.agent_name.clone(),
                cause: d.cause,
                killer_id: d.killer_id,
                final_hp: d.final_hp,
            });
        }

        // Step 12: item respawn.
        let item_spawns =
            items::spawn_tick(&mut self.grid, &mut self.items, self.phase, &mut root_rng.sub_stream("items"), &mut self.next_item_id);
        for s in &item_spawns {
            events.push(Event::ItemSpawned { battle_id: self.battle_id, epoch, item_id: s.item_id, item_type: s.item_type, position: s.position });
        }

        // Step 13: buff tick.
        items::tick_buffs(&mut self.agents);

        self.previous_market = market;
        self.previous_most_successful = combat::most_successful_agent(&combat_results);
        self.previous_intents = intents;

        let is_terminal = self.is_complete();
        events.push(Event::EpochEnd { battle_id: self.battle_id, epoch, is_terminal });
        if is_terminal {
            events.push(Event::BattleEnd { battle_id: self.battle_id, epoch, winner: self.current_winner() });
        }

        Ok(hn_types::EpochResult {
            epoch,
            phase: self.phase,
            market,
            move_results,
            trap_triggers,
            item_pickups,
            prediction_results,
            combat_results,
            storm_damage: storm_results,
            deaths,
            item_spawns,
            events,
            agents: self.agents.clone(),
            is_terminal,
        })
    }
}

fn state_label(state: BattleState) -> &'static str {
    match state {
        BattleState::Pending => "PENDING",
        BattleState::Lobby => "LOBBY",
        BattleState::Countdown => "COUNTDOWN",
        BattleState::Active => "ACTIVE",
        BattleState::Completed => "COMPLETED",
    }
}
