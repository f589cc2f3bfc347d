//! Movement — validate, order, and commit one-tile moves with collision.

use std::collections::{BTreeMap, HashMap};

use hn_types::ids::AgentId;
use hn_types::{Agent, HexCoord, MoveFailureReason, MoveResult, MoveVector};

use crate::hex_grid::HexGrid;

fn desired_destination(agent: &Agent, vector: MoveVector) -> HexCoord {
    match vector {
        MoveVector::Hold => agent.position,
        MoveVector::Step(dir) => agent.position.neighbor(dir),
    }
}

/// Resolve every living agent's movement order for this epoch and commit
/// the admitted moves to `grid`, updating each agent's `.position`.
///
/// `moves` maps agent id to its requested vector; a living agent with no
/// entry is treated as holding (the intent-provider contract guarantees
/// every living agent has an intent, so this is a defensive default, not
/// the expected path).
pub fn resolve_moves(
    grid: &mut HexGrid,
    agents: &mut [Agent],
    moves: &BTreeMap<AgentId, MoveVector>,
) -> Vec<MoveResult> {
    let mut desired: BTreeMap<AgentId, (HexCoord, HexCoord)> = BTreeMap::new();
    for agent in agents.iter().filter(|a| a.alive) {
        let vector = moves.get(&agent.id).copied().unwrap_or(MoveVector::Hold);
        let to = desired_destination(agent, vector);
        desired.insert(agent.id, (agent.position, to));
    }

    let mut rejected: BTreeMap<AgentId, MoveFailureReason> = BTreeMap::new();

    // Off-grid destinations never depend on any other agent's move.
    for (&id, &(from, to)) in desired.iter() {
        if to != from && !grid.is_valid(to) {
            rejected.insert(id, MoveFailureReason::OffGrid);
        }
    }

    // Steps 2-4: occupancy-modulo-vacating, conflicts, and swaps, iterated
    // to a fixed point. Rejecting a mover can un-vacate a tile another
    // mover was counting on, which can cascade into further rejections —
    // e.g. A->B's tile, B->C's tile, C holds: B gets rejected (C isn't
    // vacating), which means A's "B is vacating" belief was wrong too and
    // must be revisited. `rejected` only ever grows, so this converges.
    loop {
        let before = rejected.len();

        // Step 2: destination validity and occupancy-modulo-vacating.
        for (&id, &(from, to)) in desired.iter() {
            if to == from || rejected.contains_key(&id) {
                continue;
            }
            if let Some(occupant) = grid.occupant(to) {
                if occupant != id {
                    let occupant_is_vacating = desired
                        .get(&occupant)
                        .map(|&(f, t)| f != t && !rejected.contains_key(&occupant))
                        .unwrap_or(false);
                    if !occupant_is_vacating {
                        rejected.insert(id, MoveFailureReason::Occupied);
                    }
                }
            }
        }

        // Step 3: conflicts — multiple movers targeting the same destination.
        let mut by_destination: HashMap<HexCoord, Vec<AgentId>> = HashMap::new();
        for (&id, &(from, to)) in desired.iter() {
            if to != from && !rejected.contains_key(&id) {
                by_destination.entry(to).or_default().push(id);
            }
        }
        for (_, mut contenders) in by_destination {
            if contenders.len() > 1 {
                contenders.sort();
                for loser in &contenders[1..] {
                    rejected.insert(*loser, MoveFailureReason::Conflict);
                }
            }
        }

        // Step 4: swaps — two still-admitted movers targeting each other's origin.
        let admitted_ids: Vec<AgentId> = desired
            .iter()
            .filter(|(&id, &(from, to))| to != from && !rejected.contains_key(&id))
            .map(|(&id, _)| id)
            .collect();
        for &a in &admitted_ids {
            if rejected.contains_key(&a) {
                continue;
            }
            let (a_from, a_to) = desired[&a];
            for &b in &admitted_ids {
                if a >= b || rejected.contains_key(&b) {
                    continue;
                }
                let (b_from, b_to) = desired[&b];
                if a_to == b_from && b_to == a_from {
                    rejected.insert(a, MoveFailureReason::Swap);
                    rejected.insert(b, MoveFailureReason::Swap);
                }
            }
        }

        if rejected.len() == before {
            break;
        }
    }

    // Step 5: commit — clear vacated tiles first, then place admitted moves.
    let final_admitted: Vec<AgentId> = desired
        .iter()
        .filter(|(&id, &(from, to))| to != from && !rejected.contains_key(&id))
        .map(|(&id, _)| id)
        .collect();

    for &id in &final_admitted {
        let (from, _) = desired[&id];
        grid.clear(from).expect("admitted mover's origin must be occupied by itself");
    }
    for &id in &final_admitted {
        let (_, to) = desired[&id];
        grid.place(id, to).expect("destination was validated to be free or vacating");
    }
    for agent in agents.iter_mut() {
        if let Some(&(_, to)) = desired.get(&agent.id) {
            if final_admitted.contains(&agent.id) {
                agent.position = to;
            }
        }
    }

    desired
        .into_iter()
        .map(|(id, (from, to))| {
            if to == from {
                MoveResult { agent_id: id, from, to, success: true, reason: None }
            } else if let Some(&reason) = rejected.get(&id) {
                MoveResult { agent_id: id, from, to: from, success: false, reason: Some(reason) }
            } else {
                MoveResult { agent_id: id, from, to, success: true, reason: None }
            }
        })
        .collect()
}
