//! A deterministic stand-in for the intent/market/sponsor collaborators
//! spec.md assigns to external systems. Good enough to drive a full
//! offline battle from a single seed; not a policy any real agent uses.

use std::collections::BTreeMap;

use hn_engine::arena::RosterEntry;
use hn_types::ids::AgentId;
use hn_types::{
    AllianceProposal, Asset, AttackIntent, Class, HexCoord, Intent, MarketSnapshot, MoveVector,
    PredictionDirection, PredictionIntent, RngState, SponsorEffects, ARENA_COORDS,
};

const ROSTER_CLASSES: [Class; 5] =
    [Class::Warrior, Class::Trader, Class::Survivor, Class::Parasite, Class::Gambler];

/// Five agents, one of each class, spread across the outer ring so
/// nobody starts adjacent to another.
pub fn synthetic_roster() -> Vec<RosterEntry> {
    let spawn_coords: [HexCoord; 5] =
        [ARENA_COORDS[1], ARENA_COORDS[3], ARENA_COORDS[5], ARENA_COORDS[9], ARENA_COORDS[13]];
    ROSTER_CLASSES
        .iter()
        .enumerate()
        .map(|(i, &class)| RosterEntry {
            id: AgentId::new(i as u32 + 1),
            name: format!("{class:?}-{}", i + 1),
            class,
            position: spawn_coords[i],
        })
        .collect()
}

/// A small deterministic random walk: each asset moves by up to +/-5%
/// of the previous snapshot per epoch.
pub fn next_market(rng: &mut RngState, previous: &MarketSnapshot) -> MarketSnapshot {
    let walk = |rng: &mut RngState, price: f64| {
        let pct = (rng.next_f64() - 0.5) * 0.10;
        (price * (1.0 + pct)).max(0.01)
    };
    MarketSnapshot {
        eth: walk(rng, previous.eth),
        btc: walk(rng, previous.btc),
        sol: walk(rng, previous.sol),
        mon: walk(rng, previous.mon),
        timestamp: previous.timestamp + 1,
    }
}

/// Every living agent attacks the nearest living rival if adjacent,
/// otherwise steps toward them; ties broken by ascending target id. A
/// living agent with no rivals holds and defends.
pub fn synthetic_intents(
    rng: &mut RngState,
    roster: &[(AgentId, Class, HexCoord)],
) -> BTreeMap<AgentId, Intent> {
    let mut out = BTreeMap::new();
    for &(id, class, pos) in roster {
        let mut intent = Intent::default_for(id);
        intent.predict = PredictionIntent {
            asset: Asset::ALL[rng.random_index(Asset::ALL.len()).unwrap_or(0)],
            direction: if rng.roll(0.5) { PredictionDirection::Up } else { PredictionDirection::Down },
            stake_percent: 5.0 + rng.next_f64() * 15.0,
        };

        let nearest = roster
            .iter()
            .filter(|&&(other, _, _)| other != id)
            .min_by_key(|&&(other, _, other_pos)| (pos.distance(other_pos), other));

        if let Some(&(target, _, target_pos)) = nearest {
            if pos.distance(target_pos) <= 1 {
                if rng.roll(0.5) {
                    intent.attack = Some(AttackIntent { target_id: target, stake: 100.0 + rng.next_f64() * 400.0 });
                } else {
                    intent.defend = true;
                }
            } else {
                let best = hn_types::HexDirection::ALL
                    .iter()
                    .copied()
                    .map(|d| (d, pos.neighbor(d)))
                    .filter(|(_, n)| n.in_arena_bounds())
                    .min_by_key(|&(_, n)| n.distance(target_pos));
                if let Some((dir, _)) = best {
                    intent.movement = MoveVector::Step(dir);
                }
            }
        }

        if class == Class::Survivor && rng.roll(0.3) {
            if let Some(&(partner, _, _)) = nearest {
                intent.alliance_proposal = Some(AllianceProposal { partner_id: partner });
            }
        }

        out.insert(id, intent);
    }
    out
}

/// No sponsor effects by default; offline runs have no sponsor system.
pub fn synthetic_sponsor_effects() -> SponsorEffects {
    SponsorEffects::new()
}
