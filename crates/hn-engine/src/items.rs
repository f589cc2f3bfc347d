//! Item pickup/trap resolution, respawn, and buff lifecycle.

use hn_types::ids::{AgentId, BuffId, ItemId};
use hn_types::{
    Agent, BattlePhase, Buff, Item, ItemPickedUp, ItemSpawned, ItemType, RngState, TrapTriggered,
};
use hn_data::items::{effect_of, spawn_probability};

use crate::hex_grid::HexGrid;

/// Trigger every TRAP on a tile a living agent currently occupies.
/// Traps resolve before pickups, so an agent stepping onto a tile with
/// both loses HP first, then collects the remaining item if still alive.
pub fn resolve_traps(grid: &mut HexGrid, agents: &mut [Agent], items: &mut Vec<Item>) -> Vec<TrapTriggered> {
    let mut out = Vec::new();
    for agent in agents.iter_mut().filter(|a| a.alive) {
        let Ok(tile) = grid.tile(agent.position) else { continue };
        let trap_ids: Vec<ItemId> = tile
            .items
            .iter()
            .copied()
            .filter(|id| items.iter().any(|it| it.id == *id && it.item_type == ItemType::Trap))
            .collect();
        for trap_id in trap_ids {
            let effect = effect_of(ItemType::Trap);
            agent.apply_hp_delta(effect.hp_loss);
            out.push(TrapTriggered { agent_id: agent.id, item_id: trap_id, damage: effect.hp_loss.unsigned_abs() as u32 });
            items.retain(|it| it.id != trap_id);
            if let Ok(tile) = grid.tile_mut(agent.position) {
                tile.items.retain(|id| *id != trap_id);
            }
        }
    }
    out
}

/// Resolve pickups: a living agent whose tile holds non-TRAP items picks
/// up the first one in insertion order. TRAPs are handled by
/// `resolve_traps` and are skipped here.
pub fn resolve_pickups(
    grid: &mut HexGrid,
    agents: &mut [Agent],
    items: &mut Vec<Item>,
    next_buff_id: &mut u32,
) -> Vec<ItemPickedUp> {
    let mut out = Vec::new();
    for agent in agents.iter_mut().filter(|a| a.alive) {
        let Ok(tile) = grid.tile(agent.position) else { continue };
        let pickup_id = tile
            .items
            .iter()
            .copied()
            .find(|id| items.iter().any(|it| it.id == *id && it.item_type != ItemType::Trap));
        let Some(item_id) = pickup_id else { continue };
        let item_type = items.iter().find(|it| it.id == item_id).unwrap().item_type;
        let effect = effect_of(item_type);

        if effect.hp_gain != 0 {
            agent.apply_hp_delta(effect.hp_gain);
        }
        if let Some((buff_type, magnitude)) = effect.buff {
            let stacks = agent.buffs.iter().filter(|b| b.buff_type == buff_type).count();
            if stacks < hn_types::item::MAX_BUFF_STACKS {
                *next_buff_id += 1;
                agent.buffs.push(Buff {
                    id: BuffId::new(*next_buff_id),
                    owner: agent.id,
                    buff_type,
                    remaining_epochs: effect.buff_duration,
                    magnitude,
                });
            }
        }

        out.push(ItemPickedUp { agent_id: agent.id, item_id, item_type });
        items.retain(|it| it.id != item_id);
        if let Ok(tile) = grid.tile_mut(agent.position) {
            tile.items.retain(|id| *id != item_id);
        }
    }
    out
}

/// Each epoch, every tile with zero items rolls against the phase's spawn
/// probability; on success a uniformly-chosen non-TRAP item spawns there.
/// The cornucopia never spawns a TRAP (it never spawns anything but loot
/// in the first place, since it is item-empty only transiently).
pub fn spawn_tick(
    grid: &mut HexGrid,
    items: &mut Vec<Item>,
    phase: BattlePhase,
    rng: &mut RngState,
    next_item_id: &mut u32,
) -> Vec<ItemSpawned> {
    let mut out = Vec::new();
    let probability = spawn_probability(phase);
    if probability <= 0.0 {
        return out;
    }
    for coord in grid.all_coords() {
        let tile_is_empty = grid.tile(coord).map(|t| t.items.is_empty()).unwrap_or(false);
        if !tile_is_empty {
            continue;
        }
        if !rng.roll(probability) {
            continue;
        }
        let idx = rng.random_index(ItemType::LOOT.len()).expect("LOOT is non-empty");
        let item_type = ItemType::LOOT[idx];
        *next_item_id += 1;
        let item_id = ItemId::new(*next_item_id);
        items.push(Item { id: item_id, item_type, position: coord, from_cornucopia: false });
        if let Ok(tile) = grid.tile_mut(coord) {
            tile.items.push(item_id);
        }
        out.push(ItemSpawned { item_id, item_type, position: coord });
    }
    out
}

/// Decrement every buff's remaining duration by one epoch; buffs that
/// reach zero are removed.
pub fn tick_buffs(agents: &mut [Agent]) {
    for agent in agents.iter_mut() {
        for buff in agent.buffs.iter_mut() {
            buff.remaining_epochs = buff.remaining_epochs.saturating_sub(1);
        }
        agent.buffs.retain(|b| b.remaining_epochs > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_types::{Class, HexCoord};

    fn agent(id: u32, pos: HexCoord) -> Agent {
        Agent::new(AgentId::new(id), "a", Class::Survivor, pos)
    }

    #[test]
    fn trap_then_pickup_ordering() {
        let mut grid = HexGrid::new();
        let coord = HexCoord::new(0, 1);
        let mut agents = vec![agent(1, coord)];
        agents[0].hp = 100;
        grid.place(agents[0].id, coord).unwrap();

        let trap_id = ItemId::new(1);
        let ration_id = ItemId::new(2);
        let mut items = vec![
            Item { id: trap_id, item_type: ItemType::Trap, position: coord, from_cornucopia: false },
            Item { id: ration_id, item_type: ItemType::Ration, position: coord, from_cornucopia: false },
        ];
        grid.tile_mut(coord).unwrap().items = vec![trap_id, ration_id];

        let traps = resolve_traps(&mut grid, &mut agents, &mut items);
        assert_eq!(traps.len(), 1);
        assert_eq!(agents[0].hp, 20);

        let mut next_buff = 0;
        let pickups = resolve_pickups(&mut grid, &mut agents, &mut items, &mut next_buff);
        assert_eq!(pickups.len(), 1);
        assert_eq!(agents[0].hp, 120);
        assert!(items.is_empty());
    }

    #[test]
    fn weapon_pickup_grants_buff() {
        let mut grid = HexGrid::new();
        let coord = HexCoord::new(0, 1);
        let mut agents = vec![agent(1, coord)];
        grid.place(agents[0].id, coord).unwrap();
        let item_id = ItemId::new(1);
        let mut items = vec![Item { id: item_id, item_type: ItemType::Weapon, position: coord, from_cornucopia: false }];
        grid.tile_mut(coord).unwrap().items = vec![item_id];

        let mut next_buff = 0;
        resolve_pickups(&mut grid, &mut agents, &mut items, &mut next_buff);
        assert_eq!(agents[0].buffs.len(), 1);
        assert_eq!(agents[0].buffs[0].remaining_epochs, 3);
    }

    #[test]
    fn buff_tick_expires_at_zero() {
        let mut a = agent(1, HexCoord::new(0, 0));
        a.buffs.push(Buff {
            id: BuffId::new(1),
            owner: a.id,
            buff_type: hn_types::BuffType::WeaponBoost,
            remaining_epochs: 1,
            magnitude: 0.15,
        });
        let mut agents = vec![a];
        tick_buffs(&mut agents);
        assert!(agents[0].buffs.is_empty());
    }

    #[test]
    fn final_stand_spawns_nothing() {
        let mut grid = HexGrid::new();
        let mut items = Vec::new();
        let mut rng = RngState::new(1);
        let mut next_id = 0;
        let spawned = spawn_tick(&mut grid, &mut items, BattlePhase::FinalStand, &mut rng, &mut next_id);
        assert!(spawned.is_empty());
    }
}
