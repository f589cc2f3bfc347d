//! Item-type catalogue — the fixed magnitude table from the pickup-effect
//! rules, plus the phase-dependent spawn probabilities used by item
//! respawn.

use hn_types::{BattlePhase, BuffType, ItemType};

/// Pickup-effect magnitude for one item type. Only the fields relevant to
/// that type are non-zero; see `ItemCatalogue::get`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemEffect {
    pub item_type: ItemType,
    /// RATION: flat HP gain, capped at `maxHp`.
    pub hp_gain: i64,
    /// TRAP: flat HP loss (attrition), applied unconditionally.
    pub hp_loss: i64,
    /// WEAPON / SHIELD: buff type and magnitude granted on pickup.
    pub buff: Option<(BuffType, f64)>,
    /// Epoch duration of the granted buff, or 0 for instantaneous/no buff.
    pub buff_duration: u8,
}

const RATION: ItemEffect =
    ItemEffect { item_type: ItemType::Ration, hp_gain: 100, hp_loss: 0, buff: None, buff_duration: 0 };
const WEAPON: ItemEffect = ItemEffect {
    item_type: ItemType::Weapon,
    hp_gain: 0,
    hp_loss: 0,
    buff: Some((BuffType::WeaponBoost, 0.15)),
    buff_duration: 3,
};
const SHIELD: ItemEffect = ItemEffect {
    item_type: ItemType::Shield,
    hp_gain: 0,
    hp_loss: 0,
    buff: Some((BuffType::ShieldBoost, 0.10)),
    buff_duration: 3,
};
const TRAP: ItemEffect =
    ItemEffect { item_type: ItemType::Trap, hp_gain: 0, hp_loss: -80, buff: None, buff_duration: 0 };
const ORACLE: ItemEffect = ItemEffect {
    item_type: ItemType::Oracle,
    hp_gain: 0,
    hp_loss: 0,
    buff: Some((BuffType::OracleHint, 1.0)),
    buff_duration: 1,
};

/// Look up the fixed effect table entry for `item_type`.
pub fn effect_of(item_type: ItemType) -> ItemEffect {
    match item_type {
        ItemType::Ration => RATION,
        ItemType::Weapon => WEAPON,
        ItemType::Shield => SHIELD,
        ItemType::Trap => TRAP,
        ItemType::Oracle => ORACLE,
    }
}

/// Probability that an empty tile spawns a new item this epoch, by phase.
/// FINAL_STAND spawns nothing — the storm is closing, not restocking.
pub fn spawn_probability(phase: BattlePhase) -> f64 {
    match phase {
        BattlePhase::Loot => 0.12,
        BattlePhase::Hunt => 0.08,
        BattlePhase::Blood => 0.05,
        BattlePhase::FinalStand => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ration_heals_100() {
        assert_eq!(effect_of(ItemType::Ration).hp_gain, 100);
    }

    #[test]
    fn trap_deals_80() {
        assert_eq!(effect_of(ItemType::Trap).hp_loss, -80);
    }

    #[test]
    fn weapon_grants_three_epoch_buff() {
        let e = effect_of(ItemType::Weapon);
        assert_eq!(e.buff, Some((BuffType::WeaponBoost, 0.15)));
        assert_eq!(e.buff_duration, 3);
    }

    #[test]
    fn final_stand_spawns_nothing() {
        assert_eq!(spawn_probability(BattlePhase::FinalStand), 0.0);
    }
}
