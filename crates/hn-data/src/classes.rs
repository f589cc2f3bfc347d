//! Per-class combat and prediction modifiers.

use hn_types::Class;

/// Flat attack-damage bonus this class contributes unconditionally
/// (before buffs/sponsor effects are layered on).
pub fn base_attack_bonus(class: Class) -> f64 {
    match class {
        Class::Warrior => 0.25,
        Class::Trader | Class::Survivor | Class::Parasite | Class::Gambler => 0.0,
    }
}

/// TRADER's probability of flipping a wrong prediction to correct.
pub const TRADER_ACCURACY_BOOST: f64 = 0.2;

/// GAMBLER doubles both prediction stake magnitude and combat stake.
pub fn stake_multiplier(class: Class) -> f64 {
    match class {
        Class::Gambler => 2.0,
        _ => 1.0,
    }
}

/// Defend cost as a fraction of `maxHp`, deducted from a defending
/// agent's HP immediately (unless waived by a sponsor `freeDefend`).
pub const DEFEND_COST_FRACTION: f64 = 0.03;

/// WARRIOR RECKLESS self-damage fraction of `maxHp`.
pub const RECKLESS_SELF_DAMAGE_FRACTION: f64 = 0.10;

/// Flat per-epoch attrition fraction applied to every living agent.
pub const BLEED_FRACTION: f64 = 0.02;

/// Storm damage fraction of `maxHp` dealt to an occupant of a lethal tile.
pub const STORM_DAMAGE_FRACTION: f64 = 0.05;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warrior_gets_quarter_bonus() {
        assert_eq!(base_attack_bonus(Class::Warrior), 0.25);
    }

    #[test]
    fn other_classes_get_no_base_bonus() {
        for c in [Class::Trader, Class::Survivor, Class::Parasite, Class::Gambler] {
            assert_eq!(base_attack_bonus(c), 0.0);
        }
    }

    #[test]
    fn gambler_doubles_stake() {
        assert_eq!(stake_multiplier(Class::Gambler), 2.0);
        assert_eq!(stake_multiplier(Class::Warrior), 1.0);
    }
}
