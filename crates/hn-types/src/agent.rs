//! Agent — a battle participant.

use serde::{Deserialize, Serialize};

use crate::enums::Class;
use crate::hex::HexCoord;
use crate::ids::AgentId;
use crate::item::Buff;

pub const MAX_HP: u32 = 1000;

/// One participant in a battle.
///
/// Invariants the rest of the engine relies on: `0 <= hp <= max_hp`;
/// `alive` only ever transitions `true -> false`, never back; `position`
/// always names a tile that exists on the grid, and is kept in sync with
/// `HexGrid`'s own occupant bookkeeping by the grid accessors, never
/// written directly by other subsystems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub class: Class,
    pub hp: u32,
    pub max_hp: u32,
    pub alive: bool,
    pub kills: u32,
    pub position: HexCoord,
    pub buffs: Vec<Buff>,
    /// `(defender, consecutive_epoch_count)` for WARRIOR's RECKLESS
    /// auto-pick, updated after each combat phase.
    pub last_attack_target: Option<(AgentId, u8)>,
    /// Whether this agent's prediction came out wrong last epoch, updated
    /// after each prediction phase. Drives TRADER's INSIDER_INFO.
    pub last_prediction_wrong: bool,
}

impl Agent {
    pub fn new(id: AgentId, name: impl Into<String>, class: Class, position: HexCoord) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            hp: MAX_HP,
            max_hp: MAX_HP,
            alive: true,
            kills: 0,
            position,
            buffs: Vec::new(),
            last_attack_target: None,
            last_prediction_wrong: false,
        }
    }

    /// Add `delta` to `hp`, clamped to `[0, max_hp]`. Does not touch
    /// `alive` — death detection is a separate pass that compares HP
    /// against the alive set captured at the start of the epoch.
    pub fn apply_hp_delta(&mut self, delta: i64) {
        let current = self.hp as i64;
        let next = (current + delta).clamp(0, self.max_hp as i64);
        self.hp = next as u32;
    }

    pub fn has_buff(&self, buff_type: crate::enums::BuffType) -> bool {
        self.buffs.iter().any(|b| b.buff_type == buff_type)
    }

    pub fn buff_magnitude_total(&self, buff_type: crate::enums::BuffType) -> f64 {
        self.buffs.iter().filter(|b| b.buff_type == buff_type).map(|b| b.magnitude).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::BuffType;
    use crate::ids::BuffId;

    fn agent() -> Agent {
        Agent::new(AgentId::new(1), "W", Class::Warrior, HexCoord::new(0, 0))
    }

    #[test]
    fn hp_delta_clamps_to_bounds() {
        let mut a = agent();
        a.apply_hp_delta(-5000);
        assert_eq!(a.hp, 0);
        a.apply_hp_delta(5000);
        assert_eq!(a.hp, a.max_hp);
    }

    #[test]
    fn hp_delta_never_touches_alive_flag() {
        let mut a = agent();
        a.apply_hp_delta(-5000);
        assert!(a.alive, "death detection owns the alive flag, not hp mutation");
    }

    #[test]
    fn buff_magnitude_sums_stacks() {
        let mut a = agent();
        a.buffs.push(Buff {
            id: BuffId::new(1),
            owner: a.id,
            buff_type: BuffType::WeaponBoost,
            remaining_epochs: 3,
            magnitude: 0.15,
        });
        a.buffs.push(Buff {
            id: BuffId::new(2),
            owner: a.id,
            buff_type: BuffType::WeaponBoost,
            remaining_epochs: 2,
            magnitude: 0.15,
        });
        assert!((a.buff_magnitude_total(BuffType::WeaponBoost) - 0.30).abs() < 1e-9);
    }
}
