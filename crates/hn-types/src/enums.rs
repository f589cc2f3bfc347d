//! Enum catalogue for agent classes, item/buff/tile kinds, phases, and
//! the event/damage-cause vocabulary.

use serde::{Deserialize, Serialize};

/// Agent class. Per-class behavior is dispatched by `match` on this
/// variant, never by subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Class {
    Warrior,
    Trader,
    Survivor,
    Parasite,
    Gambler,
}

impl Class {
    pub const ALL: [Self; 5] =
        [Self::Warrior, Self::Trader, Self::Survivor, Self::Parasite, Self::Gambler];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Cornucopia,
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Ration,
    Weapon,
    Shield,
    Trap,
    Oracle,
}

impl ItemType {
    pub const ALL: [Self; 5] =
        [Self::Ration, Self::Weapon, Self::Shield, Self::Trap, Self::Oracle];

    /// Item types that may appear as loot drops (everything but TRAP,
    /// which is placed separately by the storm/trap spawn rule).
    pub const LOOT: [Self; 4] = [Self::Ration, Self::Weapon, Self::Shield, Self::Oracle];

    pub fn buff_type(self) -> Option<BuffType> {
        match self {
            Self::Weapon => Some(BuffType::WeaponBoost),
            Self::Shield => Some(BuffType::ShieldBoost),
            Self::Oracle => Some(BuffType::OracleHint),
            Self::Ration | Self::Trap => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffType {
    WeaponBoost,
    ShieldBoost,
    OracleHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Loot,
    Hunt,
    Blood,
    FinalStand,
}

impl BattlePhase {
    pub const ALL: [Self; 4] = [Self::Loot, Self::Hunt, Self::Blood, Self::FinalStand];

    /// Ordinal used to enforce phase monotonicity (`PhaseChange` never
    /// goes backwards) and to compute the lethal storm level `S`.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Loot => 0,
            Self::Hunt => 1,
            Self::Blood => 2,
            Self::FinalStand => 3,
        }
    }

    /// Lethal storm level `S` for this phase.
    pub fn lethal_storm_level(self) -> u8 {
        self.ordinal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleState {
    Pending,
    Lobby,
    Countdown,
    Active,
    Completed,
}

/// Direction of a market prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionDirection {
    Up,
    Down,
}

/// Tradeable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Eth,
    Btc,
    Sol,
    Mon,
}

impl Asset {
    pub const ALL: [Self; 4] = [Self::Eth, Self::Btc, Self::Sol, Self::Mon];
}

/// Root cause of an agent's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Combat,
    Prediction,
    Storm,
    Bleed,
    Trap,
    Multi,
}

/// Reason a requested move did not commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveFailureReason {
    OffGrid,
    Occupied,
    Conflict,
    Swap,
}

/// Class-specific automatic skill activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Reckless,
    InsiderInfo,
    Fortify,
    Mimic,
    AllIn,
}

/// Alliance lifecycle event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceEventType {
    Formed,
    Betrayed,
    Dissolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_ordinal_is_monotonic_in_declared_order() {
        let ords: Vec<u8> = BattlePhase::ALL.iter().map(|p| p.ordinal()).collect();
        assert_eq!(ords, vec![0, 1, 2, 3]);
    }

    #[test]
    fn item_to_buff_mapping() {
        assert_eq!(ItemType::Weapon.buff_type(), Some(BuffType::WeaponBoost));
        assert_eq!(ItemType::Ration.buff_type(), None);
        assert_eq!(ItemType::Trap.buff_type(), None);
    }

    #[test]
    fn class_serializes_snake_case() {
        let json = serde_json::to_string(&Class::Survivor).unwrap();
        assert_eq!(json, "\"survivor\"");
    }

    #[test]
    fn asset_serializes_uppercase() {
        let json = serde_json::to_string(&Asset::Eth).unwrap();
        assert_eq!(json, "\"ETH\"");
    }
}
