//! Market snapshots and sponsor effects — both collaborator-supplied
//! inputs to `process_epoch`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::Asset;

/// `{prices, timestamp}` as yielded by the market-feed collaborator.
/// Prices must be positive finite numbers; the feed is allowed to repeat
/// the previous snapshot verbatim, which the engine reads as zero percent
/// change on every asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub eth: f64,
    pub btc: f64,
    pub sol: f64,
    pub mon: f64,
    pub timestamp: u64,
}

impl MarketSnapshot {
    pub fn price(&self, asset: Asset) -> f64 {
        match asset {
            Asset::Eth => self.eth,
            Asset::Btc => self.btc,
            Asset::Sol => self.sol,
            Asset::Mon => self.mon,
        }
    }

    /// Percent change of `asset` from `previous` to `self`. `previous ==
    /// self` (a repeated snapshot) yields exactly zero.
    pub fn percent_change(&self, previous: &MarketSnapshot, asset: Asset) -> f64 {
        let prev = previous.price(asset);
        if prev == 0.0 {
            return 0.0;
        }
        (self.price(asset) - prev) / prev * 100.0
    }
}

/// Per-agent, per-epoch modifiers supplied by an external sponsor system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SponsorEffect {
    pub hp_boost: f64,
    pub free_defend: bool,
    pub attack_bonus: f64,
}

pub type SponsorEffects = BTreeMap<crate::ids::AgentId, SponsorEffect>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_snapshot_is_zero_change() {
        let snap = MarketSnapshot { eth: 100.0, btc: 1.0, sol: 1.0, mon: 1.0, timestamp: 0 };
        assert_eq!(snap.percent_change(&snap, Asset::Eth), 0.0);
    }

    #[test]
    fn percent_change_is_signed() {
        let prev = MarketSnapshot { eth: 100.0, btc: 1.0, sol: 1.0, mon: 1.0, timestamp: 0 };
        let next = MarketSnapshot { eth: 103.0, btc: 1.0, sol: 1.0, mon: 1.0, timestamp: 1 };
        assert!((next.percent_change(&prev, Asset::Eth) - 3.0).abs() < 1e-9);
    }
}
