//! The sponsor-effect resolver — a thin read-only adapter feeding Combat.
//! The provider yields a map scoped to `(battleId, epochNumber)`; an empty
//! map is legal and simply means no agent has a sponsor effect this epoch.

use hn_types::ids::AgentId;
use hn_types::{SponsorEffect, SponsorEffects};

pub fn effect_for(sponsor_effects: &SponsorEffects, agent_id: AgentId) -> SponsorEffect {
    sponsor_effects.get(&agent_id).copied().unwrap_or_default()
}
