//! Items and the buffs they grant on pickup.

use serde::{Deserialize, Serialize};

use crate::enums::{BuffType, ItemType};
use crate::hex::HexCoord;
use crate::ids::{AgentId, BuffId, ItemId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub item_type: ItemType,
    pub position: HexCoord,
    pub from_cornucopia: bool,
}

/// An active, stacking, time-limited modifier granted by an item pickup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub id: BuffId,
    pub owner: AgentId,
    pub buff_type: BuffType,
    pub remaining_epochs: u8,
    pub magnitude: f64,
}

/// Ceiling on concurrent stacks of one buff type held by a single agent.
pub const MAX_BUFF_STACKS: usize = 3;
