//! The 19-tile arena grid — the single source of truth for occupancy.
//!
//! Cyclic references between agents and tiles resolve here: an agent's
//! `.position` is a cached read-only mirror of `HexTile.occupant`, and is
//! only ever written through `place`/`clear` so the two never disagree.

use arrayvec::ArrayVec;

use hn_types::ids::{AgentId, ItemId};
use hn_types::{HexCoord, TileType, ARENA_COORDS};

use crate::error::GridError;

#[derive(Debug, Clone, PartialEq)]
pub struct HexTile {
    pub coord: HexCoord,
    pub tile_type: TileType,
    pub occupant: Option<AgentId>,
    pub items: Vec<ItemId>,
    /// 0 = safe, 1 = lethal from HUNT, 2 = lethal from BLOOD, 3 = lethal
    /// in FINAL_STAND. The cornucopia is always 0.
    pub storm_level: u8,
}

/// A map from `HexCoord` to `HexTile` for the fixed 19-tile arena.
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    tiles: Vec<HexTile>,
}

fn index_of(coord: HexCoord) -> Option<usize> {
    ARENA_COORDS.iter().position(|&c| c == coord)
}

impl HexGrid {
    /// Construct the 19 tiles once, assigning storm level by ring
    /// distance from the cornucopia (ring 0 -> 0, ring 1 -> 1, ring 2 -> 2).
    pub fn new() -> Self {
        let tiles = ARENA_COORDS
            .iter()
            .map(|&coord| {
                let ring = coord.ring();
                HexTile {
                    coord,
                    tile_type: if ring == 0 { TileType::Cornucopia } else { TileType::Edge },
                    occupant: None,
                    items: Vec::new(),
                    storm_level: ring.min(2) as u8,
                }
            })
            .collect();
        Self { tiles }
    }

    pub fn is_valid(&self, coord: HexCoord) -> bool {
        index_of(coord).is_some()
    }

    pub fn tile(&self, coord: HexCoord) -> Result<&HexTile, GridError> {
        index_of(coord).map(|i| &self.tiles[i]).ok_or(GridError::OutOfBounds(coord))
    }

    pub fn tile_mut(&mut self, coord: HexCoord) -> Result<&mut HexTile, GridError> {
        index_of(coord).map(move |i| &mut self.tiles[i]).ok_or(GridError::OutOfBounds(coord))
    }

    pub fn occupant(&self, coord: HexCoord) -> Option<AgentId> {
        self.tile(coord).ok().and_then(|t| t.occupant)
    }

    /// Neighbors of `coord` that exist on the grid, in `HexDirection::ALL`
    /// order.
    pub fn neighbors(&self, coord: HexCoord) -> ArrayVec<HexCoord, 6> {
        coord.neighbors().into_iter().filter(|c| self.is_valid(*c)).collect()
    }

    pub fn distance(&self, a: HexCoord, b: HexCoord) -> u32 {
        a.distance(b)
    }

    /// Place `agent` on `coord`. Fails if the tile is already occupied.
    pub fn place(&mut self, agent: AgentId, coord: HexCoord) -> Result<(), GridError> {
        let tile = self.tile_mut(coord)?;
        if tile.occupant.is_some() {
            return Err(GridError::TileOccupied(coord));
        }
        tile.occupant = Some(agent);
        Ok(())
    }

    /// Clear the occupant of `coord`. Fails if the tile is already empty.
    pub fn clear(&mut self, coord: HexCoord) -> Result<(), GridError> {
        let tile = self.tile_mut(coord)?;
        if tile.occupant.is_none() {
            return Err(GridError::TileEmpty(coord));
        }
        tile.occupant = None;
        Ok(())
    }

    pub fn all_coords(&self) -> [HexCoord; 19] {
        ARENA_COORDS
    }

    pub fn tiles_at_storm_level(&self, min_level: u8) -> Vec<HexCoord> {
        self.tiles.iter().filter(|t| t.storm_level >= min_level).map(|t| t.coord).collect()
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nineteen_tiles_constructed() {
        let grid = HexGrid::new();
        assert_eq!(grid.all_coords().len(), 19);
    }

    #[test]
    fn center_is_cornucopia_level_zero() {
        let grid = HexGrid::new();
        let tile = grid.tile(HexCoord::new(0, 0)).unwrap();
        assert_eq!(tile.tile_type, TileType::Cornucopia);
        assert_eq!(tile.storm_level, 0);
    }

    #[test]
    fn place_then_occupied_fails() {
        let mut grid = HexGrid::new();
        let coord = HexCoord::new(0, 0);
        grid.place(AgentId::new(1), coord).unwrap();
        assert_eq!(grid.place(AgentId::new(2), coord), Err(GridError::TileOccupied(coord)));
    }

    #[test]
    fn clear_then_empty_fails() {
        let mut grid = HexGrid::new();
        let coord = HexCoord::new(0, 0);
        assert_eq!(grid.clear(coord), Err(GridError::TileEmpty(coord)));
        grid.place(AgentId::new(1), coord).unwrap();
        grid.clear(coord).unwrap();
        assert_eq!(grid.occupant(coord), None);
    }

    #[test]
    fn out_of_bounds_coord_errors() {
        let grid = HexGrid::new();
        let far = HexCoord::new(5, 5);
        assert_eq!(grid.tile(far), Err(GridError::OutOfBounds(far)));
    }

    #[test]
    fn neighbors_filters_to_grid() {
        let grid = HexGrid::new();
        // A ring-2 corner has fewer than 6 neighbors on the grid.
        let corner = HexCoord::new(2, -2);
        let neighbors = grid.neighbors(corner);
        assert!(neighbors.len() < 6);
        for n in &neighbors {
            assert!(grid.is_valid(*n));
        }
    }
}
