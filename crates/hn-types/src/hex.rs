//! Axial hex coordinates for the 19-tile battle arena.

use serde::{Deserialize, Serialize};

/// Axial hex coordinate `(q, r)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Cube coordinate `s` (derived: s = -q - r).
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance between two coordinates.
    pub fn distance(self, other: Self) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// `true` for the 19 tiles of the centered radius-2 hexagon.
    pub fn in_arena_bounds(self) -> bool {
        self.q.unsigned_abs().max(self.r.unsigned_abs()).max(self.s().unsigned_abs()) <= 2
    }

    /// Ring distance from the center (0 for the cornucopia, 1 or 2 otherwise).
    pub fn ring(self) -> u32 {
        self.distance(HexCoord::new(0, 0))
    }

    pub fn neighbor(self, dir: HexDirection) -> Self {
        let (dq, dr) = dir.offset();
        Self { q: self.q + dq, r: self.r + dr }
    }

    /// All 6 neighbors, regardless of whether they lie inside the arena.
    pub fn neighbors(self) -> [Self; 6] {
        HexDirection::ALL.map(|dir| self.neighbor(dir))
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

/// One of the six neighbor directions on the axial grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HexDirection {
    NE,
    E,
    SE,
    SW,
    W,
    NW,
}

impl HexDirection {
    pub const ALL: [Self; 6] = [Self::NE, Self::E, Self::SE, Self::SW, Self::W, Self::NW];

    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::NE => (1, -1),
            Self::E => (1, 0),
            Self::SE => (0, 1),
            Self::SW => (-1, 1),
            Self::W => (-1, 0),
            Self::NW => (0, -1),
        }
    }
}

/// A move order: step one tile in a direction, or stay put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveVector {
    Step(HexDirection),
    Hold,
}

/// The 19 coordinates of the centered radius-2 hexagon, in a fixed
/// deterministic order (ring 0, then ring 1, then ring 2, each ring
/// walked in `HexDirection::ALL` order). Subsystems that must scan every
/// tile iterate this order so their output is reproducible.
pub const ARENA_COORDS: [HexCoord; 19] = [
    HexCoord::new(0, 0),
    // ring 1
    HexCoord::new(1, -1),
    HexCoord::new(1, 0),
    HexCoord::new(0, 1),
    HexCoord::new(-1, 1),
    HexCoord::new(-1, 0),
    HexCoord::new(0, -1),
    // ring 2
    HexCoord::new(2, -2),
    HexCoord::new(2, -1),
    HexCoord::new(2, 0),
    HexCoord::new(1, 1),
    HexCoord::new(0, 2),
    HexCoord::new(-1, 2),
    HexCoord::new(-2, 2),
    HexCoord::new(-2, 1),
    HexCoord::new(-2, 0),
    HexCoord::new(-1, -1),
    HexCoord::new(0, -2),
    HexCoord::new(1, -2),
];
