//! Value types shared by the map, the pathfinder and the level files.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Integer grid coordinate of a tile.
///
/// Tiles are addressed by a signed `(x, y)` pair because maps may be extended into negative
/// coordinates by the region-filling editor operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    /// Column of the tile.
    pub x: i32,
    /// Row of the tile.
    pub y: i32,
}

impl TilePos {
    /// Builds a coordinate from its two components.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate displaced by `(dx, dy)`.
    ///
    /// Returns [`None`] when the displacement would overflow the coordinate range, which the
    /// pathfinder treats the same as a missing tile.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Tells whether `other` is one of the eight cells surrounding this one.
    pub const fn is_adjacent(self, other: Self) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);

        dx <= 1 && dy <= 1 && (dx | dy) != 0
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.x, self.y)
    }
}

/// Terrain kind of a tile.
///
/// The order of the variants is the order in which the editor cycles through them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    /// Diggable earth, the terrain new maps are made of.
    #[default]
    Dirt,
    /// Diggable earth holding gold.
    Gold,
    /// Undiggable stone.
    Rock,
    /// Flooded ground.
    Water,
    /// Molten ground.
    Lava,
    /// Floor claimed by a dungeon keeper.
    Claimed,
}

impl TileType {
    /// Every tile type, in cycling order.
    pub const ALL: [Self; 6] = [
        Self::Dirt,
        Self::Gold,
        Self::Rock,
        Self::Water,
        Self::Lava,
        Self::Claimed,
    ];

    /// Returns the type following this one, wrapping back to [`TileType::Dirt`].
    pub const fn next(self) -> Self {
        match self {
            Self::Dirt => Self::Gold,
            Self::Gold => Self::Rock,
            Self::Rock => Self::Water,
            Self::Water => Self::Lava,
            Self::Lava => Self::Claimed,
            Self::Claimed => Self::Dirt,
        }
    }

    /// Returns the lower-case name used by level files and the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dirt => "dirt",
            Self::Gold => "gold",
            Self::Rock => "rock",
            Self::Water => "water",
            Self::Lava => "lava",
            Self::Claimed => "claimed",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for TileType {
    type Err = LevelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tile_type| tile_type.as_str().eq_ignore_ascii_case(input))
            .ok_or_else(|| LevelError::UnknownTileType(input.to_owned()))
    }
}

/// Fullness values the editor cycles through, from excavated to solid.
pub const FULLNESS_STEPS: [u32; 5] = [0, 25, 50, 75, 100];

/// Returns the fullness following `fullness` in [`FULLNESS_STEPS`].
///
/// Fullness values that are not part of the cycle snap back to zero.
pub fn next_fullness(fullness: u32) -> u32 {
    FULLNESS_STEPS
        .iter()
        .position(|&step| step == fullness)
        .and_then(|idx| FULLNESS_STEPS.get(idx + 1))
        .copied()
        .unwrap_or(0)
}

/// Three-component vector used for creature positions and mesh scales.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    /// First component.
    pub x: f64,
    /// Second component.
    pub y: f64,
    /// Third component.
    pub z: f64,
}

impl Vector3 {
    /// Builds a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {} {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_pos_offset() {
        let pos = TilePos::new(3, -2);

        assert_eq!(pos.offset(-1, 1), Some(TilePos::new(2, -1)));
        assert_eq!(TilePos::new(i32::MAX, 0).offset(1, 0), None);
    }

    #[test]
    fn test_tile_pos_adjacency() {
        let center = TilePos::new(0, 0);

        assert!(center.is_adjacent(TilePos::new(1, 1)), "diagonal cells are adjacent");
        assert!(center.is_adjacent(TilePos::new(0, -1)), "orthogonal cells are adjacent");
        assert!(!center.is_adjacent(center), "a cell is not adjacent to itself");
        assert!(!center.is_adjacent(TilePos::new(2, 0)), "cells two apart are not adjacent");
    }

    #[test]
    fn test_tile_pos_display() {
        assert_eq!(TilePos::new(4, -7).to_string(), "(4, -7)");
    }

    #[test]
    fn test_tile_type_cycle_wraps() {
        let mut tile_type = TileType::Dirt;
        for _ in 0..TileType::ALL.len() {
            tile_type = tile_type.next();
        }

        assert_eq!(tile_type, TileType::Dirt);
        assert_eq!(TileType::Lava.next(), TileType::Claimed);
    }

    #[test]
    fn test_tile_type_parse() {
        assert_eq!("rock".parse::<TileType>().ok(), Some(TileType::Rock));
        assert_eq!("Gold".parse::<TileType>().ok(), Some(TileType::Gold));
        assert!("marble".parse::<TileType>().is_err(), "unknown names should not parse");
    }

    #[test]
    fn test_next_fullness() {
        assert_eq!(next_fullness(0), 25);
        assert_eq!(next_fullness(75), 100);
        assert_eq!(next_fullness(100), 0);
        assert_eq!(next_fullness(42), 0);
    }
}
