//! Tile record, the unit cell of a game map.

use crate::types::{TilePos, TileType};

/// Unit cell of the map grid.
///
/// A tile is walkable exactly when its fullness is zero; any positive fullness makes it solid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Grid coordinate, fixed for the tile's whole life.
    pos: TilePos,
    /// Terrain kind.
    tile_type: TileType,
    /// How solid the tile is, zero meaning fully excavated.
    fullness: u32,
    /// Whether the tile is part of the current editor selection.
    selected: bool,
    /// Display name, also used by the renderer to pick tiles under the mouse.
    name: String,
}

impl Tile {
    /// Creates an unselected tile named after its coordinate.
    pub fn new(x: i32, y: i32, tile_type: TileType, fullness: u32) -> Self {
        Self {
            pos: TilePos::new(x, y),
            tile_type,
            fullness,
            selected: false,
            name: format!("Level_{x:>3}_{y:>3}"),
        }
    }

    /// Grid coordinate of the tile.
    pub const fn pos(&self) -> TilePos {
        self.pos
    }

    /// Terrain kind of the tile.
    pub const fn tile_type(&self) -> TileType {
        self.tile_type
    }

    /// Changes the terrain kind of the tile.
    pub fn set_tile_type(&mut self, tile_type: TileType) {
        self.tile_type = tile_type;
    }

    /// Fullness of the tile.
    pub const fn fullness(&self) -> u32 {
        self.fullness
    }

    /// Changes the fullness of the tile, which may change its walkability.
    pub fn set_fullness(&mut self, fullness: u32) {
        self.fullness = fullness;
    }

    /// Whether the tile is selected in the editor.
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Marks the tile as selected or not.
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Display name of the tile.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a path may pass through this tile.
    pub const fn is_walkable(&self) -> bool {
        self.fullness == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_name_is_padded() {
        let tile = Tile::new(4, 12, TileType::Dirt, 100);

        assert_eq!(tile.name(), "Level_  4_ 12");
        assert_eq!(Tile::new(-5, 300, TileType::Dirt, 0).name(), "Level_ -5_300");
    }

    #[test]
    fn test_tile_walkability_follows_fullness() {
        let mut tile = Tile::new(0, 0, TileType::Rock, 100);
        assert!(!tile.is_walkable(), "a tile with fullness should be solid");

        tile.set_fullness(0);
        assert!(tile.is_walkable(), "an empty tile should be walkable");

        tile.set_fullness(25);
        assert!(!tile.is_walkable(), "a tile with fullness should be solid");
    }

    #[test]
    fn test_tile_mutators() {
        let mut tile = Tile::new(1, 2, TileType::Dirt, 50);
        tile.set_tile_type(TileType::Claimed);
        tile.set_selected(true);

        assert_eq!(tile.tile_type(), TileType::Claimed);
        assert!(tile.is_selected(), "the tile should be selected");
        assert_eq!(tile.pos(), TilePos::new(1, 2));
    }
}
