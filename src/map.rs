//! Game map data and management module.
//!
//! This module contains the [`GameMap`] struct, which exclusively owns the tiles, the creature
//! class descriptions and the creatures of one level. Every consumer receives the map by
//! reference; there is no process-wide map instance.

use std::collections::{hash_map::Entry, HashMap};

use log::debug;

use crate::{
    creature::{Creature, CreatureClass},
    error::{MapError, PathError},
    pathfinding::{self, Heuristic, Path, Walkability},
    tile::Tile,
    types::{TilePos, TileType},
};

/// Fullness given to tiles created by [`GameMap::create_new_map`] and [`GameMap::add_tiles`].
pub const SOLID_FULLNESS: u32 = 100;

/// Tile map of one level, together with the creatures living on it.
///
/// Tiles keep the order in which they were added, so [`GameMap::tile`] addresses them by linear
/// index, while a coordinate index answers [`GameMap::tile_at`] without scanning. No two tiles
/// share a coordinate.
#[derive(Clone, Debug, Default)]
#[expect(
    clippy::module_name_repetitions,
    reason = "`GameMap` matches the name levels and tools use for the type."
)]
pub struct GameMap {
    /// Tiles of the level.
    ///
    /// This field holds every tile in the order it was added, which is the order level files list
    /// them in and the order linear indices refer to. Tiles are only ever appended or cleared all
    /// at once, so an index stays valid until the next clear.
    tiles: Vec<Tile>,
    /// Coordinate lookup for the tiles.
    ///
    /// This field maps each tile's coordinate to its position in the tile list. It is kept in step
    /// with that list on every insertion and clear, and is what rejects a second tile at an
    /// occupied coordinate.
    index: HashMap<TilePos, usize>,
    /// Creature classes known to this map.
    ///
    /// This field holds the class descriptions a creature must name to join the map. Lookups by
    /// name return the first description added under that name.
    class_descriptions: Vec<CreatureClass>,
    /// Creatures placed on the map.
    creatures: Vec<Creature>,
    /// Creatures picked up by the keeper.
    ///
    /// This field holds creatures that have been lifted off the map. They keep their data but take
    /// no part in lookups by name or in creature path requests.
    creatures_in_hand: Vec<Creature>,
}

impl GameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every tile with a `width` by `height` block of solid dirt.
    ///
    /// The block covers `0..width` horizontally and `0..height` vertically; tiles are added row by
    /// row. Creatures and classes are left untouched.
    pub fn create_new_map(&mut self, width: i32, height: i32) {
        self.clear_tiles();

        for y in 0..height {
            for x in 0..width {
                self.push_tile(Tile::new(x, y, TileType::Dirt, SOLID_FULLNESS));
            }
        }

        debug!("created new {width}x{height} map");
    }

    /// Returns the tile at `(x, y)`, or [`None`] when the map has no tile there.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tile_at_pos(TilePos::new(x, y))
    }

    /// Returns the tile at `pos`, or [`None`] when the map has no tile there.
    pub fn tile_at_pos(&self, pos: TilePos) -> Option<&Tile> {
        self.index.get(&pos).and_then(|&idx| self.tiles.get(idx))
    }

    /// Returns the tile with linear index `index`, in insertion order.
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Number of tiles on the map.
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Iterates over the tiles in insertion order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Adds a tile to the map.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DuplicateTile`] if a tile already exists at the same coordinate.
    pub fn add_tile(&mut self, tile: Tile) -> Result<(), MapError> {
        match self.index.entry(tile.pos()) {
            Entry::Occupied(_) => Err(MapError::DuplicateTile(tile.pos())),
            Entry::Vacant(slot) => {
                let _ = slot.insert(self.tiles.len());
                self.tiles.push(tile);
                Ok(())
            }
        }
    }

    /// Adds a tile whose coordinate is known to be free.
    fn push_tile(&mut self, tile: Tile) {
        let _ = self.index.insert(tile.pos(), self.tiles.len());
        self.tiles.push(tile);
    }

    /// Fills a rectangular region with solid dirt wherever no tile exists yet.
    ///
    /// The region spans from the smaller to the larger of each coordinate pair, including the
    /// lower bound and excluding the upper one. Existing tiles are left untouched. Returns the
    /// number of tiles created.
    pub fn add_tiles(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> usize {
        let mut created = 0;

        for y in y1.min(y2)..y1.max(y2) {
            for x in x1.min(x2)..x1.max(x2) {
                let pos = TilePos::new(x, y);
                if !self.index.contains_key(&pos) {
                    self.push_tile(Tile::new(x, y, TileType::Dirt, SOLID_FULLNESS));
                    created += 1;
                }
            }
        }

        debug!("added {created} tiles between ({x1}, {y1}) and ({x2}, {y2})");

        created
    }

    /// Selects every tile inside the inclusive rectangle spanned by `from` and `to`.
    ///
    /// Tiles outside the rectangle are deselected. Returns the number of selected tiles.
    pub fn select_region(&mut self, from: TilePos, to: TilePos) -> usize {
        let mut selected = 0;

        for tile in &mut self.tiles {
            let inside = in_region(tile.pos(), from, to);
            tile.set_selected(inside);
            if inside {
                selected += 1;
            }
        }

        selected
    }

    /// Deselects every tile.
    pub fn clear_selection(&mut self) {
        for tile in &mut self.tiles {
            tile.set_selected(false);
        }
    }

    /// Sets the type and fullness of every tile inside the inclusive rectangle spanned by `from`
    /// and `to`.
    ///
    /// Coordinates without a tile are skipped. Returns the number of tiles changed.
    pub fn paint_region(
        &mut self,
        from: TilePos,
        to: TilePos,
        tile_type: TileType,
        fullness: u32,
    ) -> usize {
        let mut painted = 0;

        for tile in self
            .tiles
            .iter_mut()
            .filter(|tile| in_region(tile.pos(), from, to))
        {
            tile.set_tile_type(tile_type);
            tile.set_fullness(fullness);
            painted += 1;
        }

        debug!("painted {painted} tiles between {from} and {to} as {tile_type}/{fullness}");

        painted
    }

    /// Adds a creature class description.
    ///
    /// Lookups by name return the first description added under that name.
    pub fn add_class_description(&mut self, class: CreatureClass) {
        self.class_descriptions.push(class);
    }

    /// Returns the class description named `class_name`.
    pub fn class_description(&self, class_name: &str) -> Option<&CreatureClass> {
        self.class_descriptions
            .iter()
            .find(|class| class.class_name == class_name)
    }

    /// Returns the class description with linear index `index`.
    pub fn class_description_at(&self, index: usize) -> Option<&CreatureClass> {
        self.class_descriptions.get(index)
    }

    /// Number of class descriptions on the map.
    pub fn num_class_descriptions(&self) -> usize {
        self.class_descriptions.len()
    }

    /// Iterates over the class descriptions in insertion order.
    pub fn class_descriptions(&self) -> impl Iterator<Item = &CreatureClass> {
        self.class_descriptions.iter()
    }

    /// Places a creature on the map, copying mesh and scale from its class.
    ///
    /// # Errors
    ///
    /// This function may return errors if:
    /// - The creature's class has not been described on this map
    /// - Another creature on the map already has the same name
    pub fn add_creature(&mut self, mut creature: Creature) -> Result<(), MapError> {
        let class = self
            .class_description(&creature.class_name)
            .ok_or_else(|| MapError::UnknownClass(creature.class_name.clone()))?;
        creature.apply_class(class);

        if self.creature_by_name(&creature.name).is_some() {
            return Err(MapError::DuplicateCreature(creature.name));
        }

        self.creatures.push(creature);

        Ok(())
    }

    /// Returns the creature with linear index `index`.
    pub fn creature(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    /// Returns the creature named `name`.
    pub fn creature_by_name(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|creature| creature.name == name)
    }

    /// Number of creatures on the map.
    pub fn num_creatures(&self) -> usize {
        self.creatures.len()
    }

    /// Iterates over the creatures in insertion order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    /// Puts a creature into the keeper's hand.
    pub fn add_creature_to_hand(&mut self, creature: Creature) {
        self.creatures_in_hand.push(creature);
    }

    /// Returns the creature at position `index` in the keeper's hand.
    pub fn creature_in_hand(&self, index: usize) -> Option<&Creature> {
        self.creatures_in_hand.get(index)
    }

    /// Takes the creature at position `index` out of the keeper's hand.
    ///
    /// Returns [`None`] when the hand holds fewer than `index + 1` creatures.
    pub fn remove_creature_from_hand(&mut self, index: usize) -> Option<Creature> {
        (index < self.creatures_in_hand.len()).then(|| self.creatures_in_hand.remove(index))
    }

    /// Number of creatures in the keeper's hand.
    pub fn num_creatures_in_hand(&self) -> usize {
        self.creatures_in_hand.len()
    }

    /// Removes every tile.
    pub fn clear_tiles(&mut self) {
        self.tiles.clear();
        self.index.clear();
    }

    /// Removes every creature from the map.
    pub fn clear_creatures(&mut self) {
        self.creatures.clear();
    }

    /// Removes every class description.
    pub fn clear_classes(&mut self) {
        self.class_descriptions.clear();
    }

    /// Removes tiles, creatures and class descriptions.
    pub fn clear_all(&mut self) {
        self.clear_tiles();
        self.clear_creatures();
        self.clear_classes();
    }

    /// Finds a walkable path from `start` to `goal` with the default heuristic.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidEndpoint`] when `start` or `goal` has no tile.
    pub fn find_path(&self, start: TilePos, goal: TilePos) -> Result<Path, PathError> {
        pathfinding::find_path(self, start, goal)
    }

    /// Finds a walkable path from `start` to `goal` with the given heuristic.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidEndpoint`] when `start` or `goal` has no tile.
    pub fn find_path_with(
        &self,
        start: TilePos,
        goal: TilePos,
        heuristic: Heuristic,
    ) -> Result<Path, PathError> {
        pathfinding::find_path_with(self, start, goal, heuristic)
    }

    /// Finds a walkable path and resolves it to the map's tiles, start to goal.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidEndpoint`] when `start` or `goal` has no tile.
    pub fn path_tiles(&self, start: TilePos, goal: TilePos) -> Result<Vec<&Tile>, PathError> {
        let path = self.find_path(start, goal)?;

        Ok(path
            .steps()
            .iter()
            .filter_map(|&pos| self.tile_at_pos(pos))
            .collect())
    }

    /// Finds a walkable path from the tile under the creature named `name` to `goal`.
    ///
    /// # Errors
    ///
    /// This function may return errors if:
    /// - No creature is named `name`
    /// - The creature's position does not fall on a tile coordinate
    /// - The creature's tile or `goal` has no tile in the map
    pub fn creature_path(
        &self,
        name: &str,
        goal: TilePos,
        heuristic: Heuristic,
    ) -> Result<Path, MapError> {
        let creature = self
            .creature_by_name(name)
            .ok_or_else(|| MapError::UnknownCreature(name.to_owned()))?;
        let start = creature
            .tile_pos()
            .ok_or_else(|| MapError::CreatureOffMap(name.to_owned()))?;

        Ok(self.find_path_with(start, goal, heuristic)?)
    }
}

impl Walkability for GameMap {
    fn walkable(&self, pos: TilePos) -> Option<bool> {
        self.tile_at_pos(pos).map(Tile::is_walkable)
    }
}

/// Whether `pos` lies inside the inclusive rectangle spanned by `from` and `to`.
const fn in_region(pos: TilePos, from: TilePos, to: TilePos) -> bool {
    let (min_x, max_x) = if from.x < to.x { (from.x, to.x) } else { (to.x, from.x) };
    let (min_y, max_y) = if from.y < to.y { (from.y, to.y) } else { (to.y, from.y) };

    pos.x >= min_x && pos.x <= max_x && pos.y >= min_y && pos.y <= max_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector3;

    /// Builds a 4x3 solid map that knows the `Skeleton` class.
    fn skeleton_map() -> GameMap {
        let mut map = GameMap::new();
        map.create_new_map(4, 3);
        map.add_class_description(CreatureClass::new(
            "Skeleton",
            "Skeleton.mesh",
            Vector3::new(0.01, 0.01, 0.01),
        ));
        map
    }

    #[test]
    fn test_create_new_map() {
        let map = skeleton_map();

        assert_eq!(map.num_tiles(), 12);
        let tile = map.tile_at(3, 2).expect("corner tile should exist");
        assert_eq!(tile.tile_type(), TileType::Dirt);
        assert_eq!(tile.fullness(), SOLID_FULLNESS);
        assert!(map.tile_at(4, 0).is_none(), "the map should end at x = 3");
        assert!(map.tile_at(-1, 0).is_none(), "the map should start at x = 0");
    }

    #[test]
    fn test_linear_index_follows_rows() {
        let map = skeleton_map();

        assert_eq!(map.tile(0).map(Tile::pos), Some(TilePos::new(0, 0)));
        assert_eq!(map.tile(5).map(Tile::pos), Some(TilePos::new(1, 1)));
        assert!(map.tile(12).is_none(), "there are only twelve tiles");
    }

    #[test]
    fn test_lookup_matches_linear_scan() {
        let mut map = GameMap::new();
        let _ = map.add_tiles(-3, -2, 3, 2);

        for tile in map.tiles() {
            let found = map.tile_at_pos(tile.pos()).expect("indexed tile should exist");
            assert_eq!(found, tile);
        }
    }

    #[test]
    fn test_add_tile_rejects_duplicates() {
        let mut map = skeleton_map();

        let result = map.add_tile(Tile::new(1, 1, TileType::Rock, 0));
        assert_eq!(result, Err(MapError::DuplicateTile(TilePos::new(1, 1))));
        assert_eq!(map.num_tiles(), 12);

        map.add_tile(Tile::new(10, 10, TileType::Rock, 0))
            .expect("free coordinate should accept a tile");
        assert_eq!(map.num_tiles(), 13);
    }

    #[test]
    fn test_add_tiles_fills_half_open_region() {
        let mut map = skeleton_map();

        let created = map.add_tiles(6, 4, 2, 0);

        // Columns 2..6 and rows 0..4, minus the 2x3 overlap with the existing 4x3 block.
        assert_eq!(created, 16 - 6);
        assert!(map.tile_at(5, 3).is_some(), "the region should include its lower corner block");
        assert!(map.tile_at(6, 0).is_none(), "the region should exclude its right edge");
        assert!(map.tile_at(2, 4).is_none(), "the region should exclude its top edge");
    }

    #[test]
    fn test_select_region_replaces_selection() {
        let mut map = skeleton_map();

        assert_eq!(map.select_region(TilePos::new(0, 0), TilePos::new(1, 1)), 4);
        assert_eq!(map.select_region(TilePos::new(3, 2), TilePos::new(2, 2)), 2);
        assert!(
            !map.tile_at(0, 0).expect("tile should exist").is_selected(),
            "the earlier selection should be replaced"
        );
        assert!(
            map.tile_at(2, 2).expect("tile should exist").is_selected(),
            "the region corner should be selected"
        );

        map.clear_selection();
        assert!(map.tiles().all(|tile| !tile.is_selected()), "no tile should stay selected");
    }

    #[test]
    fn test_paint_region_skips_missing_tiles() {
        let mut map = skeleton_map();

        let painted = map.paint_region(TilePos::new(2, 1), TilePos::new(9, 9), TileType::Claimed, 0);

        assert_eq!(painted, 4);
        let tile = map.tile_at(3, 2).expect("tile should exist");
        assert_eq!(tile.tile_type(), TileType::Claimed);
        assert!(tile.is_walkable(), "painted tile should be walkable");
        assert!(
            !map.tile_at(1, 1).expect("tile should exist").is_walkable(),
            "tiles outside the region should keep their fullness"
        );
    }

    #[test]
    fn test_add_creature_copies_class_data() {
        let mut map = skeleton_map();

        map.add_creature(Creature::new("Skeleton", "Bob", Vector3::new(1.0, 2.0, 0.0)))
            .expect("creature of a known class should be added");

        let bob = map.creature_by_name("Bob").expect("Bob should be on the map");
        assert_eq!(bob.mesh_name, "Skeleton.mesh");
        assert_eq!(bob.scale, Vector3::new(0.01, 0.01, 0.01));
        assert_eq!(map.num_creatures(), 1);
        assert!(map.creature(0).is_some(), "the creature should be indexed");
    }

    #[test]
    fn test_add_creature_errors() {
        let mut map = skeleton_map();
        map.add_creature(Creature::new("Skeleton", "Bob", Vector3::default()))
            .expect("first creature should be added");

        assert_eq!(
            map.add_creature(Creature::new("Dragon", "Smaug", Vector3::default())),
            Err(MapError::UnknownClass("Dragon".to_owned()))
        );
        assert_eq!(
            map.add_creature(Creature::new("Skeleton", "Bob", Vector3::default())),
            Err(MapError::DuplicateCreature("Bob".to_owned()))
        );
    }

    #[test]
    fn test_creatures_in_hand() {
        let mut map = GameMap::new();
        map.add_creature_to_hand(Creature::new("Imp", "A", Vector3::default()));
        map.add_creature_to_hand(Creature::new("Imp", "B", Vector3::default()));

        assert_eq!(map.num_creatures_in_hand(), 2);
        assert_eq!(map.creature_in_hand(1).map(|creature| creature.name.as_str()), Some("B"));

        let taken = map.remove_creature_from_hand(0).expect("hand holds a creature");
        assert_eq!(taken.name, "A");
        assert!(map.remove_creature_from_hand(5).is_none(), "an empty slot holds no creature");
        assert_eq!(map.num_creatures_in_hand(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut map = skeleton_map();
        map.add_creature(Creature::new("Skeleton", "Bob", Vector3::default()))
            .expect("creature should be added");

        map.clear_all();

        assert_eq!(map.num_tiles(), 0);
        assert_eq!(map.num_creatures(), 0);
        assert_eq!(map.num_class_descriptions(), 0);
        assert!(map.tile_at(0, 0).is_none(), "the coordinate index should be cleared");
    }

    #[test]
    fn test_creature_path_starts_under_creature() {
        let mut map = skeleton_map();
        let _ = map.paint_region(TilePos::new(0, 0), TilePos::new(3, 2), TileType::Claimed, 0);
        map.add_creature(Creature::new("Skeleton", "Bob", Vector3::new(0.2, 1.9, 0.0)))
            .expect("creature should be added");

        let path = map
            .creature_path("Bob", TilePos::new(3, 0), Heuristic::Manhattan)
            .expect("both endpoints exist");

        assert_eq!(path.first(), Some(TilePos::new(0, 2)));
        assert_eq!(path.last(), Some(TilePos::new(3, 0)));
        assert_eq!(
            map.creature_path("Nobody", TilePos::new(3, 0), Heuristic::Manhattan),
            Err(MapError::UnknownCreature("Nobody".to_owned()))
        );
    }

    #[test]
    fn test_path_tiles_resolves_tiles() {
        let mut map = skeleton_map();
        let _ = map.paint_region(TilePos::new(0, 0), TilePos::new(3, 0), TileType::Claimed, 0);

        let tiles = map
            .path_tiles(TilePos::new(0, 0), TilePos::new(3, 0))
            .expect("both endpoints exist");

        let names: Vec<&str> = tiles.iter().map(|tile| tile.name()).collect();
        assert_eq!(
            names,
            ["Level_  0_  0", "Level_  1_  0", "Level_  2_  0", "Level_  3_  0"]
        );
    }
}
