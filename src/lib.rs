//! Tile map editing and A* pathfinding for dungeon levels.
//!
//! A level is a sparse grid of [`Tile`]s addressed by integer coordinates, together with the
//! creature classes and creatures placed on it. Tiles are walkable when they are fully dug out, and
//! [`find_path`] connects two tiles with the cheapest eight-directional walk between them.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

#[cfg(test)]
use env_logger as _;

pub mod app;
pub mod cli;
pub mod config;
pub mod creature;
pub mod error;
pub mod file_loader;
pub mod logging;
pub mod map;
pub mod pathfinding;
pub mod tile;
pub mod types;

pub use app::App;
pub use config::Config;
pub use error::{LevelError, MapError, PathError};
pub use map::GameMap;
pub use pathfinding::{find_path, find_path_with, Heuristic, Path, Walkability};
pub use tile::Tile;
pub use types::{TilePos, TileType};
