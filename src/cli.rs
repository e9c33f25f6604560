//! Command line interface definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::{config::DEFAULT_CONFIG_FILE, pathfinding::Heuristic, types::TileType};

/// Edit dungeon levels and query walkable paths across them.
#[derive(Debug, Parser)]
#[command(name = "delvemap", version)]
pub struct Cli {
    /// Configuration file to read.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
    /// Raise the log level; repeat for more detail.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Level to work on, as a name inside the levels directory or a path to a `.level` file.
    #[arg(short, long, global = true)]
    pub level: Option<String>,
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations on a level.
#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Replace the level's tiles with a rectangle of solid dirt.
    New {
        /// Width of the new map.
        width: Option<i32>,
        /// Height of the new map.
        height: Option<i32>,
    },
    /// Add solid dirt wherever a rectangular region has no tile yet.
    ///
    /// The region includes the smaller coordinates and excludes the larger ones.
    AddTiles {
        /// First corner column.
        #[arg(allow_negative_numbers = true)]
        x1: i32,
        /// First corner row.
        #[arg(allow_negative_numbers = true)]
        y1: i32,
        /// Opposite corner column.
        #[arg(allow_negative_numbers = true)]
        x2: i32,
        /// Opposite corner row.
        #[arg(allow_negative_numbers = true)]
        y2: i32,
    },
    /// Set the type and fullness of every tile inside a rectangular region, corners included.
    Paint {
        /// First corner column.
        #[arg(allow_negative_numbers = true)]
        x1: i32,
        /// First corner row.
        #[arg(allow_negative_numbers = true)]
        y1: i32,
        /// Opposite corner column.
        #[arg(allow_negative_numbers = true)]
        x2: i32,
        /// Opposite corner row.
        #[arg(allow_negative_numbers = true)]
        y2: i32,
        /// Terrain kind to paint.
        #[arg(long = "type", value_name = "TYPE")]
        tile_type: Option<TileType>,
        /// Fullness to paint; zero digs the tiles out.
        #[arg(long)]
        fullness: Option<u32>,
    },
    /// Show the paint brush, or advance its tile type or fullness to the next step.
    ///
    /// The brush is kept in the configuration file and used by `paint` when no `--type` or
    /// `--fullness` is given.
    Brush {
        /// Advance the brush to the next tile type.
        #[arg(long)]
        next_type: bool,
        /// Advance the brush to the next fullness step.
        #[arg(long)]
        next_fullness: bool,
    },
    /// Describe a creature class: `<className> <meshName> <sx> <sy> <sz>`.
    AddClass {
        /// Fields of the class record.
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        record: Vec<String>,
    },
    /// Place a creature: `<className> <name> <x> <y> <z>`.
    AddCreature {
        /// Fields of the creature record.
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        record: Vec<String>,
    },
    /// Print part of the level, or the available levels.
    List {
        /// What to print.
        what: ListTarget,
    },
    /// Find a walkable path between two tiles.
    Path {
        /// Start column.
        #[arg(allow_negative_numbers = true)]
        x1: i32,
        /// Start row.
        #[arg(allow_negative_numbers = true)]
        y1: i32,
        /// Goal column.
        #[arg(allow_negative_numbers = true)]
        x2: i32,
        /// Goal row.
        #[arg(allow_negative_numbers = true)]
        y2: i32,
        /// Remaining-cost estimate guiding the search.
        #[arg(long, value_enum)]
        heuristic: Option<Heuristic>,
    },
    /// Find a walkable path from a creature's tile to a goal tile.
    CreaturePath {
        /// Name of the creature.
        name: String,
        /// Goal column.
        #[arg(allow_negative_numbers = true)]
        x: i32,
        /// Goal row.
        #[arg(allow_negative_numbers = true)]
        y: i32,
        /// Remaining-cost estimate guiding the search.
        #[arg(long, value_enum)]
        heuristic: Option<Heuristic>,
    },
}

/// Things the `list` command can print.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    /// Every tile, one level record per line.
    Tiles,
    /// Every creature, one level record per line.
    Creatures,
    /// Every creature class, one level record per line.
    Classes,
    /// The level files in the levels directory.
    Levels,
}
