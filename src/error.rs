//! Error types for map editing, pathfinding and level parsing.

#![expect(
    clippy::module_name_repetitions,
    reason = "The error types are re-exported from the crate root."
)]

use thiserror::Error;

use crate::types::TilePos;

/// Failures of a path request.
///
/// An unreachable goal is not an error: it yields an empty path instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The start or goal coordinate has no tile in the map.
    #[error("no tile at path endpoint {0}")]
    InvalidEndpoint(TilePos),
}

/// Failures of map editing operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// A tile already exists at the coordinate of the tile being added.
    #[error("a tile already exists at {0}")]
    DuplicateTile(TilePos),
    /// A creature refers to a class that has not been described on this map.
    #[error("unknown creature class `{0}`")]
    UnknownClass(String),
    /// A creature with the same name already lives on this map.
    #[error("a creature named `{0}` already exists")]
    DuplicateCreature(String),
    /// No creature with the given name lives on this map.
    #[error("no creature named `{0}`")]
    UnknownCreature(String),
    /// A creature's position cannot be mapped to a tile coordinate.
    #[error("creature `{0}` is not standing on a tile coordinate")]
    CreatureOffMap(String),
    /// A path request failed.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Failures while reading level text or single level records.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// A tile type name was not recognized.
    #[error("unknown tile type `{0}`")]
    UnknownTileType(String),
    /// A single record (tile, class or creature line) could not be parsed.
    #[error("invalid {kind} record: {reason}")]
    InvalidRecord {
        /// Kind of record being parsed.
        kind: &'static str,
        /// Description of what was wrong with the record.
        reason: String,
    },
    /// A line could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed {
        /// One-based line number in the level text.
        line: usize,
        /// Description of what was wrong with the line.
        reason: String,
    },
    /// The text ended before every announced record was read.
    #[error("unexpected end of level, expected {expected}")]
    UnexpectedEnd {
        /// Name of the section or record that was expected next.
        expected: &'static str,
    },
    /// The parsed records could not be assembled into a map.
    #[error("line {line}: {source}")]
    Map {
        /// One-based line number of the offending record.
        line: usize,
        /// The underlying map error.
        #[source]
        source: MapError,
    },
}
