//! Level file loading, saving and discovery.
//!
//! A level is plain text made of three counted sections: tiles, creature class descriptions and
//! creatures. Each section starts with a line holding its record count, followed by one record per
//! line. Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! # tiles
//! 2
//! 0 0 dirt 100
//! 1 0 claimed 0
//! # creature classes
//! 1
//! Skeleton Skeleton.mesh 0.01 0.01 0.01
//! # creatures
//! 1
//! Skeleton Bob 1 0 0
//! ```

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr as _};
use log::{info, warn};

use crate::{
    creature::{Creature, CreatureClass},
    error::LevelError,
    map::GameMap,
    tile::Tile,
    types::TileType,
};

/// File extension of level files, without the dot.
pub const LEVEL_EXTENSION: &str = "level";

/// Scans `dir` for level files and returns their names without the extension, sorted.
///
/// Entries that are not regular files or whose names are not valid UTF-8 are skipped. A directory
/// that does not exist yet holds no levels.
///
/// # Errors
///
/// This function may return errors if the directory or one of its entries cannot be read.
pub fn fetch_levels(dir: &Path) -> Result<Vec<String>> {
    let mut levels = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(levels),
        Err(err) => {
            return Err(err)
                .wrap_err_with(|| format!("failed to list levels in {}", dir.display()));
        }
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir()
            || path.extension().and_then(|ext| ext.to_str()) != Some(LEVEL_EXTENSION)
        {
            continue;
        }

        match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => levels.push(stem.to_owned()),
            None => warn!("skipping level with non UTF-8 name: {}", path.display()),
        }
    }

    levels.sort();

    Ok(levels)
}

/// Resolves a level argument to a file path.
///
/// Arguments naming a `.level` file or containing a path separator are used as given; bare names
/// are looked up inside `levels_dir` with the extension appended.
pub fn level_path(levels_dir: &Path, level: &str) -> PathBuf {
    let as_path = Path::new(level);
    if as_path.extension().and_then(|ext| ext.to_str()) == Some(LEVEL_EXTENSION)
        || as_path.components().count() > 1
    {
        return as_path.to_path_buf();
    }

    levels_dir.join(format!("{level}.{LEVEL_EXTENSION}"))
}

/// Reads and parses the level file at `path`.
///
/// # Errors
///
/// This function may return errors if the file cannot be read or its contents are not a valid
/// level.
pub fn load_level(path: &Path) -> Result<GameMap> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read level {}", path.display()))?;
    let map = parse_level(&contents)
        .wrap_err_with(|| format!("failed to parse level {}", path.display()))?;

    info!(
        "loaded {}: {} tiles, {} class descriptions, {} creatures",
        path.display(),
        map.num_tiles(),
        map.num_class_descriptions(),
        map.num_creatures()
    );

    Ok(map)
}

/// Writes `map` to the level file at `path`, replacing any previous contents.
///
/// # Errors
///
/// This function may return errors if the file cannot be written.
pub fn save_level(map: &GameMap, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, write_level(map))
        .wrap_err_with(|| format!("failed to write level {}", path.display()))?;

    info!("saved {} with {} tiles", path.display(), map.num_tiles());

    Ok(())
}

/// Renders `map` in the level file format.
pub fn write_level(map: &GameMap) -> String {
    let mut lines = vec!["# tiles".to_owned(), map.num_tiles().to_string()];
    lines.extend(map.tiles().map(|tile| {
        let pos = tile.pos();
        format!("{} {} {} {}", pos.x, pos.y, tile.tile_type(), tile.fullness())
    }));

    lines.push("# creature classes".to_owned());
    lines.push(map.num_class_descriptions().to_string());
    lines.extend(map.class_descriptions().map(ToString::to_string));

    lines.push("# creatures".to_owned());
    lines.push(map.num_creatures().to_string());
    lines.extend(map.creatures().map(ToString::to_string));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Parses level text into a map.
///
/// # Errors
///
/// Returns a [`LevelError`] naming the offending line if a count or record is malformed, a tile
/// is duplicated, a creature refers to an unknown class, or content follows the last section.
pub fn parse_level(input: &str) -> Result<GameMap, LevelError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));
    let mut map = GameMap::new();

    for _ in 0..read_count(&mut lines, "tile count")? {
        let (line_no, line) = lines
            .next()
            .ok_or(LevelError::UnexpectedEnd { expected: "tile" })?;
        let tile = parse_tile(line).map_err(|err| malformed(line_no, &err))?;
        map.add_tile(tile)
            .map_err(|source| LevelError::Map { line: line_no, source })?;
    }

    for _ in 0..read_count(&mut lines, "class count")? {
        let (line_no, line) = lines.next().ok_or(LevelError::UnexpectedEnd {
            expected: "creature class",
        })?;
        let class: CreatureClass = line.parse().map_err(|err| malformed(line_no, &err))?;
        map.add_class_description(class);
    }

    for _ in 0..read_count(&mut lines, "creature count")? {
        let (line_no, line) = lines
            .next()
            .ok_or(LevelError::UnexpectedEnd { expected: "creature" })?;
        let creature: Creature = line.parse().map_err(|err| malformed(line_no, &err))?;
        map.add_creature(creature)
            .map_err(|source| LevelError::Map { line: line_no, source })?;
    }

    if let Some((line_no, _)) = lines.next() {
        return Err(LevelError::Malformed {
            line: line_no,
            reason: "unexpected content after the creature section".to_owned(),
        });
    }

    Ok(map)
}

/// Reads the next meaningful line as a section record count.
fn read_count<'text, I>(lines: &mut I, expected: &'static str) -> Result<usize, LevelError>
where
    I: Iterator<Item = (usize, &'text str)>,
{
    let (line_no, line) = lines.next().ok_or(LevelError::UnexpectedEnd { expected })?;

    line.parse().map_err(|_err| LevelError::Malformed {
        line: line_no,
        reason: format!("expected {expected}, found `{line}`"),
    })
}

/// Parses a `<x> <y> <type> <fullness>` tile record.
fn parse_tile(line: &str) -> Result<Tile, LevelError> {
    let invalid = |reason: String| LevelError::InvalidRecord {
        kind: "tile",
        reason,
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [x, y, tile_type, fullness] = fields.as_slice() else {
        return Err(invalid(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };

    let x = x
        .parse()
        .map_err(|_err| invalid(format!("x `{x}` is not a number")))?;
    let y = y
        .parse()
        .map_err(|_err| invalid(format!("y `{y}` is not a number")))?;
    let tile_type: TileType = tile_type.parse()?;
    let fullness = fullness
        .parse()
        .map_err(|_err| invalid(format!("fullness `{fullness}` is not a number")))?;

    Ok(Tile::new(x, y, tile_type, fullness))
}

/// Attaches a line number to a record error.
fn malformed(line: usize, err: &LevelError) -> LevelError {
    LevelError::Malformed {
        line,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::MapError, types::TilePos};

    const SAMPLE: &str = "\
# tiles
3
0 0 dirt 100
1 0 claimed 0
2 0 gold 50

# creature classes
1
Skeleton Skeleton.mesh 0.01 0.01 0.01
# creatures
1
Skeleton Bob 1 0 0
";

    #[test]
    fn test_parse_level_sample() {
        let map = parse_level(SAMPLE).expect("sample level should parse");

        assert_eq!(map.num_tiles(), 3);
        let tile = map.tile_at(2, 0).expect("tile should exist");
        assert_eq!(tile.tile_type(), TileType::Gold);
        assert_eq!(tile.fullness(), 50);
        assert!(
            map.tile_at(1, 0).expect("tile should exist").is_walkable(),
            "an empty tile should load as walkable"
        );

        let bob = map.creature_by_name("Bob").expect("Bob should be loaded");
        assert_eq!(bob.mesh_name, "Skeleton.mesh");
        assert_eq!(bob.tile_pos(), Some(TilePos::new(1, 0)));
    }

    #[test]
    fn test_written_level_parses_back() {
        let map = parse_level(SAMPLE).expect("sample level should parse");

        let reparsed = parse_level(&write_level(&map)).expect("written level should parse");

        assert_eq!(reparsed.tiles().collect::<Vec<_>>(), map.tiles().collect::<Vec<_>>());
        assert_eq!(reparsed.creature(0), map.creature(0));
        assert_eq!(reparsed.class_description_at(0), map.class_description_at(0));
    }

    #[test]
    fn test_parse_level_empty_sections() {
        let map = parse_level("0\n0\n0\n").expect("empty level should parse");

        assert_eq!(map.num_tiles(), 0);
        assert_eq!(map.num_creatures(), 0);
    }

    #[test]
    fn test_parse_level_bad_count() {
        let result = parse_level("# tiles\nmany\n");

        assert!(
            matches!(result, Err(LevelError::Malformed { line: 2, .. })),
            "a non-numeric count should be reported on its line, got {result:?}"
        );
    }

    #[test]
    fn test_parse_level_unknown_tile_type() {
        let result = parse_level("1\n0 0 marble 0\n0\n0\n");

        assert!(
            matches!(result, Err(LevelError::Malformed { line: 2, .. })),
            "an unknown tile type should be reported on its line, got {result:?}"
        );
    }

    #[test]
    fn test_parse_level_duplicate_tile() {
        let result = parse_level("2\n0 0 dirt 0\n0 0 rock 100\n0\n0\n");

        assert_eq!(
            result.err(),
            Some(LevelError::Map {
                line: 3,
                source: MapError::DuplicateTile(TilePos::new(0, 0)),
            })
        );
    }

    #[test]
    fn test_parse_level_unknown_class() {
        let result = parse_level("0\n0\n1\nDragon Smaug 0 0 0\n");

        assert!(
            matches!(
                result,
                Err(LevelError::Map {
                    line: 4,
                    source: MapError::UnknownClass(_),
                })
            ),
            "an undescribed class should be reported on the creature's line, got {result:?}"
        );
    }

    #[test]
    fn test_parse_level_truncated() {
        let result = parse_level("2\n0 0 dirt 0\n");

        assert_eq!(result.err(), Some(LevelError::UnexpectedEnd { expected: "tile" }));
    }

    #[test]
    fn test_parse_level_trailing_content() {
        let result = parse_level("0\n0\n0\nsurprise\n");

        assert!(
            matches!(result, Err(LevelError::Malformed { line: 4, .. })),
            "trailing content should be reported on its line, got {result:?}"
        );
    }

    #[test]
    fn test_level_path_resolution() {
        let dir = Path::new("levels");

        assert_eq!(level_path(dir, "Test"), PathBuf::from("levels/Test.level"));
        assert_eq!(level_path(dir, "other.level"), PathBuf::from("other.level"));
        assert_eq!(level_path(dir, "maps/Test"), PathBuf::from("maps/Test"));
    }

    #[test]
    fn test_fetch_levels_missing_dir_is_empty() {
        let dir = std::env::temp_dir().join("delvemap-no-such-levels-dir");

        let levels = fetch_levels(&dir).expect("a missing directory holds no levels");

        assert!(levels.is_empty(), "no levels should be listed, got {levels:?}");
    }

    #[test]
    fn test_save_fetch_and_load() {
        let dir = std::env::temp_dir().join(format!("delvemap-loader-{}", std::process::id()));
        let mut map = GameMap::new();
        map.create_new_map(3, 2);

        save_level(&map, &level_path(&dir, "Beta")).expect("level should be saved");
        save_level(&map, &level_path(&dir, "Alpha")).expect("level should be saved");
        fs::write(dir.join("notes.txt"), "not a level").expect("file should be written");

        let levels = fetch_levels(&dir).expect("directory should be listed");
        let loaded = load_level(&level_path(&dir, "Alpha")).expect("level should load");
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(levels, ["Alpha", "Beta"]);
        assert_eq!(loaded.num_tiles(), 6);
    }
}
