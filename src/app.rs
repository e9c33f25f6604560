//! Core application state and logic for the level editor.

use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use log::{debug, warn};

use crate::{
    cli::{Command, ListTarget},
    config::Config,
    creature::{Creature, CreatureClass},
    file_loader,
    map::GameMap,
    pathfinding::{Heuristic, Path},
    types::{next_fullness, TilePos, TileType},
};

/// Application state container for the level editor.
///
/// This structure holds the settings and the level a command operates on. The map is owned here
/// and lent to the pathfinder and the level writer for the duration of each command.
#[derive(Debug)]
pub struct App {
    /// Settings read from the configuration file.
    ///
    /// This field holds the levels directory, the editor defaults and the pathfinding settings
    /// every command falls back to when the command line leaves them out. The paint brush inside
    /// it is the only part a command ever changes.
    config: Config,
    /// Location of the configuration file.
    ///
    /// This field holds the path the settings were read from, so that a changed paint brush can be
    /// written back to the same file. The file does not need to exist beforehand.
    config_path: PathBuf,
    /// Location of the level being edited.
    ///
    /// This field holds the file the level is read from before each command and written back to
    /// after commands that change it. It is resolved once, either from a bare level name inside
    /// the levels directory or from a path given on the command line.
    level_path: PathBuf,
    /// Level currently held in memory.
    ///
    /// This field holds the map a command operates on. It starts empty and is replaced by the
    /// contents of the level file whenever a command loads it, then lent to the pathfinder and the
    /// level writer for as long as that command runs.
    map: GameMap,
}

impl App {
    /// Creates the application for `level`, or the configured default level.
    ///
    /// `config_path` is where `config` was read from and where brush changes are saved.
    pub fn new(config: Config, config_path: &std::path::Path, level: Option<&str>) -> Self {
        let level = level.unwrap_or(&config.default_level);
        let level_path = file_loader::level_path(&config.levels_dir, level);

        Self {
            config,
            config_path: config_path.to_path_buf(),
            level_path,
            map: GameMap::new(),
        }
    }

    /// File the level is read from and written back to.
    pub fn level_path(&self) -> &std::path::Path {
        &self.level_path
    }

    /// Level currently held by the application.
    pub const fn map(&self) -> &GameMap {
        &self.map
    }

    /// Runs one command and returns the text to show the user.
    ///
    /// Commands that change the level write it back to its file.
    ///
    /// # Errors
    ///
    /// This function may return errors if the level cannot be read or written, a record given on
    /// the command line is malformed, or a path endpoint has no tile.
    pub fn run(&mut self, command: &Command) -> Result<String> {
        debug!("running {command:?} on {}", self.level_path.display());

        match command {
            Command::New { width, height } => self.create(*width, *height),
            Command::AddTiles { x1, y1, x2, y2 } => {
                self.load()?;
                let created = self.map.add_tiles(*x1, *y1, *x2, *y2);
                self.save()?;

                Ok(format!(
                    "Created {created} tiles for region:\n\n\t({}, {})\tto\t({}, {})",
                    x1.min(x2),
                    y1.min(y2),
                    x1.max(x2),
                    y1.max(y2)
                ))
            }
            Command::Paint {
                x1,
                y1,
                x2,
                y2,
                tile_type,
                fullness,
            } => self.paint(
                TilePos::new(*x1, *y1),
                TilePos::new(*x2, *y2),
                *tile_type,
                *fullness,
            ),
            Command::Brush {
                next_type,
                next_fullness,
            } => self.brush(*next_type, *next_fullness),
            Command::AddClass { record } => {
                self.load()?;
                let class: CreatureClass = record.join(" ").parse()?;
                let output = format!("Added class {}", class.class_name);
                self.map.add_class_description(class);
                self.save()?;

                Ok(output)
            }
            Command::AddCreature { record } => {
                self.load()?;
                let creature: Creature = record.join(" ").parse()?;
                let output = format!("Added {} the {}", creature.name, creature.class_name);
                self.map.add_creature(creature)?;
                self.save()?;

                Ok(output)
            }
            Command::List { what } => self.list(*what),
            Command::Path {
                x1,
                y1,
                x2,
                y2,
                heuristic,
            } => {
                self.load()?;
                let (start, goal) = (TilePos::new(*x1, *y1), TilePos::new(*x2, *y2));
                let path = self
                    .map
                    .find_path_with(start, goal, self.heuristic(*heuristic))?;

                Ok(describe_path(start, goal, &path))
            }
            Command::CreaturePath {
                name,
                x,
                y,
                heuristic,
            } => {
                self.load()?;
                let goal = TilePos::new(*x, *y);
                let path = self
                    .map
                    .creature_path(name, goal, self.heuristic(*heuristic))?;
                let start = self
                    .map
                    .creature_by_name(name)
                    .and_then(Creature::tile_pos)
                    .unwrap_or(goal);

                Ok(format!("{name}: {}", describe_path(start, goal, &path)))
            }
        }
    }

    /// Replaces the level's tiles with a solid block, keeping its creatures when the level loads.
    ///
    /// A level file that cannot be read is replaced by a fresh map rather than failing, so a
    /// broken level can always be regenerated.
    fn create(&mut self, width: Option<i32>, height: Option<i32>) -> Result<String> {
        if self.level_path.exists() {
            if let Err(err) = self.load() {
                warn!("discarding unreadable level: {err:#}");
                self.map = GameMap::new();
            }
        }
        let width = width.unwrap_or(self.config.editor.width);
        let height = height.unwrap_or(self.config.editor.height);
        self.map.create_new_map(width, height);
        self.save()?;

        Ok(format!(
            "Created a new {width}x{height} map in {}",
            self.level_path.display()
        ))
    }

    /// Advances the paint brush as requested and reports it.
    ///
    /// A changed brush is written back to the configuration file.
    fn brush(&mut self, advance_type: bool, advance_fullness: bool) -> Result<String> {
        let editor = &mut self.config.editor;
        if advance_type {
            editor.paint_type = editor.paint_type.next();
        }
        if advance_fullness {
            editor.paint_fullness = next_fullness(editor.paint_fullness);
        }
        if advance_type || advance_fullness {
            self.config.save(&self.config_path)?;
        }

        let (tile_type, fullness) = self.config.paint();

        Ok(format!("Paint brush: {tile_type} with fullness {fullness}"))
    }

    /// Paints the inclusive region between `from` and `to`, falling back to the configured paint.
    fn paint(
        &mut self,
        from: TilePos,
        to: TilePos,
        tile_type: Option<TileType>,
        fullness: Option<u32>,
    ) -> Result<String> {
        self.load()?;
        let (default_type, default_fullness) = self.config.paint();
        let tile_type = tile_type.unwrap_or(default_type);
        let fullness = fullness.unwrap_or(default_fullness);
        let painted = self.map.paint_region(from, to, tile_type, fullness);
        self.save()?;

        Ok(format!("Painted {painted} tiles as {tile_type} with fullness {fullness}"))
    }

    /// Renders the part of the level selected by `what`.
    fn list(&mut self, what: ListTarget) -> Result<String> {
        let lines: Vec<String> = match what {
            ListTarget::Levels => file_loader::fetch_levels(&self.config.levels_dir)?,
            ListTarget::Tiles => {
                self.load()?;
                self.map
                    .tiles()
                    .map(|tile| {
                        format!(
                            "{}\t{}\t{}\t{}",
                            tile.pos(),
                            tile.name(),
                            tile.tile_type(),
                            tile.fullness()
                        )
                    })
                    .collect()
            }
            ListTarget::Creatures => {
                self.load()?;
                self.map.creatures().map(ToString::to_string).collect()
            }
            ListTarget::Classes => {
                self.load()?;
                self.map
                    .class_descriptions()
                    .map(ToString::to_string)
                    .collect()
            }
        };

        Ok(lines.join("\n"))
    }

    /// Heuristic given on the command line, or the configured one.
    fn heuristic(&self, requested: Option<Heuristic>) -> Heuristic {
        requested.unwrap_or(self.config.pathfinding.heuristic)
    }

    /// Replaces the held map with the contents of the level file.
    fn load(&mut self) -> Result<()> {
        if !self.level_path.exists() {
            return Err(eyre!(
                "level {} does not exist; create it with the `new` command",
                self.level_path.display()
            ));
        }
        self.map = file_loader::load_level(&self.level_path)?;

        Ok(())
    }

    /// Writes the held map back to the level file.
    fn save(&self) -> Result<()> {
        file_loader::save_level(&self.map, &self.level_path)
    }
}

/// Formats the outcome of a path request.
fn describe_path(start: TilePos, goal: TilePos, path: &Path) -> String {
    if path.is_empty() {
        return format!("No path from {start} to {goal}.");
    }

    let steps: Vec<String> = path.steps().iter().map(ToString::to_string).collect();

    format!(
        "Path from {start} to {goal} ({} tiles, cost {:.3}):\n{}",
        path.len(),
        path.cost(),
        steps.join(" -> ")
    )
}
