//! Configuration file support.
//!
//! Settings are read from a TOML file. Every field is optional and falls back to its default, and
//! a missing file yields the default configuration.

#![expect(
    clippy::module_name_repetitions,
    reason = "Section types are named after the file they configure."
)]

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr as _};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{pathfinding::Heuristic, types::TileType};

/// Configuration file looked up when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "delvemap.toml";

/// Application settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the level files.
    pub levels_dir: PathBuf,
    /// Level used when the command line names none.
    pub default_level: String,
    /// Most verbose log level shown before `-v` flags are applied.
    pub log_level: LevelFilter,
    /// Defaults for the map editing commands.
    pub editor: EditorConfig,
    /// Settings for path requests.
    pub pathfinding: PathfindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("levels"),
            default_level: "Test".to_owned(),
            log_level: LevelFilter::Warn,
            editor: EditorConfig::default(),
            pathfinding: PathfindingConfig::default(),
        }
    }
}

/// Defaults for the map editing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Width of a new map when the command line gives none.
    pub width: i32,
    /// Height of a new map when the command line gives none.
    pub height: i32,
    /// Terrain kind used by region painting when the command line gives none.
    pub paint_type: TileType,
    /// Fullness used by region painting when the command line gives none.
    pub paint_fullness: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            paint_type: TileType::Claimed,
            paint_fullness: 0,
        }
    }
}

/// Settings for path requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathfindingConfig {
    /// Heuristic used when the command line gives none.
    pub heuristic: Heuristic,
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// This function may return errors if the text is not valid TOML or holds unknown or
    /// mistyped settings.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Renders the configuration as TOML text.
    ///
    /// # Errors
    ///
    /// This function may return errors if a setting cannot be represented in TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reads the configuration file at `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// This function may return errors if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents)
                .wrap_err_with(|| format!("invalid configuration in {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).wrap_err_with(|| format!("failed to read configuration {}", path.display()))
            }
        }
    }

    /// Writes the configuration to `path`, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// This function may return errors if the configuration cannot be rendered or the file cannot
    /// be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = self
            .to_toml_string()
            .wrap_err("failed to render the configuration")?;

        fs::write(path, contents)
            .wrap_err_with(|| format!("failed to write configuration {}", path.display()))
    }

    /// Default paint settings, as a tile type and fullness pair.
    pub const fn paint(&self) -> (TileType, u32) {
        (self.editor.paint_type, self.editor.paint_fullness)
    }
}
