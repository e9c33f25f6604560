//! Creature classes and the creatures living on a map.
//!
//! Both record kinds are read from single whitespace-separated lines, the same lines that appear
//! in level files and that the editor accepts as command arguments.

use std::{fmt, str::FromStr};

use crate::{
    error::LevelError,
    types::{TilePos, Vector3},
};

/// Shared description of a kind of creature.
#[derive(Clone, Debug, PartialEq)]
#[expect(
    clippy::module_name_repetitions,
    reason = "A bare `Class` would read poorly outside this module."
)]
pub struct CreatureClass {
    /// Name creatures use to refer to this class.
    pub class_name: String,
    /// Mesh file the renderer loads for creatures of this class.
    pub mesh_name: String,
    /// Scale applied to the mesh.
    pub scale: Vector3,
}

impl CreatureClass {
    /// Builds a class description.
    pub fn new(class_name: &str, mesh_name: &str, scale: Vector3) -> Self {
        Self {
            class_name: class_name.to_owned(),
            mesh_name: mesh_name.to_owned(),
            scale,
        }
    }
}

impl FromStr for CreatureClass {
    type Err = LevelError;

    /// Parses `<className> <meshName> <sx> <sy> <sz>`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        const KIND: &str = "class";

        let mut fields = Fields::new(KIND, line);
        let class_name = fields.word("class name")?;
        let mesh_name = fields.word("mesh name")?;
        let scale = fields.vector("scale")?;
        fields.finish()?;

        Ok(Self::new(class_name, mesh_name, scale))
    }
}

impl fmt::Display for CreatureClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {} {}", self.class_name, self.mesh_name, self.scale)
    }
}

/// A creature placed on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    /// Class this creature belongs to.
    pub class_name: String,
    /// Mesh copied from the class when the creature joins a map.
    pub mesh_name: String,
    /// Mesh scale copied from the class when the creature joins a map.
    pub scale: Vector3,
    /// Unique name of the creature within its map.
    pub name: String,
    /// World position, in tile units.
    pub position: Vector3,
    /// Team color index.
    pub color: i32,
    /// Hit points.
    pub hp: i32,
    /// Mana points.
    pub mana: i32,
}

impl Creature {
    /// Builds a creature of `class_name` at `position`, with class data still unresolved.
    pub fn new(class_name: &str, name: &str, position: Vector3) -> Self {
        Self {
            class_name: class_name.to_owned(),
            mesh_name: String::new(),
            scale: Vector3::default(),
            name: name.to_owned(),
            position,
            color: 0,
            hp: 0,
            mana: 0,
        }
    }

    /// Copies the mesh and scale of `class` into this creature.
    pub fn apply_class(&mut self, class: &CreatureClass) {
        self.mesh_name.clone_from(&class.mesh_name);
        self.scale = class.scale;
    }

    /// Returns the tile the creature is standing on.
    ///
    /// The position is rounded to the nearest tile. Returns [`None`] when the position does not
    /// fit the tile coordinate range.
    pub fn tile_pos(&self) -> Option<TilePos> {
        Some(TilePos::new(
            round_to_coord(self.position.x)?,
            round_to_coord(self.position.y)?,
        ))
    }
}

impl FromStr for Creature {
    type Err = LevelError;

    /// Parses `<className> <name> <x> <y> <z>`, optionally followed by `<color> <hp> <mana>`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        const KIND: &str = "creature";

        let mut fields = Fields::new(KIND, line);
        let class_name = fields.word("class name")?;
        let name = fields.word("name")?;
        let position = fields.vector("position")?;
        let mut creature = Self::new(class_name, name, position);

        if !fields.is_empty() {
            creature.color = fields.number("color")?;
            creature.hp = fields.number("hp")?;
            creature.mana = fields.number("mana")?;
        }
        fields.finish()?;

        Ok(creature)
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {} {} {} {}",
            self.class_name, self.name, self.position, self.color, self.hp, self.mana
        )
    }
}

/// Rounds a world coordinate to the nearest tile coordinate.
fn round_to_coord(value: f64) -> Option<i32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return None;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "The value is rounded and range-checked against `i32` right above."
    )]
    let coord = rounded as i32;

    Some(coord)
}

/// Cursor over the whitespace-separated fields of one record line.
struct Fields<'line> {
    /// Record kind, for error messages.
    kind: &'static str,
    /// Remaining fields.
    iter: std::iter::Peekable<std::str::SplitWhitespace<'line>>,
}

impl<'line> Fields<'line> {
    /// Starts reading the fields of `line`.
    fn new(kind: &'static str, line: &'line str) -> Self {
        Self {
            kind,
            iter: line.split_whitespace().peekable(),
        }
    }

    /// Builds an error for this record kind.
    fn error(&self, reason: String) -> LevelError {
        LevelError::InvalidRecord {
            kind: self.kind,
            reason,
        }
    }

    /// Reads the next field as a word.
    fn word(&mut self, what: &str) -> Result<&'line str, LevelError> {
        match self.iter.next() {
            Some(word) => Ok(word),
            None => Err(self.error(format!("missing {what}"))),
        }
    }

    /// Reads the next field as a number.
    fn number<T: FromStr>(&mut self, what: &str) -> Result<T, LevelError> {
        let word = self.word(what)?;
        word.parse()
            .map_err(|_err| self.error(format!("{what} `{word}` is not a number")))
    }

    /// Reads the next three fields as a vector.
    fn vector(&mut self, what: &str) -> Result<Vector3, LevelError> {
        Ok(Vector3::new(
            self.number(what)?,
            self.number(what)?,
            self.number(what)?,
        ))
    }

    /// Whether every field has been consumed.
    fn is_empty(&mut self) -> bool {
        self.iter.peek().is_none()
    }

    /// Fails if fields remain after the record is complete.
    fn finish(mut self) -> Result<(), LevelError> {
        match self.iter.next() {
            None => Ok(()),
            Some(extra) => Err(self.error(format!("unexpected trailing field `{extra}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_line() {
        let class: CreatureClass = "Skeleton Skeleton.mesh 0.01 0.02 0.03"
            .parse()
            .expect("class line should parse");

        assert_eq!(class.class_name, "Skeleton");
        assert_eq!(class.mesh_name, "Skeleton.mesh");
        assert_eq!(class.scale, Vector3::new(0.01, 0.02, 0.03));
        assert_eq!(class.to_string(), "Skeleton Skeleton.mesh 0.01 0.02 0.03");
    }

    #[test]
    fn test_parse_class_line_missing_scale() {
        let result = "Skeleton Skeleton.mesh 0.01".parse::<CreatureClass>();

        assert!(
            matches!(result, Err(LevelError::InvalidRecord { kind: "class", .. })),
            "a short class line should be rejected, got {result:?}"
        );
    }

    #[test]
    fn test_parse_creature_short_line() {
        let creature: Creature = "Skeleton Bob 10 15 0"
            .parse()
            .expect("creature line should parse");

        assert_eq!(creature.class_name, "Skeleton");
        assert_eq!(creature.name, "Bob");
        assert_eq!(creature.position, Vector3::new(10.0, 15.0, 0.0));
        assert_eq!(creature.hp, 0);
        assert!(creature.mesh_name.is_empty(), "class data is only filled in by a map");
    }

    #[test]
    fn test_parse_creature_full_line_round_trips() {
        let line = "Imp Gus 2 3 0 1 25 7";
        let creature: Creature = line.parse().expect("creature line should parse");

        assert_eq!(creature.color, 1);
        assert_eq!(creature.hp, 25);
        assert_eq!(creature.mana, 7);
        assert_eq!(creature.to_string(), line);
    }

    #[test]
    fn test_parse_creature_rejects_garbage() {
        assert!(
            "Imp Gus 2 three 0".parse::<Creature>().is_err(),
            "a non-numeric coordinate should be rejected"
        );
        assert!(
            "Imp Gus 2 3 0 1 25".parse::<Creature>().is_err(),
            "a partial optional tail should be rejected"
        );
        assert!(
            "Imp Gus 2 3 0 1 25 7 9".parse::<Creature>().is_err(),
            "extra fields should be rejected"
        );
    }

    #[test]
    fn test_creature_tile_pos_rounds() {
        let creature = Creature::new("Imp", "Gus", Vector3::new(2.4, 6.6, 0.0));
        assert_eq!(creature.tile_pos(), Some(TilePos::new(2, 7)));

        let lost = Creature::new("Imp", "Lost", Vector3::new(f64::NAN, 0.0, 0.0));
        assert_eq!(lost.tile_pos(), None);
    }

    #[test]
    fn test_apply_class() {
        let class = CreatureClass::new("Imp", "Imp.mesh", Vector3::new(1.0, 1.0, 1.0));
        let mut creature = Creature::new("Imp", "Gus", Vector3::default());
        creature.apply_class(&class);

        assert_eq!(creature.mesh_name, "Imp.mesh");
        assert_eq!(creature.scale, class.scale);
    }
}
