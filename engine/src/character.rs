use crate::ability::Abilities;
use crate::fuzzy;
use crate::hit_points::HitPoints;
use crate::record::{AttrError, Record, Value, lookup_chain};
use crate::tables::{CLASSES, RACES, level_for_xp, proficiency_bonus};
use crate::tree::{EntityError, Fields, Tree, to_int, to_text};

const CHARACTER_FIELDS: [&str; 7] = ["name", "race", "class", "abilities", "level", "xp", "hit_points"];

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub race: &'static str,
    pub class: &'static str,
    pub abilities: Abilities,
    pub hit_points: Option<HitPoints>,
    pub level: u32,
    pub xp: u32,
}

impl Character {
    /// Build from a character record. `race` and `class` may be abbreviated;
    /// a missing `level` is derived from `xp`.
    pub fn from_tree(tree: &Tree) -> Result<Self, EntityError> {
        let fields = Fields::resolve(tree, "character", &CHARACTER_FIELDS, false)?;

        let name = to_text(fields.require("name")?, "name")?;
        let race = choose(fields.require("race")?, "race", &RACES)?;
        let class = choose(fields.require("class")?, "class", &CLASSES)?;
        let abilities = Abilities::from_tree(fields.require("abilities")?)?;
        let hit_points = fields.get("hit_points").map(HitPoints::from_tree).transpose()?;
        let xp = match fields.get("xp") {
            Some(t) => non_negative(t, "xp")?,
            None => 0,
        };
        let level = match fields.get("level") {
            Some(t) => non_negative(t, "level")?,
            None => level_for_xp(xp),
        };

        Ok(Self { name, race, class, abilities, hit_points, level, xp })
    }

    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    pub fn record(&self) -> Record {
        let mut record = Record::new()
            .with("name", self.name.as_str())
            .with("race", self.race)
            .with("class", self.class)
            .with("level", self.level)
            .with("xp", self.xp)
            .with("abilities", self.abilities.record());
        if let Some(hp) = &self.hit_points {
            record.set("hit_points", hp.record());
        }
        record
    }

    /// Any field by abbreviated name, ability scores included (`"dex"`).
    pub fn attr(&self, name: &str) -> Result<Value, AttrError> {
        let own = self.record();
        let abilities = self.abilities.record();
        lookup_chain(&[&own, &abilities], name).cloned()
    }
}

fn choose(tree: &Tree, field: &str, options: &[&'static str]) -> Result<&'static str, EntityError> {
    let text = to_text(tree, field)?;
    fuzzy::fuzzy_match(&text, options.iter().copied())
        .map_err(|source| EntityError::Resolve { field: field.to_string(), source })
}

fn non_negative(tree: &Tree, field: &str) -> Result<u32, EntityError> {
    u32::try_from(to_int(tree, field)?).map_err(|_| EntityError::Shape {
        field: field.to_string(),
        expected: "a non-negative integer",
    })
}
