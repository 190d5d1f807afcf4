//! Monster templates and the instances spawned from them.
//!
//! An instance owns only its name and rolled hit points; every other field
//! reads through to the shared template.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ability::Abilities;
use crate::dice::{Dice, Roll};
use crate::hit_points::HitPoints;
use crate::record::{AttrError, Record, Value, lookup_chain};
use crate::tables::xp_for_challenge;
use crate::tree::{EntityError, Fields, Tree, scalar_text, to_text};

const MONSTER_FIELDS: [&str; 4] = ["name", "hp", "abilities", "challenge"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChallengeError {
    #[error("no XP entry for challenge {0}")]
    Unknown(Challenge),
}

/// Challenge rating, fractional below 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Challenge(pub f64);

impl Challenge {
    /// A number (`0.25`) or a fraction (`"1/4"`).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value = match text.split_once('/') {
            Some((num, den)) => {
                let num: f64 = num.trim().parse().ok()?;
                let den: f64 = den.trim().parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => text.parse().ok()?,
        };
        value.is_finite().then_some(Self(value))
    }

    pub fn xp(&self) -> Result<u32, ChallengeError> {
        xp_for_challenge(self.0).ok_or(ChallengeError::Unknown(*self))
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cr = self.0;
        if cr > 0.0 && cr < 1.0 && (1.0 / cr).fract() == 0.0 {
            write!(f, "1/{}", 1.0 / cr)
        } else {
            write!(f, "{cr}")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterTemplate {
    pub name: String,
    pub hit_dice: Roll,
    pub abilities: Abilities,
    pub challenge: Challenge,
}

impl MonsterTemplate {
    pub fn from_tree(tree: &Tree) -> Result<Self, EntityError> {
        let fields = Fields::resolve(tree, "monster", &MONSTER_FIELDS, false)?;

        let name = to_text(fields.require("name")?, "name")?;
        let hit_dice = Roll::parse(&to_text(fields.require("hp")?, "hp")?)?;
        let abilities = Abilities::from_tree(fields.require("abilities")?)?;
        let challenge = scalar_text(fields.require("challenge")?)
            .as_deref()
            .and_then(Challenge::parse)
            .ok_or_else(|| EntityError::Shape {
                field: "challenge".to_string(),
                expected: "a number or fraction",
            })?;

        Ok(Self { name, hit_dice, abilities, challenge })
    }

    /// XP for defeating one of these; fails for ratings missing from the table.
    pub fn xp(&self) -> Result<u32, ChallengeError> {
        self.challenge.xp()
    }

    pub fn record(&self) -> Record {
        let mut record = Record::new()
            .with("name", self.name.as_str())
            .with("hit_dice", self.hit_dice)
            .with("challenge", self.challenge.to_string());
        if let Ok(xp) = self.xp() {
            record.set("xp", xp);
        }
        record.with("abilities", self.abilities.record())
    }

    /// A new instance with freshly rolled hit points.
    pub fn spawn(template: &Rc<Self>, dice: &mut Dice, name: impl Into<String>) -> MonsterInstance {
        let max = dice.sample(&template.hit_dice).max(1);
        let name = name.into();
        debug!(template = %template.name, instance = %name, hp = max, "spawned");
        MonsterInstance {
            name,
            hit_points: HitPoints::new(max),
            template: Rc::clone(template),
        }
    }

    /// `count` instances named `"<template> 1"` .. `"<template> N"`, or just
    /// the template's name when `count` is 1.
    pub fn spawn_group(template: &Rc<Self>, dice: &mut Dice, count: usize) -> Vec<MonsterInstance> {
        if count == 1 {
            return vec![Self::spawn(template, dice, template.name.clone())];
        }
        (1..=count)
            .map(|i| Self::spawn(template, dice, format!("{} {}", template.name, i)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterInstance {
    pub name: String,
    pub hit_points: HitPoints,
    template: Rc<MonsterTemplate>,
}

impl MonsterInstance {
    pub fn template(&self) -> &Rc<MonsterTemplate> {
        &self.template
    }

    pub fn abilities(&self) -> &Abilities {
        &self.template.abilities
    }

    pub fn same_template(&self, other: &MonsterInstance) -> bool {
        Rc::ptr_eq(&self.template, &other.template)
    }

    /// Own fields only.
    pub fn record(&self) -> Record {
        Record::new()
            .with("name", self.name.as_str())
            .with("hit_points", self.hit_points.record())
            .with("template", self.template.name.as_str())
    }

    /// Own fields first, then the template's, then its ability scores.
    pub fn attr(&self, name: &str) -> Result<Value, AttrError> {
        let own = self.record();
        let template = self.template.record();
        let abilities = self.template.abilities.record();
        lookup_chain(&[&own, &template, &abilities], name).cloned()
    }
}
