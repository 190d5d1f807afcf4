//! Combatants and initiative order.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::ability::{Abilities, Ability};
use crate::character::Character;
use crate::dice::{AdMode, Dice};
use crate::hit_points::HitPoints;
use crate::monster::{MonsterInstance, MonsterTemplate};
use crate::record::{AttrError, Record, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Combatant {
    Character(Character),
    Monster(MonsterInstance),
}

impl Combatant {
    pub fn name(&self) -> &str {
        match self {
            Combatant::Character(c) => &c.name,
            Combatant::Monster(m) => &m.name,
        }
    }

    fn rename(&mut self, name: String) {
        match self {
            Combatant::Character(c) => c.name = name,
            Combatant::Monster(m) => m.name = name,
        }
    }

    pub fn abilities(&self) -> &Abilities {
        match self {
            Combatant::Character(c) => &c.abilities,
            Combatant::Monster(m) => m.abilities(),
        }
    }

    pub fn hit_points(&self) -> Option<&HitPoints> {
        match self {
            Combatant::Character(c) => c.hit_points.as_ref(),
            Combatant::Monster(m) => Some(&m.hit_points),
        }
    }

    pub fn is_monster(&self) -> bool {
        matches!(self, Combatant::Monster(_))
    }

    pub fn attr(&self, name: &str) -> Result<Value, AttrError> {
        match self {
            Combatant::Character(c) => c.attr(name),
            Combatant::Monster(m) => m.attr(name),
        }
    }

    pub fn record(&self) -> Record {
        match self {
            Combatant::Character(c) => c.record(),
            Combatant::Monster(m) => m.record(),
        }
    }
}

impl From<Character> for Combatant {
    fn from(c: Character) -> Self {
        Combatant::Character(c)
    }
}

impl From<MonsterInstance> for Combatant {
    fn from(m: MonsterInstance) -> Self {
        Combatant::Monster(m)
    }
}

/// Who rolls initiative together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Group {
    Solo(usize),
    Template(*const MonsterTemplate),
}

fn group_of(index: usize, combatant: &Combatant) -> Group {
    match combatant {
        Combatant::Character(_) => Group::Solo(index),
        Combatant::Monster(m) => Group::Template(Rc::as_ptr(m.template())),
    }
}

/// Combatants in turn order plus their initiative scores, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Encounter {
    combatants: Vec<Combatant>,
    initiative: IndexMap<String, i32>,
}

impl Encounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the encounter. Names stay unique: a name already present gets
    /// the first free numeric suffix (`"Goblin"` becomes `"Goblin 2"`).
    pub fn add(&mut self, combatant: impl Into<Combatant>) {
        let mut combatant = combatant.into();
        if self.is_taken(combatant.name()) {
            let base = combatant.name().to_string();
            let mut n = 2;
            let name = loop {
                let candidate = format!("{base} {n}");
                if !self.is_taken(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            debug!(from = %base, to = %name, "renamed duplicate combatant");
            combatant.rename(name);
        }
        self.combatants.push(combatant);
    }

    fn is_taken(&self, name: &str) -> bool {
        self.combatants.iter().any(|c| c.name() == name)
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn initiative(&self, name: &str) -> Option<i32> {
        self.initiative.get(name).copied()
    }

    /// Roll one d20 + DEX per group (a character alone, or every monster of
    /// one template together) and re-sort the combatants, highest first.
    /// Equal scores are ordered by fresh random noise that is not stored.
    pub fn roll_initiative(&mut self, dice: &mut Dice) {
        let mut groups: IndexMap<Group, Vec<usize>> = IndexMap::new();
        for (i, c) in self.combatants.iter().enumerate() {
            groups.entry(group_of(i, c)).or_default().push(i);
        }

        self.initiative.clear();
        for members in groups.values() {
            let leader = &self.combatants[members[0]];
            let dex = leader.abilities().modifier(Ability::Dexterity);
            let score = dice.d20(AdMode::Normal) as i32 + dex;
            debug!(leader = leader.name(), members = members.len(), score, "initiative");
            for &i in members {
                self.initiative.insert(self.combatants[i].name().to_string(), score);
            }
        }

        let mut keyed: Vec<(f64, Combatant)> = self
            .combatants
            .drain(..)
            .map(|c| {
                let score = self.initiative.get(c.name()).copied().unwrap_or_default();
                (score as f64 + dice.unit(), c)
            })
            .collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.combatants = keyed.into_iter().map(|(_, c)| c).collect();

        info!(combatants = self.combatants.len(), groups = groups.len(), "initiative rolled");
    }

    /// `(name, score)` in turn order. Unrolled combatants have no score.
    pub fn turn_order(&self) -> Vec<(&str, Option<i32>)> {
        self.combatants
            .iter()
            .map(|c| (c.name(), self.initiative(c.name())))
            .collect()
    }

    /// One aligned line per combatant: name and initiative.
    pub fn record(&self) -> Record {
        self.turn_order()
            .into_iter()
            .map(|(name, score)| {
                let value = match score {
                    Some(s) => Value::Int(s.into()),
                    None => Value::Text("-".to_string()),
                };
                (name.to_string(), value)
            })
            .collect()
    }
}

impl Extend<Combatant> for Encounter {
    fn extend<I: IntoIterator<Item = Combatant>>(&mut self, iter: I) {
        for combatant in iter {
            self.add(combatant);
        }
    }
}
