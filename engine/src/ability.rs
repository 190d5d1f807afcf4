use std::fmt;

use crate::checks::{self, RollConfirm};
use crate::dice::{AdMode, Dice};
use crate::fuzzy;
use crate::record::{AttrError, Record};
use crate::tables::ABILITIES;
use crate::tree::{EntityError, Fields, Tree, to_int};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// Canonical order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn name(self) -> &'static str {
        ABILITIES[self as usize]
    }

    /// Resolve an abbreviated ability name (`"dex"`, `"cha"`).
    pub fn resolve(name: &str) -> Result<Ability, AttrError> {
        fuzzy::fuzzy_match(name, Ability::ALL)
            .map_err(|source| AttrError::NotFound { name: name.to_string(), source })
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One ability score, nominally 1 to 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityScore {
    pub value: i32,
}

impl AbilityScore {
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    /// floor(score / 2) - 5
    pub fn modifier(&self) -> i32 {
        self.value.div_euclid(2) - 5
    }

    /// d20 plus modifier. The die goes through `confirm` first so a physical
    /// roll can replace it.
    pub fn check(&self, dice: &mut Dice, confirm: &mut dyn RollConfirm, label: &str) -> i32 {
        checks::roll_d20(dice, confirm, label, AdMode::Normal) + self.modifier()
    }
}

impl fmt::Display for AbilityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:2} ({:+})", self.value, self.modifier())
    }
}

/// The six scores in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abilities {
    scores: [AbilityScore; 6],
}

impl Abilities {
    pub fn new(scores: [i32; 6]) -> Self {
        Self { scores: scores.map(AbilityScore::new) }
    }

    pub fn get(&self, ability: Ability) -> AbilityScore {
        self.scores[ability as usize]
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier()
    }

    /// Score for an abbreviated ability name.
    pub fn by_name(&self, name: &str) -> Result<AbilityScore, AttrError> {
        Ability::resolve(name).map(|a| self.get(a))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, AbilityScore)> + '_ {
        Ability::ALL.into_iter().zip(self.scores.iter().copied())
    }

    /// Either six scores in canonical order, or a mapping whose keys
    /// abbreviate the six ability names.
    pub fn from_tree(tree: &Tree) -> Result<Self, EntityError> {
        let mut scores = [0; 6];
        if let Some(seq) = tree.as_sequence() {
            if seq.len() != 6 {
                return Err(EntityError::AbilityCount(seq.len()));
            }
            for (slot, node) in scores.iter_mut().zip(seq) {
                *slot = score(node)?;
            }
        } else {
            let fields = Fields::resolve(tree, "abilities", &ABILITIES, true)?;
            if fields.len() != 6 {
                return Err(EntityError::AbilityCount(fields.len()));
            }
            for (slot, ability) in scores.iter_mut().zip(Ability::ALL) {
                *slot = score(fields.require(ability.name())?)?;
            }
        }
        Ok(Self::new(scores))
    }

    pub fn record(&self) -> Record {
        self.iter().map(|(a, s)| (a.name(), s)).collect()
    }
}

fn score(node: &Tree) -> Result<i32, EntityError> {
    let value = to_int(node, "abilities")?;
    i32::try_from(value).map_err(|_| EntityError::Shape {
        field: "abilities".to_string(),
        expected: "a 32-bit integer",
    })
}
