use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::character::Character;
use crate::content::{builtin_bestiaries, builtin_parties};
use crate::dice::Dice;
use crate::encounter::{Combatant, Encounter};
use crate::fuzzy;
use crate::loader::{self, Batch};
use crate::monster::MonsterTemplate;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EncounterConfig {
    #[serde(default)]
    pub players_path: Option<String>,
    #[serde(default)]
    pub players_id: Option<String>,
    #[serde(default)]
    pub monsters_path: Option<String>,
    #[serde(default)]
    pub monsters_id: Option<String>,
    #[serde(default)]
    pub spawn: Vec<SpawnSpec>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpawnSpec {
    pub template: String,
    #[serde(default = "one")]
    pub count: usize,
}

fn one() -> usize {
    1
}

impl SpawnSpec {
    /// `"goblin=3"`, or just `"goblin"` for one.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once('=') {
            Some((template, count)) => Ok(Self {
                template: template.trim().to_string(),
                count: count
                    .trim()
                    .parse()
                    .with_context(|| format!("bad spawn count in '{}'", text))?,
            }),
            None => Ok(Self { template: text.trim().to_string(), count: 1 }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TurnEntry {
    pub name: String,
    pub initiative: i32,
    pub kind: &'static str,
    pub hit_points: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EncounterReport {
    pub order: Vec<TurnEntry>,
    pub skipped: Vec<String>,
}

/// JSON when the text opens with `{`, YAML otherwise.
pub fn parse_config(text: &str) -> Result<EncounterConfig> {
    if text.trim_start().starts_with('{') {
        serde_json::from_str(text).context("failed to parse encounter config JSON")
    } else {
        serde_yaml::from_str(text).context("failed to parse encounter config")
    }
}

pub fn load_party(path: Option<&str>, id: Option<&str>) -> Result<Batch<Character>> {
    match (path, id) {
        (Some(path), _) => loader::load_characters(path)
            .with_context(|| format!("failed to load party: {}", path)),
        (None, Some(id)) => {
            let parties = builtin_parties();
            let text = parties.get(id).ok_or_else(|| anyhow!("unknown builtin party '{}'", id))?;
            Ok(loader::characters_from_str(text, id)?)
        }
        (None, None) => Ok(Batch::default()),
    }
}

pub fn load_bestiary(path: Option<&str>, id: Option<&str>) -> Result<Batch<MonsterTemplate>> {
    match (path, id) {
        (Some(path), _) => loader::load_monsters(path)
            .with_context(|| format!("failed to load monsters: {}", path)),
        (None, Some(id)) => {
            let bestiaries = builtin_bestiaries();
            let text = bestiaries.get(id).ok_or_else(|| anyhow!("unknown builtin bestiary '{}'", id))?;
            Ok(loader::monsters_from_str(text, id)?)
        }
        (None, None) => Ok(Batch::default()),
    }
}

/// Load the party and bestiary, spawn the requested monsters. Returns the
/// encounter and one message per skipped record.
pub fn build_encounter(cfg: &EncounterConfig, dice: &mut Dice) -> Result<(Encounter, Vec<String>)> {
    let party = load_party(cfg.players_path.as_deref(), cfg.players_id.as_deref())?;
    let bestiary = load_bestiary(cfg.monsters_path.as_deref(), cfg.monsters_id.as_deref())?;

    let skipped: Vec<String> = party
        .failures
        .iter()
        .chain(&bestiary.failures)
        .map(ToString::to_string)
        .collect();

    let templates: Vec<Rc<MonsterTemplate>> = bestiary.loaded.into_iter().map(Rc::new).collect();
    let names: Vec<String> = templates.iter().map(|t| t.name.clone()).collect();

    let mut encounter = Encounter::new();
    encounter.extend(party.loaded.into_iter().map(Combatant::from));
    for spec in &cfg.spawn {
        let index = fuzzy::resolve(&spec.template, &names)
            .with_context(|| format!("no monster template for '{}'", spec.template))?;
        let spawned = MonsterTemplate::spawn_group(&templates[index], dice, spec.count);
        encounter.extend(spawned.into_iter().map(Combatant::from));
    }
    Ok((encounter, skipped))
}

pub fn run_encounter(cfg: EncounterConfig) -> Result<EncounterReport> {
    let mut dice = match cfg.seed {
        Some(seed) => Dice::from_seed(seed),
        None => Dice::from_entropy(),
    };
    let (mut encounter, skipped) = build_encounter(&cfg, &mut dice)?;
    encounter.roll_initiative(&mut dice);
    info!(combatants = encounter.len(), skipped = skipped.len(), "encounter ready");

    let order = encounter
        .combatants()
        .iter()
        .map(|c| TurnEntry {
            name: c.name().to_string(),
            initiative: encounter.initiative(c.name()).unwrap_or_default(),
            kind: if c.is_monster() { "monster" } else { "character" },
            hit_points: c.hit_points().map(ToString::to_string),
        })
        .collect();

    Ok(EncounterReport { order, skipped })
}
