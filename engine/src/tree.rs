//! Reading entity fields out of parsed YAML trees.

use indexmap::IndexMap;
use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use crate::dice::DiceParseError;
use crate::fuzzy::{self, MatchError};

/// A parsed document: mappings, sequences and scalars.
pub type Tree = Value;

/// A single entity could not be built from its tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    #[error("missing field: {0}")]
    Missing(String),
    #[error("field {field}: expected {expected}")]
    Shape { field: String, expected: &'static str },
    #[error("field {field}: {source}")]
    Resolve { field: String, source: MatchError },
    #[error("field {0} given more than once")]
    Duplicate(String),
    #[error("expected 6 ability scores, got {0}")]
    AbilityCount(usize),
    #[error(transparent)]
    Dice(#[from] DiceParseError),
}

/// Text of a scalar node; `None` for mappings, sequences and nulls.
pub fn scalar_text(tree: &Tree) -> Option<String> {
    match tree {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(t) => scalar_text(&t.value),
        _ => None,
    }
}

/// Integer coercion: whole numbers, integral floats and numeric strings.
pub fn to_int(tree: &Tree, field: &str) -> Result<i64, EntityError> {
    let shape = || EntityError::Shape { field: field.to_string(), expected: "an integer" };
    match tree {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            (None, Some(f)) if f.fract() == 0.0 => Ok(f as i64),
            _ => Err(shape()),
        },
        Value::String(s) => s.trim().parse().map_err(|_| shape()),
        Value::Tagged(t) => to_int(&t.value, field),
        _ => Err(shape()),
    }
}

pub fn to_text(tree: &Tree, field: &str) -> Result<String, EntityError> {
    scalar_text(tree).ok_or_else(|| EntityError::Shape { field: field.to_string(), expected: "a scalar" })
}

fn normalize_key(key: &str) -> String {
    key.trim().replace([' ', '-'], "_")
}

/// The fields of one mapping, keyed by the canonical name each source key
/// resolved to.
#[derive(Debug)]
pub struct Fields<'a> {
    found: IndexMap<&'static str, &'a Tree>,
}

impl<'a> Fields<'a> {
    /// Resolve every key of `tree` against `canonical`. Keys naming a field
    /// exactly claim it first; the rest are resolved fuzzily.
    ///
    /// With `strict`, a key matching no canonical name, or one whose field is
    /// already claimed, is an error. Otherwise such keys are skipped, so
    /// extra fields like `ac` never displace the ones they resemble.
    pub fn resolve(
        tree: &'a Tree,
        context: &str,
        canonical: &[&'static str],
        strict: bool,
    ) -> Result<Self, EntityError> {
        let mapping = tree.as_mapping().ok_or_else(|| EntityError::Shape {
            field: context.to_string(),
            expected: "a mapping",
        })?;
        let mut keyed = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = scalar_text(key).ok_or_else(|| EntityError::Shape {
                field: context.to_string(),
                expected: "scalar keys",
            })?;
            keyed.push((normalize_key(&key), value));
        }

        let mut found = IndexMap::new();
        let mut fuzzy_keys = Vec::new();
        for (key, value) in keyed {
            match canonical.iter().copied().find(|c| c.eq_ignore_ascii_case(&key)) {
                Some(name) => {
                    if found.insert(name, value).is_some() {
                        return Err(EntityError::Duplicate(name.to_string()));
                    }
                }
                None => fuzzy_keys.push((key, value)),
            }
        }

        for (key, value) in fuzzy_keys {
            match fuzzy::fuzzy_match(&key, canonical.iter().copied()) {
                Ok(name) if !found.contains_key(name) => {
                    found.insert(name, value);
                }
                Ok(name) if strict => return Err(EntityError::Duplicate(name.to_string())),
                Ok(name) => {
                    debug!(context, key = %key, shadowed = name, "ignoring field already given");
                }
                Err(MatchError::NoMatch { .. }) if !strict => {
                    debug!(context, key = %key, "ignoring unknown field");
                }
                Err(source) => {
                    return Err(EntityError::Resolve { field: context.to_string(), source });
                }
            }
        }
        Ok(Self { found })
    }

    pub fn get(&self, name: &str) -> Option<&'a Tree> {
        self.found.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<&'a Tree, EntityError> {
        self.get(name).ok_or_else(|| EntityError::Missing(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}
