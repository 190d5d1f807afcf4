//! Batch loading of characters and monster templates from YAML.
//!
//! A bad record is skipped and reported; it never takes its siblings down
//! with it. Only unreadable or unparsable files fail a whole load.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::character::Character;
use crate::monster::MonsterTemplate;
use crate::tree::{EntityError, Tree, scalar_text};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {origin}: {source}")]
    Yaml { origin: String, source: serde_yaml::Error },
    #[error("{origin}: expected a sequence or mapping of records")]
    Shape { origin: String },
}

/// One record that could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub origin: String,
    pub index: usize,
    pub name: Option<String>,
    pub error: EntityError,
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.origin, self.index)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        write!(f, ": {}", self.error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub loaded: Vec<T>,
    pub failures: Vec<LoadFailure>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self { loaded: Vec::new(), failures: Vec::new() }
    }
}

impl<T> Batch<T> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn absorb(&mut self, other: Batch<T>) {
        self.loaded.extend(other.loaded);
        self.failures.extend(other.failures);
    }
}

pub fn parse_yaml(text: &str, origin: &str) -> Result<Tree, LoadError> {
    serde_yaml::from_str(text).map_err(|source| LoadError::Yaml { origin: origin.to_string(), source })
}

/// Build one entity per record of `tree`: a sequence of records, or a
/// single mapping holding one record.
pub fn batch_from_tree<T>(
    tree: &Tree,
    origin: &str,
    build: impl Fn(&Tree) -> Result<T, EntityError>,
) -> Result<Batch<T>, LoadError> {
    let records: Vec<&Tree> = match tree {
        Tree::Sequence(seq) => seq.iter().collect(),
        Tree::Mapping(_) => vec![tree],
        Tree::Null => Vec::new(),
        _ => return Err(LoadError::Shape { origin: origin.to_string() }),
    };

    let mut batch = Batch::default();
    for (index, record) in records.into_iter().enumerate() {
        match build(record) {
            Ok(entity) => batch.loaded.push(entity),
            Err(error) => {
                let name = record.get("name").and_then(scalar_text);
                warn!(origin, index, name = name.as_deref().unwrap_or("?"), %error, "skipping record");
                batch.failures.push(LoadFailure { origin: origin.to_string(), index, name, error });
            }
        }
    }
    Ok(batch)
}

pub fn characters_from_str(text: &str, origin: &str) -> Result<Batch<Character>, LoadError> {
    batch_from_tree(&parse_yaml(text, origin)?, origin, Character::from_tree)
}

pub fn monsters_from_str(text: &str, origin: &str) -> Result<Batch<MonsterTemplate>, LoadError> {
    batch_from_tree(&parse_yaml(text, origin)?, origin, MonsterTemplate::from_tree)
}

pub fn load_characters(path: impl AsRef<Path>) -> Result<Batch<Character>, LoadError> {
    load_path(path.as_ref(), Character::from_tree)
}

pub fn load_monsters(path: impl AsRef<Path>) -> Result<Batch<MonsterTemplate>, LoadError> {
    load_path(path.as_ref(), MonsterTemplate::from_tree)
}

/// A YAML file, or every `.yaml`/`.yml` file in a directory in name order.
fn load_path<T>(
    path: &Path,
    build: impl Fn(&Tree) -> Result<T, EntityError> + Copy,
) -> Result<Batch<T>, LoadError> {
    let io = |source| LoadError::Io { path: path.to_path_buf(), source };
    let files = if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(io)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_yaml(p))
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut batch = Batch::default();
    for file in &files {
        let text = fs::read_to_string(file)
            .map_err(|source| LoadError::Io { path: file.clone(), source })?;
        let origin = file.display().to_string();
        batch.absorb(batch_from_tree(&parse_yaml(&text, &origin)?, &origin, build)?);
    }
    info!(
        path = %path.display(),
        files = files.len(),
        loaded = batch.loaded.len(),
        failed = batch.failures.len(),
        "loaded"
    );
    Ok(batch)
}

fn is_yaml(path: &Path) -> bool {
    path.is_file()
        && matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        )
}
