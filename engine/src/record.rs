//! Dynamically keyed records with fuzzy field access and indented rendering.
//!
//! Every entity in the crate can project itself into a [`Record`] so it can
//! be probed by abbreviated field name (`"dex"`, `"hp"`) and printed as an
//! aligned block:
//!
//! ```text
//! name:                   Aria
//! abilities:
//!   strength:             10 (+0)
//! ```

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::ability::AbilityScore;
use crate::dice::Roll;
use crate::fuzzy::{self, MatchError, PRIVATE_MARKER};

/// Column at which leaf values start, counted from the left margin.
pub const NAME_WIDTH: usize = 24;

/// Reserved field overriding [`NAME_WIDTH`] for one record. Never matched,
/// never rendered.
pub const WIDTH_FIELD: &str = "name_width";

const INDENT: &str = "  ";

/// Field or item lookup failed, for whatever reason the resolver gave.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrError {
    #[error("attribute not found: {name} ({source})")]
    NotFound { name: String, source: MatchError },
}

impl AttrError {
    pub fn name(&self) -> &str {
        match self {
            AttrError::NotFound { name, .. } => name,
        }
    }

    /// True when the name matched nothing, as opposed to several fields.
    pub fn is_no_match(&self) -> bool {
        matches!(self, AttrError::NotFound { source: MatchError::NoMatch { .. }, .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Bool(bool),
    Text(String),
    Roll(Roll),
    Ability(AbilityScore),
    Record(Record),
    List(RecordList),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Ability(score) => Some(score.value as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ability(&self) -> Option<AbilityScore> {
        match self {
            Value::Ability(score) => Some(*score),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&RecordList> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Nested block lines, or `None` for a leaf.
    fn render_nested(&self, indent: &str) -> Option<Vec<String>> {
        match self {
            Value::Record(r) => Some(r.render_indented(indent)),
            Value::List(l) => Some(l.render_indented(indent)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Real(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
            Value::Roll(r) => write!(f, "{r}"),
            Value::Ability(a) => write!(f, "{a}"),
            Value::Record(r) => write!(f, "{r}"),
            Value::List(l) => write!(f, "{l}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Roll> for Value {
    fn from(r: Roll) -> Self {
        Value::Roll(r)
    }
}

impl From<AbilityScore> for Value {
    fn from(a: AbilityScore) -> Self {
        Value::Ability(a)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<RecordList> for Value {
    fn from(l: RecordList) -> Self {
        Value::List(l)
    }
}

/// Ordered field-name → value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Add or overwrite a field. Overwriting keeps the field's position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The stored field name `name` refers to.
    pub fn resolve(&self, name: &str) -> Result<&str, AttrError> {
        if let Some((stored, _)) = self.fields.get_key_value(name) {
            return Ok(stored);
        }
        let candidates = self.fields.keys().filter(|k| k.as_str() != WIDTH_FIELD);
        fuzzy::fuzzy_match(name, candidates)
            .map(String::as_str)
            .map_err(|source| AttrError::NotFound { name: name.to_string(), source })
    }

    /// Read a field by its stored name or any unambiguous abbreviation.
    pub fn get(&self, name: &str) -> Result<&Value, AttrError> {
        let stored = self.resolve(name)?;
        Ok(&self.fields[stored])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value, AttrError> {
        let stored = self.resolve(name)?.to_string();
        Ok(&mut self.fields[&stored])
    }

    /// Like [`Record::get`], but a name matching nothing reads as `None`.
    /// Ambiguity is still an error.
    pub fn probe(&self, name: &str) -> Result<Option<&Value>, AttrError> {
        match self.get(name) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_no_match() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn width(&self) -> usize {
        match self.fields.get(WIDTH_FIELD) {
            Some(Value::Int(w)) if *w > 0 => *w as usize,
            _ => NAME_WIDTH,
        }
    }

    pub fn render(&self) -> Vec<String> {
        self.render_indented("")
    }

    fn render_indented(&self, indent: &str) -> Vec<String> {
        let width = self.width();
        let visible = self
            .fields
            .iter()
            .filter(|(name, _)| !name.starts_with(PRIVATE_MARKER) && name.as_str() != WIDTH_FIELD);
        let mut lines = Vec::new();
        for (name, value) in visible {
            render_entry(&mut lines, indent, width, name, value);
        }
        lines
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().join("\n"))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

/// Read `name` through several records at once. All field names compete in
/// one resolution; a name present on more than one level is owned by the
/// first of them, so earlier records shadow later ones.
pub fn lookup_chain<'a>(levels: &[&'a Record], name: &str) -> Result<&'a Value, AttrError> {
    if let Some(value) = levels.iter().copied().find_map(|r| r.fields.get(name)) {
        return Ok(value);
    }
    let mut owners: IndexMap<&'a str, &'a Record> = IndexMap::new();
    for &record in levels {
        for field in record.fields.keys() {
            if field != WIDTH_FIELD {
                owners.entry(field.as_str()).or_insert(record);
            }
        }
    }
    let texts: Vec<String> = owners.keys().map(|k| k.to_string()).collect();
    let index = fuzzy::resolve(name, &texts)
        .map_err(|source| AttrError::NotFound { name: name.to_string(), source })?;
    let (&field, &record) = owners.get_index(index).ok_or_else(|| AttrError::NotFound {
        name: name.to_string(),
        source: MatchError::NoMatch { query: name.to_string() },
    })?;
    Ok(&record.fields[field])
}

fn render_entry(lines: &mut Vec<String>, indent: &str, width: usize, name: &str, value: &Value) {
    let inner = format!("{indent}{INDENT}");
    match value.render_nested(&inner) {
        Some(block) => {
            lines.push(format!("{indent}{name}:"));
            lines.extend(block);
        }
        None => {
            let width = width.saturating_sub(indent.len());
            let label = format!("{name}:");
            lines.push(format!("{indent}{label:<width$}{value}"));
        }
    }
}

/// Ordered records, each addressed by its `name` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordList {
    items: Vec<Record>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.items.push(record);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.items.iter()
    }

    pub fn at(&self, index: usize) -> Option<&Record> {
        self.items.get(index)
    }

    /// Find an item by fuzzy-matching its `name`.
    pub fn get(&self, name: &str) -> Result<&Record, AttrError> {
        let named: Vec<(String, &Record)> =
            self.items.iter().filter_map(|r| Some((item_name(r)?, r))).collect();
        let texts: Vec<String> = named.iter().map(|(n, _)| n.clone()).collect();
        fuzzy::resolve(name, &texts)
            .map(|i| named[i].1)
            .map_err(|source| AttrError::NotFound { name: name.to_string(), source })
    }

    pub fn render(&self) -> Vec<String> {
        self.render_indented("")
    }

    fn render_indented(&self, indent: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for item in &self.items {
            let name = item_name(item).unwrap_or_default();
            render_entry(&mut lines, indent, NAME_WIDTH, &name, &Value::Record(item.clone()));
        }
        lines
    }
}

fn item_name(record: &Record) -> Option<String> {
    record.fields.get("name").map(Value::to_string)
}

impl fmt::Display for RecordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render().join("\n"))
    }
}

impl FromIterator<Record> for RecordList {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for RecordList {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
