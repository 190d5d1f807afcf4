//! Abbreviation-tolerant name resolution.
//!
//! A query resolves to a candidate in ordered passes, stopping at the first
//! pass that yields exactly one candidate:
//!
//! 1. exact (case-insensitive) match of the whole name,
//! 2. prefix match,
//! 3. in-order subsequence match (`"drd"` finds `"druid"`).
//!
//! Candidates whose text starts with [`PRIVATE_MARKER`] never match.

use std::fmt;

use thiserror::Error;

/// Names starting with this character are hidden from matching.
pub const PRIVATE_MARKER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no match: {query}")]
    NoMatch { query: String },
    #[error("ambiguous match: {query}: {}", candidates.join(", "))]
    Ambiguous { query: String, candidates: Vec<String> },
}

/// Failure of [`fuzzy_get`] when no default is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("key not found: {key}")]
    Missing { key: String },
    #[error(transparent)]
    Match(MatchError),
}

/// Resolve `query` against `candidates`, returning the matched candidate
/// itself (original casing and type).
pub fn fuzzy_match<I, T>(query: &str, candidates: I) -> Result<T, MatchError>
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let mut candidates: Vec<T> = candidates.into_iter().collect();
    let texts: Vec<String> = candidates.iter().map(|c| c.to_string()).collect();
    let index = resolve(query, &texts)?;
    Ok(candidates.swap_remove(index))
}

/// Look `key` up in a mapping by fuzzy-matching against its keys.
pub fn fuzzy_get<'a, I, K, V>(entries: I, key: &str) -> Result<&'a V, LookupError>
where
    I: IntoIterator<Item = (K, &'a V)>,
    K: fmt::Display,
    V: 'a + ?Sized,
{
    match fuzzy_match_entry(entries, key) {
        Ok(value) => Ok(value),
        Err(MatchError::NoMatch { .. }) => Err(LookupError::Missing { key: key.to_string() }),
        Err(ambiguous) => Err(LookupError::Match(ambiguous)),
    }
}

/// Like [`fuzzy_get`], but a key that matches nothing yields `default`.
/// An ambiguous key is still an error.
pub fn fuzzy_get_or<'a, I, K, V>(entries: I, key: &str, default: &'a V) -> Result<&'a V, MatchError>
where
    I: IntoIterator<Item = (K, &'a V)>,
    K: fmt::Display,
    V: 'a + ?Sized,
{
    match fuzzy_match_entry(entries, key) {
        Err(MatchError::NoMatch { .. }) => Ok(default),
        other => other,
    }
}

fn fuzzy_match_entry<'a, I, K, V>(entries: I, key: &str) -> Result<&'a V, MatchError>
where
    I: IntoIterator<Item = (K, &'a V)>,
    K: fmt::Display,
    V: 'a + ?Sized,
{
    let (keys, values): (Vec<String>, Vec<&'a V>) =
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).unzip();
    let index = resolve(key, &keys)?;
    Ok(values[index])
}

/// Index into `texts` of the single candidate `query` resolves to.
pub fn resolve(query: &str, texts: &[String]) -> Result<usize, MatchError> {
    let needle = query.to_lowercase();
    let visible: Vec<(usize, String)> = texts
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.starts_with(PRIVATE_MARKER))
        .map(|(i, text)| (i, text.to_lowercase()))
        .collect();

    // An empty query is left to the prefix pass, where it matches everything.
    if !needle.is_empty() {
        let exact = select(&visible, |text| text == &needle);
        if let [only] = exact[..] {
            return Ok(only);
        }
    }

    let prefixed = select(&visible, |text| text.starts_with(&needle));
    if let [only] = prefixed[..] {
        return Ok(only);
    }

    let ordered = select(&visible, |text| is_subsequence(&needle, text));
    match ordered[..] {
        [only] => Ok(only),
        [] => Err(MatchError::NoMatch { query: query.to_string() }),
        _ => Err(MatchError::Ambiguous {
            query: query.to_string(),
            candidates: ordered.iter().map(|&i| texts[i].clone()).collect(),
        }),
    }
}

fn select(visible: &[(usize, String)], pred: impl Fn(&String) -> bool) -> Vec<usize> {
    visible.iter().filter(|(_, text)| pred(text)).map(|(i, _)| *i).collect()
}

/// Whether every char of `needle` occurs in `haystack`, in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}
