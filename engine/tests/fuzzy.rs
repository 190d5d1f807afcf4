use std::collections::BTreeMap;

use dmkit::fuzzy::{LookupError, MatchError, fuzzy_get, fuzzy_get_or, fuzzy_match};
use proptest::prelude::*;

#[test]
fn prefix_wins_when_unique() {
    assert_eq!(fuzzy_match("dex", ["dexterity", "druid"]).unwrap(), "dexterity");
}

#[test]
fn shared_prefix_is_ambiguous() {
    let err = fuzzy_match("d", ["dexterity", "druid"]).unwrap_err();
    assert_eq!(
        err,
        MatchError::Ambiguous {
            query: "d".into(),
            candidates: vec!["dexterity".into(), "druid".into()],
        }
    );
    insta::assert_snapshot!(err.to_string(), @"ambiguous match: d: dexterity, druid");
}

#[test]
fn nothing_matches() {
    let err = fuzzy_match("xyz", ["dexterity"]).unwrap_err();
    assert!(matches!(err, MatchError::NoMatch { .. }));
    insta::assert_snapshot!(err.to_string(), @"no match: xyz");
}

#[test]
fn subsequence_fallback() {
    assert_eq!(fuzzy_match("drd", ["druid", "dwarf"]).unwrap(), "druid");
    assert_eq!(fuzzy_match("tfl", ["human", "tiefling"]).unwrap(), "tiefling");
}

#[test]
fn query_case_is_ignored_and_original_returned() {
    assert_eq!(fuzzy_match("GOB", ["Goblin", "Orc"]).unwrap(), "Goblin");
}

#[test]
fn private_names_are_hidden() {
    assert_eq!(fuzzy_match("s", ["_secret", "strength"]).unwrap(), "strength");
    assert!(fuzzy_match("_sec", ["_secret"]).is_err());
}

#[test]
fn exact_name_beats_longer_prefixes() {
    assert_eq!(fuzzy_match("elf", ["half-elf", "elf", "elfling"]).unwrap(), "elf");
}

#[test]
fn non_string_candidates_are_stringified() {
    assert_eq!(fuzzy_match("2", [10, 20, 30]).unwrap(), 20);
}

#[test]
fn get_resolves_keys() {
    let map = BTreeMap::from([("max", 10), ("current", 7)]);
    assert_eq!(*fuzzy_get(&map, "cur").unwrap(), 7);
    assert_eq!(
        fuzzy_get(&map, "temp").unwrap_err(),
        LookupError::Missing { key: "temp".into() }
    );
}

#[test]
fn get_default_only_covers_missing_keys() {
    let map = BTreeMap::from([("cleric", 1), ("charisma", 2)]);
    assert_eq!(*fuzzy_get_or(&map, "wizard", &0).unwrap(), 0);
    assert!(matches!(
        fuzzy_get_or(&map, "c", &0),
        Err(MatchError::Ambiguous { .. })
    ));
    assert!(matches!(fuzzy_get(&map, "c"), Err(LookupError::Match(_))));
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,8}", 1..8).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #[test]
    fn exact_query_finds_its_candidate(names in names(), pick in any::<prop::sample::Index>()) {
        let target = pick.get(&names).clone();
        let found = fuzzy_match(&target.to_uppercase(), names.iter()).unwrap();
        prop_assert_eq!(found, &target);
    }

    #[test]
    fn empty_query_needs_a_single_visible_candidate(
        names in prop::collection::vec("_?[a-z]{0,6}", 0..6)
    ) {
        let visible = names.iter().filter(|n| !n.starts_with('_')).count();
        prop_assert_eq!(fuzzy_match("", names.iter()).is_ok(), visible == 1);
    }

    #[test]
    fn result_contains_query_as_subsequence(names in names(), query in "[a-z]{1,3}") {
        if let Ok(found) = fuzzy_match(&query, names.iter()) {
            let mut rest = found.chars();
            prop_assert!(query.chars().all(|c| rest.any(|h| h == c)));
        }
    }
}
