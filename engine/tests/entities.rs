use std::rc::Rc;

use dmkit::{
    Abilities, Ability, AbilityScore, Challenge, ChallengeError, Character, Dice, EntityError,
    HitPoints, MatchError, MonsterTemplate, Tree, Value,
};

fn yaml(text: &str) -> Tree {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn modifier_table() {
    let m = |v| AbilityScore::new(v).modifier();
    assert_eq!((m(1), m(10), m(11), m(20), m(30)), (-5, 0, 0, 5, 10));
    assert_eq!(AbilityScore::new(16).to_string(), "16 (+3)");
    assert_eq!(AbilityScore::new(7).to_string(), " 7 (-2)");
}

#[test]
fn abilities_from_sequence_or_mapping() {
    let listed = Abilities::from_tree(&yaml("[16, 12, 15, 8, 10, 11]")).unwrap();
    let keyed = Abilities::from_tree(&yaml(
        "{cha: 11, wis: 10, int: 8, con: 15, dex: 12, str: 16}",
    ))
    .unwrap();
    assert_eq!(listed, keyed);
    assert_eq!(keyed.get(Ability::Constitution).value, 15);
    assert_eq!(keyed.by_name("intel").unwrap().value, 8);
}

#[test]
fn abilities_reject_bad_shapes() {
    assert_eq!(
        Abilities::from_tree(&yaml("[10, 10, 10]")).unwrap_err(),
        EntityError::AbilityCount(3)
    );
    assert_eq!(
        Abilities::from_tree(&yaml("{str: 10, dex: 10}")).unwrap_err(),
        EntityError::AbilityCount(2)
    );
    assert!(matches!(
        Abilities::from_tree(&yaml("{c: 10}")).unwrap_err(),
        EntityError::Resolve { source: MatchError::Ambiguous { .. }, .. }
    ));
    assert_eq!(
        Abilities::from_tree(&yaml("{str: 1, strength: 2}")).unwrap_err(),
        EntityError::Duplicate("strength".into())
    );
}

#[test]
fn hit_points_default_to_max() {
    let hp = HitPoints::new(10);
    assert_eq!((hp.max, hp.current, hp.temporary_max), (10, 10, 10));
    assert_eq!(HitPoints::from_tree(&yaml("10")).unwrap(), hp);
    let hp = HitPoints::from_tree(&yaml("{max: 10, cur: 4}")).unwrap();
    assert_eq!((hp.max, hp.current, hp.temporary_max), (10, 4, 10));
    assert!(HitPoints::from_tree(&yaml("{current: 4}")).is_err());
    assert!(HitPoints::from_tree(&yaml("0")).is_err());
}

#[test]
fn character_fields_are_fuzzy() {
    let c = Character::from_tree(&yaml(
        r#"
        name: Borin
        race: hum
        class: barb
        abilities: [16, 12, 15, 8, 10, 11]
        hp: {max: 14, temp: 16}
        xp: 2700
        "#,
    ))
    .unwrap();
    assert_eq!((c.race, c.class), ("human", "barbarian"));
    assert_eq!(c.level, 4);
    assert_eq!(c.proficiency_bonus(), 2);
    let hp = c.hit_points.unwrap();
    assert_eq!((hp.current, hp.temporary_max), (14, 16));

    assert_eq!(c.attr("dex").unwrap(), Value::Ability(AbilityScore::new(12)));
    assert_eq!(c.attr("lvl").unwrap(), Value::Int(4));
    assert_eq!(c.attr("int").unwrap().as_int(), Some(8));
}

#[test]
fn explicit_level_ignores_xp() {
    let c = Character::from_tree(&yaml(
        "{name: Sel, race: tief, class: cler, abilities: [10, 13, 14, 10, 16, 12], level: 5}",
    ))
    .unwrap();
    assert_eq!((c.level, c.xp), (5, 0));
    assert_eq!(c.proficiency_bonus(), 3);
    assert_eq!(c.hit_points, None);
}

#[test]
fn unknown_race_is_fatal() {
    let err = Character::from_tree(&yaml(
        "{name: Gimli, race: dwarf, class: barb, abilities: [16, 12, 15, 8, 10, 11]}",
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "field race: no match: dwarf");
}

#[test]
fn missing_name_is_fatal() {
    let err = Character::from_tree(&yaml(
        "{race: elf, class: monk, abilities: [10, 10, 10, 10, 10, 10]}",
    ))
    .unwrap_err();
    assert_eq!(err, EntityError::Missing("name".into()));
}

fn goblin() -> MonsterTemplate {
    MonsterTemplate::from_tree(&yaml(
        "{name: Goblin, hp: 2d6, abilities: [8, 14, 10, 10, 8, 8], challenge: 1/4}",
    ))
    .unwrap()
}

#[test]
fn monster_template_from_tree() {
    let g = goblin();
    assert_eq!(g.hit_dice.to_string(), "2d6");
    assert_eq!(g.challenge, Challenge(0.25));
    assert_eq!(g.challenge.to_string(), "1/4");
    assert_eq!(g.xp().unwrap(), 50);
}

#[test]
fn bad_hit_dice_fail_the_template() {
    let err = MonsterTemplate::from_tree(&yaml(
        "{name: Blob, hp: lots, abilities: [8, 14, 10, 10, 8, 8], challenge: 1}",
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid dice notation: \"lots\"");
}

#[test]
fn unknown_challenge_only_fails_xp() {
    let t = MonsterTemplate::from_tree(&yaml(
        "{name: Oddity, hp: 3, abilities: [8, 14, 10, 10, 8, 8], challenge: 0.3}",
    ))
    .unwrap();
    assert_eq!(t.xp(), Err(ChallengeError::Unknown(Challenge(0.3))));
    assert!(t.record().probe("xp").unwrap().is_none());
}

#[test]
fn instances_read_through_to_template() {
    let template = Rc::new(goblin());
    let mut dice = Dice::from_seed(11);
    let pack = MonsterTemplate::spawn_group(&template, &mut dice, 3);
    let names: Vec<_> = pack.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Goblin 1", "Goblin 2", "Goblin 3"]);

    let g2 = &pack[1];
    assert!((2..=12).contains(&g2.hit_points.max));
    assert_eq!(g2.attr("name").unwrap().to_string(), "Goblin 2");
    assert_eq!(g2.attr("hp").unwrap().as_record().and_then(|r| r.get("max").ok()).and_then(Value::as_int), Some(g2.hit_points.max as i64));
    assert_eq!(g2.attr("hit_d").unwrap(), Value::Roll("2d6".parse().unwrap()));
    assert_eq!(g2.attr("xp").unwrap(), Value::Int(50));
    assert_eq!(g2.attr("dex").unwrap().as_int(), Some(14));
    assert!(g2.same_template(&pack[0]));
}

#[test]
fn single_spawn_keeps_template_name() {
    let template = Rc::new(goblin());
    let mut dice = Dice::from_seed(1);
    let one = MonsterTemplate::spawn_group(&template, &mut dice, 1);
    assert_eq!(one[0].name, "Goblin");
}
