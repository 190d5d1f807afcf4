use assert_cmd::Command;
use predicates::prelude::*;

fn dmkit() -> Command {
    Command::cargo_bin("dmkit").unwrap()
}

#[test]
fn roll_flat_value() {
    dmkit()
        .args(["roll", "17", "--times", "3", "--seed", "1"])
        .assert()
        .success()
        .stdout("17: 17 17 17\n");
}

#[test]
fn roll_reports_bad_notation() {
    dmkit()
        .args(["roll", "2x6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid dice notation: \"2x6\""));
}

#[test]
fn seeded_rolls_repeat() {
    let run = || {
        dmkit()
            .args(["roll", "2d6", "d8+4", "--times", "5", "--seed", "77"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn party_sheet_renders() {
    dmkit()
        .args(["party"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aria:"))
        .stdout(predicate::str::is_match(r"race:\s+half-elf").unwrap())
        .stdout(predicate::str::contains("abilities:"));
}

#[test]
fn bestiary_shows_xp() {
    dmkit()
        .args(["bestiary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ogre:"))
        .stdout(predicate::str::is_match(r"xp:\s+450").unwrap());
}

#[test]
fn check_resolves_names() {
    dmkit()
        .args(["check", "--who", "bor", "--ability", "str", "--dc", "12", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Borin str check (mod=+3)"));
}

#[test]
fn initiative_json() {
    dmkit()
        .args(["initiative", "--spawn", "goblin=2", "--seed", "5", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Goblin 2\""))
        .stdout(predicate::str::contains("\"kind\": \"monster\""));
}

#[test]
fn initiative_unknown_template_fails() {
    dmkit()
        .args(["initiative", "--spawn", "dragon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no monster template for 'dragon'"));
}
