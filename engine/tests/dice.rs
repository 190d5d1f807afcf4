use dmkit::dice::{D6, D8, D20, MAX_COUNT, MAX_SIDES};
use dmkit::{Dice, DiceParseError, Roll};
use proptest::prelude::*;

#[test]
fn notation_forms() {
    assert_eq!(Roll::parse("17").unwrap(), Roll::flat(17));
    assert_eq!(Roll::parse("2d6").unwrap(), Roll::new(6, 2, 0));
    assert_eq!(Roll::parse("d8+4").unwrap(), Roll::new(8, 1, 4));
    assert_eq!(Roll::parse("4d4-4").unwrap(), Roll::new(4, 4, -4));
}

#[test]
fn flat_values_carry_no_dice() {
    let r: Roll = "17".parse().unwrap();
    assert_eq!((r.sides(), r.count(), r.modifier()), (0, 0, 17));
    let mut dice = Dice::from_seed(1);
    assert!(dice.repeat(50, &r).iter().all(|&v| v == 17));
}

#[test]
fn bad_notation_reports_the_input() {
    for bad in ["", "d", "2d", "d0", "2x6", "d6+", "1d6+2+3", "abc"] {
        assert_eq!(Roll::parse(bad), Err(DiceParseError::Invalid(bad.to_string())));
    }
    insta::assert_snapshot!(
        Roll::parse("2x6").unwrap_err().to_string(),
        @r#"invalid dice notation: "2x6""#
    );
}

#[test]
fn display_is_canonical() {
    assert_eq!(Roll::flat(17).to_string(), "17");
    assert_eq!(D8.shift(4).to_string(), "d8+4");
    assert_eq!(D6.scale(2).unwrap().to_string(), "2d6");
    assert_eq!(Roll::new(4, 4, -4).to_string(), "4d4-4");
}

#[test]
fn scale_and_shift_build_new_values() {
    let base = D8 + 2;
    let triple = base.scale(3).unwrap();
    assert_eq!(triple, Roll::new(8, 3, 2));
    assert_eq!(base, Roll::new(8, 1, 2));
    assert_eq!(triple.shift(-2), Roll::new(8, 3, 0));
}

#[test]
fn scale_refuses_too_many_dice() {
    assert_eq!(D6.scale(MAX_COUNT).map(|r| r.count()), Some(MAX_COUNT));
    assert_eq!(D6.scale(MAX_COUNT + 1), None);
    assert_eq!(Roll::new(6, 2, 0).scale(u32::MAX), None);
}

#[test]
fn largest_notation_rolls_without_overflow() {
    let top = format!("{MAX_COUNT}d{MAX_SIDES}+{}", i32::MAX);
    let r = Roll::parse(&top).unwrap();
    assert_eq!(r.max(), i32::MAX);
    let mut dice = Dice::from_seed(1);
    assert_eq!(dice.sample(&r), i32::MAX);

    let r = Roll::parse(&format!("{MAX_COUNT}d{MAX_SIDES}-{}", i32::MAX)).unwrap();
    let v = dice.sample(&r);
    assert!(v >= r.min() && v <= r.max());
    assert_eq!(r.max(), 1_000_000 - i32::MAX);
}

#[test]
fn oversized_notation_is_rejected() {
    for big in ["30000d1000000", "1001d6", "d1001", "99999999999d6"] {
        assert_eq!(Roll::parse(big), Err(DiceParseError::OutOfRange(big.to_string())));
    }
    insta::assert_snapshot!(
        Roll::parse("1001d6").unwrap_err().to_string(),
        @r#"dice notation out of range: "1001d6" (at most 1000d1000)"#
    );
}

#[test]
fn hand_built_extremes_saturate() {
    let r = Roll::new(u32::MAX, u32::MAX, i32::MAX);
    assert_eq!(r.max(), i32::MAX);
    assert_eq!(r.min(), i32::MAX);
    assert_eq!(Roll::flat(i32::MIN).shift(-1), Roll::flat(i32::MIN));
}

#[test]
fn bounds_and_average() {
    let r = Roll::parse("2d8+2").unwrap();
    assert_eq!((r.min(), r.max(), r.average()), (4, 18, 11));
    assert_eq!(D20.average(), 10);
}

#[test]
fn two_d6_distribution() {
    let r = Roll::parse("2d6").unwrap();
    let mut dice = Dice::from_seed(2024);
    let samples = dice.repeat(10_000, &r);
    assert!(samples.iter().all(|v| (2..=12).contains(v)));
    let mean = samples.iter().sum::<i32>() as f64 / samples.len() as f64;
    assert!((mean - 7.0).abs() < 0.15, "mean was {mean}");
}

#[test]
fn seeded_dice_repeat() {
    let r = Roll::parse("3d6+1").unwrap();
    let a = Dice::from_seed(42).repeat(20, &r);
    let b = Dice::from_seed(42).repeat(20, &r);
    assert_eq!(a, b);
}

#[test]
fn unit_noise_in_range() {
    let mut dice = Dice::from_seed(3);
    assert!((0..1000).map(|_| dice.unit()).all(|x| (0.0..1.0).contains(&x)));
}

proptest! {
    #[test]
    fn notation_round_trips(count in 0u32..20, sides in 1u32..100, modifier in -50i32..50, flat in any::<bool>()) {
        let roll = if flat { Roll::flat(modifier) } else { Roll::new(sides, count, modifier) };
        let reparsed: Roll = roll.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, roll);
    }
}
