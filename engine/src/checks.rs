use tracing::info;

use crate::ability::Ability;
use crate::dice::{AdMode, Dice};
use crate::encounter::Combatant;
use crate::record::AttrError;

/// Lets a person at the table replace a computed die roll, e.g. with a
/// physical one.
pub trait RollConfirm {
    /// Return `roll` or a replacement in `1..=sides`.
    fn confirm(&mut self, label: &str, roll: i32, sides: u32) -> i32;
}

/// Keeps every computed roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptRoll;

impl RollConfirm for AcceptRoll {
    fn confirm(&mut self, _label: &str, roll: i32, _sides: u32) -> i32 {
        roll
    }
}

/// Parse an override typed at a prompt. `Some(None)` keeps the roll (blank
/// input), `None` means the input was not a face of the die.
pub fn parse_override(input: &str, sides: u32) -> Option<Option<i32>> {
    let input = input.trim();
    if input.is_empty() {
        return Some(None);
    }
    let value: i32 = input.parse().ok()?;
    (1..=sides as i32).contains(&value).then_some(Some(value))
}

#[derive(Debug, Clone, Copy)]
pub struct CheckInput {
    pub dc: i32,
    pub modifier: i32,
    pub mode: AdMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    pub roll: i32,
    pub total: i32,
    pub dc: i32,
    pub passed: bool,
}

/// The d20 for `label`, rolled per `mode` and offered to `confirm`.
pub fn roll_d20(dice: &mut Dice, confirm: &mut dyn RollConfirm, label: &str, mode: AdMode) -> i32 {
    confirm.confirm(label, dice.d20(mode) as i32, 20)
}

/// Roll a d20 (with advantage/disadvantage), add modifier, compare vs DC.
pub fn check(
    dice: &mut Dice,
    confirm: &mut dyn RollConfirm,
    label: &str,
    input: CheckInput,
) -> CheckResult {
    let roll = roll_d20(dice, confirm, label, input.mode);
    let total = roll + input.modifier;
    CheckResult { roll, total, dc: input.dc, passed: total >= input.dc }
}

/// Modifier `who` adds to a check named by an abbreviated ability.
pub fn check_modifier(who: &Combatant, kind: &str) -> Result<i32, AttrError> {
    let ability = Ability::resolve(kind)?;
    Ok(who.abilities().modifier(ability))
}

/// An ability check against `dc`, with the d20 offered to `confirm`.
pub fn check_against(
    dice: &mut Dice,
    confirm: &mut dyn RollConfirm,
    who: &Combatant,
    kind: &str,
    dc: i32,
    mode: AdMode,
) -> Result<CheckResult, AttrError> {
    let ability = Ability::resolve(kind)?;
    let modifier = who.abilities().modifier(ability);
    let label = format!("{} {}", who.name(), ability);
    let res = check(dice, confirm, &label, CheckInput { dc, modifier, mode });
    info!(
        who = who.name(),
        %ability,
        modifier,
        dc,
        total = res.total,
        passed = res.passed,
        "{ability} check ({modifier:+}) DC {dc}: roll {}: {}",
        res.total,
        if res.passed { "success" } else { "failure" }
    );
    Ok(res)
}
