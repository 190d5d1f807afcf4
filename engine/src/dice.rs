//! Dice expressions and the random source that samples them.
//!
//! A [`Roll`] is an immutable `(sides, count, modifier)` value such as
//! `2d6+3`. Sampling always goes through a [`Dice`], which owns the RNG so
//! callers can pick a seeded or an entropy-backed source.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<flat>[+-]?\d+)|(?P<count>\d+)?[dD](?P<sides>\d+)(?:(?P<sign>[+-])(?P<inc>\d+))?)$")
        .expect("dice notation regex is valid")
});

/// Most dice one expression may roll.
pub const MAX_COUNT: u32 = 1_000;
/// Most faces one die may have.
pub const MAX_SIDES: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    #[error("invalid dice notation: {0:?}")]
    Invalid(String),
    #[error("dice notation out of range: {0:?} (at most {}d{})", MAX_COUNT, MAX_SIDES)]
    OutOfRange(String),
}

/// A dice expression: `count` dice with `sides` faces plus a flat `modifier`.
///
/// A flat value carries no dice at all: `sides == 0` and `count == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Roll {
    sides: u32,
    count: u32,
    modifier: i32,
}

pub const D4: Roll = Roll::die(4);
pub const D6: Roll = Roll::die(6);
pub const D8: Roll = Roll::die(8);
pub const D10: Roll = Roll::die(10);
pub const D12: Roll = Roll::die(12);
pub const D20: Roll = Roll::die(20);

impl Roll {
    /// Build an expression. Zero dice or zero sides collapses to a flat value.
    pub const fn new(sides: u32, count: u32, modifier: i32) -> Self {
        if sides == 0 || count == 0 {
            Self::flat(modifier)
        } else {
            Self { sides, count, modifier }
        }
    }

    pub const fn flat(value: i32) -> Self {
        Self { sides: 0, count: 0, modifier: value }
    }

    /// A single die with `sides` faces.
    pub const fn die(sides: u32) -> Self {
        Self::new(sides, 1, 0)
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    pub fn is_flat(&self) -> bool {
        self.count == 0
    }

    /// `n` copies of this expression's dice; the modifier is kept once.
    /// `None` when the result would roll more than [`MAX_COUNT`] dice.
    pub fn scale(&self, n: u32) -> Option<Self> {
        let count = self.count.checked_mul(n).filter(|&c| c <= MAX_COUNT)?;
        Some(Self::new(self.sides, count, self.modifier))
    }

    /// Add `delta` to the modifier, saturating at the `i32` bounds.
    pub fn shift(&self, delta: i32) -> Self {
        Self { modifier: self.modifier.saturating_add(delta), ..*self }
    }

    pub fn min(&self) -> i32 {
        saturate(i64::from(self.count) + i64::from(self.modifier))
    }

    pub fn max(&self) -> i32 {
        let dice = i64::from(self.count).saturating_mul(i64::from(self.sides));
        saturate(dice.saturating_add(i64::from(self.modifier)))
    }

    /// Expected value, rounded down.
    pub fn average(&self) -> i32 {
        let per_die = (1.0 + self.sides as f64) / 2.0;
        let mean = (self.count as f64 * per_die + self.modifier as f64).floor();
        // `as` saturates float to int.
        mean as i32
    }

    pub fn parse(notation: &str) -> Result<Self, DiceParseError> {
        let invalid = || DiceParseError::Invalid(notation.to_string());
        let out_of_range = || DiceParseError::OutOfRange(notation.to_string());
        let caps = NOTATION.captures(notation.trim()).ok_or_else(invalid)?;

        if let Some(flat) = caps.name("flat") {
            let value = flat.as_str().parse::<i32>().map_err(|_| invalid())?;
            return Ok(Self::flat(value));
        }

        let count = match caps.name("count") {
            Some(m) => m.as_str().parse::<u32>().map_err(|_| out_of_range())?,
            None => 1,
        };
        let sides = caps["sides"].parse::<u32>().map_err(|_| out_of_range())?;
        if sides == 0 {
            return Err(invalid());
        }
        if count > MAX_COUNT || sides > MAX_SIDES {
            return Err(out_of_range());
        }
        let inc = match caps.name("inc") {
            Some(m) => m.as_str().parse::<i32>().map_err(|_| invalid())?,
            None => 0,
        };
        let modifier = match caps.name("sign").map(|m| m.as_str()) {
            Some("-") => -inc,
            _ => inc,
        };
        Ok(Self::new(sides, count, modifier))
    }
}

impl FromStr for Roll {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_flat() {
            return write!(f, "{}", self.modifier);
        }
        if self.count > 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "d{}", self.sides)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}

impl Add<i32> for Roll {
    type Output = Roll;

    fn add(self, delta: i32) -> Roll {
        self.shift(delta)
    }
}

fn saturate(total: i64) -> i32 {
    total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdMode {
    Normal,
    Advantage,
    Disadvantage,
}

/// The randomness provider handed to everything that rolls.
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    /// One uniform draw in `1..=sides`.
    pub fn die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides)
    }

    /// Sum of the dice plus the modifier, saturating at the `i32` bounds.
    pub fn sample(&mut self, roll: &Roll) -> i32 {
        let dice: i64 = (0..roll.count).map(|_| i64::from(self.die(roll.sides))).sum();
        let total = saturate(dice + i64::from(roll.modifier));
        debug!(roll = %roll, total, "sampled");
        total
    }

    /// `n` independent samples of the same expression.
    pub fn repeat(&mut self, n: usize, roll: &Roll) -> Vec<i32> {
        (0..n).map(|_| self.sample(roll)).collect()
    }

    pub fn d20(&mut self, mode: AdMode) -> u8 {
        let mut roll = || self.rng.gen_range(1..=20);
        match mode {
            AdMode::Normal => roll(),
            AdMode::Advantage => { let a = roll(); let b = roll(); a.max(b) }
            AdMode::Disadvantage => { let a = roll(); let b = roll(); a.min(b) }
        }
    }

    /// Uniform real in `[0, 1)`, used to break initiative ties.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

impl Default for Dice {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_collapses_to_flat() {
        assert_eq!(Roll::new(6, 0, 3), Roll::flat(3));
        assert_eq!(D6.scale(0), Some(Roll::flat(0)));
    }

    #[test]
    fn signed_flat_values_parse() {
        assert_eq!(Roll::parse("-2").unwrap(), Roll::flat(-2));
        assert_eq!(Roll::parse(" 5 ").unwrap(), Roll::flat(5));
    }
}
