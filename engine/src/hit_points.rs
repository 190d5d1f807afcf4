use std::fmt;

use crate::record::Record;
use crate::tree::{EntityError, Fields, Tree, to_int};

const HP_FIELDS: [&str; 3] = ["max", "current", "temporary_max"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
    pub temporary_max: i32,
}

impl HitPoints {
    /// Fresh at full health: current and temporary maximum equal `max`.
    pub fn new(max: i32) -> Self {
        Self::with(max, None, None)
    }

    pub fn with(max: i32, current: Option<i32>, temporary_max: Option<i32>) -> Self {
        Self {
            max,
            current: current.unwrap_or(max),
            temporary_max: temporary_max.unwrap_or(max),
        }
    }

    /// Lose `amount` HP, stopping at zero.
    pub fn damage(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).max(0);
    }

    /// Regain `amount` HP, up to the temporary maximum.
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current = (self.current + amount).min(self.temporary_max.max(self.current));
    }

    pub fn is_down(&self) -> bool {
        self.current <= 0
    }

    /// A bare integer (the maximum) or a mapping of `max`, `current` and
    /// `temporary_max`, keys abbreviated freely.
    pub fn from_tree(tree: &Tree) -> Result<Self, EntityError> {
        if tree.is_mapping() {
            let fields = Fields::resolve(tree, "hit_points", &HP_FIELDS, true)?;
            let max = positive(hp(fields.require("max")?, "max")?, "max")?;
            let current = fields.get("current").map(|t| hp(t, "current")).transpose()?;
            let temporary_max = fields.get("temporary_max").map(|t| hp(t, "temporary_max")).transpose()?;
            Ok(Self::with(max, current, temporary_max))
        } else {
            Ok(Self::new(positive(hp(tree, "hit_points")?, "hit_points")?))
        }
    }

    pub fn record(&self) -> Record {
        Record::new()
            .with("max", self.max)
            .with("current", self.current)
            .with("temporary_max", self.temporary_max)
    }
}

impl fmt::Display for HitPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.temporary_max)?;
        if self.temporary_max != self.max {
            write!(f, " (max {})", self.max)?;
        }
        Ok(())
    }
}

fn hp(tree: &Tree, field: &str) -> Result<i32, EntityError> {
    i32::try_from(to_int(tree, field)?).map_err(|_| EntityError::Shape {
        field: field.to_string(),
        expected: "a 32-bit integer",
    })
}

fn positive(value: i32, field: &str) -> Result<i32, EntityError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(EntityError::Shape { field: field.to_string(), expected: "a positive integer" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heal_caps_at_temporary_max() {
        let mut hp = HitPoints::with(10, Some(4), Some(12));
        hp.heal(20);
        assert_eq!(hp.current, 12);
        hp.damage(50);
        assert_eq!(hp.current, 0);
        assert!(hp.is_down());
    }
}
