//! Game-master toolkit: dice, fuzzy lookups, character and monster loading,
//! initiative.

pub mod ability;
pub mod api;
pub mod character;
pub mod checks;
pub mod content;
pub mod dice;
pub mod encounter;
pub mod fuzzy;
pub mod hit_points;
pub mod loader;
pub mod monster;
pub mod record;
pub mod tables;
pub mod tree;

pub use ability::{Abilities, Ability, AbilityScore};
pub use character::Character;
pub use checks::{AcceptRoll, CheckInput, CheckResult, RollConfirm, check};
pub use dice::{AdMode, Dice, DiceParseError, Roll};
pub use encounter::{Combatant, Encounter};
pub use fuzzy::{LookupError, MatchError, fuzzy_get, fuzzy_get_or, fuzzy_match};
pub use hit_points::HitPoints;
pub use loader::{Batch, LoadError, LoadFailure};
pub use monster::{Challenge, ChallengeError, MonsterInstance, MonsterTemplate};
pub use record::{AttrError, Record, RecordList, Value};
pub use tree::{EntityError, Tree};
