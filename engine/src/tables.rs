//! Static reference tables from the Basic Rules.

pub const ABILITIES: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

pub const RACES: [&str; 4] = ["elf", "half-elf", "human", "tiefling"];

pub const CLASSES: [&str; 6] = ["barbarian", "cleric", "druid", "monk", "ranger", "wizard"];

pub const MAX_LEVEL: u32 = 20;

/// `(proficiency bonus, XP needed)` for levels 1 through 20.
pub const LEVELS: [(i32, u32); MAX_LEVEL as usize] = [
    (2, 0),
    (2, 300),
    (2, 900),
    (2, 2_700),
    (3, 6_500),
    (3, 14_000),
    (3, 23_000),
    (3, 34_000),
    (4, 48_000),
    (4, 64_000),
    (4, 85_000),
    (4, 100_000),
    (5, 120_000),
    (5, 140_000),
    (5, 165_000),
    (5, 195_000),
    (6, 225_000),
    (6, 265_000),
    (6, 305_000),
    (6, 355_000),
];

// Basic Rules p. 113.
pub const XP_BY_CHALLENGE: [(f64, u32); 34] = [
    (0.0, 10),
    (0.125, 25),
    (0.25, 50),
    (0.5, 100),
    (1.0, 200),
    (2.0, 450),
    (3.0, 700),
    (4.0, 1_100),
    (5.0, 1_800),
    (6.0, 2_300),
    (7.0, 2_900),
    (8.0, 3_900),
    (9.0, 5_000),
    (10.0, 5_900),
    (11.0, 7_200),
    (12.0, 8_400),
    (13.0, 10_000),
    (14.0, 11_500),
    (15.0, 13_000),
    (16.0, 15_000),
    (17.0, 18_000),
    (18.0, 20_000),
    (19.0, 22_000),
    (20.0, 25_000),
    (21.0, 33_000),
    (22.0, 41_000),
    (23.0, 50_000),
    (24.0, 62_000),
    (25.0, 75_000),
    (26.0, 90_000),
    (27.0, 105_000),
    (28.0, 120_000),
    (29.0, 135_000),
    (30.0, 155_000),
];

/// Highest level whose XP threshold `xp` has reached.
pub fn level_for_xp(xp: u32) -> u32 {
    LEVELS.iter().take_while(|(_, needed)| xp >= *needed).count() as u32
}

/// Proficiency bonus at `level`, clamped to the table's range.
pub fn proficiency_bonus(level: u32) -> i32 {
    let index = level.clamp(1, MAX_LEVEL) as usize - 1;
    LEVELS[index].0
}

pub fn xp_for_challenge(challenge: f64) -> Option<u32> {
    XP_BY_CHALLENGE
        .iter()
        .find(|(cr, _)| *cr == challenge)
        .map(|(_, xp)| *xp)
}
