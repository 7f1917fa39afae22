//! Cardinal directions and their single-letter shortcuts.

use std::str::FromStr;

/// The four directions monsters wander in and players can type bare.
///
/// Room exits are keyed by free-form names; these are only the ones the
/// parser and the monster timer know about.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantArray,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Expands `n`/`s`/`e`/`w` and parses full names.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "n" => Some(Direction::North),
            "s" => Some(Direction::South),
            "e" => Some(Direction::East),
            "w" => Some(Direction::West),
            other => Direction::from_str(other).ok(),
        }
    }

    /// Lowercase name, as used for room exits.
    pub fn name(self) -> &'static str {
        self.into()
    }
}
