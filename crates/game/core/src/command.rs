//! Text command interpretation.
//!
//! Turns one raw input line into a [`Command`]. Parsing never fails: anything
//! the parser does not recognise becomes [`Command::Unknown`], which the player
//! actor answers with a narrative line.

use crate::direction::Direction;

/// Filler words dropped before splitting. Each is only removed when bounded by
/// spaces on both sides, so a leading "the" survives.
const STOP_WORDS: [&str; 3] = [" on ", " the ", " a "];

/// A parsed player command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Look,
    /// Move through an exit. `None` when the player typed a bare `go`.
    Go(Option<String>),
    /// Attack someone in the room. The target keeps the player's casing.
    Kill(Option<String>),
    Drop(String),
    Take(String),
    Inventory,
    Shout(String),
    Whisper(String),
    Help,
    End,
    Unknown,
}

impl Command {
    /// Whether a killed player may still issue this command.
    pub fn allowed_when_dead(&self) -> bool {
        matches!(self, Command::End)
    }
}

/// Parses a raw command line.
pub fn parse_command(line: &str) -> Command {
    let line = strip_stop_words(line);
    let words: Vec<&str> = line.split_whitespace().collect();

    let Some(first) = words.first() else {
        return Command::Unknown;
    };
    let verb = first.to_lowercase();
    let args = &words[1..];

    if let Some(direction) = Direction::from_word(&verb)
        && (verb.len() == 1 || verb == direction.name())
    {
        return Command::Go(Some(direction.name().to_string()));
    }

    match verb.as_str() {
        "l" | "look" => Command::Look,
        "go" => Command::Go(args.first().map(|word| normalize_exit(word))),
        "kill" => {
            if args.is_empty() {
                Command::Kill(None)
            } else {
                Command::Kill(Some(args.join(" ")))
            }
        }
        "drop" => Command::Drop(rest(args)),
        "take" => Command::Take(rest(args)),
        "i" | "inv" | "inventory" => Command::Inventory,
        "shout" => Command::Shout(rest(args)),
        "whisper" => Command::Whisper(rest(args)),
        "help" => Command::Help,
        "end" => Command::End,
        _ => Command::Unknown,
    }
}

fn strip_stop_words(line: &str) -> String {
    STOP_WORDS
        .iter()
        .fold(line.to_string(), |acc, word| acc.replace(word, " "))
}

/// Everything after the verb, lower-cased.
fn rest(args: &[&str]) -> String {
    args.join(" ").trim().to_lowercase()
}

/// Exit names are stored lower-case; shortcuts expand to full names.
fn normalize_exit(word: &str) -> String {
    let word = word.to_lowercase();
    match Direction::from_word(&word) {
        Some(direction) => direction.name().to_string(),
        None => word,
    }
}
