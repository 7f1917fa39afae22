//! Every line of text the world says to players.
//!
//! Actors compose responses and broadcasts from these helpers so the wording
//! lives in one place.

pub const OKAY: &str = "Okay.";
pub const DONT_UNDERSTAND: &str = "I don't understand.";
pub const GO_WHERE: &str = "Go where?";
pub const CANNOT_GO: &str = "You cannot go in that direction.";
pub const KILL_WHAT: &str = "Kill what?";
pub const BARE_HANDS: &str = "With what? Your bare hands?";
pub const KILL_YOURSELF: &str = "You can't kill yourself!";
pub const NOT_IN_ROOM: &str = "You are not in any room.";
pub const YOU_DIED: &str = "You died!";
pub const DEFAULT_PLAYER_NAME: &str = "nobody";
pub const HELP: &str = "Available commands: Look, North, South, East, West, Kill, Drop, Take, Inventory, Shout, Whisper, End";

const THINGS_HEADER: &str = "The following things are present:";
const OCCUPANTS_HEADER: &str = "Beware! These guys are in the room with you:";
const HOLDING_HEADER: &str = "You are holding the following items:";

// ============================================================================
// Room broadcasts
// ============================================================================

pub fn entered(name: &str) -> String {
    format!("{name} entered the room.")
}

pub fn left_room(name: &str) -> String {
    format!("{name} left the room.")
}

pub fn left_game(name: &str) -> String {
    format!("{name} left the game.")
}

/// Death announcement for the victim's room.
///
/// ```
/// use adventure_core::narrative::death;
///
/// assert_eq!(death("Amy", Some("Bob"), Some("sword")), "Amy was killed by Bob using a sword.");
/// assert_eq!(death("Amy", None, None), "Amy died.");
/// ```
pub fn death(victim: &str, killer: Option<&str>, weapon: Option<&str>) -> String {
    match (killer, weapon) {
        (Some(killer), Some(weapon)) => format!("{victim} was killed by {killer} using a {weapon}."),
        (Some(killer), None) => format!("{victim} was killed by {killer}."),
        (None, Some(weapon)) => format!("{victim} was killed with a {weapon}."),
        (None, None) => format!("{victim} died."),
    }
}

pub fn whispers(sender: &str, words: &str) -> String {
    format!("{sender} whispers '{words}'")
}

pub fn shouts(sender: &str, words: &str) -> String {
    format!("{sender} SHOUTS '{}'", words.to_uppercase())
}

/// Renders a room as seen by one occupant.
///
/// `things` are the names on the floor; `others` are the names of every
/// player and monster present except the asker. Each line ends with `\n`.
pub fn describe_room<'a>(
    description: &str,
    things: impl IntoIterator<Item = &'a str>,
    others: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut out = String::new();
    push_line(&mut out, description);
    push_section(&mut out, THINGS_HEADER, things);
    push_section(&mut out, OCCUPANTS_HEADER, others);
    out
}

// ============================================================================
// Player responses
// ============================================================================

pub fn inventory<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.into_iter().collect();
    format!("You are carrying: {}", names.join(" "))
}

/// Trailer appended after a move attempt. Empty when nothing is carried.
pub fn holding<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    let mut names = names.into_iter().peekable();
    if names.peek().is_some() {
        push_line(&mut out, HOLDING_HEADER);
        for name in names {
            push_line(&mut out, name);
        }
    }
    out
}

pub fn cannot_see(target: &str) -> String {
    format!("I can't see {target} here. Are you sure?")
}

pub fn now_dead(target: &str) -> String {
    format!("{target} is now dead.")
}

pub fn you_whispered(words: &str) -> String {
    format!("You whispered '{words}'")
}

pub fn you_shouted(words: &str) -> String {
    format!("You shouted '{words}'")
}

/// Private notice delivered to a player who has just died.
pub fn killed_notice(killer: Option<&str>) -> String {
    match killer {
        Some(killer) => format!("You were killed by {killer}!"),
        None => YOU_DIED.to_string(),
    }
}

// ============================================================================
// Monster responses
// ============================================================================

pub fn monster_dead(name: &str) -> String {
    format!("{name} is dead.")
}

pub fn snuck_away(name: &str) -> String {
    format!("{name} snuck away. You were too slow!")
}

pub fn already_dead(name: &str) -> String {
    format!("{name} is already dead. You were too slow and someone else got to him!")
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_section<'a>(out: &mut String, header: &str, items: impl IntoIterator<Item = &'a str>) {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return;
    }
    push_line(out, header);
    for item in items {
        out.push_str("  ");
        push_line(out, item);
    }
}
